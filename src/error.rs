//! Error types.

use thiserror::Error;

use crate::model::{ProspectId, VisitId};

/// Input rejected before any computation takes place.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no prospects supplied")]
    EmptyProspects,

    #[error("no reps supplied")]
    EmptyReps,

    #[error("manual assignment requires a rep")]
    MissingRep,

    #[error("unknown prospect {0}")]
    UnknownProspect(ProspectId),

    #[error("unknown visit {0}")]
    UnknownVisit(VisitId),

    #[error("distance must be a non-negative number, got {0}")]
    NegativeDistance(f64),

    #[error("{name} must be a non-negative number, got {value}")]
    InvalidRate { name: &'static str, value: f64 },

    #[error("invalid {name} window: {start} must be before {end}")]
    InvalidTimeWindow {
        name: &'static str,
        start: chrono::NaiveTime,
        end: chrono::NaiveTime,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

/// Failure of a single distance lookup. Recovered by the caller.
#[derive(Debug, Error)]
pub enum DistanceError {
    #[error("distance lookup timed out")]
    Timeout,

    #[error("distance backend request failed: {0}")]
    Http(String),

    #[error("distance backend found no route ({0})")]
    NoRoute(String),

    #[error("location has no coordinates to route from")]
    MissingCoordinates,

    #[error("malformed backend response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for DistanceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DistanceError::Timeout
        } else if err.is_decode() {
            DistanceError::Malformed(err.to_string())
        } else {
            DistanceError::Http(err.to_string())
        }
    }
}
