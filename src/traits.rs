//! Core traits for travel resolution.
//!
//! The engine never talks to a mapping backend directly; it asks a
//! [`DistanceProvider`] for the distance and duration between two
//! locations. Two implementations ship with the crate: the zone matrix /
//! haversine estimator and the OSRM client.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::DistanceError;
use crate::model::Zone;

/// Geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Where a visit takes place.
///
/// The zone is always known; coordinates and address are optional and only
/// sharpen the estimate (or enable exact lookups) when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub zone: Zone,
    pub coordinates: Option<Coordinates>,
    pub address: Option<String>,
}

impl Location {
    pub fn in_zone(zone: Zone) -> Self {
        Self {
            zone,
            coordinates: None,
            address: None,
        }
    }

    pub fn at(zone: Zone, lat: f64, lng: f64) -> Self {
        Self {
            zone,
            coordinates: Some(Coordinates::new(lat, lng)),
            address: None,
        }
    }

    /// Stable key used by caches and lookup tables.
    pub fn key(&self) -> String {
        match (&self.coordinates, &self.address) {
            (Some(c), _) => format!("{:.6},{:.6}", c.lat, c.lng),
            (None, Some(address)) => format!("addr:{}", address.trim().to_lowercase()),
            (None, None) => format!("zone:{:?}", self.zone),
        }
    }
}

/// Travel distance and duration between two locations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TravelEstimate {
    pub distance_km: f64,
    pub duration_min: f64,
}

/// Which provider produced an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Estimated,
    Exact,
}

/// Resolves travel between two locations.
///
/// Implementations must be shareable across threads: exact lookups are
/// fanned out on a thread pool.
pub trait DistanceProvider: Send + Sync {
    fn distance(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<TravelEstimate, DistanceError>;

    fn kind(&self) -> ProviderKind;
}

impl<P: DistanceProvider + ?Sized> DistanceProvider for Box<P> {
    fn distance(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<TravelEstimate, DistanceError> {
        (**self).distance(origin, destination)
    }

    fn kind(&self) -> ProviderKind {
        (**self).kind()
    }
}

impl<P: DistanceProvider + ?Sized> DistanceProvider for Arc<P> {
    fn distance(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<TravelEstimate, DistanceError> {
        (**self).distance(origin, destination)
    }

    fn kind(&self) -> ProviderKind {
        (**self).kind()
    }
}
