//! territory-planner core
//!
//! Assigns sales prospects to reps under zone/sector eligibility and
//! workload balancing, and turns a rep's confirmed visits into a
//! time-feasible, cost-annotated daily route.

pub mod traits;
pub mod model;
pub mod error;
pub mod config;
pub mod haversine;
pub mod osrm;
pub mod travel;
pub mod cost;
pub mod eligibility;
pub mod scoring;
pub mod assigner;
pub mod scheduler;
pub mod optimizer;
pub mod engine;

pub use engine::PlanningEngine;
pub use error::{DistanceError, EngineError};
