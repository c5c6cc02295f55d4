//! Estimated distance provider (always available).
//!
//! Uses great-circle distance when both ends carry coordinates, and the
//! static zone matrix otherwise. Travel time is derived from an assumed
//! average speed. Less accurate than OSRM (ignores roads) but never fails
//! and never leaves the process.

use crate::error::DistanceError;
use crate::model::Zone;
use crate::traits::{Coordinates, DistanceProvider, Location, ProviderKind, TravelEstimate};

/// Average driving speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Road distance in km between zone centres, indexed by [`Zone::index`].
/// The diagonal is the typical trip length inside one district.
const ZONE_MATRIX_KM: [[f64; 9]; 9] = [
    [4.0, 18.0, 36.0, 18.0, 25.0, 40.0, 36.0, 40.0, 51.0],
    [18.0, 4.0, 18.0, 25.0, 18.0, 25.0, 40.0, 36.0, 40.0],
    [36.0, 18.0, 4.0, 40.0, 25.0, 18.0, 51.0, 40.0, 36.0],
    [18.0, 25.0, 40.0, 4.0, 18.0, 36.0, 18.0, 25.0, 40.0],
    [25.0, 18.0, 25.0, 18.0, 4.0, 18.0, 25.0, 18.0, 25.0],
    [40.0, 25.0, 18.0, 36.0, 18.0, 4.0, 40.0, 25.0, 18.0],
    [36.0, 40.0, 51.0, 18.0, 25.0, 40.0, 4.0, 18.0, 36.0],
    [40.0, 36.0, 40.0, 25.0, 18.0, 25.0, 18.0, 4.0, 18.0],
    [51.0, 40.0, 36.0, 40.0, 25.0, 18.0, 36.0, 18.0, 4.0],
];

/// Zone-matrix distance between two districts.
pub fn zone_distance_km(from: Zone, to: Zone) -> f64 {
    ZONE_MATRIX_KM[from.index()][to.index()]
}

/// Great-circle distance between two points in kilometers.
pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Zone matrix / haversine estimator.
#[derive(Debug, Clone)]
pub struct HaversineEstimator {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineEstimator {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl HaversineEstimator {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Infallible estimate between two locations.
    pub fn estimate(&self, origin: &Location, destination: &Location) -> TravelEstimate {
        let distance_km = match (origin.coordinates, destination.coordinates) {
            (Some(from), Some(to)) => haversine_km(from, to),
            _ => zone_distance_km(origin.zone, destination.zone),
        };

        TravelEstimate {
            distance_km,
            duration_min: self.km_to_minutes(distance_km),
        }
    }

    /// Convert distance in km to travel time in minutes.
    fn km_to_minutes(&self, km: f64) -> f64 {
        km / self.speed_kmh * 60.0
    }
}

impl DistanceProvider for HaversineEstimator {
    fn distance(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<TravelEstimate, DistanceError> {
        Ok(self.estimate(origin, destination))
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Estimated
    }
}
