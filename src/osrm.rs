//! OSRM HTTP adapter for exact point-to-point travel.
//!
//! Results are cached per ordered location pair for the lifetime of the
//! client. Failures are reported, never estimated; the caller decides the
//! fallback.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DistanceError;
use crate::traits::{DistanceProvider, Location, ProviderKind, TravelEstimate};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

type PairKey = (String, String);

/// Blocking client for the OSRM route service.
///
/// OSRM routes between coordinates only. Locations that carry just a street
/// address must be geocoded by the caller first; otherwise the lookup fails
/// with [`DistanceError::MissingCoordinates`] without issuing a request.
#[derive(Debug)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
    cache: RwLock<HashMap<PairKey, TravelEstimate>>,
    requests: AtomicU64,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            config,
            client,
            cache: RwLock::new(HashMap::new()),
            requests: AtomicU64::new(0),
        })
    }

    /// Number of HTTP requests issued so far (cache hits excluded).
    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    pub fn cached_pairs(&self) -> usize {
        self.cache.read().len()
    }

    pub fn clear_cache(&self) {
        self.cache.write().clear();
    }

    fn fetch(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<TravelEstimate, DistanceError> {
        let from = origin.coordinates.ok_or(DistanceError::MissingCoordinates)?;
        let to = destination
            .coordinates
            .ok_or(DistanceError::MissingCoordinates)?;

        let url = format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?overview=false",
            self.config.base_url, self.config.profile, from.lng, from.lat, to.lng, to.lat
        );

        self.requests.fetch_add(1, Ordering::Relaxed);
        let body = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OsrmRouteResponse>())?;

        if body.code != "Ok" {
            return Err(DistanceError::NoRoute(body.code));
        }
        let route = body
            .routes
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| DistanceError::Malformed("response has no routes".to_string()))?;

        Ok(TravelEstimate {
            distance_km: route.distance / 1000.0,
            duration_min: route.duration / 60.0,
        })
    }
}

impl DistanceProvider for OsrmClient {
    fn distance(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<TravelEstimate, DistanceError> {
        let key = (origin.key(), destination.key());
        if let Some(hit) = self.cache.read().get(&key) {
            return Ok(*hit);
        }

        let estimate = self.fetch(origin, destination)?;
        debug!(
            from = %key.0,
            to = %key.1,
            distance_km = estimate.distance_km,
            "osrm route resolved"
        );
        self.cache.write().insert(key, estimate);
        Ok(estimate)
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Exact
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    routes: Option<Vec<OsrmRoute>>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    /// Meters.
    distance: f64,
    /// Seconds.
    duration: f64,
}
