//! Travel resolution with exact-then-estimated fallback.
//!
//! The resolver asks the exact provider first (when one is configured) and
//! drops to the estimator for that single pair when the lookup fails. Batch
//! lookups fan out on a bounded thread pool and are merged back in input
//! order.

use std::sync::Arc;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::warn;

use crate::config::EngineConfig;
use crate::error::DistanceError;
use crate::haversine::HaversineEstimator;
use crate::osrm::OsrmClient;
use crate::traits::{DistanceProvider, Location, ProviderKind, TravelEstimate};

/// A resolved travel leg and the provider that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    pub estimate: TravelEstimate,
    pub provider: ProviderKind,
}

pub struct TravelResolver {
    estimator: HaversineEstimator,
    exact: Option<Box<dyn DistanceProvider>>,
    /// Set when the exact provider is the OSRM client, for its counter and cache.
    osrm: Option<Arc<OsrmClient>>,
    /// Built once; `None` means lookups run on the calling thread.
    pool: Option<ThreadPool>,
}

impl TravelResolver {
    /// Resolver that never leaves the process.
    pub fn estimated_only(estimator: HaversineEstimator) -> Self {
        Self {
            estimator,
            exact: None,
            osrm: None,
            pool: None,
        }
    }

    pub fn with_exact(
        estimator: HaversineEstimator,
        exact: Box<dyn DistanceProvider>,
        max_concurrent: usize,
    ) -> Self {
        Self {
            estimator,
            exact: Some(exact),
            osrm: None,
            pool: lookup_pool(max_concurrent),
        }
    }

    /// Exact lookups through a shared OSRM client. The caller may keep its
    /// own handle to read the request counter or clear the cache.
    pub fn with_osrm(
        estimator: HaversineEstimator,
        client: Arc<OsrmClient>,
        max_concurrent: usize,
    ) -> Self {
        let mut resolver = Self::with_exact(estimator, Box::new(Arc::clone(&client)), max_concurrent);
        resolver.osrm = Some(client);
        resolver
    }

    /// Build the resolver described by `config`. An exact backend that
    /// cannot be constructed degrades to estimated-only mode.
    pub fn from_config(config: &EngineConfig) -> Self {
        let estimator = HaversineEstimator::new(config.estimate.average_speed_kmh);
        let Some(osrm) = &config.exact else {
            return Self::estimated_only(estimator);
        };

        match OsrmClient::new(osrm.clone()) {
            Ok(client) => Self::with_osrm(estimator, Arc::new(client), config.max_concurrent_lookups),
            Err(err) => {
                warn!(error = %err, "osrm client unavailable, using estimates only");
                Self::estimated_only(estimator)
            }
        }
    }

    pub fn has_exact(&self) -> bool {
        self.exact.is_some()
    }

    pub fn estimator(&self) -> &HaversineEstimator {
        &self.estimator
    }

    pub fn osrm(&self) -> Option<&OsrmClient> {
        self.osrm.as_deref()
    }

    /// Resolve one pair. Never fails.
    pub fn resolve(&self, origin: &Location, destination: &Location) -> Leg {
        if let Some(exact) = &self.exact {
            match exact.distance(origin, destination).and_then(sanitize) {
                Ok(estimate) => {
                    return Leg {
                        estimate,
                        provider: exact.kind(),
                    };
                }
                Err(err) => {
                    warn!(
                        error = %err,
                        from = %origin.key(),
                        to = %destination.key(),
                        "exact distance lookup failed, falling back to estimate"
                    );
                }
            }
        }

        Leg {
            estimate: self.estimator.estimate(origin, destination),
            provider: ProviderKind::Estimated,
        }
    }

    /// Resolve many pairs, preserving input order.
    pub fn resolve_all(&self, pairs: &[(&Location, &Location)]) -> Vec<Leg> {
        match &self.pool {
            Some(pool) if self.exact.is_some() && pairs.len() > 1 => {
                pool.install(|| pairs.par_iter().map(|(a, b)| self.resolve(a, b)).collect())
            }
            _ => pairs.iter().map(|(a, b)| self.resolve(a, b)).collect(),
        }
    }

    /// Full travel matrix over `locations`; the diagonal is zero.
    pub fn matrix(&self, locations: &[&Location]) -> Vec<Vec<Leg>> {
        let n = locations.len();
        let mut pairs = Vec::with_capacity(n * n.saturating_sub(1));
        for (i, from) in locations.iter().enumerate() {
            for (j, to) in locations.iter().enumerate() {
                if i != j {
                    pairs.push((*from, *to));
                }
            }
        }

        let mut resolved = self.resolve_all(&pairs).into_iter();
        let zero = Leg {
            estimate: TravelEstimate {
                distance_km: 0.0,
                duration_min: 0.0,
            },
            provider: ProviderKind::Estimated,
        };

        let mut matrix = vec![vec![zero; n]; n];
        for (i, row) in matrix.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                if i != j {
                    if let Some(leg) = resolved.next() {
                        *cell = leg;
                    }
                }
            }
        }
        matrix
    }
}

fn lookup_pool(max_concurrent: usize) -> Option<ThreadPool> {
    if max_concurrent <= 1 {
        return None;
    }
    match ThreadPoolBuilder::new()
        .num_threads(max_concurrent)
        .thread_name(|i| format!("distance-lookup-{}", i))
        .build()
    {
        Ok(pool) => Some(pool),
        Err(err) => {
            warn!(error = %err, "lookup pool unavailable, resolving sequentially");
            None
        }
    }
}

fn sanitize(estimate: TravelEstimate) -> Result<TravelEstimate, DistanceError> {
    let valid = |v: f64| v.is_finite() && v >= 0.0;
    if valid(estimate.distance_km) && valid(estimate.duration_min) {
        Ok(estimate)
    } else {
        Err(DistanceError::Malformed(format!(
            "negative or non-finite travel {:?}",
            estimate
        )))
    }
}
