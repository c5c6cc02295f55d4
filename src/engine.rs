//! Entry point for the surrounding application.
//!
//! [`PlanningEngine`] bundles a validated configuration with its travel
//! resolver so callers can run assignments and day plans without wiring
//! the components themselves.

use chrono::NaiveDate;

use crate::assigner::{Assigner, AssignmentPolicy, AssignmentRun};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::model::{Prospect, Rep, RepId, Visit, VisitId};
use crate::optimizer::{OptimizedRoute, RouteOptimizer};
use crate::osrm::OsrmClient;
use crate::scheduler::{Route, RouteScheduler};
use crate::travel::TravelResolver;

pub struct PlanningEngine {
    config: EngineConfig,
    resolver: TravelResolver,
}

impl PlanningEngine {
    /// Validate `config` and build the matching travel resolver.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let resolver = TravelResolver::from_config(&config);
        Ok(Self { config, resolver })
    }

    /// Use a caller-supplied resolver, e.g. one backed by a custom exact
    /// provider.
    pub fn with_resolver(config: EngineConfig, resolver: TravelResolver) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self { config, resolver })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// HTTP requests issued by the OSRM client so far; `None` when no OSRM
    /// backend is in use.
    pub fn exact_request_count(&self) -> Option<u64> {
        self.resolver.osrm().map(OsrmClient::request_count)
    }

    /// Forget cached OSRM routes. No-op in estimated-only mode.
    pub fn clear_distance_cache(&self) {
        if let Some(osrm) = self.resolver.osrm() {
            osrm.clear_cache();
        }
    }

    pub fn assign(
        &self,
        policy: &AssignmentPolicy,
        prospects: &[Prospect],
        reps: &[Rep],
    ) -> Result<AssignmentRun, EngineError> {
        Assigner::new(&self.config).run(policy, prospects, reps)
    }

    pub fn schedule_day(
        &self,
        rep_id: &RepId,
        date: NaiveDate,
        visits: &[Visit],
    ) -> Result<Route, EngineError> {
        self.scheduler().schedule(rep_id, date, visits)
    }

    pub fn optimize_day(
        &self,
        rep_id: &RepId,
        date: NaiveDate,
        visits: &[Visit],
        start: Option<&VisitId>,
    ) -> Result<OptimizedRoute, EngineError> {
        RouteOptimizer::new(self.scheduler()).optimize(rep_id, date, visits, start)
    }

    pub fn schedule_day_in_order(
        &self,
        rep_id: &RepId,
        date: NaiveDate,
        visits: &[Visit],
        order: &[VisitId],
    ) -> Result<OptimizedRoute, EngineError> {
        RouteOptimizer::new(self.scheduler()).optimize_with_order(rep_id, date, visits, order)
    }

    fn scheduler(&self) -> RouteScheduler<'_> {
        RouteScheduler::new(&self.config, &self.resolver)
    }
}
