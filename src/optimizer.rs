//! Travel-reducing reordering of a day's visits.
//!
//! The default ordering is a nearest-neighbour walk over the travel
//! matrix. Callers with access to a better solver may pass their own order
//! instead. Either way the reordered day is scheduled with the same rules
//! as the baseline and is only kept when it schedules at least as many
//! visits over no more distance.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::error::EngineError;
use crate::model::{RepId, Visit, VisitId};
use crate::scheduler::{Route, RouteScheduler};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizedRoute {
    pub route: Route,
    /// The priority-ordered schedule the optimisation is measured against.
    pub baseline: Route,
    pub distance_saved_km: f64,
    pub travel_minutes_saved: f64,
    /// False when the candidate order was rejected in favour of the baseline.
    pub reordered: bool,
}

pub struct RouteOptimizer<'a> {
    scheduler: RouteScheduler<'a>,
}

impl<'a> RouteOptimizer<'a> {
    pub fn new(scheduler: RouteScheduler<'a>) -> Self {
        Self { scheduler }
    }

    /// Reorder with nearest neighbour, starting from `start` or from the
    /// highest-priority visit.
    pub fn optimize(
        &self,
        rep_id: &RepId,
        date: NaiveDate,
        visits: &[Visit],
        start: Option<&VisitId>,
    ) -> Result<OptimizedRoute, EngineError> {
        let day = self.scheduler.day_visits(rep_id, date, visits);
        let first = match start {
            Some(id) => day
                .iter()
                .position(|v| &v.id == id)
                .ok_or_else(|| EngineError::UnknownVisit(id.clone()))?,
            None => 0,
        };

        let order = self.nearest_neighbor(&day, first);
        let ordered = order.into_iter().map(|i| day[i].clone()).collect();
        self.finish(rep_id, date, day, ordered)
    }

    /// Schedule an externally computed order.
    ///
    /// Visits of the day missing from `order` are appended in priority
    /// order.
    pub fn optimize_with_order(
        &self,
        rep_id: &RepId,
        date: NaiveDate,
        visits: &[Visit],
        order: &[VisitId],
    ) -> Result<OptimizedRoute, EngineError> {
        let day = self.scheduler.day_visits(rep_id, date, visits);

        let mut taken = vec![false; day.len()];
        let mut ordered = Vec::with_capacity(day.len());
        for id in order {
            let index = day
                .iter()
                .position(|v| &v.id == id)
                .ok_or_else(|| EngineError::UnknownVisit(id.clone()))?;
            if !taken[index] {
                taken[index] = true;
                ordered.push(day[index].clone());
            }
        }
        for (index, visit) in day.iter().enumerate() {
            if !taken[index] {
                ordered.push(visit.clone());
            }
        }

        self.finish(rep_id, date, day, ordered)
    }

    fn nearest_neighbor(&self, day: &[Visit], first: usize) -> Vec<usize> {
        if day.is_empty() {
            return Vec::new();
        }

        let locations: Vec<_> = day.iter().map(|v| &v.location).collect();
        let matrix = self.scheduler.resolver().matrix(&locations);

        let mut visited = vec![false; day.len()];
        let mut order = Vec::with_capacity(day.len());
        let mut current = first;
        visited[current] = true;
        order.push(current);

        while order.len() < day.len() {
            let mut next: Option<usize> = None;
            for candidate in 0..day.len() {
                if visited[candidate] {
                    continue;
                }
                let closer = next.is_none_or(|best| {
                    matrix[current][candidate].estimate.distance_km
                        < matrix[current][best].estimate.distance_km
                });
                if closer {
                    next = Some(candidate);
                }
            }

            let Some(next) = next else { break };
            visited[next] = true;
            order.push(next);
            current = next;
        }

        order
    }

    fn finish(
        &self,
        rep_id: &RepId,
        date: NaiveDate,
        day: Vec<Visit>,
        ordered: Vec<Visit>,
    ) -> Result<OptimizedRoute, EngineError> {
        let baseline = self.scheduler.schedule_in_order(rep_id, date, day)?;
        let candidate = self.scheduler.schedule_in_order(rep_id, date, ordered)?;

        let keeps_feasibility = candidate.visits.len() >= baseline.visits.len();
        let travels_less = candidate.visits.len() > baseline.visits.len()
            || candidate.totals.distance_km <= baseline.totals.distance_km;
        let reordered = keeps_feasibility && travels_less;

        let route = if reordered {
            candidate
        } else {
            baseline.clone()
        };
        let distance_saved_km = baseline.totals.distance_km - route.totals.distance_km;
        let travel_minutes_saved = baseline.totals.travel_minutes - route.totals.travel_minutes;

        info!(
            rep = %rep_id,
            %date,
            reordered,
            distance_saved_km,
            travel_minutes_saved,
            "route optimised"
        );

        Ok(OptimizedRoute {
            route,
            baseline,
            distance_saved_km,
            travel_minutes_saved,
            reordered,
        })
    }
}
