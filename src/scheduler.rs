//! Daily route scheduling for one rep.
//!
//! Visits are ordered by sector group, desired start time and assignment
//! priority, then walked with a running clock that starts at the beginning
//! of the working day. A desired start time only orders visits. Each visit
//! is placed at the current clock unless it would touch the lunch break
//! (then it moves to lunch end) or run past the end of the day (then it and
//! every later visit are left unscheduled).

use std::cmp::Reverse;

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::model::{RepId, Visit, VisitId};
use crate::traits::ProviderKind;
use crate::travel::{Leg, TravelResolver};

const MINUTES_PER_DAY: i64 = 24 * 60;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledVisit {
    pub visit: Visit,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSegment {
    pub from_visit: VisitId,
    pub to_visit: VisitId,
    pub distance_km: f64,
    pub duration_min: f64,
    pub cost: f64,
    pub provider: ProviderKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouteTotals {
    pub distance_km: f64,
    pub travel_minutes: f64,
    pub visit_minutes: u32,
    /// Visit time plus travel time.
    pub total_minutes: f64,
    pub cost: f64,
    pub exact_segments: usize,
    pub estimated_segments: usize,
}

/// One rep's day. `unscheduled` holds the visits that did not fit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub rep_id: RepId,
    pub date: NaiveDate,
    pub visits: Vec<ScheduledVisit>,
    pub segments: Vec<RouteSegment>,
    pub totals: RouteTotals,
    pub unscheduled: Vec<Visit>,
}

impl Route {
    pub fn visit_ids(&self) -> Vec<&VisitId> {
        self.visits.iter().map(|s| &s.visit.id).collect()
    }

    pub fn is_complete(&self) -> bool {
        self.unscheduled.is_empty()
    }
}

pub struct RouteScheduler<'a> {
    config: &'a EngineConfig,
    resolver: &'a TravelResolver,
}

impl<'a> RouteScheduler<'a> {
    pub fn new(config: &'a EngineConfig, resolver: &'a TravelResolver) -> Self {
        Self { config, resolver }
    }

    pub(crate) fn resolver(&self) -> &TravelResolver {
        self.resolver
    }

    /// Schedule `rep_id`'s visits on `date` in priority order.
    ///
    /// Visits for other reps or dates, and visits that are no longer
    /// planned or confirmed, are ignored.
    pub fn schedule(
        &self,
        rep_id: &RepId,
        date: NaiveDate,
        visits: &[Visit],
    ) -> Result<Route, EngineError> {
        let day = self.day_visits(rep_id, date, visits);
        self.schedule_in_order(rep_id, date, day)
    }

    /// The visits `schedule` would consider, in priority order.
    pub fn day_visits(&self, rep_id: &RepId, date: NaiveDate, visits: &[Visit]) -> Vec<Visit> {
        let mut day: Vec<Visit> = visits
            .iter()
            .filter(|v| {
                let keep = &v.rep_id == rep_id && v.date == date && v.status.is_schedulable();
                if !keep {
                    debug!(visit = %v.id, status = ?v.status, "visit not part of this day");
                }
                keep
            })
            .cloned()
            .collect();
        self.sort_by_priority(&mut day);
        day
    }

    /// Stable sort by sector group, then desired start time (pinned first),
    /// then assignment priority (highest first).
    pub fn sort_by_priority(&self, visits: &mut [Visit]) {
        let schedule = &self.config.schedule;
        visits.sort_by_key(|v| {
            (
                schedule.sector_rank(v.sector),
                v.start_time.is_none(),
                v.start_time,
                Reverse(v.priority),
            )
        });
    }

    /// Schedule visits in exactly the given order.
    pub fn schedule_in_order(
        &self,
        rep_id: &RepId,
        date: NaiveDate,
        ordered: Vec<Visit>,
    ) -> Result<Route, EngineError> {
        self.config.schedule.validate()?;

        let schedule = &self.config.schedule;
        let day_start = minutes_of(schedule.working_hours.start);
        let day_end = minutes_of(schedule.working_hours.end);
        let lunch_start = minutes_of(schedule.lunch.start);
        let lunch_end = minutes_of(schedule.lunch.end);
        let buffer = i64::from(schedule.buffer_minutes);

        let pairs: Vec<_> = ordered
            .windows(2)
            .map(|w| (&w[0].location, &w[1].location))
            .collect();
        let legs = self.resolver.resolve_all(&pairs);

        let mut clock = day_start;
        let mut scheduled: Vec<ScheduledVisit> = Vec::with_capacity(ordered.len());
        let mut unscheduled: Vec<Visit> = Vec::new();

        for (i, visit) in ordered.into_iter().enumerate() {
            if !unscheduled.is_empty() {
                unscheduled.push(visit);
                continue;
            }

            let duration = i64::from(visit.duration_minutes());
            let in_lunch = clock >= lunch_start && clock < lunch_end;
            let overlaps_lunch = clock < lunch_end && clock + duration > lunch_start;
            if in_lunch || overlaps_lunch {
                clock = lunch_end;
            }

            if clock >= day_end || clock + duration > day_end {
                warn!(
                    visit = %visit.id,
                    clock = %time_of(clock),
                    "working day exhausted, remaining visits left unscheduled"
                );
                unscheduled.push(visit);
                continue;
            }

            let start = clock;
            let travel = legs
                .get(i)
                .map(|leg| leg.estimate.duration_min.ceil() as i64)
                .unwrap_or(0);
            clock = start + duration + travel + buffer;

            debug!(
                visit = %visit.id,
                start = %time_of(start),
                duration,
                travel,
                "visit scheduled"
            );
            scheduled.push(ScheduledVisit {
                visit,
                start: time_of(start),
                end: time_of(start + duration),
            });
        }

        let segments = self.segments(&scheduled, &legs)?;
        let totals = totals(&scheduled, &segments);

        info!(
            rep = %rep_id,
            %date,
            scheduled = scheduled.len(),
            unscheduled = unscheduled.len(),
            distance_km = totals.distance_km,
            cost = totals.cost,
            "route scheduled"
        );

        Ok(Route {
            rep_id: rep_id.clone(),
            date,
            visits: scheduled,
            segments,
            totals,
            unscheduled,
        })
    }

    fn segments(
        &self,
        scheduled: &[ScheduledVisit],
        legs: &[Leg],
    ) -> Result<Vec<RouteSegment>, EngineError> {
        scheduled
            .windows(2)
            .zip(legs)
            .map(|(pair, leg)| {
                Ok(RouteSegment {
                    from_visit: pair[0].visit.id.clone(),
                    to_visit: pair[1].visit.id.clone(),
                    distance_km: leg.estimate.distance_km,
                    duration_min: leg.estimate.duration_min,
                    cost: self.config.cost.cost(leg.estimate.distance_km)?,
                    provider: leg.provider,
                })
            })
            .collect()
    }
}

fn totals(scheduled: &[ScheduledVisit], segments: &[RouteSegment]) -> RouteTotals {
    let mut totals = RouteTotals::default();
    for segment in segments {
        totals.distance_km += segment.distance_km;
        totals.travel_minutes += segment.duration_min;
        totals.cost += segment.cost;
        match segment.provider {
            ProviderKind::Exact => totals.exact_segments += 1,
            ProviderKind::Estimated => totals.estimated_segments += 1,
        }
    }
    totals.visit_minutes = scheduled.iter().map(|s| s.visit.duration_minutes()).sum();
    totals.total_minutes = f64::from(totals.visit_minutes) + totals.travel_minutes;
    totals
}

fn minutes_of(time: NaiveTime) -> i64 {
    i64::from(time.num_seconds_from_midnight() / 60)
}

fn time_of(minutes: i64) -> NaiveTime {
    let clamped = minutes.clamp(0, MINUTES_PER_DAY - 1) as u32;
    NaiveTime::from_num_seconds_from_midnight_opt(clamped * 60, 0).unwrap_or(NaiveTime::MIN)
}
