//! Test fixtures for territory-planner.
//!
//! Provides:
//! - Named Lyon sites with zones, sectors and coordinates
//! - Builders for prospects, reps and visits
//! - Scripted distance providers (fixed, failing, selectively failing)

#![allow(dead_code)]

pub mod lyon_sites;

use chrono::{NaiveDate, NaiveTime};

use territory_planner::error::DistanceError;
use territory_planner::model::{
    Performance, Prospect, ProspectId, ProspectStatus, Rep, RepId, Sector, Visit, VisitId,
    VisitStatus, VisitType, Workload, Zone,
};
use territory_planner::traits::{DistanceProvider, Location, ProviderKind, TravelEstimate};

pub fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

pub fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

// ============================================================================
// Prospects
// ============================================================================

#[derive(Clone, Debug)]
pub struct ProspectBuilder {
    prospect: Prospect,
}

impl ProspectBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            prospect: Prospect {
                id: ProspectId::new(id),
                name: format!("Prospect {}", id),
                zone: Zone::Center,
                sector: Sector::Hotel,
                status: ProspectStatus::New,
                potential_score: 3,
                coordinates: None,
                address: None,
                budget_hint: None,
            },
        }
    }

    pub fn zone(mut self, zone: Zone) -> Self {
        self.prospect.zone = zone;
        self
    }

    pub fn sector(mut self, sector: Sector) -> Self {
        self.prospect.sector = sector;
        self
    }

    pub fn status(mut self, status: ProspectStatus) -> Self {
        self.prospect.status = status;
        self
    }

    pub fn potential(mut self, score: u8) -> Self {
        self.prospect.potential_score = score;
        self
    }

    pub fn build(self) -> Prospect {
        self.prospect
    }
}

// ============================================================================
// Reps
// ============================================================================

#[derive(Clone, Debug)]
pub struct RepBuilder {
    rep: Rep,
}

impl RepBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            rep: Rep {
                id: RepId::new(id),
                name: format!("Rep {}", id),
                home_zone: Zone::Center,
                home_coordinates: None,
                zones: vec![Zone::Center],
                sectors: vec![Sector::Hotel],
                performance: Performance::default(),
                workload: Workload::default(),
            },
        }
    }

    pub fn home(mut self, zone: Zone) -> Self {
        self.rep.home_zone = zone;
        self
    }

    pub fn zones(mut self, zones: &[Zone]) -> Self {
        self.rep.zones = zones.to_vec();
        self
    }

    pub fn sectors(mut self, sectors: &[Sector]) -> Self {
        self.rep.sectors = sectors.to_vec();
        self
    }

    pub fn capacity(mut self, remaining_pct: f64) -> Self {
        self.rep.workload.remaining_capacity_pct = remaining_pct;
        self
    }

    pub fn conversion(mut self, rate_pct: f64) -> Self {
        self.rep.performance.conversion_rate = rate_pct;
        self
    }

    pub fn ranked(mut self, rank: u32) -> Self {
        self.rep.performance.ranking = Some(rank);
        self
    }

    pub fn build(self) -> Rep {
        self.rep
    }
}

// ============================================================================
// Visits
// ============================================================================

#[derive(Clone, Debug)]
pub struct VisitBuilder {
    visit: Visit,
}

impl VisitBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            visit: Visit {
                id: VisitId::new(id),
                prospect_id: ProspectId::new(format!("p-{}", id)),
                rep_id: RepId::new("rep"),
                date: day(),
                visit_type: VisitType::Discovery,
                status: VisitStatus::Confirmed,
                start_time: None,
                duration_minutes: None,
                sector: Sector::Hotel,
                location: Location::in_zone(Zone::Center),
                priority: None,
            },
        }
    }

    pub fn rep(mut self, rep_id: &str) -> Self {
        self.visit.rep_id = RepId::new(rep_id);
        self
    }

    pub fn kind(mut self, visit_type: VisitType) -> Self {
        self.visit.visit_type = visit_type;
        self
    }

    pub fn duration(mut self, minutes: u32) -> Self {
        self.visit.duration_minutes = Some(minutes);
        self
    }

    pub fn sector(mut self, sector: Sector) -> Self {
        self.visit.sector = sector;
        self
    }

    pub fn zone(mut self, zone: Zone) -> Self {
        self.visit.location = Location::in_zone(zone);
        self
    }

    pub fn at(mut self, location: Location) -> Self {
        self.visit.location = location;
        self
    }

    pub fn starting(mut self, time: NaiveTime) -> Self {
        self.visit.start_time = Some(time);
        self
    }

    pub fn build(self) -> Visit {
        self.visit
    }
}

// ============================================================================
// Distance providers
// ============================================================================

/// Exact provider answering the same leg for every pair.
pub struct FixedTravel {
    pub distance_km: f64,
    pub duration_min: f64,
}

impl DistanceProvider for FixedTravel {
    fn distance(&self, _: &Location, _: &Location) -> Result<TravelEstimate, DistanceError> {
        Ok(TravelEstimate {
            distance_km: self.distance_km,
            duration_min: self.duration_min,
        })
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Exact
    }
}

/// Exact provider that is always down.
pub struct FailingExact;

impl DistanceProvider for FailingExact {
    fn distance(&self, _: &Location, _: &Location) -> Result<TravelEstimate, DistanceError> {
        Err(DistanceError::Timeout)
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Exact
    }
}

/// Exact provider that fails for any trip ending in `unreachable`.
pub struct UnreachableZone {
    pub unreachable: Zone,
    pub leg: FixedTravel,
}

impl DistanceProvider for UnreachableZone {
    fn distance(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<TravelEstimate, DistanceError> {
        if destination.zone == self.unreachable {
            return Err(DistanceError::NoRoute("NoRoute".to_string()));
        }
        self.leg.distance(origin, destination)
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Exact
    }
}
