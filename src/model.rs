//! Domain records consumed and produced by the engine.
//!
//! Prospect and rep records are read-only inputs; assignments and routes are
//! plain output values handed back to the caller for persistence.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::traits::{Coordinates, Location};

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(ProspectId);
string_id!(RepId);
string_id!(VisitId);

/// Geographic district. The set is closed; distance estimation relies on
/// [`Zone::index`] addressing the static zone matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    NorthWest,
    North,
    NorthEast,
    West,
    Center,
    East,
    SouthWest,
    South,
    SouthEast,
}

impl Zone {
    pub const ALL: [Zone; 9] = [
        Zone::NorthWest,
        Zone::North,
        Zone::NorthEast,
        Zone::West,
        Zone::Center,
        Zone::East,
        Zone::SouthWest,
        Zone::South,
        Zone::SouthEast,
    ];

    /// Row/column of this zone in the zone distance matrix.
    pub fn index(self) -> usize {
        match self {
            Zone::NorthWest => 0,
            Zone::North => 1,
            Zone::NorthEast => 2,
            Zone::West => 3,
            Zone::Center => 4,
            Zone::East => 5,
            Zone::SouthWest => 6,
            Zone::South => 7,
            Zone::SouthEast => 8,
        }
    }
}

/// Business category of a prospect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    Hotel,
    Pharmacy,
    Clinic,
    Enterprise,
    Retail,
    Restaurant,
    Other,
}

/// Lifecycle of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProspectStatus {
    New,
    Contacted,
    Qualified,
    Proposal,
    Negotiation,
    Won,
    Lost,
}

impl ProspectStatus {
    pub fn is_closed(self) -> bool {
        matches!(self, ProspectStatus::Won | ProspectStatus::Lost)
    }

    /// Whether a lead may move from `self` to `next`.
    ///
    /// Open leads advance one step at a time and may be lost from any open
    /// state. Closed leads never move.
    pub fn can_transition_to(self, next: ProspectStatus) -> bool {
        use ProspectStatus::*;

        if self.is_closed() {
            return false;
        }
        match (self, next) {
            (_, Lost) => true,
            (New, Contacted)
            | (Contacted, Qualified)
            | (Qualified, Proposal)
            | (Proposal, Negotiation)
            | (Negotiation, Won) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prospect {
    pub id: ProspectId,
    pub name: String,
    pub zone: Zone,
    pub sector: Sector,
    pub status: ProspectStatus,
    /// Potential on a 1-5 scale.
    pub potential_score: u8,
    pub coordinates: Option<Coordinates>,
    pub address: Option<String>,
    pub budget_hint: Option<f64>,
}

impl Prospect {
    pub fn location(&self) -> Location {
        Location {
            zone: self.zone,
            coordinates: self.coordinates,
            address: self.address.clone(),
        }
    }
}

/// Rolling performance snapshot of a rep.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Performance {
    /// Conversion rate in percent (22.0 means 22%).
    pub conversion_rate: f64,
    pub visits_completed: u32,
    /// 1-based position in the team ranking, if ranked.
    pub ranking: Option<u32>,
}

/// Workload snapshot of a rep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Workload {
    pub active_prospects: u32,
    /// Remaining capacity in percent (0-100).
    pub remaining_capacity_pct: f64,
}

impl Default for Workload {
    fn default() -> Self {
        Self {
            active_prospects: 0,
            remaining_capacity_pct: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rep {
    pub id: RepId,
    pub name: String,
    pub home_zone: Zone,
    pub home_coordinates: Option<Coordinates>,
    pub zones: Vec<Zone>,
    pub sectors: Vec<Sector>,
    pub performance: Performance,
    pub workload: Workload,
}

impl Rep {
    pub fn home_location(&self) -> Location {
        Location {
            zone: self.home_zone,
            coordinates: self.home_coordinates,
            address: None,
        }
    }
}

/// Coarse proximity class between a rep's home and a prospect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceBucket {
    SameZone,
    Near,
    Medium,
    Far,
}

/// A scored prospect-to-rep pairing. Not persisted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub prospect_id: ProspectId,
    pub rep_id: RepId,
    pub score: i32,
    pub reasons: Vec<String>,
    pub distance_bucket: DistanceBucket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitType {
    Discovery,
    Presentation,
    Negotiation,
    Signature,
    FollowUp,
}

impl VisitType {
    pub fn default_duration_minutes(self) -> u32 {
        match self {
            VisitType::Discovery => 45,
            VisitType::Presentation => 60,
            VisitType::Negotiation => 60,
            VisitType::Signature => 30,
            VisitType::FollowUp => 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitStatus {
    Planned,
    Confirmed,
    Completed,
    Cancelled,
    Postponed,
}

impl VisitStatus {
    pub fn is_schedulable(self) -> bool {
        matches!(self, VisitStatus::Planned | VisitStatus::Confirmed)
    }
}

/// A dated meeting between a rep and a prospect.
///
/// The visit carries the prospect's site (location and sector) so the
/// scheduler never has to reach back into the prospect store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    pub id: VisitId,
    pub prospect_id: ProspectId,
    pub rep_id: RepId,
    pub date: NaiveDate,
    pub visit_type: VisitType,
    pub status: VisitStatus,
    /// Desired start time, if the caller pinned one. Orders the day only;
    /// the scheduler still starts the visit at its running clock.
    pub start_time: Option<NaiveTime>,
    /// Overrides the visit type's default duration.
    pub duration_minutes: Option<u32>,
    pub sector: Sector,
    pub location: Location,
    /// Assignment-derived priority; higher is scheduled earlier within a
    /// sector group.
    pub priority: Option<i32>,
}

impl Visit {
    /// Build a planned visit for `prospect`, copying its site.
    pub fn for_prospect(
        id: VisitId,
        prospect: &Prospect,
        rep_id: RepId,
        date: NaiveDate,
        visit_type: VisitType,
    ) -> Self {
        Self {
            id,
            prospect_id: prospect.id.clone(),
            rep_id,
            date,
            visit_type,
            status: VisitStatus::Planned,
            start_time: None,
            duration_minutes: None,
            sector: prospect.sector,
            location: prospect.location(),
            priority: None,
        }
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
            .unwrap_or_else(|| self.visit_type.default_duration_minutes())
    }
}
