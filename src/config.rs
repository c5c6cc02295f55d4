//! Engine configuration.
//!
//! A single immutable [`EngineConfig`] value is threaded into every engine
//! call. Every section has defaults, so a partial JSON document is enough.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::cost::CostPolicy;
use crate::error::EngineError;
use crate::model::Sector;
use crate::osrm::OsrmConfig;

const DEFAULT_MAX_CONCURRENT_LOOKUPS: usize = 4;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub schedule: ScheduleConfig,
    pub scoring: ScoringWeights,
    pub cost: CostPolicy,
    pub estimate: EstimateConfig,
    /// Exact provider settings. `None` runs the engine in estimated-only mode.
    pub exact: Option<OsrmConfig>,
    pub max_concurrent_lookups: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            schedule: ScheduleConfig::default(),
            scoring: ScoringWeights::default(),
            cost: CostPolicy::default(),
            estimate: EstimateConfig::default(),
            exact: None,
            max_concurrent_lookups: DEFAULT_MAX_CONCURRENT_LOOKUPS,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(raw: &str) -> Result<Self, EngineError> {
        let config: EngineConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        self.schedule.validate()?;
        self.cost.validate()?;
        let speed = self.estimate.average_speed_kmh;
        if speed.is_nan() || speed <= 0.0 {
            return Err(EngineError::InvalidRate {
                name: "average_speed_kmh",
                value: speed,
            });
        }
        Ok(())
    }
}

/// A `[start, end)` window within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    pub fn hm(start: (u32, u32), end: (u32, u32)) -> Self {
        Self {
            start: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap_or(NaiveTime::MIN),
        }
    }

    fn validate(&self, name: &'static str) -> Result<(), EngineError> {
        if self.start >= self.end {
            return Err(EngineError::InvalidTimeWindow {
                name,
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub working_hours: TimeWindow,
    pub lunch: TimeWindow,
    /// Slack added after every visit on top of travel time.
    pub buffer_minutes: u32,
    /// Sector groups in scheduling order. Sectors not listed share the
    /// lowest group.
    pub sector_priority: Vec<Sector>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            working_hours: TimeWindow::hm((8, 0), (18, 0)),
            lunch: TimeWindow::hm((12, 0), (13, 0)),
            buffer_minutes: 10,
            sector_priority: vec![
                Sector::Hotel,
                Sector::Pharmacy,
                Sector::Clinic,
                Sector::Enterprise,
            ],
        }
    }
}

impl ScheduleConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        self.working_hours.validate("working hours")?;
        self.lunch.validate("lunch")
    }

    /// Group rank of a sector; lower ranks are visited first.
    pub fn sector_rank(&self, sector: Sector) -> usize {
        self.sector_priority
            .iter()
            .position(|s| *s == sector)
            .unwrap_or(self.sector_priority.len())
    }
}

/// Point table and thresholds used by the assignment scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub same_zone: i32,
    pub near_km: f64,
    pub near: i32,
    pub medium_km: f64,
    pub medium: i32,

    pub capacity_high_pct: f64,
    pub capacity_high: i32,
    pub capacity_mid_pct: f64,
    pub capacity_mid: i32,
    pub capacity_low_pct: f64,
    pub capacity_low: i32,
    pub overloaded: i32,

    pub conversion_high_pct: f64,
    pub conversion_high: i32,
    pub conversion_mid_pct: f64,
    pub conversion_mid: i32,
    pub rank_first: i32,
    pub rank_second: i32,

    pub negotiation: i32,
    pub qualified: i32,

    pub potential_multiplier: i32,

    /// ScoreRanked assignments below this score are discarded.
    pub threshold: i32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            same_zone: 30,
            near_km: 30.0,
            near: 20,
            medium_km: 50.0,
            medium: 10,

            capacity_high_pct: 50.0,
            capacity_high: 25,
            capacity_mid_pct: 25.0,
            capacity_mid: 15,
            capacity_low_pct: 10.0,
            capacity_low: 5,
            overloaded: -10,

            conversion_high_pct: 20.0,
            conversion_high: 20,
            conversion_mid_pct: 15.0,
            conversion_mid: 10,
            rank_first: 15,
            rank_second: 10,

            negotiation: 15,
            qualified: 10,

            potential_multiplier: 5,

            threshold: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimateConfig {
    /// Assumed average driving speed in km/h.
    pub average_speed_kmh: f64,
}

impl Default for EstimateConfig {
    fn default() -> Self {
        Self {
            average_speed_kmh: 40.0,
        }
    }
}
