//! Compatibility scoring for eligible (prospect, rep) pairs.
//!
//! The score is the plain sum of five independent contributions. Each
//! non-zero contribution carries a display reason.

use serde::Serialize;

use crate::config::ScoringWeights;
use crate::haversine::HaversineEstimator;
use crate::model::{DistanceBucket, Prospect, ProspectStatus, Rep, Workload};

/// Per-category points. `total()` is the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ScoreBreakdown {
    pub proximity: i32,
    pub capacity: i32,
    pub performance: i32,
    pub urgency: i32,
    pub potential: i32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> i32 {
        self.proximity + self.capacity + self.performance + self.urgency + self.potential
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreCard {
    pub score: i32,
    pub reasons: Vec<String>,
    pub breakdown: ScoreBreakdown,
    pub distance_km: f64,
    pub distance_bucket: DistanceBucket,
}

pub struct AssignmentScorer<'a> {
    weights: &'a ScoringWeights,
    estimator: &'a HaversineEstimator,
}

impl<'a> AssignmentScorer<'a> {
    pub fn new(weights: &'a ScoringWeights, estimator: &'a HaversineEstimator) -> Self {
        Self { weights, estimator }
    }

    /// Score a pair. Callers are expected to have checked eligibility.
    pub fn score(&self, prospect: &Prospect, rep: &Rep, workload: &Workload) -> ScoreCard {
        let w = self.weights;
        let mut reasons = Vec::new();
        let mut breakdown = ScoreBreakdown::default();

        let distance_km = self
            .estimator
            .estimate(&rep.home_location(), &prospect.location())
            .distance_km;
        let distance_bucket = self.bucket(prospect, rep, distance_km);
        breakdown.proximity = match distance_bucket {
            DistanceBucket::SameZone => {
                reasons.push("Same district".to_string());
                w.same_zone
            }
            DistanceBucket::Near => {
                reasons.push(format!("Nearby ({:.0} km)", distance_km));
                w.near
            }
            DistanceBucket::Medium => {
                reasons.push(format!("Within reach ({:.0} km)", distance_km));
                w.medium
            }
            DistanceBucket::Far => 0,
        };

        let free = workload.remaining_capacity_pct;
        breakdown.capacity = if free > w.capacity_high_pct {
            reasons.push(format!("High availability ({:.0}% free)", free));
            w.capacity_high
        } else if free > w.capacity_mid_pct {
            reasons.push(format!("Available capacity ({:.0}% free)", free));
            w.capacity_mid
        } else if free > w.capacity_low_pct {
            reasons.push(format!("Limited capacity ({:.0}% free)", free));
            w.capacity_low
        } else {
            reasons.push(format!("Overloaded ({:.0}% free)", free));
            w.overloaded
        };

        let conversion = rep.performance.conversion_rate;
        if conversion > w.conversion_high_pct {
            reasons.push(format!("Strong conversion rate ({:.0}%)", conversion));
            breakdown.performance += w.conversion_high;
        } else if conversion > w.conversion_mid_pct {
            reasons.push(format!("Good conversion rate ({:.0}%)", conversion));
            breakdown.performance += w.conversion_mid;
        }
        match rep.performance.ranking {
            Some(1) => {
                reasons.push("Top performer (#1)".to_string());
                breakdown.performance += w.rank_first;
            }
            Some(2) => {
                reasons.push("Runner-up performer (#2)".to_string());
                breakdown.performance += w.rank_second;
            }
            _ => {}
        }

        breakdown.urgency = match prospect.status {
            ProspectStatus::Negotiation => {
                reasons.push("In negotiation".to_string());
                w.negotiation
            }
            ProspectStatus::Qualified => {
                reasons.push("Qualified lead".to_string());
                w.qualified
            }
            _ => 0,
        };

        let potential = i32::from(prospect.potential_score.clamp(1, 5));
        breakdown.potential = potential * w.potential_multiplier;
        if breakdown.potential != 0 {
            reasons.push(format!("Potential {}/5", potential));
        }

        ScoreCard {
            score: breakdown.total(),
            reasons,
            breakdown,
            distance_km,
            distance_bucket,
        }
    }

    /// Proximity class of a pair, without scoring it.
    pub fn distance_bucket(&self, prospect: &Prospect, rep: &Rep) -> DistanceBucket {
        let distance_km = self
            .estimator
            .estimate(&rep.home_location(), &prospect.location())
            .distance_km;
        self.bucket(prospect, rep, distance_km)
    }

    fn bucket(&self, prospect: &Prospect, rep: &Rep, distance_km: f64) -> DistanceBucket {
        if prospect.zone == rep.home_zone {
            DistanceBucket::SameZone
        } else if distance_km < self.weights.near_km {
            DistanceBucket::Near
        } else if distance_km < self.weights.medium_km {
            DistanceBucket::Medium
        } else {
            DistanceBucket::Far
        }
    }
}
