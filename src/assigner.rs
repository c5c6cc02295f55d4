//! Prospect-to-rep assignment.
//!
//! Three policies share one output shape: manual (an explicit prospect set
//! handed to one rep), load-balanced, and score-ranked. Every run is a pure
//! function of its inputs; nothing is persisted here.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::eligibility::is_eligible;
use crate::error::EngineError;
use crate::haversine::HaversineEstimator;
use crate::model::{Assignment, Prospect, ProspectId, Rep, RepId};
use crate::scoring::{AssignmentScorer, ScoreCard};

/// Capacity lead (in percentage points) that overrides count balancing.
const CAPACITY_OVERRIDE_PCT: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentPolicy {
    Manual {
        prospect_ids: Vec<ProspectId>,
        rep_id: Option<RepId>,
    },
    LoadBalanced,
    ScoreRanked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum UnassignedReason {
    NoEligibleRep,
    BelowThreshold { best_score: i32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnassignedProspect {
    pub prospect_id: ProspectId,
    pub reason: UnassignedReason,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssignmentRun {
    pub assignments: Vec<Assignment>,
    pub unassigned: Vec<UnassignedProspect>,
}

impl AssignmentRun {
    /// Number of assignments per rep in this run.
    pub fn load_by_rep(&self) -> BTreeMap<RepId, usize> {
        let mut load = BTreeMap::new();
        for assignment in &self.assignments {
            *load.entry(assignment.rep_id.clone()).or_insert(0) += 1;
        }
        load
    }

    pub fn assignment_for(&self, prospect_id: &ProspectId) -> Option<&Assignment> {
        self.assignments
            .iter()
            .find(|a| &a.prospect_id == prospect_id)
    }
}

pub struct Assigner<'a> {
    config: &'a EngineConfig,
    estimator: HaversineEstimator,
}

impl<'a> Assigner<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self {
            config,
            estimator: HaversineEstimator::new(config.estimate.average_speed_kmh),
        }
    }

    fn scorer(&self) -> AssignmentScorer<'_> {
        AssignmentScorer::new(&self.config.scoring, &self.estimator)
    }

    pub fn run(
        &self,
        policy: &AssignmentPolicy,
        prospects: &[Prospect],
        reps: &[Rep],
    ) -> Result<AssignmentRun, EngineError> {
        match policy {
            AssignmentPolicy::Manual {
                prospect_ids,
                rep_id,
            } => {
                let rep = match rep_id {
                    Some(id) => Some(
                        reps.iter()
                            .find(|r| &r.id == id)
                            .ok_or(EngineError::MissingRep)?,
                    ),
                    None => None,
                };
                let selected = prospect_ids
                    .iter()
                    .map(|id| {
                        prospects
                            .iter()
                            .find(|p| &p.id == id)
                            .ok_or_else(|| EngineError::UnknownProspect(id.clone()))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                self.manual(&selected, rep)
            }
            AssignmentPolicy::LoadBalanced => self.load_balanced(prospects, reps),
            AssignmentPolicy::ScoreRanked => self.score_ranked(prospects, reps),
        }
    }

    /// Hand every prospect in `prospects` to `rep`.
    ///
    /// Manual assignment is an override: pairs outside the rep's territory
    /// are kept, scored zero and flagged in their reasons.
    pub fn manual(
        &self,
        prospects: &[&Prospect],
        rep: Option<&Rep>,
    ) -> Result<AssignmentRun, EngineError> {
        let rep = rep.ok_or(EngineError::MissingRep)?;
        if prospects.is_empty() {
            return Err(EngineError::EmptyProspects);
        }

        let scorer = self.scorer();
        let mut run = AssignmentRun::default();
        for prospect in prospects {
            let mut reasons = vec!["Manual assignment".to_string()];
            let (score, distance_bucket) = if is_eligible(prospect, rep) {
                let card = scorer.score(prospect, rep, &rep.workload);
                reasons.extend(card.reasons);
                (card.score, card.distance_bucket)
            } else {
                warn!(prospect = %prospect.id, rep = %rep.id, "manual assignment outside rep territory");
                reasons.push("Outside rep territory".to_string());
                (0, scorer.distance_bucket(prospect, rep))
            };

            run.assignments.push(Assignment {
                prospect_id: prospect.id.clone(),
                rep_id: rep.id.clone(),
                score,
                reasons,
                distance_bucket,
            });
        }

        info!(rep = %rep.id, assigned = run.assignments.len(), "manual assignment run");
        Ok(run)
    }

    /// Spread prospects across eligible reps, in input order.
    ///
    /// Each prospect goes to the eligible rep with the fewest assignments so
    /// far in this run, unless another eligible rep has more than 20 points
    /// of extra remaining capacity.
    pub fn load_balanced(
        &self,
        prospects: &[Prospect],
        reps: &[Rep],
    ) -> Result<AssignmentRun, EngineError> {
        check_inputs(prospects, reps)?;

        let scorer = self.scorer();
        let mut counts = vec![0usize; reps.len()];
        let mut run = AssignmentRun::default();

        for prospect in prospects {
            let eligible: Vec<usize> = reps
                .iter()
                .enumerate()
                .filter(|(_, rep)| is_eligible(prospect, rep))
                .map(|(i, _)| i)
                .collect();

            let Some(chosen) = pick_balanced(&eligible, &counts, reps) else {
                debug!(prospect = %prospect.id, "no eligible rep");
                run.unassigned.push(UnassignedProspect {
                    prospect_id: prospect.id.clone(),
                    reason: UnassignedReason::NoEligibleRep,
                });
                continue;
            };

            let rep = &reps[chosen];
            counts[chosen] += 1;
            let card = scorer.score(prospect, rep, &rep.workload);
            debug!(
                prospect = %prospect.id,
                rep = %rep.id,
                run_count = counts[chosen],
                score = card.score,
                "load-balanced pick"
            );
            run.assignments.push(to_assignment(prospect, rep, card));
        }

        info!(
            assigned = run.assignments.len(),
            unassigned = run.unassigned.len(),
            "load-balanced assignment run"
        );
        Ok(run)
    }

    /// Give each prospect to its best-scoring eligible rep, if that score
    /// clears the configured threshold.
    ///
    /// Rep capacity is not re-checked between picks: a rep that wins many
    /// prospects receives all of them.
    pub fn score_ranked(
        &self,
        prospects: &[Prospect],
        reps: &[Rep],
    ) -> Result<AssignmentRun, EngineError> {
        check_inputs(prospects, reps)?;

        let scorer = self.scorer();
        let threshold = self.config.scoring.threshold;

        let outcomes: Vec<Result<Assignment, UnassignedProspect>> = prospects
            .par_iter()
            .map(|prospect| {
                let mut best: Option<(&Rep, ScoreCard)> = None;
                for rep in reps.iter().filter(|rep| is_eligible(prospect, rep)) {
                    let card = scorer.score(prospect, rep, &rep.workload);
                    let better = best
                        .as_ref()
                        .is_none_or(|(_, current)| card.score > current.score);
                    if better {
                        best = Some((rep, card));
                    }
                }

                match best {
                    None => Err(UnassignedProspect {
                        prospect_id: prospect.id.clone(),
                        reason: UnassignedReason::NoEligibleRep,
                    }),
                    Some((_, card)) if card.score < threshold => Err(UnassignedProspect {
                        prospect_id: prospect.id.clone(),
                        reason: UnassignedReason::BelowThreshold {
                            best_score: card.score,
                        },
                    }),
                    Some((rep, card)) => Ok(to_assignment(prospect, rep, card)),
                }
            })
            .collect();

        let mut run = AssignmentRun::default();
        for outcome in outcomes {
            match outcome {
                Ok(assignment) => {
                    debug!(
                        prospect = %assignment.prospect_id,
                        rep = %assignment.rep_id,
                        score = assignment.score,
                        "score-ranked pick"
                    );
                    run.assignments.push(assignment);
                }
                Err(unassigned) => run.unassigned.push(unassigned),
            }
        }

        info!(
            assigned = run.assignments.len(),
            unassigned = run.unassigned.len(),
            threshold,
            "score-ranked assignment run"
        );
        Ok(run)
    }
}

fn check_inputs(prospects: &[Prospect], reps: &[Rep]) -> Result<(), EngineError> {
    if prospects.is_empty() {
        return Err(EngineError::EmptyProspects);
    }
    if reps.is_empty() {
        return Err(EngineError::EmptyReps);
    }
    Ok(())
}

/// Index of the rep to receive the next prospect, among `eligible`.
fn pick_balanced(eligible: &[usize], counts: &[usize], reps: &[Rep]) -> Option<usize> {
    let capacity = |i: usize| reps[i].workload.remaining_capacity_pct;

    let mut best = *eligible.first()?;
    for &i in &eligible[1..] {
        if counts[i] < counts[best] {
            best = i;
        }
    }

    let mut roomiest = best;
    for &i in eligible {
        if capacity(i) > capacity(roomiest) {
            roomiest = i;
        }
    }

    if capacity(roomiest) - capacity(best) > CAPACITY_OVERRIDE_PCT {
        Some(roomiest)
    } else {
        Some(best)
    }
}

fn to_assignment(prospect: &Prospect, rep: &Rep, card: ScoreCard) -> Assignment {
    Assignment {
        prospect_id: prospect.id.clone(),
        rep_id: rep.id.clone(),
        score: card.score,
        reasons: card.reasons,
        distance_bucket: card.distance_bucket,
    }
}
