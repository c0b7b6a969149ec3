//! Scenario explanation and comparison.
//!
//! [`explain`] condenses a scenario into the payload the conflict and
//! scenario screens consume: hard-violation counts (all zero on a
//! feasible run), soft-objective values, the decision log, and the
//! before/after conflict table. [`compare`] diffs two scenarios metric
//! by metric; the diff is symmetric up to sign.

use std::collections::BTreeMap;
use std::ops::Neg;

use serde::{Deserialize, Serialize};

use super::{DecisionEntry, ResolutionSummary, Scenario};
use crate::detector::detect;
use crate::evaluator::ObjectiveScores;
use crate::models::ConflictKind;

/// Summary payload for one scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainPayload {
    /// Scenario id.
    pub scenario_id: String,
    /// Scenario display name.
    pub name: String,
    /// Whether the run satisfied every hard constraint.
    pub feasible: bool,
    /// Residual hard-violation counts by conflict kind.
    pub hard_counts: BTreeMap<ConflictKind, usize>,
    /// Soft-objective values.
    pub scores: ObjectiveScores,
    /// Ordered decisions from construction and improvement.
    pub decision_log: Vec<DecisionEntry>,
    /// Conflict counts before and after improvement.
    pub conflicts_resolved: ResolutionSummary,
}

/// Builds the explanation payload for a scenario.
pub fn explain(scenario: &Scenario) -> ExplainPayload {
    let mut hard_counts = BTreeMap::new();
    let hard: Vec<_> = scenario
        .residual_violations
        .iter()
        .filter(|v| v.is_hard())
        .cloned()
        .collect();
    for conflict in detect(&hard) {
        *hard_counts.entry(conflict.kind).or_insert(0) += 1;
    }

    ExplainPayload {
        scenario_id: scenario.id.clone(),
        name: scenario.name.clone(),
        feasible: scenario.is_feasible(),
        hard_counts,
        scores: scenario.scores,
        decision_log: scenario.decision_log.clone(),
        conflicts_resolved: scenario.conflicts_resolved.clone(),
    }
}

/// Per-metric difference between two scenarios (`a - b`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricDiff {
    /// Weighted soft-objective difference.
    pub weighted_total: f64,
    /// Student compactness difference.
    pub student_compactness: f64,
    /// Faculty fairness difference.
    pub faculty_fairness: f64,
    /// Room match difference.
    pub room_match: f64,
    /// Elective clash difference.
    pub elective_clash: f64,
    /// Hard-violation count difference.
    pub hard_violations: i64,
    /// Session count difference.
    pub session_count: i64,
}

impl Neg for MetricDiff {
    type Output = MetricDiff;

    fn neg(self) -> MetricDiff {
        MetricDiff {
            weighted_total: -self.weighted_total,
            student_compactness: -self.student_compactness,
            faculty_fairness: -self.faculty_fairness,
            room_match: -self.room_match,
            elective_clash: -self.elective_clash,
            hard_violations: -self.hard_violations,
            session_count: -self.session_count,
        }
    }
}

/// Diffs two scenarios: every metric is `a`'s value minus `b`'s, so
/// `compare(a, b) == -compare(b, a)`.
pub fn compare(a: &Scenario, b: &Scenario) -> MetricDiff {
    let hard = |s: &Scenario| s.residual_violations.iter().filter(|v| v.is_hard()).count() as i64;

    MetricDiff {
        weighted_total: a.scores.weighted_total - b.scores.weighted_total,
        student_compactness: a.scores.student_compactness - b.scores.student_compactness,
        faculty_fairness: a.scores.faculty_fairness - b.scores.faculty_fairness,
        room_match: a.scores.room_match - b.scores.room_match,
        elective_clash: a.scores.elective_clash - b.scores.elective_clash,
        hard_violations: hard(a) - hard(b),
        session_count: a.assignment.len() as i64 - b.assignment.len() as i64,
    }
}
