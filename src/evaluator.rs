//! Constraint evaluation.
//!
//! Indexes an assignment and reports hard-constraint violations plus
//! soft-objective scores.
//!
//! # Algorithm
//!
//! Three index maps are built in one pass over every grid cell each
//! session occupies: (room, day, slot), (faculty, day, slot), and
//! (cohort, day, slot) → session ids. Any bucket with more than one
//! entry is an overlap, reported once per offending *pair* and
//! deduplicated across cells, so a two-slot collision still yields one
//! violation. Overlap detection is O(n) amortized in occupied cells,
//! not O(n²) pairwise.
//!
//! Soft objectives are independent per-session aggregates, each scaled
//! to [0, 1] (higher is better) and combined into a single weighted
//! scalar for scenario comparison.

use std::collections::{HashMap, HashSet};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::models::{Assignment, Calendar, ConstraintConfig, Day, Session, Violation};
use crate::registry::Registry;

/// Soft-objective scores for an assignment.
///
/// Each component is in [0, 1]; `weighted_total` is the
/// config-weighted sum used to compare scenarios.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveScores {
    /// Inverse of per-cohort daily gap count.
    pub student_compactness: f64,
    /// Inverse of the variance of assigned hours across faculty.
    pub faculty_fairness: f64,
    /// Fraction of sessions whose room fits kind, equipment, and capacity.
    pub room_match: f64,
    /// Inverse of the elective clash-risk signal count.
    pub elective_clash: f64,
    /// Weighted sum of the four components.
    pub weighted_total: f64,
}

/// Result of evaluating an assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    /// Detected violations, hard and advisory, in stable order.
    pub violations: Vec<Violation>,
    /// Soft-objective scores.
    pub scores: ObjectiveScores,
}

impl Evaluation {
    /// Hard violations only.
    pub fn hard_violations(&self) -> Vec<&Violation> {
        self.violations.iter().filter(|v| v.is_hard()).collect()
    }

    /// Number of hard violations.
    pub fn hard_count(&self) -> usize {
        self.violations.iter().filter(|v| v.is_hard()).count()
    }

    /// Whether the assignment satisfies every enforced hard constraint.
    pub fn is_feasible(&self) -> bool {
        self.hard_count() == 0
    }

    /// Fingerprints of every hard violation, for identity comparison
    /// across re-evaluations.
    pub fn hard_fingerprints(&self) -> HashSet<String> {
        self.violations
            .iter()
            .filter(|v| v.is_hard())
            .map(|v| v.fingerprint())
            .collect()
    }
}

/// Evaluates an assignment against the enforced constraints.
pub fn evaluate(
    assignment: &Assignment,
    registry: &Registry,
    calendar: &Calendar,
    config: &ConstraintConfig,
) -> Evaluation {
    let sessions = assignment.sessions();
    let mut violations = Vec::new();

    if config.no_room_double_book {
        for (a, b) in overlap_pairs(sessions, |s: &Session| s.room.as_str()) {
            violations.push(Violation::room_double_book(&a.room, &a.id, &b.id));
        }
    }
    if config.no_faculty_overlap {
        for (a, b) in overlap_pairs(sessions, |s: &Session| s.faculty.as_str()) {
            violations.push(Violation::faculty_overlap(&a.faculty, &a.id, &b.id));
        }
    }
    if config.no_cohort_overlap {
        for (a, b) in overlap_pairs(sessions, |s: &Session| s.cohort.as_str()) {
            violations.push(Violation::cohort_overlap(&a.cohort, &a.id, &b.id));
        }
    }

    if config.capacity_respect {
        for session in sessions {
            let expected = registry
                .offering(&session.course)
                .map(|o| o.expected_enrollment)
                .unwrap_or(0);
            if let Some(room) = registry.room(&session.room) {
                if room.capacity > 0 && expected > room.capacity {
                    violations.push(Violation::capacity_overflow(
                        &session.id,
                        &room.id,
                        expected,
                        room.capacity,
                    ));
                }
            }
        }
    }

    // Advisory bundle-risk signals, independent of any time overlap.
    for cohort in &registry.cohorts {
        for bundle in cohort.clash_risk_bundles(config.elective_clash_threshold) {
            violations.push(Violation::elective_clash_risk(
                &cohort.id,
                bundle.iter().cloned(),
            ));
        }
    }

    let scores = score(assignment, registry, calendar, config, &violations);

    Evaluation { violations, scores }
}

/// Overlap pairs for one resource dimension.
///
/// `key` extracts the resource id a session occupies (room, faculty,
/// or cohort). Returns each colliding pair exactly once, ordered by
/// session id for stable output.
fn overlap_pairs<'a, F>(sessions: &'a [Session], key: F) -> Vec<(&'a Session, &'a Session)>
where
    F: Fn(&Session) -> &str,
{
    let mut cells: HashMap<(&str, Day, usize), Vec<usize>> = HashMap::new();
    for (idx, session) in sessions.iter().enumerate() {
        for slot in session.occupied_slots() {
            cells
                .entry((key(session), session.day, slot))
                .or_default()
                .push(idx);
        }
    }

    let mut seen: HashSet<(usize, usize)> = HashSet::new();
    let mut pairs = Vec::new();
    for occupants in cells.values() {
        if occupants.len() < 2 {
            continue;
        }
        for (i, &a) in occupants.iter().enumerate() {
            for &b in &occupants[i + 1..] {
                let pair = if a < b { (a, b) } else { (b, a) };
                if seen.insert(pair) {
                    pairs.push(pair);
                }
            }
        }
    }

    // Index order is insertion order, so sorting restores determinism
    // lost to map iteration.
    pairs.sort_unstable();
    pairs
        .into_iter()
        .map(|(a, b)| (&sessions[a], &sessions[b]))
        .collect()
}

/// Computes the soft-objective scores.
fn score(
    assignment: &Assignment,
    registry: &Registry,
    calendar: &Calendar,
    config: &ConstraintConfig,
    violations: &[Violation],
) -> ObjectiveScores {
    let student_compactness = compactness_score(assignment);
    let faculty_fairness = fairness_score(assignment, registry, calendar);
    let room_match = room_match_score(assignment, registry);

    let risk_signals = violations.iter().filter(|v| !v.is_hard()).count();
    let elective_clash = 1.0 / (1.0 + risk_signals as f64);

    let (w_compact, w_fair, w_room, w_elective) = config.soft_weights();
    let weighted_total = f64::from(w_compact) * student_compactness
        + f64::from(w_fair) * faculty_fairness
        + f64::from(w_room) * room_match
        + f64::from(w_elective) * elective_clash;

    ObjectiveScores {
        student_compactness,
        faculty_fairness,
        room_match,
        elective_clash,
        weighted_total,
    }
}

/// Inverse of the total idle-slot count between each cohort's first and
/// last session of a day.
fn compactness_score(assignment: &Assignment) -> f64 {
    let mut day_slots: HashMap<(&str, Day), Vec<usize>> = assignment
        .sessions()
        .iter()
        .flat_map(|s| {
            s.occupied_slots()
                .map(move |slot| ((s.cohort.as_str(), s.day), slot))
        })
        .into_group_map();

    let mut total_gaps = 0usize;
    for slots in day_slots.values_mut() {
        slots.sort_unstable();
        slots.dedup();
        if let (Some(&first), Some(&last)) = (slots.first(), slots.last()) {
            total_gaps += (last - first + 1) - slots.len();
        }
    }

    1.0 / (1.0 + total_gaps as f64)
}

/// Inverse of the variance of assigned weekly hours across the roster.
fn fairness_score(assignment: &Assignment, registry: &Registry, calendar: &Calendar) -> f64 {
    if registry.faculty.is_empty() {
        return 1.0;
    }

    let slot_hours = f64::from(calendar.slot_length_minutes) / 60.0;
    let mut hours: HashMap<&str, f64> = registry
        .faculty
        .iter()
        .map(|f| (f.id.as_str(), 0.0))
        .collect();
    for session in assignment.sessions() {
        if let Some(load) = hours.get_mut(session.faculty.as_str()) {
            *load += session.duration_slots as f64 * slot_hours;
        }
    }

    // Sum in roster order so repeated evaluations are bit-identical.
    let loads: Vec<f64> = registry
        .faculty
        .iter()
        .map(|f| hours[f.id.as_str()])
        .collect();
    let n = loads.len() as f64;
    let mean = loads.iter().sum::<f64>() / n;
    let variance = loads.iter().map(|h| (h - mean).powi(2)).sum::<f64>() / n;

    1.0 / (1.0 + variance)
}

/// Fraction of sessions placed in a room fitting the offering's kind,
/// equipment, and minimum capacity.
fn room_match_score(assignment: &Assignment, registry: &Registry) -> f64 {
    let mut considered = 0usize;
    let mut matched = 0usize;

    for session in assignment.sessions() {
        let (Some(offering), Some(room)) = (
            registry.offering(&session.course),
            registry.room(&session.room),
        ) else {
            continue;
        };
        considered += 1;
        if room.kind == offering.room_kind
            && room.has_equipment(&offering.equipment_needed)
            && room.capacity >= offering.min_capacity
        {
            matched += 1;
        }
    }

    if considered == 0 {
        1.0
    } else {
        matched as f64 / considered as f64
    }
}
