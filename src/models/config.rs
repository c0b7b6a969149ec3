//! Constraint configuration and objective-weight profiles.
//!
//! [`ConstraintConfig`] is the single validated knob set for the
//! engine: which hard constraints are enforced, how the soft objectives
//! are weighted (0-5 each), and the elective-bundle clash-risk width.
//! [`ScenarioProfile`] presets rebalance the soft weights for a solve
//! run without touching the hard flags.

use serde::{Deserialize, Serialize};

/// Largest allowed soft-objective weight.
pub const MAX_SOFT_WEIGHT: u8 = 5;

/// Hard-constraint flags and soft-objective weights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintConfig {
    /// Reject overlapping sessions for one faculty member.
    pub no_faculty_overlap: bool,
    /// Reject overlapping sessions in one room.
    pub no_room_double_book: bool,
    /// Reject rooms smaller than expected enrollment.
    pub capacity_respect: bool,
    /// Reject overlapping sessions for one cohort.
    pub no_cohort_overlap: bool,
    /// Weight (0-5) of per-cohort daily compactness.
    pub student_compactness: u8,
    /// Weight (0-5) of even load distribution across faculty.
    pub faculty_fairness: u8,
    /// Weight (0-5) of room kind/equipment/capacity fit.
    pub room_match: u8,
    /// Weight (0-5) of elective clash avoidance.
    pub elective_clash_min: u8,
    /// Bundle width (distinct course count) from which an elective
    /// bundle counts as clash risk.
    pub elective_clash_threshold: usize,
}

impl Default for ConstraintConfig {
    fn default() -> Self {
        Self {
            no_faculty_overlap: true,
            no_room_double_book: true,
            capacity_respect: true,
            no_cohort_overlap: true,
            student_compactness: 3,
            faculty_fairness: 3,
            room_match: 2,
            elective_clash_min: 2,
            elective_clash_threshold: 3,
        }
    }
}

impl ConstraintConfig {
    /// All hard constraints on, default soft weights.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Soft weights as `(compactness, fairness, room_match, elective)`.
    pub fn soft_weights(&self) -> (u8, u8, u8, u8) {
        (
            self.student_compactness,
            self.faculty_fairness,
            self.room_match,
            self.elective_clash_min,
        )
    }

    /// Replaces the soft weights, clamping to the 0-5 range.
    pub fn with_soft_weights(
        mut self,
        student_compactness: u8,
        faculty_fairness: u8,
        room_match: u8,
        elective_clash_min: u8,
    ) -> Self {
        self.student_compactness = student_compactness.min(MAX_SOFT_WEIGHT);
        self.faculty_fairness = faculty_fairness.min(MAX_SOFT_WEIGHT);
        self.room_match = room_match.min(MAX_SOFT_WEIGHT);
        self.elective_clash_min = elective_clash_min.min(MAX_SOFT_WEIGHT);
        self
    }
}

/// Objective-weight preset for a scenario run.
///
/// Profiles rebalance the soft weights only; hard flags always come
/// from the caller's [`ConstraintConfig`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioProfile {
    /// Keep the configured weights as-is.
    #[default]
    Balanced,
    /// Weight student compactness and elective clash avoidance up.
    StudentFirst,
    /// Weight faculty fairness up.
    FacultyFirst,
    /// Weight room fit up.
    RoomUtilization,
}

impl ScenarioProfile {
    /// Applies this profile to a base configuration.
    pub fn apply(self, base: &ConstraintConfig) -> ConstraintConfig {
        let config = base.clone();
        match self {
            ScenarioProfile::Balanced => config,
            ScenarioProfile::StudentFirst => config.with_soft_weights(5, 2, 1, 4),
            ScenarioProfile::FacultyFirst => config.with_soft_weights(2, 5, 1, 2),
            ScenarioProfile::RoomUtilization => config.with_soft_weights(1, 2, 5, 1),
        }
    }
}
