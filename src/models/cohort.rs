//! Cohort model.
//!
//! A cohort is a group of students scheduled as a unit: a
//! program-semester section. Cohorts carry elective bundles, sets of
//! courses offered together as mutually available electives. Wide
//! bundles are a pre-emptive clash-risk signal even before any time
//! overlap exists.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A student group scheduled as a unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cohort {
    /// Unique cohort identifier (e.g., "BSC-CS-3A").
    pub id: String,
    /// Number of students. Must be positive.
    pub size: u32,
    /// Parent program (e.g., "FYUGP-CS").
    pub program: String,
    /// Current semester (1-based).
    pub semester: u8,
    /// Sets of course codes co-offered as elective groups.
    pub elective_bundles: Vec<BTreeSet<String>>,
}

impl Cohort {
    /// Creates a new cohort.
    pub fn new(id: impl Into<String>, size: u32) -> Self {
        Self {
            id: id.into(),
            size,
            program: String::new(),
            semester: 1,
            elective_bundles: Vec::new(),
        }
    }

    /// Sets the parent program.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Sets the semester.
    pub fn with_semester(mut self, semester: u8) -> Self {
        self.semester = semester;
        self
    }

    /// Adds an elective bundle.
    pub fn with_elective_bundle(
        mut self,
        courses: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.elective_bundles
            .push(courses.into_iter().map(Into::into).collect());
        self
    }

    /// Bundles at or above the clash-risk width threshold.
    pub fn clash_risk_bundles(&self, threshold: usize) -> Vec<&BTreeSet<String>> {
        self.elective_bundles
            .iter()
            .filter(|b| b.len() >= threshold)
            .collect()
    }

    /// The bundle containing both courses, if any.
    pub fn shared_bundle(&self, a: &str, b: &str) -> Option<&BTreeSet<String>> {
        self.elective_bundles
            .iter()
            .find(|bundle| bundle.contains(a) && bundle.contains(b))
    }
}
