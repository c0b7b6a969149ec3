//! Constraint violation records.
//!
//! Violations are what the evaluator reports: a hard-constraint breach
//! between a pair of sessions, a capacity overflow on one session, or
//! an advisory elective-bundle risk signal. The conflict detector turns
//! violations into stateful [`Conflict`](super::Conflict) records.

use serde::{Deserialize, Serialize};

/// Classification of a constraint violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViolationKind {
    /// One faculty member booked into overlapping sessions.
    FacultyOverlap {
        /// Double-booked faculty id.
        faculty: String,
    },
    /// One room booked for overlapping sessions.
    RoomDoubleBook {
        /// Double-booked room id.
        room: String,
    },
    /// One cohort scheduled into overlapping sessions.
    CohortOverlap {
        /// Double-booked cohort id.
        cohort: String,
    },
    /// A session's room is smaller than the expected enrollment.
    CapacityOverflow {
        /// Room id.
        room: String,
        /// Expected enrollment.
        expected: u32,
        /// Room capacity.
        capacity: u32,
        /// `expected / capacity - 1`.
        overflow_ratio: f64,
    },
    /// An elective bundle wide enough to signal clash risk.
    ///
    /// Advisory: raised even absent a time overlap.
    ElectiveClashRisk {
        /// Cohort owning the bundle.
        cohort: String,
        /// Bundle course codes.
        courses: Vec<String>,
    },
}

/// A single constraint violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// What was violated.
    pub kind: ViolationKind,
    /// Involved session ids (a pair for overlaps, one for capacity,
    /// empty for bundle risk).
    pub sessions: Vec<String>,
    /// Human-readable description.
    pub message: String,
}

impl Violation {
    /// Creates a faculty overlap violation for a session pair.
    pub fn faculty_overlap(faculty: impl Into<String>, a: impl Into<String>, b: impl Into<String>) -> Self {
        let faculty = faculty.into();
        let (a, b) = ordered(a.into(), b.into());
        Self {
            message: format!("Faculty '{faculty}' is double-booked across '{a}' and '{b}'"),
            kind: ViolationKind::FacultyOverlap { faculty },
            sessions: vec![a, b],
        }
    }

    /// Creates a room double-booking violation for a session pair.
    pub fn room_double_book(room: impl Into<String>, a: impl Into<String>, b: impl Into<String>) -> Self {
        let room = room.into();
        let (a, b) = ordered(a.into(), b.into());
        Self {
            message: format!("Room '{room}' is double-booked across '{a}' and '{b}'"),
            kind: ViolationKind::RoomDoubleBook { room },
            sessions: vec![a, b],
        }
    }

    /// Creates a cohort overlap violation for a session pair.
    pub fn cohort_overlap(cohort: impl Into<String>, a: impl Into<String>, b: impl Into<String>) -> Self {
        let cohort = cohort.into();
        let (a, b) = ordered(a.into(), b.into());
        Self {
            message: format!("Cohort '{cohort}' is double-booked across '{a}' and '{b}'"),
            kind: ViolationKind::CohortOverlap { cohort },
            sessions: vec![a, b],
        }
    }

    /// Creates a capacity overflow violation.
    ///
    /// `overflow_ratio` is `expected / capacity - 1`; callers guarantee
    /// `capacity > 0` via registry validation.
    pub fn capacity_overflow(
        session: impl Into<String>,
        room: impl Into<String>,
        expected: u32,
        capacity: u32,
    ) -> Self {
        let room = room.into();
        let overflow_ratio = expected as f64 / capacity as f64 - 1.0;
        Self {
            message: format!(
                "Room '{room}' seats {capacity} but {expected} students are expected"
            ),
            kind: ViolationKind::CapacityOverflow {
                room,
                expected,
                capacity,
                overflow_ratio,
            },
            sessions: vec![session.into()],
        }
    }

    /// Creates an elective-bundle clash-risk signal.
    pub fn elective_clash_risk(
        cohort: impl Into<String>,
        courses: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let cohort = cohort.into();
        let mut courses: Vec<String> = courses.into_iter().map(Into::into).collect();
        courses.sort();
        Self {
            message: format!(
                "Cohort '{cohort}' carries a {}-course elective bundle ({})",
                courses.len(),
                courses.join(", ")
            ),
            kind: ViolationKind::ElectiveClashRisk { cohort, courses },
            sessions: Vec::new(),
        }
    }

    /// Whether this violation breaches a hard constraint.
    ///
    /// Bundle-risk signals are advisory and never make an assignment
    /// infeasible.
    pub fn is_hard(&self) -> bool {
        !matches!(self.kind, ViolationKind::ElectiveClashRisk { .. })
    }

    /// Stable identity for deduplication and conflict tracking.
    ///
    /// Two detections of the same underlying problem (same kind, same
    /// key entity, same sessions) produce equal fingerprints.
    pub fn fingerprint(&self) -> String {
        match &self.kind {
            ViolationKind::FacultyOverlap { faculty } => {
                format!("faculty-overlap:{faculty}:{}", self.sessions.join("+"))
            }
            ViolationKind::RoomDoubleBook { room } => {
                format!("room-double-book:{room}:{}", self.sessions.join("+"))
            }
            ViolationKind::CohortOverlap { cohort } => {
                format!("cohort-overlap:{cohort}:{}", self.sessions.join("+"))
            }
            ViolationKind::CapacityOverflow { room, .. } => {
                format!("capacity-overflow:{room}:{}", self.sessions.join("+"))
            }
            ViolationKind::ElectiveClashRisk { cohort, courses } => {
                format!("elective-risk:{cohort}:{}", courses.join("+"))
            }
        }
    }
}

/// Orders a session pair lexicographically so pair identity is stable
/// regardless of discovery order.
fn ordered(a: String, b: String) -> (String, String) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
