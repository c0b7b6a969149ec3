//! Course offering model.
//!
//! A course offering is one course taught in one semester: its weekly
//! session requirements, candidate instructors, room needs, and the
//! cohorts enrolled in it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{RoomKind, SessionKind};

/// Weekly session requirement for one session kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRequirement {
    /// Kind of session required.
    pub kind: SessionKind,
    /// Number of sessions of this kind per week.
    pub count: u32,
    /// Duration of each session in grid slots.
    pub duration_slots: u32,
}

impl SessionRequirement {
    /// Creates a requirement.
    pub fn new(kind: SessionKind, count: u32, duration_slots: u32) -> Self {
        Self {
            kind,
            count,
            duration_slots,
        }
    }
}

/// One course taught in one semester.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseOffering {
    /// Course code (e.g., "CS301").
    pub course: String,
    /// Course title.
    pub title: String,
    /// Semester this offering belongs to (1-based).
    pub semester: u8,
    /// Expected enrollment across all cohorts.
    pub expected_enrollment: u32,
    /// Weekly session requirements by kind.
    pub sessions_required: Vec<SessionRequirement>,
    /// Candidate instructor ids, in preference order.
    pub instructors: Vec<String>,
    /// Required room kind.
    pub room_kind: RoomKind,
    /// Minimum acceptable room capacity.
    pub min_capacity: u32,
    /// Equipment tags the room must carry.
    pub equipment_needed: BTreeSet<String>,
    /// Cohorts enrolled in this offering.
    pub cohorts: Vec<String>,
}

impl CourseOffering {
    /// Creates an offering.
    pub fn new(course: impl Into<String>, semester: u8, room_kind: RoomKind) -> Self {
        Self {
            course: course.into(),
            title: String::new(),
            semester,
            expected_enrollment: 0,
            sessions_required: Vec::new(),
            instructors: Vec::new(),
            room_kind,
            min_capacity: 0,
            equipment_needed: BTreeSet::new(),
            cohorts: Vec::new(),
        }
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the expected enrollment.
    pub fn with_enrollment(mut self, expected: u32) -> Self {
        self.expected_enrollment = expected;
        self
    }

    /// Adds a weekly session requirement.
    pub fn with_requirement(mut self, requirement: SessionRequirement) -> Self {
        self.sessions_required.push(requirement);
        self
    }

    /// Adds a candidate instructor.
    pub fn with_instructor(mut self, faculty_id: impl Into<String>) -> Self {
        self.instructors.push(faculty_id.into());
        self
    }

    /// Sets the minimum room capacity.
    pub fn with_min_capacity(mut self, min_capacity: u32) -> Self {
        self.min_capacity = min_capacity;
        self
    }

    /// Adds a required equipment tag.
    pub fn with_equipment(mut self, tag: impl Into<String>) -> Self {
        self.equipment_needed.insert(tag.into());
        self
    }

    /// Enrolls a cohort.
    pub fn with_cohort(mut self, cohort_id: impl Into<String>) -> Self {
        self.cohorts.push(cohort_id.into());
        self
    }

    /// Total weekly sessions required, summed over kinds.
    pub fn weekly_session_count(&self) -> u32 {
        self.sessions_required.iter().map(|r| r.count).sum()
    }

    /// Total weekly slots required, summed over kinds.
    pub fn weekly_slot_count(&self) -> u32 {
        self.sessions_required
            .iter()
            .map(|r| r.count * r.duration_slots)
            .sum()
    }
}
