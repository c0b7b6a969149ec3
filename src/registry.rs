//! Domain registry.
//!
//! Owns the scheduling inventory: rooms, faculty, cohorts, and course
//! offerings. The registry is plain data with id lookups; structural
//! integrity checks live in [`crate::validation`].

use serde::{Deserialize, Serialize};

use crate::models::{Cohort, CourseOffering, Faculty, Room, RoomKind};

/// The scheduling inventory for one term.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    /// Room inventory.
    pub rooms: Vec<Room>,
    /// Faculty roster.
    pub faculty: Vec<Faculty>,
    /// Cohort list.
    pub cohorts: Vec<Cohort>,
    /// Course offerings for the term.
    pub offerings: Vec<CourseOffering>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a room.
    pub fn with_room(mut self, room: Room) -> Self {
        self.rooms.push(room);
        self
    }

    /// Adds a faculty member.
    pub fn with_faculty(mut self, faculty: Faculty) -> Self {
        self.faculty.push(faculty);
        self
    }

    /// Adds a cohort.
    pub fn with_cohort(mut self, cohort: Cohort) -> Self {
        self.cohorts.push(cohort);
        self
    }

    /// Adds a course offering.
    pub fn with_offering(mut self, offering: CourseOffering) -> Self {
        self.offerings.push(offering);
        self
    }

    /// Looks up a room by id.
    pub fn room(&self, id: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    /// Looks up a faculty member by id.
    pub fn faculty_member(&self, id: &str) -> Option<&Faculty> {
        self.faculty.iter().find(|f| f.id == id)
    }

    /// Looks up a cohort by id.
    pub fn cohort(&self, id: &str) -> Option<&Cohort> {
        self.cohorts.iter().find(|c| c.id == id)
    }

    /// Looks up an offering by course code.
    pub fn offering(&self, course: &str) -> Option<&CourseOffering> {
        self.offerings.iter().find(|o| o.course == course)
    }

    /// Rooms of a kind with at least the given capacity, in inventory order.
    pub fn rooms_matching(&self, kind: RoomKind, min_capacity: u32) -> Vec<&Room> {
        self.rooms
            .iter()
            .filter(|r| r.kind == kind && r.capacity >= min_capacity)
            .collect()
    }
}
