//! Session and assignment models.
//!
//! A session is one scheduled teaching instance: a course meeting a
//! cohort with a faculty member in a room, on a day, over a span of
//! grid slots. Sessions are immutable once created; edits replace the
//! record. The [`Assignment`] owns its sessions and carries a version
//! counter so swap application can be checked against concurrent edits.

use serde::{Deserialize, Serialize};

use super::Day;

/// Session kind.
///
/// Serialized as the single-letter code used across the data contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SessionKind {
    /// Lecture.
    #[serde(rename = "L")]
    Lecture,
    /// Tutorial.
    #[serde(rename = "T")]
    Tutorial,
    /// Practical (lab).
    #[serde(rename = "P")]
    Practical,
    /// Seminar.
    #[serde(rename = "S")]
    Seminar,
}

impl SessionKind {
    /// Single-letter code used in wire data and generated session ids.
    pub fn code(self) -> &'static str {
        match self {
            SessionKind::Lecture => "L",
            SessionKind::Tutorial => "T",
            SessionKind::Practical => "P",
            SessionKind::Seminar => "S",
        }
    }
}

/// One scheduled teaching instance.
///
/// Immutable: there are no setters. To change a placed session, build a
/// replacement with [`Session::moved_to`], [`Session::in_room`], or
/// [`Session::taught_by`] and swap it in through the owning
/// [`Assignment`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier.
    pub id: String,
    /// Session kind.
    pub kind: SessionKind,
    /// Course code.
    pub course: String,
    /// Attending cohort id.
    pub cohort: String,
    /// Teaching faculty id.
    pub faculty: String,
    /// Room id.
    pub room: String,
    /// Day of week.
    pub day: Day,
    /// First occupied slot index.
    pub slot_start: usize,
    /// Number of consecutive slots occupied.
    pub duration_slots: usize,
}

impl Session {
    /// Creates a session.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        kind: SessionKind,
        course: impl Into<String>,
        cohort: impl Into<String>,
        faculty: impl Into<String>,
        room: impl Into<String>,
        day: Day,
        slot_start: usize,
        duration_slots: usize,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            course: course.into(),
            cohort: cohort.into(),
            faculty: faculty.into(),
            room: room.into(),
            day,
            slot_start,
            duration_slots,
        }
    }

    /// Slot indices this session occupies.
    #[inline]
    pub fn occupied_slots(&self) -> std::ops::Range<usize> {
        self.slot_start..self.slot_start + self.duration_slots
    }

    /// Whether this session overlaps another in time (same day,
    /// intersecting slot ranges). Ignores resource dimensions.
    pub fn overlaps(&self, other: &Session) -> bool {
        self.day == other.day
            && self.slot_start < other.slot_start + other.duration_slots
            && other.slot_start < self.slot_start + self.duration_slots
    }

    /// Replacement record at a different (day, slot).
    pub fn moved_to(&self, day: Day, slot_start: usize) -> Session {
        Session {
            day,
            slot_start,
            ..self.clone()
        }
    }

    /// Replacement record in a different room.
    pub fn in_room(&self, room: impl Into<String>) -> Session {
        Session {
            room: room.into(),
            ..self.clone()
        }
    }

    /// Replacement record with a different instructor.
    pub fn taught_by(&self, faculty: impl Into<String>) -> Session {
        Session {
            faculty: faculty.into(),
            ..self.clone()
        }
    }
}

/// A complete set of placed sessions with an edit version.
///
/// The version counter increments on every mutation. Callers that
/// captured state at version `v` (e.g., a detected conflict) pass `v`
/// back when applying a swap; a mismatch means the assignment moved
/// underneath them and the operation is rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Assignment {
    sessions: Vec<Session>,
    version: u64,
}

impl Assignment {
    /// Creates an empty assignment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an assignment from a session list, at version 0.
    pub fn from_sessions(sessions: Vec<Session>) -> Self {
        Self {
            sessions,
            version: 0,
        }
    }

    /// Current edit version.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// All sessions, in placement order.
    #[inline]
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// Number of sessions.
    #[inline]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the assignment holds no sessions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Finds a session by id.
    pub fn session(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Adds a session, bumping the version.
    pub fn add(&mut self, session: Session) {
        self.sessions.push(session);
        self.version += 1;
    }

    /// Replaces the session with `replacement.id`, bumping the version.
    ///
    /// Returns `false` when no session with that id exists; the
    /// assignment is unchanged in that case.
    pub fn replace(&mut self, replacement: Session) -> bool {
        match self.sessions.iter().position(|s| s.id == replacement.id) {
            Some(idx) => {
                self.sessions[idx] = replacement;
                self.version += 1;
                true
            }
            None => false,
        }
    }

    /// Removes a session by id, bumping the version on success.
    pub fn remove(&mut self, id: &str) -> Option<Session> {
        let idx = self.sessions.iter().position(|s| s.id == id)?;
        self.version += 1;
        Some(self.sessions.remove(idx))
    }

    /// Sessions for one cohort.
    pub fn sessions_for_cohort(&self, cohort: &str) -> Vec<&Session> {
        self.sessions.iter().filter(|s| s.cohort == cohort).collect()
    }

    /// Sessions for one faculty member.
    pub fn sessions_for_faculty(&self, faculty: &str) -> Vec<&Session> {
        self.sessions
            .iter()
            .filter(|s| s.faculty == faculty)
            .collect()
    }

    /// Sessions in one room.
    pub fn sessions_for_room(&self, room: &str) -> Vec<&Session> {
        self.sessions.iter().filter(|s| s.room == room).collect()
    }
}
