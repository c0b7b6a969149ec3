//! Room model.
//!
//! Rooms are the physical resources sessions are placed into. Each room
//! has a kind, a seating capacity, and an equipment tag set used to
//! match course requirements.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Room classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoomKind {
    /// Tiered or flat lecture hall.
    Lecture,
    /// Equipped laboratory.
    Lab,
    /// Studio space (design, performance).
    Studio,
    /// Small-group seminar room.
    Seminar,
}

/// A schedulable room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier (e.g., "B-102", "Lab-2").
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Room classification.
    pub kind: RoomKind,
    /// Seating capacity. Must be positive.
    pub capacity: u32,
    /// Equipment tags (e.g., "projector", "fume-hood").
    pub equipment: BTreeSet<String>,
}

impl Room {
    /// Creates a new room.
    pub fn new(id: impl Into<String>, kind: RoomKind, capacity: u32) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            kind,
            capacity,
            equipment: BTreeSet::new(),
        }
    }

    /// Sets the room name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds an equipment tag.
    pub fn with_equipment(mut self, tag: impl Into<String>) -> Self {
        self.equipment.insert(tag.into());
        self
    }

    /// Whether this room carries every tag in `needed`.
    pub fn has_equipment(&self, needed: &BTreeSet<String>) -> bool {
        needed.iter().all(|tag| self.equipment.contains(tag))
    }

    /// Whether this room can seat `headcount` students.
    #[inline]
    pub fn seats(&self, headcount: u32) -> bool {
        self.capacity >= headcount
    }
}
