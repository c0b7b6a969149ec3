//! Faculty model.
//!
//! Faculty members teach sessions. Each carries a weekly load ceiling,
//! an availability set over the calendar grid, soft preferences, and
//! expertise tags used when suggesting instructor swaps.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::Day;

/// Soft scheduling preferences for a faculty member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyPreferences {
    /// Prefers sessions before noon.
    pub morning_preferred: bool,
    /// Prefers teaching packed into fewer days.
    pub compact_days: bool,
}

/// A faculty member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Faculty {
    /// Unique faculty identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Weekly teaching load ceiling in hours. Must be positive.
    pub max_weekly_load_hours: u32,
    /// (day, slot) cells this member can teach in.
    pub availability: BTreeSet<(Day, usize)>,
    /// Soft preferences.
    pub preferences: FacultyPreferences,
    /// Expertise tags (course codes or subject areas).
    pub expertise: BTreeSet<String>,
}

impl Faculty {
    /// Creates a new faculty member.
    pub fn new(id: impl Into<String>, max_weekly_load_hours: u32) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            max_weekly_load_hours,
            availability: BTreeSet::new(),
            preferences: FacultyPreferences::default(),
            expertise: BTreeSet::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Marks a set of slots on one day as available.
    pub fn with_availability(mut self, day: Day, slots: impl IntoIterator<Item = usize>) -> Self {
        for slot in slots {
            self.availability.insert((day, slot));
        }
        self
    }

    /// Sets the soft preferences.
    pub fn with_preferences(mut self, preferences: FacultyPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Adds an expertise tag.
    pub fn with_expertise(mut self, tag: impl Into<String>) -> Self {
        self.expertise.insert(tag.into());
        self
    }

    /// Whether this member is available in a single grid cell.
    #[inline]
    pub fn available_at(&self, day: Day, slot: usize) -> bool {
        self.availability.contains(&(day, slot))
    }

    /// Whether this member is available for every cell of a span.
    pub fn available_for_span(&self, day: Day, slot_start: usize, duration_slots: usize) -> bool {
        (slot_start..slot_start + duration_slots).all(|s| self.available_at(day, s))
    }

    /// Whether this member carries an expertise tag.
    pub fn has_expertise(&self, tag: &str) -> bool {
        self.expertise.contains(tag)
    }
}
