//! Term calendar and slot-grid model.
//!
//! Defines the working time grid for a teaching term: teaching days,
//! slot start times on a shared grid unit, and dated exclusions
//! (holidays, exam windows, blackout cells).
//!
//! # Time Model
//! All intra-day times are `"HH:MM"` strings parsed to minutes from
//! midnight. Sessions address the grid by slot index; two slots are
//! adjacent iff their indices differ by one.
//!
//! # Precedence
//! Exclusions override the grid. A (day, slot) cell is schedulable iff
//! the day is a teaching day and the cell is not blacked out; a date is
//! schedulable iff it falls in the term, is not a holiday, and is not
//! inside an exam window.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Grid units (minutes) a calendar may use.
pub const ALLOWED_SLOT_LENGTHS: [u32; 7] = [30, 45, 50, 60, 75, 90, 120];

/// A teaching day of the week.
///
/// Serialized as the three-letter English abbreviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Day {
    /// All days a calendar may teach on, in week order.
    pub const ALL: [Day; 6] = [Day::Mon, Day::Tue, Day::Wed, Day::Thu, Day::Fri, Day::Sat];
}

/// A dated single-day exclusion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holiday {
    /// Excluded date.
    pub date: NaiveDate,
    /// Display label (e.g., "Republic Day").
    pub label: String,
}

/// A date range during which regular teaching is suspended.
///
/// Closed range: both endpoints are suspended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamWindow {
    /// First suspended date.
    pub start: NaiveDate,
    /// Last suspended date (inclusive).
    pub end: NaiveDate,
    /// Display label (e.g., "Mid-semester exams").
    pub label: String,
}

impl ExamWindow {
    /// Whether a date falls inside this window.
    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// A (day, slot) cell that is globally unschedulable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blackout {
    /// Day of week.
    pub day: Day,
    /// Slot index into the calendar grid.
    pub slot: usize,
}

/// Term calendar: the working slot grid plus exclusions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Calendar {
    /// First teaching date of the term.
    pub term_start: NaiveDate,
    /// Last teaching date of the term (inclusive).
    pub term_end: NaiveDate,
    /// Days of the week on which teaching happens.
    pub teaching_days: Vec<Day>,
    /// Ordered slot start times as `"HH:MM"` strings.
    pub slots: Vec<String>,
    /// Shared grid unit in minutes (one of [`ALLOWED_SLOT_LENGTHS`]).
    pub slot_length_minutes: u32,
    /// Dated single-day exclusions.
    pub holidays: Vec<Holiday>,
    /// Date ranges where regular teaching is suspended.
    pub exam_windows: Vec<ExamWindow>,
    /// (day, slot) cells that are globally unavailable.
    pub blackouts: Vec<Blackout>,
}

impl Calendar {
    /// Creates a calendar for a term with an empty grid.
    pub fn new(term_start: NaiveDate, term_end: NaiveDate) -> Self {
        Self {
            term_start,
            term_end,
            teaching_days: Vec::new(),
            slots: Vec::new(),
            slot_length_minutes: 60,
            holidays: Vec::new(),
            exam_windows: Vec::new(),
            blackouts: Vec::new(),
        }
    }

    /// Sets the teaching days.
    pub fn with_teaching_days(mut self, days: impl IntoIterator<Item = Day>) -> Self {
        self.teaching_days = days.into_iter().collect();
        self
    }

    /// Sets the slot grid: start times plus the shared grid unit.
    pub fn with_slots(
        mut self,
        starts: impl IntoIterator<Item = impl Into<String>>,
        slot_length_minutes: u32,
    ) -> Self {
        self.slots = starts.into_iter().map(Into::into).collect();
        self.slot_length_minutes = slot_length_minutes;
        self
    }

    /// Adds a holiday.
    pub fn with_holiday(mut self, date: NaiveDate, label: impl Into<String>) -> Self {
        self.holidays.push(Holiday {
            date,
            label: label.into(),
        });
        self
    }

    /// Adds an exam window.
    pub fn with_exam_window(
        mut self,
        start: NaiveDate,
        end: NaiveDate,
        label: impl Into<String>,
    ) -> Self {
        self.exam_windows.push(ExamWindow {
            start,
            end,
            label: label.into(),
        });
        self
    }

    /// Adds a blackout cell.
    pub fn with_blackout(mut self, day: Day, slot: usize) -> Self {
        self.blackouts.push(Blackout { day, slot });
        self
    }

    /// Number of slots in the daily grid.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Whether a day is a teaching day.
    pub fn is_teaching_day(&self, day: Day) -> bool {
        self.teaching_days.contains(&day)
    }

    /// Whether a (day, slot) cell is blacked out.
    pub fn is_blacked_out(&self, day: Day, slot: usize) -> bool {
        self.blackouts.iter().any(|b| b.day == day && b.slot == slot)
    }

    /// Whether any cell in `[slot_start, slot_start + duration)` is blacked out
    /// or off the grid for the given day.
    pub fn span_blocked(&self, day: Day, slot_start: usize, duration_slots: usize) -> bool {
        if slot_start + duration_slots > self.slot_count() {
            return true;
        }
        (slot_start..slot_start + duration_slots).any(|s| self.is_blacked_out(day, s))
    }

    /// Whether a date is a holiday.
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.iter().any(|h| h.date == date)
    }

    /// Whether a date falls inside an exam window.
    pub fn in_exam_window(&self, date: NaiveDate) -> bool {
        self.exam_windows.iter().any(|w| w.contains(date))
    }

    /// Whether regular teaching happens on a date.
    pub fn is_teaching_date(&self, date: NaiveDate) -> bool {
        date >= self.term_start
            && date <= self.term_end
            && !self.is_holiday(date)
            && !self.in_exam_window(date)
    }

    /// Minutes from midnight for a slot index, if the slot parses.
    pub fn slot_minutes(&self, slot: usize) -> Option<u32> {
        self.slots.get(slot).and_then(|s| parse_hhmm(s))
    }

    /// Looks up a slot index by its `"HH:MM"` label.
    pub fn slot_index(&self, label: &str) -> Option<usize> {
        self.slots.iter().position(|s| s == label)
    }

    /// Whether two grid slots are adjacent given a duration in slots.
    ///
    /// `second` is adjacent to `first` iff it starts exactly where a
    /// session of `duration_slots` starting at `first` would end.
    pub fn is_adjacent(&self, first: usize, duration_slots: usize, second: usize) -> bool {
        first + duration_slots == second
    }
}

/// Parses an `"HH:MM"` string into minutes from midnight.
///
/// Strict format: exactly two digits, a colon, two digits, with
/// `HH < 24` and `MM < 60`.
pub fn parse_hhmm(s: &str) -> Option<u32> {
    let bytes = s.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return None;
    }
    let digits = |a: u8, b: u8| -> Option<u32> {
        if a.is_ascii_digit() && b.is_ascii_digit() {
            Some(((a - b'0') as u32) * 10 + (b - b'0') as u32)
        } else {
            None
        }
    };
    let hours = digits(bytes[0], bytes[1])?;
    let minutes = digits(bytes[3], bytes[4])?;
    if hours < 24 && minutes < 60 {
        Some(hours * 60 + minutes)
    } else {
        None
    }
}

/// Formats minutes from midnight as `"HH:MM"`.
pub fn format_hhmm(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_calendar() -> Calendar {
        Calendar::new(date(2026, 1, 5), date(2026, 5, 15))
            .with_teaching_days([Day::Mon, Day::Tue, Day::Wed, Day::Thu, Day::Fri])
            .with_slots(["09:00", "10:00", "11:00", "12:00", "14:00", "15:00"], 60)
            .with_holiday(date(2026, 1, 26), "Republic Day")
            .with_exam_window(date(2026, 3, 2), date(2026, 3, 7), "Mid-semester exams")
            .with_blackout(Day::Wed, 3)
    }

    #[test]
    fn test_parse_hhmm() {
        assert_eq!(parse_hhmm("09:00"), Some(540));
        assert_eq!(parse_hhmm("00:00"), Some(0));
        assert_eq!(parse_hhmm("23:59"), Some(1439));
        assert_eq!(parse_hhmm("24:00"), None);
        assert_eq!(parse_hhmm("12:60"), None);
        assert_eq!(parse_hhmm("9:00"), None); // Must be zero-padded
        assert_eq!(parse_hhmm("0900"), None);
        assert_eq!(parse_hhmm("ab:cd"), None);
    }

    #[test]
    fn test_format_hhmm() {
        assert_eq!(format_hhmm(540), "09:00");
        assert_eq!(format_hhmm(0), "00:00");
        assert_eq!(format_hhmm(845), "14:05");
    }

    #[test]
    fn test_teaching_day() {
        let cal = sample_calendar();
        assert!(cal.is_teaching_day(Day::Mon));
        assert!(!cal.is_teaching_day(Day::Sat));
    }

    #[test]
    fn test_slot_lookup() {
        let cal = sample_calendar();
        assert_eq!(cal.slot_count(), 6);
        assert_eq!(cal.slot_index("14:00"), Some(4));
        assert_eq!(cal.slot_index("13:00"), None);
        assert_eq!(cal.slot_minutes(0), Some(540));
        assert_eq!(cal.slot_minutes(99), None);
    }

    #[test]
    fn test_blackout() {
        let cal = sample_calendar();
        assert!(cal.is_blacked_out(Day::Wed, 3));
        assert!(!cal.is_blacked_out(Day::Wed, 2));
        assert!(!cal.is_blacked_out(Day::Thu, 3));
    }

    #[test]
    fn test_span_blocked() {
        let cal = sample_calendar();
        // Two-slot span ending in the blackout cell
        assert!(cal.span_blocked(Day::Wed, 2, 2));
        assert!(!cal.span_blocked(Day::Thu, 2, 2));
        // Span running off the end of the grid
        assert!(cal.span_blocked(Day::Mon, 5, 2));
    }

    #[test]
    fn test_teaching_date() {
        let cal = sample_calendar();
        assert!(cal.is_teaching_date(date(2026, 1, 12)));
        assert!(!cal.is_teaching_date(date(2026, 1, 26))); // Holiday
        assert!(!cal.is_teaching_date(date(2026, 3, 4))); // Exam window
        assert!(!cal.is_teaching_date(date(2025, 12, 25))); // Before term
        assert!(!cal.is_teaching_date(date(2026, 6, 1))); // After term
    }

    #[test]
    fn test_exam_window_bounds() {
        let w = ExamWindow {
            start: date(2026, 3, 2),
            end: date(2026, 3, 7),
            label: "exams".into(),
        };
        assert!(w.contains(date(2026, 3, 2)));
        assert!(w.contains(date(2026, 3, 7)));
        assert!(!w.contains(date(2026, 3, 8)));
    }

    #[test]
    fn test_adjacency() {
        let cal = sample_calendar();
        // A two-slot session starting at 0 ends where slot 2 begins
        assert!(cal.is_adjacent(0, 2, 2));
        assert!(!cal.is_adjacent(0, 2, 3));
        assert!(cal.is_adjacent(4, 1, 5));
    }

    #[test]
    fn test_day_serde() {
        let json = serde_json::to_string(&Day::Wed).unwrap();
        assert_eq!(json, "\"Wed\"");
        let day: Day = serde_json::from_str("\"Sat\"").unwrap();
        assert_eq!(day, Day::Sat);
    }
}
