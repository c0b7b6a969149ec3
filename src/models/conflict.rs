//! Conflict records.
//!
//! A conflict is the stateful, user-facing form of a detected
//! violation: classified by kind and severity, carrying a lifecycle
//! status. Transition rules live in the detector's
//! [`ConflictBoard`](crate::detector::ConflictBoard); this module only
//! defines the data shapes.

use serde::{Deserialize, Serialize};

/// User-facing conflict classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConflictKind {
    /// One faculty member in two places at once.
    FacultyOverlap,
    /// One room hosting two sessions at once.
    RoomDoubleBook,
    /// One cohort expected in two places at once, or an elective
    /// bundle wide enough to signal clash risk.
    StudentClash,
    /// Room smaller than expected enrollment.
    CapacityOverflow,
}

/// Conflict severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Severity for a capacity overflow ratio.
    ///
    /// Monotonic in the ratio: under 10% is Low, 10-25% Medium, above
    /// 25% High.
    pub fn from_overflow_ratio(ratio: f64) -> Self {
        if ratio < 0.10 {
            Severity::Low
        } else if ratio <= 0.25 {
            Severity::Medium
        } else {
            Severity::High
        }
    }
}

/// Conflict lifecycle status.
///
/// `Open → Investigating → Resolved`, with `Muted` reachable from any
/// live status. `Resolved` and `Muted` are terminal for the occurrence;
/// re-detection creates a fresh conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConflictStatus {
    /// Detected, not yet handled.
    Open,
    /// Being looked at; no effect on the assignment.
    Investigating,
    /// Confirmed gone after a swap or manual fix.
    Resolved,
    /// User accepted the risk.
    Muted,
}

impl ConflictStatus {
    /// Whether this occurrence can still change status.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, ConflictStatus::Resolved | ConflictStatus::Muted)
    }
}

/// A classified, stateful scheduling conflict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    /// Unique conflict identifier.
    pub id: String,
    /// Classification.
    pub kind: ConflictKind,
    /// Severity.
    pub severity: Severity,
    /// Lifecycle status.
    pub status: ConflictStatus,
    /// Involved session ids.
    pub sessions: Vec<String>,
    /// Human-readable note from detection.
    pub note: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_from_ratio() {
        assert_eq!(Severity::from_overflow_ratio(0.05), Severity::Low);
        assert_eq!(Severity::from_overflow_ratio(0.10), Severity::Medium);
        assert_eq!(Severity::from_overflow_ratio(0.15), Severity::Medium);
        assert_eq!(Severity::from_overflow_ratio(0.25), Severity::Medium);
        assert_eq!(Severity::from_overflow_ratio(0.30), Severity::High);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!ConflictStatus::Open.is_terminal());
        assert!(!ConflictStatus::Investigating.is_terminal());
        assert!(ConflictStatus::Resolved.is_terminal());
        assert!(ConflictStatus::Muted.is_terminal());
    }
}
