//! Conflict detection and lifecycle tracking.
//!
//! [`detect`] maps evaluator violations to classified [`Conflict`]
//! records. [`ConflictBoard`] owns conflict state across
//! re-evaluations: it deduplicates live conflicts by violation
//! fingerprint, enforces the lifecycle transition rules, and confirms
//! resolution by re-running the evaluator before accepting it.
//!
//! # Lifecycle
//!
//! `Open → Investigating → Resolved`, `Open → Resolved`, and
//! `{Open, Investigating} → Muted`. Resolved and Muted are terminal
//! for an occurrence: a fresh detection of the same underlying problem
//! opens a *new* conflict rather than reopening the old record.

use thiserror::Error;

use crate::evaluator::evaluate;
use crate::models::{
    Assignment, Calendar, Conflict, ConflictKind, ConflictStatus, ConstraintConfig, Severity,
    Violation, ViolationKind,
};
use crate::registry::Registry;

/// Errors from conflict lifecycle transitions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransitionError {
    /// No conflict with the given id is tracked.
    #[error("conflict '{0}' not found")]
    UnknownConflict(String),
    /// The requested transition is not allowed from the current status.
    #[error("conflict '{id}' is {status:?} and cannot move to {target:?}")]
    InvalidTransition {
        id: String,
        status: ConflictStatus,
        target: ConflictStatus,
    },
    /// Resolution was requested but re-evaluation still finds the
    /// violation. Distinct from a stale-version swap rejection.
    #[error("conflict '{0}' is not actually resolved; the violation persists")]
    NotResolved(String),
}

/// Filter over the conflict list. `None` fields match everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictFilter {
    /// Match a single kind.
    pub kind: Option<ConflictKind>,
    /// Match a single severity.
    pub severity: Option<Severity>,
    /// Match a single status.
    pub status: Option<ConflictStatus>,
}

impl ConflictFilter {
    /// Matches every conflict.
    pub fn any() -> Self {
        Self::default()
    }

    /// Restricts to one kind.
    pub fn with_kind(mut self, kind: ConflictKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Restricts to one severity.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Restricts to one status.
    pub fn with_status(mut self, status: ConflictStatus) -> Self {
        self.status = Some(status);
        self
    }

    fn matches(&self, conflict: &Conflict) -> bool {
        self.kind.map_or(true, |k| conflict.kind == k)
            && self.severity.map_or(true, |s| conflict.severity == s)
            && self.status.map_or(true, |s| conflict.status == s)
    }
}

/// Sort key for conflict queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictSortKey {
    Id,
    Kind,
    Severity,
    Status,
}

/// Classifies one violation into conflict kind and severity.
///
/// Overlaps on faculty or rooms are High; student clashes (cohort
/// overlap or wide elective bundles) are Medium; capacity overflows
/// scale with the overflow ratio.
fn classify(violation: &Violation) -> (ConflictKind, Severity) {
    match &violation.kind {
        ViolationKind::FacultyOverlap { .. } => (ConflictKind::FacultyOverlap, Severity::High),
        ViolationKind::RoomDoubleBook { .. } => (ConflictKind::RoomDoubleBook, Severity::High),
        ViolationKind::CohortOverlap { .. } => (ConflictKind::StudentClash, Severity::Medium),
        ViolationKind::ElectiveClashRisk { .. } => (ConflictKind::StudentClash, Severity::Medium),
        ViolationKind::CapacityOverflow { overflow_ratio, .. } => (
            ConflictKind::CapacityOverflow,
            Severity::from_overflow_ratio(*overflow_ratio),
        ),
    }
}

/// Maps violations to freshly opened conflicts.
///
/// Stateless form of detection: ids are numbered within the call.
/// Use a [`ConflictBoard`] when conflicts must survive re-evaluation.
pub fn detect(violations: &[Violation]) -> Vec<Conflict> {
    violations
        .iter()
        .enumerate()
        .map(|(idx, violation)| {
            let (kind, severity) = classify(violation);
            Conflict {
                id: format!("CF-{}", idx + 1),
                kind,
                severity,
                status: ConflictStatus::Open,
                sessions: violation.sessions.clone(),
                note: violation.message.clone(),
            }
        })
        .collect()
}

struct Tracked {
    conflict: Conflict,
    fingerprint: String,
}

/// Stateful conflict store across detections.
#[derive(Default)]
pub struct ConflictBoard {
    tracked: Vec<Tracked>,
    next_id: u64,
}

impl ConflictBoard {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a fresh violation list into the board.
    ///
    /// Violations whose fingerprint matches a live (Open or
    /// Investigating) conflict are already tracked and skipped.
    /// Everything else opens a new conflict, including re-detections of
    /// problems whose previous occurrence was Resolved or Muted.
    /// Returns the ids of newly opened conflicts.
    pub fn sync(&mut self, violations: &[Violation]) -> Vec<String> {
        let mut opened = Vec::new();
        for violation in violations {
            let fingerprint = violation.fingerprint();
            let live = self.tracked.iter().any(|t| {
                t.fingerprint == fingerprint && !t.conflict.status.is_terminal()
            });
            if live {
                continue;
            }

            self.next_id += 1;
            let (kind, severity) = classify(violation);
            let conflict = Conflict {
                id: format!("CF-{}", self.next_id),
                kind,
                severity,
                status: ConflictStatus::Open,
                sessions: violation.sessions.clone(),
                note: violation.message.clone(),
            };
            opened.push(conflict.id.clone());
            self.tracked.push(Tracked {
                conflict,
                fingerprint,
            });
        }
        opened
    }

    /// All tracked conflicts, in detection order.
    pub fn conflicts(&self) -> Vec<&Conflict> {
        self.tracked.iter().map(|t| &t.conflict).collect()
    }

    /// Looks up a conflict by id.
    pub fn get(&self, id: &str) -> Option<&Conflict> {
        self.tracked
            .iter()
            .map(|t| &t.conflict)
            .find(|c| c.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Tracked, TransitionError> {
        self.tracked
            .iter_mut()
            .find(|t| t.conflict.id == id)
            .ok_or_else(|| TransitionError::UnknownConflict(id.to_string()))
    }

    /// Marks a conflict as under investigation. No effect on the
    /// assignment.
    pub fn start_investigating(&mut self, id: &str) -> Result<(), TransitionError> {
        let tracked = self.get_mut(id)?;
        match tracked.conflict.status {
            ConflictStatus::Open => {
                tracked.conflict.status = ConflictStatus::Investigating;
                Ok(())
            }
            status => Err(TransitionError::InvalidTransition {
                id: id.to_string(),
                status,
                target: ConflictStatus::Investigating,
            }),
        }
    }

    /// Mutes a conflict: the user accepts the risk. Allowed
    /// unconditionally from any live status.
    pub fn mute(&mut self, id: &str) -> Result<(), TransitionError> {
        let tracked = self.get_mut(id)?;
        match tracked.conflict.status {
            ConflictStatus::Open | ConflictStatus::Investigating => {
                tracked.conflict.status = ConflictStatus::Muted;
                Ok(())
            }
            status => Err(TransitionError::InvalidTransition {
                id: id.to_string(),
                status,
                target: ConflictStatus::Muted,
            }),
        }
    }

    /// Marks a conflict Resolved after confirming the violation is
    /// gone.
    ///
    /// Re-runs the evaluator on the current assignment. If the
    /// conflict's fingerprint still appears, the claim is refused with
    /// [`TransitionError::NotResolved`] and the conflict is forced back
    /// to Open.
    pub fn resolve(
        &mut self,
        id: &str,
        assignment: &Assignment,
        registry: &Registry,
        calendar: &Calendar,
        config: &ConstraintConfig,
    ) -> Result<(), TransitionError> {
        let tracked = self.get_mut(id)?;
        match tracked.conflict.status {
            ConflictStatus::Open | ConflictStatus::Investigating => {}
            status => {
                return Err(TransitionError::InvalidTransition {
                    id: id.to_string(),
                    status,
                    target: ConflictStatus::Resolved,
                })
            }
        }

        let fingerprint = tracked.fingerprint.clone();
        let evaluation = evaluate(assignment, registry, calendar, config);
        let persists = evaluation
            .violations
            .iter()
            .any(|v| v.fingerprint() == fingerprint);

        let tracked = self.get_mut(id)?;
        if persists {
            tracked.conflict.status = ConflictStatus::Open;
            Err(TransitionError::NotResolved(id.to_string()))
        } else {
            tracked.conflict.status = ConflictStatus::Resolved;
            Ok(())
        }
    }

    /// Filters and sorts the conflict list.
    pub fn query(
        &self,
        filter: ConflictFilter,
        sort: ConflictSortKey,
        ascending: bool,
    ) -> Vec<&Conflict> {
        let mut result: Vec<&Conflict> = self
            .tracked
            .iter()
            .map(|t| &t.conflict)
            .filter(|c| filter.matches(c))
            .collect();

        result.sort_by(|a, b| {
            let ordering = match sort {
                ConflictSortKey::Id => a.id.cmp(&b.id),
                ConflictSortKey::Kind => a.kind.cmp(&b.kind),
                ConflictSortKey::Severity => a.severity.cmp(&b.severity),
                ConflictSortKey::Status => a.status.cmp(&b.status),
            };
            if ascending {
                ordering
            } else {
                ordering.reverse()
            }
        });
        result
    }
}
