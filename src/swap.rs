//! Swap suggestions and atomic swap application.
//!
//! For a detected conflict, enumerates alternative bindings (room,
//! time, or instructor) for the involved sessions, validates each one
//! against a hypothetical post-swap evaluation, and ranks the
//! survivors. Candidates that would introduce any new hard violation
//! are discarded before ranking.
//!
//! Applying a candidate is a compare-and-swap against the assignment's
//! version counter: if the assignment changed since the conflict was
//! detected, the apply is rejected and the caller re-detects before
//! retrying. A successful apply is the only path that can move a
//! conflict to Resolved.

use std::cmp::Ordering;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::detector::detect;
use crate::evaluator::evaluate;
use crate::models::{
    Assignment, Calendar, Conflict, ConflictKind, ConstraintConfig, Day, Session,
};
use crate::registry::Registry;

/// The binding change a swap candidate proposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapChange {
    /// Move the session into another room.
    Room { room: String },
    /// Move the session to another (day, slot) cell.
    TimeMove { day: Day, slot_start: usize },
    /// Hand the session to another instructor.
    Instructor { faculty: String },
}

/// A validated, ranked swap proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapCandidate {
    /// Session the change applies to.
    pub session: String,
    /// Proposed binding change.
    pub change: SwapChange,
    /// Whether applying it removes the originating conflict.
    pub resolves: bool,
    /// Number of sessions the change touches.
    pub sessions_touched: usize,
    /// Soft-objective regression (`before - after`); negative values
    /// improve the timetable.
    pub soft_delta: f64,
}

/// Errors from applying a swap.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SwapError {
    /// The assignment changed since the conflict was detected.
    /// Recoverable: re-detect and retry.
    #[error("assignment moved on from version {expected} to {actual}; re-detect before retrying")]
    StaleConflict { expected: u64, actual: u64 },
    /// The candidate references a session the assignment doesn't hold.
    #[error("session '{0}' not found in the assignment")]
    UnknownSession(String),
}

/// Suggests ranked swap candidates for a conflict.
///
/// Enumeration depends on the conflict kind:
/// - RoomDoubleBook / CapacityOverflow: rooms of the required kind
///   seating the expected enrollment, free at the session's cells.
/// - FacultyOverlap: free cells within the instructor's availability,
///   or alternate instructors with matching expertise.
/// - StudentClash: alternate cells for one of the colliding sessions.
///
/// Ranking: resolving candidates first, then fewest sessions touched,
/// then best soft-objective delta; ties broken by session id and
/// change shape for stable output.
pub fn suggest(
    conflict: &Conflict,
    assignment: &Assignment,
    registry: &Registry,
    calendar: &Calendar,
    config: &ConstraintConfig,
) -> Vec<SwapCandidate> {
    let baseline = evaluate(assignment, registry, calendar, config);
    let baseline_fingerprints = baseline.hard_fingerprints();
    let baseline_total = baseline.scores.weighted_total;

    let mut candidates = Vec::new();
    let mut discarded = 0usize;

    for (session_id, change) in enumerate_changes(conflict, assignment, registry, calendar) {
        let Some(hypothetical) = applied_clone(assignment, &session_id, &change) else {
            continue;
        };
        let after = evaluate(&hypothetical, registry, calendar, config);

        // Any hard violation absent from the baseline kills the candidate.
        let introduces_new = after
            .hard_fingerprints()
            .difference(&baseline_fingerprints)
            .next()
            .is_some();
        if introduces_new {
            discarded += 1;
            continue;
        }

        let resolves = !detect(&after.violations).iter().any(|c| {
            c.kind == conflict.kind && c.sessions == conflict.sessions
        });

        candidates.push(SwapCandidate {
            session: session_id,
            change,
            resolves,
            sessions_touched: 1,
            soft_delta: baseline_total - after.scores.weighted_total,
        });
    }

    debug!(
        "swap suggestion for {}: {} candidates, {} discarded for new violations",
        conflict.id,
        candidates.len(),
        discarded
    );

    candidates.sort_by(|a, b| {
        b.resolves
            .cmp(&a.resolves)
            .then(a.sessions_touched.cmp(&b.sessions_touched))
            .then(
                a.soft_delta
                    .partial_cmp(&b.soft_delta)
                    .unwrap_or(Ordering::Equal),
            )
            .then(a.session.cmp(&b.session))
            .then(change_rank(&a.change).cmp(&change_rank(&b.change)))
    });
    candidates
}

/// Applies a candidate to the assignment, compare-and-swap style.
///
/// `expected_version` is the assignment version the caller observed
/// when the conflict was detected. On success returns the new version.
pub fn apply_swap(
    assignment: &mut Assignment,
    candidate: &SwapCandidate,
    expected_version: u64,
) -> Result<u64, SwapError> {
    let actual = assignment.version();
    if actual != expected_version {
        return Err(SwapError::StaleConflict {
            expected: expected_version,
            actual,
        });
    }

    let current = assignment
        .session(&candidate.session)
        .ok_or_else(|| SwapError::UnknownSession(candidate.session.clone()))?;
    let replacement = build_replacement(current, &candidate.change);
    assignment.replace(replacement);

    info!(
        "applied swap on '{}': {:?} (version {} -> {})",
        candidate.session,
        candidate.change,
        expected_version,
        assignment.version()
    );
    Ok(assignment.version())
}

fn build_replacement(current: &Session, change: &SwapChange) -> Session {
    match change {
        SwapChange::Room { room } => current.in_room(room.clone()),
        SwapChange::TimeMove { day, slot_start } => current.moved_to(*day, *slot_start),
        SwapChange::Instructor { faculty } => current.taught_by(faculty.clone()),
    }
}

fn applied_clone(
    assignment: &Assignment,
    session_id: &str,
    change: &SwapChange,
) -> Option<Assignment> {
    let current = assignment.session(session_id)?;
    let replacement = build_replacement(current, change);
    let mut clone = assignment.clone();
    clone.replace(replacement);
    Some(clone)
}

/// Deterministic ordering of change shapes for tie-breaking.
fn change_rank(change: &SwapChange) -> (u8, String, usize) {
    match change {
        SwapChange::Room { room } => (0, room.clone(), 0),
        SwapChange::TimeMove { day, slot_start } => (1, format!("{day:?}"), *slot_start),
        SwapChange::Instructor { faculty } => (2, faculty.clone(), 0),
    }
}

/// Enumerates raw (session, change) possibilities for a conflict.
fn enumerate_changes(
    conflict: &Conflict,
    assignment: &Assignment,
    registry: &Registry,
    calendar: &Calendar,
) -> Vec<(String, SwapChange)> {
    let mut changes = Vec::new();

    for session_id in &conflict.sessions {
        let Some(session) = assignment.session(session_id) else {
            continue;
        };

        match conflict.kind {
            ConflictKind::RoomDoubleBook | ConflictKind::CapacityOverflow => {
                enumerate_rooms(session, assignment, registry, &mut changes);
            }
            ConflictKind::FacultyOverlap => {
                enumerate_time_moves(session, assignment, registry, calendar, &mut changes);
                enumerate_instructors(session, assignment, registry, &mut changes);
            }
            ConflictKind::StudentClash => {
                enumerate_time_moves(session, assignment, registry, calendar, &mut changes);
            }
        }
    }

    changes
}

/// Rooms of the offering's kind that seat the expected enrollment and
/// are free across the session's cells.
fn enumerate_rooms(
    session: &Session,
    assignment: &Assignment,
    registry: &Registry,
    out: &mut Vec<(String, SwapChange)>,
) {
    let Some(offering) = registry.offering(&session.course) else {
        return;
    };
    let needed = offering.expected_enrollment.max(offering.min_capacity);

    for room in registry.rooms_matching(offering.room_kind, needed) {
        if room.id == session.room || !room.has_equipment(&offering.equipment_needed) {
            continue;
        }
        let free = !assignment.sessions().iter().any(|other| {
            other.id != session.id && other.room == room.id && other.overlaps(session)
        });
        if free {
            out.push((
                session.id.clone(),
                SwapChange::Room {
                    room: room.id.clone(),
                },
            ));
        }
    }
}

/// Free (day, slot) cells within the session instructor's availability.
fn enumerate_time_moves(
    session: &Session,
    assignment: &Assignment,
    registry: &Registry,
    calendar: &Calendar,
    out: &mut Vec<(String, SwapChange)>,
) {
    let faculty = registry.faculty_member(&session.faculty);
    let duration = session.duration_slots;
    let slot_count = calendar.slot_count();

    for &day in &calendar.teaching_days {
        for slot_start in 0..slot_count.saturating_sub(duration - 1) {
            if day == session.day && slot_start == session.slot_start {
                continue;
            }
            if calendar.span_blocked(day, slot_start, duration) {
                continue;
            }
            if let Some(f) = faculty {
                if !f.available_for_span(day, slot_start, duration) {
                    continue;
                }
            }
            let target = session.moved_to(day, slot_start);
            let busy = assignment.sessions().iter().any(|other| {
                other.id != session.id
                    && other.overlaps(&target)
                    && (other.room == session.room
                        || other.faculty == session.faculty
                        || other.cohort == session.cohort)
            });
            if !busy {
                out.push((
                    session.id.clone(),
                    SwapChange::TimeMove { day, slot_start },
                ));
            }
        }
    }
}

/// Alternate instructors from the offering's candidate list with the
/// required expertise, available and free at the session's cells.
fn enumerate_instructors(
    session: &Session,
    assignment: &Assignment,
    registry: &Registry,
    out: &mut Vec<(String, SwapChange)>,
) {
    let Some(offering) = registry.offering(&session.course) else {
        return;
    };

    for candidate_id in &offering.instructors {
        if *candidate_id == session.faculty {
            continue;
        }
        let Some(candidate) = registry.faculty_member(candidate_id) else {
            continue;
        };
        if !candidate.has_expertise(&session.course) {
            continue;
        }
        if !candidate.available_for_span(session.day, session.slot_start, session.duration_slots) {
            continue;
        }
        let busy = assignment.sessions().iter().any(|other| {
            other.id != session.id && other.faculty == *candidate_id && other.overlaps(session)
        });
        if !busy {
            out.push((
                session.id.clone(),
                SwapChange::Instructor {
                    faculty: candidate_id.clone(),
                },
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::ConflictBoard;
    use crate::models::{
        Cohort, CourseOffering, Faculty, Room, RoomKind, SessionKind, SessionRequirement,
    };
    use chrono::NaiveDate;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn calendar() -> Calendar {
        Calendar::new(date(2026, 1, 5), date(2026, 5, 15))
            .with_teaching_days([Day::Mon, Day::Tue, Day::Wed, Day::Thu, Day::Fri])
            .with_slots(["09:00", "10:00", "11:00", "12:00", "14:00", "15:00"], 60)
    }

    fn full_availability(id: &str) -> Faculty {
        let mut f = Faculty::new(id, 20);
        for day in [Day::Mon, Day::Tue, Day::Wed, Day::Thu, Day::Fri] {
            f = f.with_availability(day, 0..6);
        }
        f
    }

    fn registry() -> Registry {
        Registry::new()
            .with_room(Room::new("Lab-2", RoomKind::Lab, 40).with_equipment("bench"))
            .with_room(Room::new("Lab-5", RoomKind::Lab, 45).with_equipment("bench"))
            .with_room(Room::new("B-102", RoomKind::Lecture, 60))
            .with_faculty(full_availability("F-12").with_expertise("CS301"))
            .with_faculty(full_availability("F-07").with_expertise("CS301").with_expertise("CS305"))
            .with_cohort(Cohort::new("BSC-CS-3A", 38))
            .with_cohort(Cohort::new("BSC-CS-3B", 36))
            .with_offering(
                CourseOffering::new("CS301", 3, RoomKind::Lab)
                    .with_enrollment(38)
                    .with_requirement(SessionRequirement::new(SessionKind::Practical, 1, 2))
                    .with_instructor("F-12")
                    .with_instructor("F-07")
                    .with_equipment("bench")
                    .with_cohort("BSC-CS-3A"),
            )
            .with_offering(
                CourseOffering::new("CS305", 3, RoomKind::Lab)
                    .with_enrollment(36)
                    .with_requirement(SessionRequirement::new(SessionKind::Practical, 1, 2))
                    .with_instructor("F-07")
                    .with_equipment("bench")
                    .with_cohort("BSC-CS-3B"),
            )
    }

    /// Two practicals colliding in Lab-2 on Wed 14:00 (slot 4).
    fn colliding_assignment() -> Assignment {
        let mut a = Assignment::new();
        a.add(Session::new(
            "CS301-P1",
            SessionKind::Practical,
            "CS301",
            "BSC-CS-3A",
            "F-12",
            "Lab-2",
            Day::Wed,
            4,
            2,
        ));
        a.add(Session::new(
            "CS305-P1",
            SessionKind::Practical,
            "CS305",
            "BSC-CS-3B",
            "F-07",
            "Lab-2",
            Day::Wed,
            4,
            2,
        ));
        a
    }

    fn room_conflict(
        assignment: &Assignment,
        registry: &Registry,
        calendar: &Calendar,
        config: &ConstraintConfig,
    ) -> Conflict {
        let eval = evaluate(assignment, registry, calendar, config);
        detect(&eval.violations)
            .into_iter()
            .find(|c| c.kind == ConflictKind::RoomDoubleBook)
            .expect("expected a room conflict")
    }

    #[test]
    fn test_room_swap_resolves_double_booking() {
        let a = colliding_assignment();
        let reg = registry();
        let cal = calendar();
        let config = ConstraintConfig::default();

        let conflict = room_conflict(&a, &reg, &cal, &config);
        let candidates = suggest(&conflict, &a, &reg, &cal, &config);
        assert!(!candidates.is_empty());

        let top = &candidates[0];
        assert!(top.resolves);
        // Only Lab-5 is a big-enough free lab
        assert_eq!(
            top.change,
            SwapChange::Room {
                room: "Lab-5".into()
            }
        );

        let mut after = a.clone();
        let version = after.version();
        apply_swap(&mut after, top, version).unwrap();
        let eval = evaluate(&after, &reg, &cal, &config);
        assert!(eval.is_feasible());
    }

    #[test]
    fn test_applied_candidate_marks_conflict_resolved() {
        let mut a = colliding_assignment();
        let reg = registry();
        let cal = calendar();
        let config = ConstraintConfig::default();

        let eval = evaluate(&a, &reg, &cal, &config);
        let mut board = ConflictBoard::new();
        let ids = board.sync(&eval.violations);

        let conflict = board.get(&ids[0]).unwrap().clone();
        let candidates = suggest(&conflict, &a, &reg, &cal, &config);
        let version = a.version();
        apply_swap(&mut a, &candidates[0], version).unwrap();

        board.resolve(&ids[0], &a, &reg, &cal, &config).unwrap();
    }

    #[test]
    fn test_stale_version_rejected() {
        let mut a = colliding_assignment();
        let reg = registry();
        let cal = calendar();
        let config = ConstraintConfig::default();

        let conflict = room_conflict(&a, &reg, &cal, &config);
        let candidates = suggest(&conflict, &a, &reg, &cal, &config);
        let observed = a.version();

        // Concurrent edit bumps the version
        let moved = a.session("CS305-P1").unwrap().moved_to(Day::Mon, 0);
        a.replace(moved);

        let err = apply_swap(&mut a, &candidates[0], observed).unwrap_err();
        assert!(matches!(err, SwapError::StaleConflict { .. }));

        // Recoverable: the caller re-detects against the current state.
        // Here the concurrent move already cleared the collision.
        let eval = evaluate(&a, &reg, &cal, &config);
        assert!(!detect(&eval.violations)
            .iter()
            .any(|c| c.kind == ConflictKind::RoomDoubleBook));
    }

    #[test]
    fn test_faculty_overlap_suggests_time_and_instructor() {
        let reg = registry();
        let cal = calendar();
        let config = ConstraintConfig::default();

        let mut a = Assignment::new();
        a.add(Session::new(
            "CS301-P1",
            SessionKind::Practical,
            "CS301",
            "BSC-CS-3A",
            "F-07",
            "Lab-2",
            Day::Mon,
            0,
            2,
        ));
        a.add(Session::new(
            "CS305-P1",
            SessionKind::Practical,
            "CS305",
            "BSC-CS-3B",
            "F-07",
            "Lab-5",
            Day::Mon,
            0,
            2,
        ));

        let eval = evaluate(&a, &reg, &cal, &config);
        let conflict = detect(&eval.violations)
            .into_iter()
            .find(|c| c.kind == ConflictKind::FacultyOverlap)
            .unwrap();

        let candidates = suggest(&conflict, &a, &reg, &cal, &config);
        assert!(candidates.iter().any(|c| matches!(c.change, SwapChange::TimeMove { .. })));
        // F-12 has CS301 expertise and is free: an instructor swap must appear
        assert!(candidates.iter().any(|c| {
            c.session == "CS301-P1"
                && c.change
                    == SwapChange::Instructor {
                        faculty: "F-12".into(),
                    }
        }));
        assert!(candidates[0].resolves);
    }

    #[test]
    fn test_no_candidate_introduces_new_violation() {
        // Randomized assignments: applying the top candidate never
        // increases the hard-violation count.
        let reg = registry();
        let cal = calendar();
        let config = ConstraintConfig::default();
        let mut rng = SmallRng::seed_from_u64(7);
        let days = [Day::Mon, Day::Tue, Day::Wed, Day::Thu, Day::Fri];

        for _ in 0..25 {
            let mut a = Assignment::new();
            for (i, (course, cohort, faculty)) in [
                ("CS301", "BSC-CS-3A", "F-12"),
                ("CS305", "BSC-CS-3B", "F-07"),
                ("CS301", "BSC-CS-3A", "F-12"),
            ]
            .iter()
            .enumerate()
            {
                let day = days[rng.random_range(0..days.len())];
                let slot = rng.random_range(0..5);
                let room = if rng.random_bool(0.5) { "Lab-2" } else { "Lab-5" };
                a.add(Session::new(
                    format!("S{i}"),
                    SessionKind::Practical,
                    *course,
                    *cohort,
                    *faculty,
                    room,
                    day,
                    slot,
                    2,
                ));
            }

            let eval = evaluate(&a, &reg, &cal, &config);
            let before = eval.hard_count();
            let conflicts = detect(&eval.violations);
            let Some(conflict) = conflicts.first() else {
                continue;
            };

            let candidates = suggest(conflict, &a, &reg, &cal, &config);
            let Some(top) = candidates.first() else {
                continue;
            };
            let mut after = a.clone();
            let version = after.version();
            apply_swap(&mut after, top, version).unwrap();
            let after_eval = evaluate(&after, &reg, &cal, &config);
            assert!(
                after_eval.hard_count() <= before,
                "swap increased violations: {} -> {}",
                before,
                after_eval.hard_count()
            );
        }
    }

    #[test]
    fn test_ranking_prefers_resolving_candidates() {
        let a = colliding_assignment();
        let reg = registry();
        let cal = calendar();
        let config = ConstraintConfig::default();

        let conflict = room_conflict(&a, &reg, &cal, &config);
        let candidates = suggest(&conflict, &a, &reg, &cal, &config);
        let first_non_resolving = candidates.iter().position(|c| !c.resolves);
        let last_resolving = candidates.iter().rposition(|c| c.resolves);
        if let (Some(nr), Some(r)) = (first_non_resolving, last_resolving) {
            assert!(r < nr, "resolving candidates must rank first");
        }
    }

    #[test]
    fn test_unknown_session_apply() {
        let mut a = colliding_assignment();
        let candidate = SwapCandidate {
            session: "GHOST".into(),
            change: SwapChange::Room { room: "Lab-5".into() },
            resolves: true,
            sessions_touched: 1,
            soft_delta: 0.0,
        };
        let version = a.version();
        let err = apply_swap(&mut a, &candidate, version).unwrap_err();
        assert_eq!(err, SwapError::UnknownSession("GHOST".into()));
    }

    #[test]
    fn test_suggestion_order_is_deterministic() {
        let a = colliding_assignment();
        let reg = registry();
        let cal = calendar();
        let config = ConstraintConfig::default();
        let conflict = room_conflict(&a, &reg, &cal, &config);

        let first = suggest(&conflict, &a, &reg, &cal, &config);
        let second = suggest(&conflict, &a, &reg, &cal, &config);
        assert_eq!(first, second);
    }
}
