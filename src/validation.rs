//! Input validation for calendars, registries, and constraint configs.
//!
//! All checks collect every detected problem and return the full list;
//! nothing is reported singly. Callers persist or proceed only on an
//! empty error list. Validation is side-effect-free.

use std::collections::HashSet;

use crate::models::{parse_hhmm, Calendar, ConstraintConfig, MAX_SOFT_WEIGHT, ALLOWED_SLOT_LENGTHS};
use crate::registry::Registry;

/// Validation result: `Ok(())` or every detected error.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Term end does not follow term start, or a range is inverted.
    InvalidDateOrder,
    /// Slot length outside the allowed grid units.
    UnknownSlotLength,
    /// A slot start time is not a valid `"HH:MM"` string.
    MalformedTime,
    /// Slot starts not strictly increasing or closer than the grid unit.
    NonMonotonicSlots,
    /// A holiday or exam window falls outside the term.
    OutOfTermDate,
    /// A blackout or availability entry references a day or slot the
    /// calendar does not have.
    UnknownDayOrSlot,
    /// No teaching days configured.
    EmptyTeachingDays,
    /// Two entities share the same ID.
    DuplicateId,
    /// A record references an entity that doesn't exist.
    InvalidReference,
    /// A capacity, size, or load that must be positive is not.
    NonPositiveQuantity,
    /// A soft-objective weight outside the 0-5 range.
    WeightOutOfRange,
    /// An elective clash-risk threshold too small to be meaningful.
    BadThreshold,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a calendar.
///
/// Checks:
/// 1. `term_start < term_end`
/// 2. Slot length is one of the allowed grid units
/// 3. Every slot start parses as `"HH:MM"`
/// 4. Slot starts strictly increase, at least one grid unit apart
/// 5. Teaching days are non-empty
/// 6. Holidays and exam windows fall inside the term
/// 7. Blackouts reference teaching days and real slots
pub fn validate_calendar(calendar: &Calendar) -> ValidationResult {
    let mut errors = Vec::new();

    if calendar.term_start >= calendar.term_end {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidDateOrder,
            format!(
                "Term start {} is not before term end {}",
                calendar.term_start, calendar.term_end
            ),
        ));
    }

    if !ALLOWED_SLOT_LENGTHS.contains(&calendar.slot_length_minutes) {
        errors.push(ValidationError::new(
            ValidationErrorKind::UnknownSlotLength,
            format!(
                "Slot length {} min is not one of the allowed grid units",
                calendar.slot_length_minutes
            ),
        ));
    }

    if calendar.teaching_days.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyTeachingDays,
            "Calendar has no teaching days",
        ));
    }

    let mut prev: Option<(usize, u32)> = None;
    for (idx, label) in calendar.slots.iter().enumerate() {
        match parse_hhmm(label) {
            None => errors.push(ValidationError::new(
                ValidationErrorKind::MalformedTime,
                format!("Slot {idx} start '{label}' is not a valid HH:MM time"),
            )),
            Some(minutes) => {
                if let Some((prev_idx, prev_minutes)) = prev {
                    if minutes < prev_minutes + calendar.slot_length_minutes {
                        errors.push(ValidationError::new(
                            ValidationErrorKind::NonMonotonicSlots,
                            format!(
                                "Slot {idx} ('{label}') starts before slot {prev_idx} ends"
                            ),
                        ));
                    }
                }
                prev = Some((idx, minutes));
            }
        }
    }

    for holiday in &calendar.holidays {
        if holiday.date < calendar.term_start || holiday.date > calendar.term_end {
            errors.push(ValidationError::new(
                ValidationErrorKind::OutOfTermDate,
                format!(
                    "Holiday '{}' ({}) falls outside the term",
                    holiday.label, holiday.date
                ),
            ));
        }
    }

    for window in &calendar.exam_windows {
        if window.start > window.end {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDateOrder,
                format!(
                    "Exam window '{}' starts after it ends",
                    window.label
                ),
            ));
        }
        if window.start < calendar.term_start || window.end > calendar.term_end {
            errors.push(ValidationError::new(
                ValidationErrorKind::OutOfTermDate,
                format!(
                    "Exam window '{}' extends outside the term",
                    window.label
                ),
            ));
        }
    }

    for blackout in &calendar.blackouts {
        if !calendar.teaching_days.contains(&blackout.day) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownDayOrSlot,
                format!("Blackout references non-teaching day {:?}", blackout.day),
            ));
        }
        if blackout.slot >= calendar.slot_count() {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownDayOrSlot,
                format!(
                    "Blackout references slot {} but the grid has {} slots",
                    blackout.slot,
                    calendar.slot_count()
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a registry against a calendar.
///
/// Checks:
/// 1. No duplicate room/faculty/cohort/course ids
/// 2. Positive capacities, cohort sizes, load ceilings, enrollments
/// 3. Offerings reference existing faculty and cohorts, with at least
///    one instructor candidate and one session requirement
/// 4. Faculty availability references real grid cells
pub fn validate_registry(registry: &Registry, calendar: &Calendar) -> ValidationResult {
    let mut errors = Vec::new();

    let mut room_ids = HashSet::new();
    for room in &registry.rooms {
        if !room_ids.insert(room.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate room ID: {}", room.id),
            ));
        }
        if room.capacity == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveQuantity,
                format!("Room '{}' has zero capacity", room.id),
            ));
        }
    }

    let mut faculty_ids = HashSet::new();
    for member in &registry.faculty {
        if !faculty_ids.insert(member.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate faculty ID: {}", member.id),
            ));
        }
        if member.max_weekly_load_hours == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveQuantity,
                format!("Faculty '{}' has zero weekly load", member.id),
            ));
        }
        for &(day, slot) in &member.availability {
            if !calendar.teaching_days.contains(&day) || slot >= calendar.slot_count() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownDayOrSlot,
                    format!(
                        "Faculty '{}' availability references unknown cell ({:?}, {})",
                        member.id, day, slot
                    ),
                ));
            }
        }
    }

    let mut cohort_ids = HashSet::new();
    for cohort in &registry.cohorts {
        if !cohort_ids.insert(cohort.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate cohort ID: {}", cohort.id),
            ));
        }
        if cohort.size == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveQuantity,
                format!("Cohort '{}' has zero size", cohort.id),
            ));
        }
    }

    let mut course_ids = HashSet::new();
    for offering in &registry.offerings {
        if !course_ids.insert(offering.course.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate course offering: {}", offering.course),
            ));
        }
        if offering.instructors.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidReference,
                format!("Offering '{}' has no instructor candidates", offering.course),
            ));
        }
        if offering.sessions_required.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidReference,
                format!("Offering '{}' requires no sessions", offering.course),
            ));
        }
        for instructor in &offering.instructors {
            if !faculty_ids.contains(instructor.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidReference,
                    format!(
                        "Offering '{}' references unknown faculty '{}'",
                        offering.course, instructor
                    ),
                ));
            }
        }
        for cohort in &offering.cohorts {
            if !cohort_ids.contains(cohort.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidReference,
                    format!(
                        "Offering '{}' references unknown cohort '{}'",
                        offering.course, cohort
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a constraint configuration.
///
/// Rejects soft weights above the 0-5 range and clash-risk thresholds
/// below 2 (a single course cannot clash with itself). Runs before any
/// solve or detect call.
pub fn validate_config(config: &ConstraintConfig) -> ValidationResult {
    let mut errors = Vec::new();

    let weights = [
        ("studentCompactness", config.student_compactness),
        ("facultyFairness", config.faculty_fairness),
        ("roomMatch", config.room_match),
        ("electiveClashMin", config.elective_clash_min),
    ];
    for (name, weight) in weights {
        if weight > MAX_SOFT_WEIGHT {
            errors.push(ValidationError::new(
                ValidationErrorKind::WeightOutOfRange,
                format!("Soft weight '{name}' is {weight}, outside 0-{MAX_SOFT_WEIGHT}"),
            ));
        }
    }

    if config.elective_clash_threshold < 2 {
        errors.push(ValidationError::new(
            ValidationErrorKind::BadThreshold,
            format!(
                "Elective clash threshold {} is below the minimum of 2",
                config.elective_clash_threshold
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
