//! Timetabling domain models.
//!
//! Core data types for representing an institutional timetable: the
//! term calendar and slot grid, the scheduling resources (rooms,
//! faculty, cohorts, offerings), placed sessions, constraint
//! configuration, and the violation/conflict records the engine
//! reports.
//!
//! # Domain Mappings
//!
//! | timetabler | Campus reality |
//! |------------|----------------|
//! | Calendar | Academic term + period grid |
//! | Cohort | Program-semester section |
//! | CourseOffering | One course taught this term |
//! | Session | One weekly meeting of an offering |
//! | Assignment | A complete draft timetable |

mod calendar;
mod cohort;
mod config;
mod conflict;
mod faculty;
mod offering;
mod room;
mod session;
mod violation;

pub use calendar::{
    format_hhmm, parse_hhmm, Blackout, Calendar, Day, ExamWindow, Holiday, ALLOWED_SLOT_LENGTHS,
};
pub use cohort::Cohort;
pub use config::{ConstraintConfig, ScenarioProfile, MAX_SOFT_WEIGHT};
pub use conflict::{Conflict, ConflictKind, ConflictStatus, Severity};
pub use faculty::{Faculty, FacultyPreferences};
pub use offering::{CourseOffering, SessionRequirement};
pub use room::{Room, RoomKind};
pub use session::{Assignment, Session, SessionKind};
pub use violation::{Violation, ViolationKind};
