//! Timetable constraint-satisfaction and conflict-detection engine.
//!
//! The core behind an institutional timetable manager: it represents
//! calendars, resources, and scheduling constraints; detects and
//! classifies conflicts; proposes non-disruptive swaps; and runs and
//! compares optimization scenarios with an explainable decision log.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Calendar`, `Room`, `Faculty`,
//!   `Cohort`, `CourseOffering`, `Session`, `Assignment`,
//!   `ConstraintConfig`, `Conflict`, `Violation`
//! - **`registry`**: The scheduling inventory with id lookups
//! - **`validation`**: Collected-error checks for calendars,
//!   registries, and configs
//! - **`evaluator`**: Index-based violation detection and
//!   soft-objective scoring
//! - **`detector`**: Conflict classification and lifecycle tracking
//! - **`swap`**: Ranked swap suggestions and compare-and-swap apply
//! - **`solver`**: Scenario construction, seeded improvement,
//!   background jobs, explanation, and comparison
//!
//! # Boundaries
//!
//! The crate exchanges plain serde-shaped records with its callers and
//! prescribes no transport or persistence. Rendering, routing,
//! authentication, and export formats live outside.

pub mod detector;
pub mod evaluator;
pub mod models;
pub mod registry;
pub mod solver;
pub mod swap;
pub mod validation;
