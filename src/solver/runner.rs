//! Background scenario execution.
//!
//! Each scenario run executes on its own thread over an owned snapshot
//! of the registry, calendar, and config taken at submission time, so
//! concurrent edits to the source data never perturb an in-flight run.
//! Jobs share no mutable state; any number may run concurrently.
//!
//! Cancellation is cooperative: [`ScenarioJob::cancel`] raises a flag
//! the solver polls between improvement rounds, and [`ScenarioJob::join`]
//! then returns the best assignment found so far.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::info;
use thiserror::Error;

use super::{solve_with_cancel, Scenario, SolveRequest};
use crate::models::{Calendar, ConstraintConfig};
use crate::registry::Registry;

/// Errors from a background scenario job.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunnerError {
    /// The worker thread panicked; no scenario is available.
    #[error("scenario worker panicked")]
    WorkerPanicked,
}

/// Handle to one in-flight scenario run.
pub struct ScenarioJob {
    cancel: Arc<AtomicBool>,
    handle: JoinHandle<Scenario>,
}

impl ScenarioJob {
    /// Requests cooperative cancellation. The job finishes its current
    /// round and returns its best-so-far result.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Whether the worker has finished (normally or after cancellation).
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the job and returns its scenario.
    pub fn join(self) -> Result<Scenario, RunnerError> {
        self.handle.join().map_err(|_| RunnerError::WorkerPanicked)
    }
}

/// Spawns a scenario run on its own thread.
///
/// The registry, calendar, and config are moved in as the run's
/// immutable snapshot; callers keep editing their own copies freely.
pub fn spawn_scenario(
    registry: Registry,
    calendar: Calendar,
    config: ConstraintConfig,
    request: SolveRequest,
) -> ScenarioJob {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);

    let handle = thread::spawn(move || {
        info!("scenario '{}' started in background", request.name);
        solve_with_cancel(&registry, &calendar, &config, &request, &flag)
    });

    ScenarioJob { cancel, handle }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Cohort, CourseOffering, Day, Faculty, Room, RoomKind, SessionKind, SessionRequirement,
    };
    use chrono::NaiveDate;
    use std::time::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn calendar() -> Calendar {
        Calendar::new(date(2026, 1, 5), date(2026, 5, 15))
            .with_teaching_days([Day::Mon, Day::Tue, Day::Wed])
            .with_slots(["09:00", "10:00", "11:00", "12:00"], 60)
    }

    fn registry() -> Registry {
        let mut faculty = Faculty::new("F-12", 18);
        for day in [Day::Mon, Day::Tue, Day::Wed] {
            faculty = faculty.with_availability(day, 0..4);
        }
        Registry::new()
            .with_room(Room::new("B-102", RoomKind::Lecture, 60))
            .with_faculty(faculty)
            .with_cohort(Cohort::new("C1", 40))
            .with_offering(
                CourseOffering::new("CS301", 3, RoomKind::Lecture)
                    .with_enrollment(40)
                    .with_requirement(SessionRequirement::new(SessionKind::Lecture, 2, 1))
                    .with_instructor("F-12")
                    .with_cohort("C1"),
            )
    }

    #[test]
    fn test_background_run_completes() {
        let job = spawn_scenario(
            registry(),
            calendar(),
            crate::models::ConstraintConfig::default(),
            SolveRequest::new("bg")
                .with_seed(11)
                .with_time_budget(Duration::from_millis(50)),
        );
        let scenario = job.join().unwrap();
        assert_eq!(scenario.assignment.len(), 2);
        assert!(scenario.is_feasible());
    }

    #[test]
    fn test_cancelled_job_returns_partial() {
        let job = spawn_scenario(
            registry(),
            calendar(),
            crate::models::ConstraintConfig::default(),
            SolveRequest::new("bg")
                .with_seed(11)
                .with_time_budget(Duration::from_secs(3600)),
        );
        job.cancel();
        let scenario = job.join().unwrap();
        // Construction output survives even an immediate cancel
        assert_eq!(scenario.assignment.len(), 2);
    }

    #[test]
    fn test_concurrent_jobs_are_isolated() {
        let mut registry_a = registry();
        let job_a = spawn_scenario(
            registry_a.clone(),
            calendar(),
            crate::models::ConstraintConfig::default(),
            SolveRequest::new("a").with_seed(1).with_time_budget(Duration::from_millis(20)),
        );
        let job_b = spawn_scenario(
            registry_a.clone(),
            calendar(),
            crate::models::ConstraintConfig::default(),
            SolveRequest::new("b").with_seed(2).with_time_budget(Duration::from_millis(20)),
        );

        // Mutating the source after submission cannot affect the runs
        registry_a.rooms.clear();

        let a = job_a.join().unwrap();
        let b = job_b.join().unwrap();
        assert_eq!(a.assignment.len(), 2);
        assert_eq!(b.assignment.len(), 2);
    }
}
