//! Core domain logic for habit tracking.
//! This crate is the single source of truth for business invariants.

pub mod clock;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::day::{DayId, DayRecord, DaySummary, DayView, ToggleOutcome};
pub use model::habit::{
    check_calendar_date, Habit, HabitId, HabitValidationError, NewHabit, WeekDay,
};
pub use repo::day_repo::DayRepository;
pub use repo::habit_repo::{HabitRepository, RepoError, RepoResult, SqliteHabitRepository};
pub use service::habit_service::{HabitService, ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
