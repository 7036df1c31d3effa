//! Habit tracking use-case service.
//!
//! # Responsibility
//! - Create habits stamped with the current day.
//! - Build the per-day view (due habits + completed ids).
//! - Toggle today's completion for a habit.
//! - Compute the per-day summary over all materialized days.
//!
//! # Invariants
//! - Input is validated before any repository call.
//! - "Today" always comes from the injected `Clock`.
//! - Log lines carry identifiers and counts only, never habit titles.

use crate::clock::Clock;
use crate::model::day::{DaySummary, DayView, ToggleOutcome};
use crate::model::habit::{check_calendar_date, Habit, HabitId, HabitValidationError, NewHabit};
use crate::repo::day_repo::DayRepository;
use crate::repo::habit_repo::{HabitRepository, RepoError};
use chrono::NaiveDate;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Service error for habit use cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Input rejected before touching the store.
    Validation(HabitValidationError),
    /// Referenced habit does not exist.
    HabitNotFound(HabitId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::HabitNotFound(id) => write!(f, "habit not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::HabitNotFound(_) => None,
        }
    }
}

impl From<HabitValidationError> for ServiceError {
    fn from(value: HabitValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::HabitNotFound(id),
            other => Self::Repo(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Habit service facade over repository implementations.
pub struct HabitService<R, C> {
    repo: R,
    clock: C,
}

impl<R, C> HabitService<R, C>
where
    R: HabitRepository + DayRepository,
    C: Clock,
{
    pub fn new(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Creates a habit due on the given weekdays, starting today.
    ///
    /// # Contract
    /// - Duplicate weekdays collapse into one rule.
    /// - The habit and all of its rules are written atomically.
    pub fn create_habit(&mut self, title: &str, week_days: &[i64]) -> ServiceResult<Habit> {
        let started_at = Instant::now();
        let new_habit = match NewHabit::new(title, week_days) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    "event=habit_create module=service status=rejected reason={:?}",
                    err
                );
                return Err(err.into());
            }
        };

        let today = check_calendar_date(self.clock.today())?;
        let habit = self.repo.create_habit(&new_habit, today)?;
        info!(
            "event=habit_create module=service status=ok habit_id={} week_days={} created_at={} duration_ms={}",
            habit.id,
            new_habit.week_days.len(),
            habit.created_at,
            started_at.elapsed().as_millis()
        );
        Ok(habit)
    }

    pub fn get_habit(&self, id: HabitId) -> ServiceResult<Option<Habit>> {
        Ok(self.repo.get_habit(id)?)
    }

    /// Returns habits due on `date` and the ids completed on it.
    ///
    /// Never materializes a day row; an untouched date has no completions.
    /// Dates outside years 1..=9999 are rejected.
    pub fn day_view(&self, date: NaiveDate) -> ServiceResult<DayView> {
        let date = check_calendar_date(date)?;
        let available_habits = self.repo.list_available_on(date)?;
        let completed_habits = match self.repo.find_day(date)? {
            Some(day) => self.repo.completed_habit_ids(day.id)?,
            None => Vec::new(),
        };

        info!(
            "event=day_view module=service status=ok date={} available={} completed={}",
            date,
            available_habits.len(),
            completed_habits.len()
        );
        Ok(DayView {
            available_habits,
            completed_habits,
        })
    }

    /// Flips today's completion state for one habit.
    pub fn toggle_today(&mut self, habit_id: HabitId) -> ServiceResult<ToggleOutcome> {
        let today = check_calendar_date(self.clock.today())?;
        match self.repo.toggle_habit_on(today, habit_id) {
            Ok(outcome) => {
                info!(
                    "event=habit_toggle module=service status=ok habit_id={} date={} outcome={}",
                    habit_id,
                    today,
                    outcome.as_str()
                );
                Ok(outcome)
            }
            Err(err) => {
                warn!(
                    "event=habit_toggle module=service status=error habit_id={} date={} error={}",
                    habit_id, today, err
                );
                Err(err.into())
            }
        }
    }

    /// Completed vs. available counts for every materialized day.
    ///
    /// Days on which nothing was ever toggled do not appear.
    pub fn summary(&self) -> ServiceResult<Vec<DaySummary>> {
        let started_at = Instant::now();
        let days = self.repo.list_days()?;
        let mut rows = Vec::with_capacity(days.len());
        for day in days {
            rows.push(DaySummary {
                completed: self.repo.count_completed(day.id)?,
                available: self.repo.count_available_on(day.date)?,
                id: day.id,
                date: day.date,
            });
        }

        info!(
            "event=summary module=service status=ok days={} duration_ms={}",
            rows.len(),
            started_at.elapsed().as_millis()
        );
        Ok(rows)
    }
}
