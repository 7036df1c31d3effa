//! Habit domain model.
//!
//! # Responsibility
//! - Define the habit record and its weekday recurrence.
//! - Validate and normalize creation input before persistence.
//!
//! # Invariants
//! - A habit has at least one weekday and never the same weekday twice.
//! - `created_at` is the calendar day the habit was created on.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a habit.
pub type HabitId = Uuid;

/// Upper bound on title length, counted in characters.
pub const HABIT_TITLE_MAX_CHARS: usize = 200;

/// Weekday index with 0 = Sunday .. 6 = Saturday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct WeekDay(u8);

impl WeekDay {
    pub const SUNDAY: Self = Self(0);
    pub const SATURDAY: Self = Self(6);

    /// Builds a weekday from its numeric index, rejecting values outside 0..=6.
    pub fn new(value: i64) -> Result<Self, HabitValidationError> {
        match u8::try_from(value) {
            Ok(day) if day <= Self::SATURDAY.0 => Ok(Self(day)),
            _ => Err(HabitValidationError::WeekDayOutOfRange(value)),
        }
    }

    /// Derives the weekday of a calendar date.
    pub fn of(date: NaiveDate) -> Self {
        // num_days_from_sunday is always within 0..=6.
        Self(date.weekday().num_days_from_sunday() as u8)
    }

    pub fn index(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for WeekDay {
    type Error = HabitValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WeekDay> for u8 {
    fn from(value: WeekDay) -> Self {
        value.0
    }
}

impl Display for WeekDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persisted habit as returned by read paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    pub title: String,
    /// Creation day; the habit is never available before it.
    pub created_at: NaiveDate,
}

/// Earliest and latest years whose ISO text form sorts in date order.
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

/// Rejects dates whose `YYYY-MM-DD` text would not compare in calendar order.
///
/// Stored dates are compared as text, so signed or five-digit years are
/// refused before they reach a query.
pub fn check_calendar_date(date: NaiveDate) -> Result<NaiveDate, HabitValidationError> {
    if (MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
        Ok(date)
    } else {
        Err(HabitValidationError::DateOutOfRange(date))
    }
}

/// Validated creation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHabit {
    pub title: String,
    pub week_days: BTreeSet<WeekDay>,
}

impl NewHabit {
    /// Validates raw creation input.
    ///
    /// # Contract
    /// - Title is trimmed and must be non-empty.
    /// - Every weekday must lie in 0..=6; duplicates collapse into one.
    /// - At least one weekday is required.
    pub fn new(title: &str, week_days: &[i64]) -> Result<Self, HabitValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(HabitValidationError::EmptyTitle);
        }
        let title_chars = title.chars().count();
        if title_chars > HABIT_TITLE_MAX_CHARS {
            return Err(HabitValidationError::TitleTooLong {
                max: HABIT_TITLE_MAX_CHARS,
                actual: title_chars,
            });
        }

        let week_days = week_days
            .iter()
            .map(|value| WeekDay::new(*value))
            .collect::<Result<BTreeSet<_>, _>>()?;
        if week_days.is_empty() {
            return Err(HabitValidationError::NoWeekDays);
        }

        Ok(Self {
            title: title.to_string(),
            week_days,
        })
    }
}

/// Rejection reasons for habit creation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HabitValidationError {
    EmptyTitle,
    TitleTooLong { max: usize, actual: usize },
    NoWeekDays,
    WeekDayOutOfRange(i64),
    DateOutOfRange(NaiveDate),
}

impl Display for HabitValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title cannot be empty"),
            Self::TitleTooLong { max, actual } => {
                write!(f, "title has {actual} characters; at most {max} allowed")
            }
            Self::NoWeekDays => write!(f, "at least one week day is required"),
            Self::WeekDayOutOfRange(value) => {
                write!(f, "week day {value} is out of range; expected 0..=6")
            }
            Self::DateOutOfRange(date) => {
                write!(f, "date {date} is out of range; expected years {MIN_YEAR}..={MAX_YEAR}")
            }
        }
    }
}

impl Error for HabitValidationError {}
