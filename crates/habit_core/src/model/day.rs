//! Day and completion read models.
//!
//! # Invariants
//! - A `DayRecord` exists only for dates where some habit was toggled.
//! - Completion is the presence of a day/habit link, never a flag.

use crate::model::habit::{Habit, HabitId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type DayId = Uuid;

/// Materialized calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub id: DayId,
    pub date: NaiveDate,
}

/// Habits due on one date and which of them were completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayView {
    pub available_habits: Vec<Habit>,
    pub completed_habits: Vec<HabitId>,
}

/// One summary row per materialized day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    pub id: DayId,
    pub date: NaiveDate,
    pub completed: u32,
    pub available: u32,
}

/// Transition performed by a completion toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleOutcome {
    /// not-completed -> completed
    Completed,
    /// completed -> not-completed
    Cleared,
}

impl ToggleOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Cleared => "cleared",
        }
    }
}
