//! Habit repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist habits together with their weekday recurrence.
//! - Answer "which habits are due on this date" queries.
//!
//! # Invariants
//! - A habit row is never committed without all of its week-day rows.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::habit::{Habit, HabitId, NewHabit, WeekDay};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row, TransactionBehavior};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for habit/day persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(HabitId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "habit not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for habit operations.
pub trait HabitRepository {
    /// Persists one habit and every weekday rule in a single transaction.
    ///
    /// `habit` is trusted as validated by `NewHabit::new`.
    fn create_habit(&mut self, habit: &NewHabit, created_at: NaiveDate) -> RepoResult<Habit>;
    fn get_habit(&self, id: HabitId) -> RepoResult<Option<Habit>>;
    /// Returns the recurrence of one habit, sorted ascending.
    fn week_days(&self, id: HabitId) -> RepoResult<BTreeSet<WeekDay>>;
    /// Habits created on or before `date` whose recurrence includes its weekday.
    fn list_available_on(&self, date: NaiveDate) -> RepoResult<Vec<Habit>>;
    fn count_available_on(&self, date: NaiveDate) -> RepoResult<u32>;
}

/// SQLite-backed repository for habits and their daily completion records.
pub struct SqliteHabitRepository<'conn> {
    pub(crate) conn: &'conn mut Connection,
}

impl<'conn> SqliteHabitRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl HabitRepository for SqliteHabitRepository<'_> {
    fn create_habit(&mut self, habit: &NewHabit, created_at: NaiveDate) -> RepoResult<Habit> {
        let record = Habit {
            id: Uuid::new_v4(),
            title: habit.title.clone(),
            created_at,
        };
        let id_text = record.id.to_string();

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO habits (id, title, created_at) VALUES (?1, ?2, ?3);",
            params![
                id_text.as_str(),
                record.title.as_str(),
                format_date(record.created_at)
            ],
        )?;
        for week_day in &habit.week_days {
            tx.execute(
                "INSERT INTO habit_week_days (id, habit_id, week_day) VALUES (?1, ?2, ?3);",
                params![
                    Uuid::new_v4().to_string(),
                    id_text.as_str(),
                    i64::from(week_day.index())
                ],
            )?;
        }
        tx.commit()?;

        Ok(record)
    }

    fn get_habit(&self, id: HabitId) -> RepoResult<Option<Habit>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, created_at FROM habits WHERE id = ?1;")?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_habit_row(row)?));
        }
        Ok(None)
    }

    fn week_days(&self, id: HabitId) -> RepoResult<BTreeSet<WeekDay>> {
        let mut stmt = self.conn.prepare(
            "SELECT week_day
             FROM habit_week_days
             WHERE habit_id = ?1
             ORDER BY week_day ASC;",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        let mut days = BTreeSet::new();
        while let Some(row) = rows.next()? {
            let value: i64 = row.get("week_day")?;
            let day = WeekDay::new(value).map_err(|_| {
                RepoError::InvalidData(format!(
                    "invalid week day `{value}` in habit_week_days.week_day"
                ))
            })?;
            days.insert(day);
        }
        Ok(days)
    }

    fn list_available_on(&self, date: NaiveDate) -> RepoResult<Vec<Habit>> {
        let mut stmt = self.conn.prepare(
            "SELECT h.id AS id, h.title AS title, h.created_at AS created_at
             FROM habits h
             WHERE h.created_at <= ?1
               AND EXISTS (
                   SELECT 1
                   FROM habit_week_days w
                   WHERE w.habit_id = h.id
                     AND w.week_day = ?2
               )
             ORDER BY h.created_at ASC, h.title ASC, h.id ASC;",
        )?;
        let mut rows = stmt.query(params![
            format_date(date),
            i64::from(WeekDay::of(date).index())
        ])?;
        let mut habits = Vec::new();
        while let Some(row) = rows.next()? {
            habits.push(parse_habit_row(row)?);
        }
        Ok(habits)
    }

    fn count_available_on(&self, date: NaiveDate) -> RepoResult<u32> {
        let count: u32 = self.conn.query_row(
            "SELECT COUNT(*)
             FROM habits h
             WHERE h.created_at <= ?1
               AND EXISTS (
                   SELECT 1
                   FROM habit_week_days w
                   WHERE w.habit_id = h.id
                     AND w.week_day = ?2
               );",
            params![
                format_date(date),
                i64::from(WeekDay::of(date).index())
            ],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn parse_date(value: &str, column: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| RepoError::InvalidData(format!("invalid date value `{value}` in {column}")))
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

fn parse_habit_row(row: &Row<'_>) -> RepoResult<Habit> {
    let id_text: String = row.get("id")?;
    let created_text: String = row.get("created_at")?;
    Ok(Habit {
        id: parse_uuid(&id_text, "habits.id")?,
        title: row.get("title")?,
        created_at: parse_date(&created_text, "habits.created_at")?,
    })
}
