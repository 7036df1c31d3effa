//! Day/completion repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Materialize day rows lazily and flip day/habit completion links.
//! - Provide per-day counts for the summary read model.
//!
//! # Invariants
//! - At most one day row per date, even under concurrent toggles: the row is
//!   created with an atomic upsert on the unique `date` column.
//! - A toggle for an unknown habit leaves no day row behind.

use crate::model::day::{DayId, DayRecord, ToggleOutcome};
use crate::model::habit::HabitId;
use crate::repo::habit_repo::{
    format_date, parse_date, parse_uuid, RepoError, RepoResult, SqliteHabitRepository,
};
use chrono::NaiveDate;
use rusqlite::{params, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

/// Repository interface for day materialization and completion links.
pub trait DayRepository {
    fn find_day(&self, date: NaiveDate) -> RepoResult<Option<DayRecord>>;
    /// Habit ids linked to the given day, sorted for stable output.
    fn completed_habit_ids(&self, day_id: DayId) -> RepoResult<Vec<HabitId>>;
    /// Flips the completion state of `habit_id` on `date`, creating the day
    /// row on first use.
    fn toggle_habit_on(&mut self, date: NaiveDate, habit_id: HabitId)
        -> RepoResult<ToggleOutcome>;
    /// All materialized days ordered by date ascending.
    fn list_days(&self) -> RepoResult<Vec<DayRecord>>;
    fn count_completed(&self, day_id: DayId) -> RepoResult<u32>;
}

impl DayRepository for SqliteHabitRepository<'_> {
    fn find_day(&self, date: NaiveDate) -> RepoResult<Option<DayRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, date FROM days WHERE date = ?1;")?;
        let mut rows = stmt.query([format_date(date)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_day_row(row)?));
        }
        Ok(None)
    }

    fn completed_habit_ids(&self, day_id: DayId) -> RepoResult<Vec<HabitId>> {
        let mut stmt = self.conn.prepare(
            "SELECT habit_id
             FROM day_habits
             WHERE day_id = ?1
             ORDER BY habit_id ASC;",
        )?;
        let mut rows = stmt.query([day_id.to_string()])?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            let value: String = row.get("habit_id")?;
            ids.push(parse_uuid(&value, "day_habits.habit_id")?);
        }
        Ok(ids)
    }

    fn toggle_habit_on(
        &mut self,
        date: NaiveDate,
        habit_id: HabitId,
    ) -> RepoResult<ToggleOutcome> {
        let habit_id_text = habit_id.to_string();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !habit_exists_in_tx(&tx, habit_id_text.as_str())? {
            return Err(RepoError::NotFound(habit_id));
        }

        let day_id_text = upsert_day_in_tx(&tx, date)?;
        let removed = tx.execute(
            "DELETE FROM day_habits WHERE day_id = ?1 AND habit_id = ?2;",
            params![day_id_text.as_str(), habit_id_text.as_str()],
        )?;
        let outcome = if removed > 0 {
            ToggleOutcome::Cleared
        } else {
            tx.execute(
                "INSERT INTO day_habits (id, day_id, habit_id) VALUES (?1, ?2, ?3);",
                params![
                    Uuid::new_v4().to_string(),
                    day_id_text.as_str(),
                    habit_id_text.as_str()
                ],
            )?;
            ToggleOutcome::Completed
        };

        tx.commit()?;
        Ok(outcome)
    }

    fn list_days(&self) -> RepoResult<Vec<DayRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, date FROM days ORDER BY date ASC;")?;
        let mut rows = stmt.query([])?;
        let mut days = Vec::new();
        while let Some(row) = rows.next()? {
            days.push(parse_day_row(row)?);
        }
        Ok(days)
    }

    fn count_completed(&self, day_id: DayId) -> RepoResult<u32> {
        let count: u32 = self.conn.query_row(
            "SELECT COUNT(*) FROM day_habits WHERE day_id = ?1;",
            [day_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn upsert_day_in_tx(tx: &Transaction<'_>, date: NaiveDate) -> RepoResult<String> {
    let date_text = format_date(date);
    tx.execute(
        "INSERT INTO days (id, date) VALUES (?1, ?2)
         ON CONFLICT (date) DO NOTHING;",
        params![Uuid::new_v4().to_string(), date_text.as_str()],
    )?;
    let id: String = tx.query_row(
        "SELECT id FROM days WHERE date = ?1;",
        [date_text.as_str()],
        |row| row.get(0),
    )?;
    Ok(id)
}

fn habit_exists_in_tx(tx: &Transaction<'_>, habit_id: &str) -> RepoResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM habits WHERE id = ?1);",
        [habit_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn parse_day_row(row: &Row<'_>) -> RepoResult<DayRecord> {
    let id_text: String = row.get("id")?;
    let date_text: String = row.get("date")?;
    Ok(DayRecord {
        id: parse_uuid(&id_text, "days.id")?,
        date: parse_date(&date_text, "days.date")?,
    })
}
