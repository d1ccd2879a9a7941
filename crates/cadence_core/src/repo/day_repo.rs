//! Day repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide day-centric read models: per-date schedule status and the
//!   all-days summary report.
//! - Own completion toggling over the `days` + `day_habits` tables with
//!   atomic semantics.
//!
//! # Invariants
//! - A `days` row is created lazily inside the toggle transaction and is
//!   never deleted when its last completion goes away.
//! - Toggling is insert/delete of one `day_habits` link; no status column.
//! - Toggle rejects habits that are not possible on the target date, so a
//!   day's completed count can never exceed its possible count.
//! - Listings are deterministic: status by habit creation/id, summary by
//!   date ascending.

use crate::model::day::{date_from_epoch_ms, date_to_epoch_ms, Day, DayId};
use crate::model::habit::{Habit, HabitId, WeekDay};
use crate::repo::habit_repo::{
    ensure_schema_version, load_week_days, parse_habit_id, parse_habit_row, table_exists,
    table_has_column, RepoError, RepoResult,
};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Read model for one date's schedule state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayStatus {
    /// The queried calendar date.
    pub date: NaiveDate,
    /// Habits possible on this date: weekday in the recurrence set and
    /// creation date on/before the queried date.
    pub possible_habits: Vec<Habit>,
    /// Ids of habits completed on this date. Empty when no `days` row
    /// exists yet.
    pub completed_habit_ids: Vec<HabitId>,
}

/// Read model for one `days` row in the summary report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySummary {
    /// Stable id of the `days` row.
    pub id: DayId,
    /// The calendar date.
    pub date: NaiveDate,
    /// Number of habits completed on this date.
    pub completed: u32,
    /// Number of habits possible on this date.
    pub possible: u32,
}

/// Outcome of a completion toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The completion link was created.
    Completed,
    /// The completion link was removed.
    Uncompleted,
}

impl Display for ToggleOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Uncompleted => write!(f, "uncompleted"),
        }
    }
}

/// Repository interface for day status, completion toggling and summary.
pub trait DayRepository {
    /// Returns possible habits and completed habit ids for one date.
    fn day_status(&self, date: NaiveDate) -> RepoResult<DayStatus>;
    /// Flips completion of one habit on one date, creating the `days` row
    /// on first use.
    fn toggle_completion(&mut self, habit_id: HabitId, date: NaiveDate)
        -> RepoResult<ToggleOutcome>;
    /// Returns completed/possible counts for every recorded day.
    fn summary(&self) -> RepoResult<Vec<DaySummary>>;
}

/// SQLite-backed day repository.
pub struct SqliteDayRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteDayRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_schema_version(conn)?;
        ensure_day_tables_ready(conn)?;
        Ok(Self { conn })
    }
}

impl DayRepository for SqliteDayRepository<'_> {
    fn day_status(&self, date: NaiveDate) -> RepoResult<DayStatus> {
        let date_ms = date_to_epoch_ms(date);
        let week_day = WeekDay::of(date);

        let mut stmt = self.conn.prepare(
            "SELECT id, title, created_at
             FROM habits
             WHERE created_at <= ?1
               AND EXISTS (
                   SELECT 1
                   FROM habit_week_days hwd
                   WHERE hwd.habit_id = habits.id
                     AND hwd.week_day = ?2
               )
             ORDER BY created_at ASC, id ASC;",
        )?;

        let mut rows = stmt.query(params![date_ms, i64::from(week_day.index())])?;
        let mut possible_habits = Vec::new();
        while let Some(row) = rows.next()? {
            let id_text: String = row.get("id")?;
            let week_days = load_week_days(self.conn, &id_text)?;
            possible_habits.push(parse_habit_row(row, week_days)?);
        }

        let mut completed_stmt = self.conn.prepare(
            "SELECT dh.habit_id
             FROM day_habits dh
             INNER JOIN days d ON d.id = dh.day_id
             WHERE d.date = ?1
             ORDER BY dh.habit_id ASC;",
        )?;

        let mut completed_rows = completed_stmt.query([date_ms])?;
        let mut completed_habit_ids = Vec::new();
        while let Some(row) = completed_rows.next()? {
            let id_text: String = row.get("habit_id")?;
            completed_habit_ids.push(parse_habit_id(&id_text)?);
        }

        Ok(DayStatus {
            date,
            possible_habits,
            completed_habit_ids,
        })
    }

    fn toggle_completion(
        &mut self,
        habit_id: HabitId,
        date: NaiveDate,
    ) -> RepoResult<ToggleOutcome> {
        let habit_id_text = habit_id.to_string();
        let date_ms = date_to_epoch_ms(date);

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !habit_exists_in_tx(&tx, &habit_id_text)? {
            return Err(RepoError::HabitNotFound(habit_id));
        }
        if !habit_scheduled_in_tx(&tx, &habit_id_text, date_ms, WeekDay::of(date))? {
            return Err(RepoError::NotScheduled { habit_id, date });
        }

        let day_id_text = match find_day_id_in_tx(&tx, date_ms)? {
            Some(id_text) => id_text,
            None => {
                let day = Day::new(date);
                let id_text = day.id.to_string();
                tx.execute(
                    "INSERT INTO days (id, date) VALUES (?1, ?2);",
                    params![id_text.as_str(), date_ms],
                )?;
                id_text
            }
        };

        let existing_link: Option<i64> = tx
            .query_row(
                "SELECT id FROM day_habits WHERE day_id = ?1 AND habit_id = ?2;",
                params![day_id_text.as_str(), habit_id_text.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        let outcome = match existing_link {
            Some(link_id) => {
                tx.execute("DELETE FROM day_habits WHERE id = ?1;", [link_id])?;
                ToggleOutcome::Uncompleted
            }
            None => {
                tx.execute(
                    "INSERT INTO day_habits (day_id, habit_id) VALUES (?1, ?2);",
                    params![day_id_text.as_str(), habit_id_text.as_str()],
                )?;
                ToggleOutcome::Completed
            }
        };

        tx.commit()?;
        Ok(outcome)
    }

    fn summary(&self) -> RepoResult<Vec<DaySummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                d.id,
                d.date,
                (
                    SELECT COUNT(*)
                    FROM day_habits dh
                    WHERE dh.day_id = d.id
                ) AS completed,
                (
                    SELECT COUNT(*)
                    FROM habit_week_days hwd
                    INNER JOIN habits h ON h.id = hwd.habit_id
                    WHERE hwd.week_day =
                          CAST(strftime('%w', d.date / 1000, 'unixepoch') AS INTEGER)
                      AND h.created_at <= d.date
                ) AS possible
             FROM days d
             ORDER BY d.date ASC;",
        )?;

        let mut rows = stmt.query([])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            let id_text: String = row.get("id")?;
            let id = Uuid::parse_str(&id_text).map_err(|_| {
                RepoError::InvalidData(format!("invalid uuid value `{id_text}` in days.id"))
            })?;

            let date_ms: i64 = row.get("date")?;
            let date = date_from_epoch_ms(date_ms).ok_or_else(|| {
                RepoError::InvalidData(format!("invalid date value `{date_ms}` in days.date"))
            })?;

            entries.push(DaySummary {
                id,
                date,
                completed: parse_count(row.get("completed")?, "completed")?,
                possible: parse_count(row.get("possible")?, "possible")?,
            });
        }

        Ok(entries)
    }
}

fn parse_count(value: i64, column: &str) -> RepoResult<u32> {
    u32::try_from(value).map_err(|_| {
        RepoError::InvalidData(format!("invalid count value `{value}` in summary.{column}"))
    })
}

fn habit_exists_in_tx(tx: &Transaction<'_>, habit_id: &str) -> RepoResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM habits
            WHERE id = ?1
        );",
        [habit_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn habit_scheduled_in_tx(
    tx: &Transaction<'_>,
    habit_id: &str,
    date_ms: i64,
    week_day: WeekDay,
) -> RepoResult<bool> {
    let scheduled: i64 = tx.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM habits h
            INNER JOIN habit_week_days hwd ON hwd.habit_id = h.id
            WHERE h.id = ?1
              AND h.created_at <= ?2
              AND hwd.week_day = ?3
        );",
        params![habit_id, date_ms, i64::from(week_day.index())],
        |row| row.get(0),
    )?;
    Ok(scheduled == 1)
}

fn find_day_id_in_tx(tx: &Transaction<'_>, date_ms: i64) -> RepoResult<Option<String>> {
    let id_text = tx
        .query_row("SELECT id FROM days WHERE date = ?1;", [date_ms], |row| {
            row.get::<_, String>(0)
        })
        .optional()?;
    Ok(id_text)
}

fn ensure_day_tables_ready(conn: &Connection) -> RepoResult<()> {
    for table in ["habits", "habit_week_days", "days", "day_habits"] {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    for column in ["id", "date"] {
        if !table_has_column(conn, "days", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "days",
                column,
            });
        }
    }

    for column in ["day_id", "habit_id"] {
        if !table_has_column(conn, "day_habits", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "day_habits",
                column,
            });
        }
    }

    Ok(())
}
