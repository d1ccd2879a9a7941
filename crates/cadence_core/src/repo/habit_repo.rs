//! Habit repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over `habits` + `habit_week_days` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths must call `Habit::validate()` before SQL mutations.
//! - Habit and recurrence rows are written in one transaction.
//! - Read paths must reject invalid persisted state instead of masking it.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::day::{date_from_epoch_ms, date_to_epoch_ms};
use crate::model::habit::{Habit, HabitId, HabitValidationError, WeekDay};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row, TransactionBehavior};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const HABIT_SELECT_SQL: &str = "SELECT id, title, created_at FROM habits";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for habit and day persistence operations.
#[derive(Debug)]
pub enum RepoError {
    /// Domain validation failed before any SQL ran.
    Validation(HabitValidationError),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Target habit does not exist.
    HabitNotFound(HabitId),
    /// Habit exists but is not possible on the given date.
    NotScheduled { habit_id: HabitId, date: NaiveDate },
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from an expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::HabitNotFound(id) => write!(f, "habit not found: {id}"),
            Self::NotScheduled { habit_id, date } => {
                write!(f, "habit {habit_id} is not scheduled on {date}")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<HabitValidationError> for RepoError {
    fn from(value: HabitValidationError) -> Self {
        Self::Validation(value)
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

/// Repository interface for habit CRUD operations.
pub trait HabitRepository {
    /// Creates one habit with its recurrence set and returns its stable id.
    fn create_habit(&mut self, habit: &Habit) -> RepoResult<HabitId>;
    /// Gets one habit by id.
    fn get_habit(&self, id: HabitId) -> RepoResult<Option<Habit>>;
    /// Lists all habits sorted by creation date, then id.
    fn list_habits(&self) -> RepoResult<Vec<Habit>>;
}

/// SQLite-backed habit repository.
pub struct SqliteHabitRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteHabitRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_schema_version(conn)?;
        ensure_habit_tables_ready(conn)?;
        Ok(Self { conn })
    }
}

impl HabitRepository for SqliteHabitRepository<'_> {
    fn create_habit(&mut self, habit: &Habit) -> RepoResult<HabitId> {
        habit.validate()?;

        let habit_id_text = habit.id.to_string();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute(
            "INSERT INTO habits (id, title, created_at) VALUES (?1, ?2, ?3);",
            params![
                habit_id_text.as_str(),
                habit.title.as_str(),
                date_to_epoch_ms(habit.created_on),
            ],
        )?;

        for week_day in &habit.week_days {
            tx.execute(
                "INSERT INTO habit_week_days (habit_id, week_day) VALUES (?1, ?2);",
                params![habit_id_text.as_str(), i64::from(week_day.index())],
            )?;
        }

        tx.commit()?;
        Ok(habit.id)
    }

    fn get_habit(&self, id: HabitId) -> RepoResult<Option<Habit>> {
        let id_text = id.to_string();
        let mut stmt = self
            .conn
            .prepare(&format!("{HABIT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id_text.as_str()])?;
        if let Some(row) = rows.next()? {
            let week_days = load_week_days(self.conn, id_text.as_str())?;
            return Ok(Some(parse_habit_row(row, week_days)?));
        }

        Ok(None)
    }

    fn list_habits(&self) -> RepoResult<Vec<Habit>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{HABIT_SELECT_SQL} ORDER BY created_at ASC, id ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut habits = Vec::new();
        while let Some(row) = rows.next()? {
            let id_text: String = row.get("id")?;
            let week_days = load_week_days(self.conn, &id_text)?;
            habits.push(parse_habit_row(row, week_days)?);
        }

        Ok(habits)
    }
}

pub(crate) fn parse_habit_row(row: &Row<'_>, week_days: BTreeSet<WeekDay>) -> RepoResult<Habit> {
    let id_text: String = row.get("id")?;
    let id = parse_habit_id(&id_text)?;

    let created_at_ms: i64 = row.get("created_at")?;
    let created_on = date_from_epoch_ms(created_at_ms).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid created_at value `{created_at_ms}` in habits.created_at"
        ))
    })?;

    let habit = Habit {
        id,
        title: row.get("title")?,
        created_on,
        week_days,
    };
    habit.validate()?;
    Ok(habit)
}

pub(crate) fn parse_habit_id(value: &str) -> RepoResult<HabitId> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in habits.id")))
}

pub(crate) fn load_week_days(
    conn: &Connection,
    habit_id: &str,
) -> RepoResult<BTreeSet<WeekDay>> {
    let mut stmt = conn.prepare(
        "SELECT week_day
         FROM habit_week_days
         WHERE habit_id = ?1
         ORDER BY week_day ASC;",
    )?;

    let mut rows = stmt.query([habit_id])?;
    let mut week_days = BTreeSet::new();
    while let Some(row) = rows.next()? {
        let value: i64 = row.get("week_day")?;
        let index = u8::try_from(value).ok().and_then(WeekDay::new).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid week_day value `{value}` in habit_week_days.week_day"
            ))
        })?;
        week_days.insert(index);
    }

    Ok(week_days)
}

pub(crate) fn ensure_schema_version(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}

fn ensure_habit_tables_ready(conn: &Connection) -> RepoResult<()> {
    for table in ["habits", "habit_week_days"] {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    for column in ["id", "title", "created_at"] {
        if !table_has_column(conn, "habits", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "habits",
                column,
            });
        }
    }

    for column in ["habit_id", "week_day"] {
        if !table_has_column(conn, "habit_week_days", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "habit_week_days",
                column,
            });
        }
    }

    Ok(())
}

pub(crate) fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

pub(crate) fn table_has_column(
    conn: &Connection,
    table: &str,
    column: &str,
) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
