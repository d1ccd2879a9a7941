//! Habit domain model.
//!
//! # Responsibility
//! - Define the canonical habit record and its weekly recurrence set.
//! - Validate habit fields before they reach persistence.
//!
//! # Invariants
//! - `id` is stable and never reused for another habit.
//! - `week_days` holds distinct weekday values; an empty set is invalid.
//! - `created_on` is a calendar date; possibility checks compare whole days.
//!
//! # See also
//! - DESIGN.md

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a habit.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type HabitId = Uuid;

/// One weekday in a habit's recurrence set, `0` = Sunday through `6` = Saturday.
///
/// The numbering matches the clients' `Date.getDay()` and SQLite's
/// `strftime('%w')`, so values cross the wire and the storage boundary
/// without remapping. Out-of-range values are rejected at construction and
/// therefore at deserialization.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct WeekDay(u8);

impl WeekDay {
    /// Creates a weekday from its index, rejecting values outside `0..=6`.
    pub fn new(index: u8) -> Option<Self> {
        (index <= 6).then_some(Self(index))
    }

    /// Returns the weekday of a calendar date (`0` = Sunday).
    pub fn of(date: NaiveDate) -> Self {
        Self(date.weekday().num_days_from_sunday() as u8)
    }

    /// Returns the numeric index in `0..=6`.
    pub fn index(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for WeekDay {
    type Error = HabitValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(HabitValidationError::WeekDayOutOfRange(value))
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

/// Validation error for habit fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HabitValidationError {
    /// Title is empty or whitespace-only.
    EmptyTitle,
    /// Recurrence set is empty; the habit could never be possible.
    EmptyWeekDays,
    /// Weekday index outside `0..=6`.
    WeekDayOutOfRange(u8),
}

impl Display for HabitValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "habit title cannot be empty"),
            Self::EmptyWeekDays => write!(f, "habit needs at least one weekday"),
            Self::WeekDayOutOfRange(value) => {
                write!(f, "weekday index {value} is outside 0..=6")
            }
        }
    }
}

impl Error for HabitValidationError {}

/// Canonical domain record for a recurring habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    /// Stable global ID used for completion links and API routing.
    pub id: HabitId,
    /// Display title entered by the user.
    pub title: String,
    /// Creation date; the habit is possible starting this day.
    pub created_on: NaiveDate,
    /// Weekly recurrence set, distinct and ordered by weekday index.
    pub week_days: BTreeSet<WeekDay>,
}

impl Habit {
    /// Creates a new habit with a generated stable ID.
    pub fn new(
        title: impl Into<String>,
        created_on: NaiveDate,
        week_days: impl IntoIterator<Item = WeekDay>,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), title, created_on, week_days)
    }

    /// Creates a habit with a caller-provided stable ID.
    ///
    /// Used by persistence read paths where identity already exists.
    ///
    /// # Invariants
    /// - The provided `id` must remain stable for this habit's lifetime.
    /// - This constructor does not validate; call [`Habit::validate`] before
    ///   persisting.
    pub fn with_id(
        id: HabitId,
        title: impl Into<String>,
        created_on: NaiveDate,
        week_days: impl IntoIterator<Item = WeekDay>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            created_on,
            week_days: week_days.into_iter().collect(),
        }
    }

    /// Checks the write-path contract: non-empty title, non-empty weekday set.
    pub fn validate(&self) -> Result<(), HabitValidationError> {
        if self.title.trim().is_empty() {
            return Err(HabitValidationError::EmptyTitle);
        }
        if self.week_days.is_empty() {
            return Err(HabitValidationError::EmptyWeekDays);
        }
        Ok(())
    }

    /// Returns whether this habit is possible on the given date.
    ///
    /// Possible means the date is on/after the creation date and the date's
    /// weekday is in the recurrence set.
    pub fn is_possible_on(&self, date: NaiveDate) -> bool {
        date >= self.created_on && self.week_days.contains(&WeekDay::of(date))
    }
}
