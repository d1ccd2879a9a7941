//! Habit use-case service.
//!
//! # Responsibility
//! - Provide stable create/get/list entry points for core callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::habit::{Habit, HabitId, WeekDay};
use crate::repo::habit_repo::{HabitRepository, RepoResult};
use chrono::NaiveDate;

/// Use-case service wrapper for habit operations.
pub struct HabitService<R: HabitRepository> {
    repo: R,
}

impl<R: HabitRepository> HabitService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a habit from user input.
    ///
    /// # Contract
    /// - `created_on` is the caller-resolved creation date (the HTTP layer
    ///   passes today); the habit is possible starting that date.
    /// - Duplicate weekdays collapse into one recurrence entry.
    /// - Returns the created habit as persisted.
    pub fn create_habit(
        &mut self,
        title: impl Into<String>,
        created_on: NaiveDate,
        week_days: impl IntoIterator<Item = WeekDay>,
    ) -> RepoResult<Habit> {
        let habit = Habit::new(title, created_on, week_days);
        self.repo.create_habit(&habit)?;
        Ok(habit)
    }

    /// Gets one habit by stable ID.
    pub fn get_habit(&self, id: HabitId) -> RepoResult<Option<Habit>> {
        self.repo.get_habit(id)
    }

    /// Lists all habits sorted by creation date, then id.
    pub fn list_habits(&self) -> RepoResult<Vec<Habit>> {
        self.repo.list_habits()
    }
}
