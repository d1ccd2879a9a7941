//! Day use-case service.
//!
//! # Responsibility
//! - Provide per-date status, completion toggling and the summary report.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Dates are caller-resolved; the service never reads the wall clock, so
//!   behavior is deterministic under test.

use crate::model::habit::HabitId;
use crate::repo::day_repo::{DayRepository, DayStatus, DaySummary, ToggleOutcome};
use crate::repo::habit_repo::RepoResult;
use chrono::NaiveDate;

/// Use-case service wrapper for day-centric operations.
pub struct DayService<R: DayRepository> {
    repo: R,
}

impl<R: DayRepository> DayService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns possible habits and completed habit ids for one date.
    ///
    /// # Contract
    /// - Dates without a recorded `days` row report empty completions.
    /// - Future dates are answered like any other date.
    pub fn status_for(&self, date: NaiveDate) -> RepoResult<DayStatus> {
        self.repo.day_status(date)
    }

    /// Flips completion of one habit on one date.
    ///
    /// # Contract
    /// - Creates the `days` row lazily on first completion for that date.
    /// - Returns `HabitNotFound` for unknown habits and `NotScheduled` when
    ///   the habit is not possible on `date`.
    pub fn toggle(&mut self, habit_id: HabitId, date: NaiveDate) -> RepoResult<ToggleOutcome> {
        self.repo.toggle_completion(habit_id, date)
    }

    /// Returns completed/possible counts for every recorded day, date
    /// ascending.
    pub fn summary(&self) -> RepoResult<Vec<DaySummary>> {
        self.repo.summary()
    }
}
