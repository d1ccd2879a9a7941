//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes enforce `Habit::validate()` before persistence.
//! - Repository APIs return semantic errors (`HabitNotFound`,
//!   `NotScheduled`) in addition to DB transport errors.
//! - Repositories refuse connections whose schema is not fully migrated.

pub mod day_repo;
pub mod habit_repo;
