//! Domain model for habits and their per-day completion state.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep calendar-day semantics in one place (UTC midnight storage form).
//!
//! # Invariants
//! - Every domain object is identified by a stable uuid.
//! - Completion is presence/absence of a day/habit link, not a status field.

pub mod day;
pub mod habit;
