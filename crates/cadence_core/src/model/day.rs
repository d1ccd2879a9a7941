//! Day domain model and calendar/storage conversions.
//!
//! # Responsibility
//! - Define the lazily-created calendar day record.
//! - Convert calendar dates to/from the epoch-millisecond storage form.
//!
//! # Invariants
//! - `date` identifies one calendar day; the storage form is epoch
//!   milliseconds at UTC midnight, so equal dates compare equal in SQL.
//! - A `Day` row exists only after the first completion toggle touched it.

use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a calendar day record.
pub type DayId = Uuid;

/// Calendar day record, created on first completion toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    /// Stable global ID referenced by completion links.
    pub id: DayId,
    /// The calendar date this row stands for.
    pub date: NaiveDate,
}

impl Day {
    /// Creates a new day record with a generated stable ID.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
        }
    }
}

/// Converts a calendar date to its storage form: epoch ms at UTC midnight.
pub fn date_to_epoch_ms(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

/// Reads a stored epoch-ms day key back into a calendar date.
///
/// Returns `None` only for timestamps outside chrono's representable range;
/// repositories treat that as invalid persisted data.
pub fn date_from_epoch_ms(epoch_ms: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(epoch_ms).map(|at| at.date_naive())
}
