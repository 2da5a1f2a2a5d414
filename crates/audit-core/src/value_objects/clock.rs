//! Clock - source of ingestion timestamps
//!
//! Timestamps are issued at microsecond precision, which is what the
//! PostgreSQL `TIMESTAMPTZ` column stores, so a record read back from the
//! store compares equal to the one that was written.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// Source of the current time for newly ingested records
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock that never goes backwards
///
/// If the system clock steps back, the last issued instant is returned
/// until the wall clock catches up again, so a sequence of calls on one
/// clock yields non-decreasing timestamps.
#[derive(Debug, Default)]
pub struct SystemClock {
    last_micros: AtomicI64,
}

impl SystemClock {
    /// Create a new clock
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        let wall = Utc::now().timestamp_micros();
        let previous = self.last_micros.fetch_max(wall, Ordering::AcqRel);
        let issued = previous.max(wall);

        DateTime::from_timestamp_micros(issued).unwrap_or_else(Utc::now)
    }
}
