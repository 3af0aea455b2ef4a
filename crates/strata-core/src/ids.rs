//! Identifier and date sources for new records

use chrono::{NaiveDate, Utc};
use ulid::Ulid;

/// Produces identifiers for new records
pub trait IdGenerator: std::fmt::Debug + Send + Sync {
    /// Next unused identifier
    fn next_id(&self) -> String;
}

/// ULID identifiers (lexicographically sortable by creation time)
#[derive(Debug, Clone, Copy, Default)]
pub struct UlidGenerator;

impl IdGenerator for UlidGenerator {
    fn next_id(&self) -> String {
        Ulid::new().to_string()
    }
}

/// Supplies the current date for check-ins recorded without one
pub trait Clock: std::fmt::Debug + Send + Sync {
    /// Today's date
    fn today(&self) -> NaiveDate;
}

/// Wall clock, UTC
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}
