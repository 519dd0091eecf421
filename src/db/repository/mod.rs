//! Repository layer — entity-scoped database operations for the two
//! dashboard record kinds.

mod report;
mod research_update;

pub use report::*;
pub use research_update::*;

use chrono::{DateTime, SecondsFormat, Utc};

use super::DatabaseError;

/// Fixed-width UTC timestamps keep `ORDER BY created_at` chronological.
pub(crate) fn timestamp_to_sql(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn timestamp_from_sql(raw: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| DatabaseError::ConstraintViolation(format!("bad timestamp '{raw}': {e}")))
}
