//! SQLite storage layer.
//!
//! Repository implementations backed by SQLite with WAL mode and split
//! read/write connection pools.

pub mod agent;
pub mod message;
pub mod pool;

use chrono::{DateTime, SecondsFormat, Utc};

use arkagents_types::error::RepositoryError;

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

/// Fixed-width UTC form so text comparison in SQL orders chronologically.
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Map a failed write, turning a foreign key violation into `NotFound`.
pub(crate) fn map_write_error(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::Database(db_err) if db_err.message().contains("FOREIGN KEY") => {
            RepositoryError::NotFound
        }
        other => RepositoryError::Query(other.to_string()),
    }
}
