//! Column conversions shared by the SQLite repositories.

use chrono::{DateTime, SecondsFormat, Utc};
use skillswap_types::error::RepositoryError;

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

/// Fixed-width UTC form, so that `ORDER BY created_at` is chronological.
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored id column into its newtype.
pub(crate) fn parse_id<T: std::str::FromStr<Err = uuid::Error>>(
    s: &str,
    what: &str,
) -> Result<T, RepositoryError> {
    s.parse::<T>()
        .map_err(|e| RepositoryError::Query(format!("invalid {what} id: {e}")))
}

/// Classify a sqlx error.
///
/// Pool exhaustion and IO failures are transient; a uniqueness violation is
/// a conflict; anything else is a query failure.
pub(crate) fn map_sqlx_error(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            RepositoryError::Connection(e.to_string())
        }
        sqlx::Error::Database(ref db_err) if db_err.message().contains("UNIQUE") => {
            RepositoryError::Conflict(db_err.message().to_string())
        }
        other => RepositoryError::Query(other.to_string()),
    }
}
