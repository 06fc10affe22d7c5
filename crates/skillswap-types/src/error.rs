use thiserror::Error;

/// Errors raised by the negotiation engine.
///
/// Every variant is surfaced unchanged to the caller; none are retried here.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// Referenced entity is absent or not visible to the caller.
    #[error("{0}")]
    NotFound(String),

    /// Caller lacks the sender, recipient, or participant relationship required.
    #[error("{0}")]
    Forbidden(String),

    /// State-machine violation: wrong status, duplicate pending tuple, double rating.
    #[error("{0}")]
    Conflict(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Transient storage failure; the caller decides whether to retry.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors raised by the feed ranker.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors from repository operations (used by trait definitions in skillswap-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

impl From<RepositoryError> for ExchangeError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::Connection(msg) => ExchangeError::Unavailable(msg),
            RepositoryError::Query(msg) => ExchangeError::Storage(msg),
            RepositoryError::NotFound => ExchangeError::NotFound("entity not found".to_string()),
            RepositoryError::Conflict(msg) => ExchangeError::Conflict(msg),
        }
    }
}

impl From<RepositoryError> for FeedError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::Connection(msg) => FeedError::Unavailable(msg),
            other => FeedError::Storage(other.to_string()),
        }
    }
}
