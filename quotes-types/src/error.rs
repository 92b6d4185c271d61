//! Error types for the quote service.

/// Upstream fetch errors.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected status code: {0}")]
    UnexpectedStatus(u16),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Exchange data not found for pair {0}")]
    PairNotFound(String),
}

/// Repository-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Database error: {0}")]
    Database(String),
}

/// Application-level errors (for HTTP responses).
///
/// Each variant is terminal for the request that produced it.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Request cancelled by the client")]
    Cancelled,

    #[error("Error with request: {0}")]
    Fetch(String),

    #[error("Error with saving data: {0}")]
    Persist(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        AppError::Fetch(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        AppError::Persist(err.to_string())
    }
}
