//! Client workflow error types.

use thiserror::Error;

/// Result type for client workflows.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors surfaced by the client workflows. Every workflow propagates its
/// failure as a `ClientError`; nothing is swallowed into a logged-and-None
/// path.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Session error: {0}")]
    Session(String),

    /// The identity session exists but cannot mint a backend token yet.
    #[error("Session not ready: {0}")]
    SessionNotReady(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Postgrest(#[from] jb_postgrest::PostgrestError),

    #[error(transparent)]
    Storage(#[from] jb_storage::StorageError),
}

impl ClientError {
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    pub fn session_not_ready(msg: impl Into<String>) -> Self {
        Self::SessionNotReady(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgrest_errors_pass_through() {
        let err: ClientError = jb_postgrest::PostgrestError::not_found("job 7").into();
        assert!(matches!(err, ClientError::Postgrest(_)));
        assert_eq!(err.to_string(), "Not found: job 7");
    }
}
