//! PostgREST error types.

use thiserror::Error;

/// Result type for PostgREST operations.
pub type PostgrestResult<T> = Result<T, PostgrestError>;

/// Errors that can occur during PostgREST operations.
#[derive(Debug, Error)]
pub enum PostgrestError {
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Failed to configure PostgREST client: {0}")]
    ConfigError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limited, retry after {0}ms")]
    RateLimited(u64),

    #[error("Server error ({0}): {1}")]
    ServerError(u16, String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PostgrestError {
    pub fn missing_credential(msg: impl Into<String>) -> Self {
        Self::MissingCredential(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self::RequestFailed(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Map an HTTP status to an error variant.
    pub fn from_http_status(status: u16, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        match status {
            401 | 403 => Self::PermissionDenied(msg),
            404 | 406 => Self::NotFound(msg),
            409 => Self::AlreadyExists(msg),
            429 => Self::RateLimited(1000),
            500..=599 => Self::ServerError(status, msg),
            _ => Self::RequestFailed(msg),
        }
    }

    /// Check if error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PostgrestError::Network(_)
                | PostgrestError::RateLimited(_)
                | PostgrestError::ServerError(_, _)
        )
    }

    /// Retry-After hint in milliseconds, if the backend provided one.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            PostgrestError::RateLimited(ms) => Some(*ms),
            _ => None,
        }
    }

    /// HTTP status this error maps to, for metrics.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            PostgrestError::MissingCredential(_) | PostgrestError::PermissionDenied(_) => Some(403),
            PostgrestError::NotFound(_) => Some(404),
            PostgrestError::AlreadyExists(_) => Some(409),
            PostgrestError::RateLimited(_) => Some(429),
            PostgrestError::ServerError(status, _) => Some(*status),
            PostgrestError::RequestFailed(_) => Some(400),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_http_status_429() {
        let err = PostgrestError::from_http_status(429, "rate limited");
        assert!(matches!(err, PostgrestError::RateLimited(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_from_http_status_5xx() {
        let err = PostgrestError::from_http_status(503, "service unavailable");
        assert!(matches!(err, PostgrestError::ServerError(503, _)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_from_http_status_4xx_not_retryable() {
        let err = PostgrestError::from_http_status(400, "bad request");
        assert!(matches!(err, PostgrestError::RequestFailed(_)));
        assert!(!err.is_retryable());

        let err = PostgrestError::from_http_status(404, "not found");
        assert!(matches!(err, PostgrestError::NotFound(_)));
        assert!(!err.is_retryable());

        let err = PostgrestError::from_http_status(409, "duplicate");
        assert!(matches!(err, PostgrestError::AlreadyExists(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_permission_denied_mapping() {
        for status in [401, 403] {
            let err = PostgrestError::from_http_status(status, "denied");
            assert!(matches!(err, PostgrestError::PermissionDenied(_)));
        }
    }

    #[test]
    fn test_retry_after_hint() {
        assert_eq!(PostgrestError::RateLimited(2000).retry_after_ms(), Some(2000));
        assert_eq!(
            PostgrestError::ServerError(500, "err".into()).retry_after_ms(),
            None
        );
    }

    #[test]
    fn test_http_status_getter() {
        assert_eq!(PostgrestError::RateLimited(1000).http_status(), Some(429));
        assert_eq!(
            PostgrestError::ServerError(502, "bad gateway".into()).http_status(),
            Some(502)
        );
        assert_eq!(
            PostgrestError::not_found("job 7").http_status(),
            Some(404)
        );
    }
}
