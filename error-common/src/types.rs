use crate::codes;
use thiserror::Error;

/// Workspace-wide error enum
#[derive(Error, Debug)]
pub enum KliniqError {
    /// Network communication errors
    #[error("Network error: {0}")]
    NetworkError(String),

    /// A network call exceeded its deadline
    #[error("Timeout: {0}")]
    Timeout(String),

    /// A model service answered with a non-success status
    #[error("Upstream service error: {0}")]
    UpstreamError(String),

    /// Database / store errors
    #[error("Persistence error: {0}")]
    PersistenceError(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Unknown identifiers
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Server startup / runtime errors
    #[error("Server error: {0}")]
    ServerError(String),

    /// Internal system errors
    #[error("Internal error: {0}")]
    InternalError(String),

    /// Wrapped external errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KliniqError {
    /// Stable error code for API payloads and log search
    pub fn code(&self) -> &'static str {
        match self {
            KliniqError::NetworkError(_) => codes::network::REQUEST_FAILED,
            KliniqError::Timeout(_) => codes::network::TIMEOUT,
            KliniqError::UpstreamError(_) => codes::network::UPSTREAM_STATUS,
            KliniqError::PersistenceError(_) => codes::database::QUERY_FAILED,
            KliniqError::ValidationError(_) => codes::validation::INVALID_INPUT,
            KliniqError::NotFound(_) => codes::resource::NOT_FOUND,
            KliniqError::ConfigError(_) => codes::system::CONFIGURATION,
            KliniqError::ServerError(_) | KliniqError::InternalError(_) | KliniqError::Other(_) => {
                codes::system::INTERNAL
            }
        }
    }

    /// Whether the failure came from an external dependency rather than the caller
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            KliniqError::NetworkError(_) | KliniqError::Timeout(_) | KliniqError::UpstreamError(_)
        )
    }
}

/// Result type alias for Kliniq operations
pub type Result<T> = std::result::Result<T, KliniqError>;

/// Async logging function for errors
pub async fn log_error(context: &str, error: &KliniqError) {
    tracing::error!(
        context = context,
        error_code = error.code(),
        error = %error,
        "Kliniq error occurred"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(KliniqError::Timeout("asr".into()).code(), "NET_3002");
        assert_eq!(KliniqError::NotFound("message".into()).code(), "RESOURCE_2001");
        assert_eq!(
            KliniqError::Other(anyhow::anyhow!("boom")).code(),
            codes::system::INTERNAL
        );
    }

    #[test]
    fn test_transient_classification() {
        assert!(KliniqError::UpstreamError("503".into()).is_transient());
        assert!(!KliniqError::ValidationError("empty message".into()).is_transient());
    }

    #[tokio::test]
    async fn test_log_error_does_not_panic_without_subscriber() {
        log_error("unit-test", &KliniqError::InternalError("x".into())).await;
    }
}
