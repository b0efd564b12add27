use error_common::KliniqError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Inference endpoint not configured")]
    NotConfigured,

    #[error("Inference request timed out")]
    Timeout,

    #[error("Inference service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to decode inference response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type InferenceResult<T> = Result<T, InferenceError>;

impl From<InferenceError> for KliniqError {
    fn from(err: InferenceError) -> Self {
        match err {
            InferenceError::NotConfigured => KliniqError::ConfigError(err.to_string()),
            InferenceError::Timeout => KliniqError::Timeout(err.to_string()),
            InferenceError::Status { .. } => KliniqError::UpstreamError(err.to_string()),
            InferenceError::Network(_) | InferenceError::Decode(_) => {
                KliniqError::NetworkError(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_to_kliniq_error() {
        assert!(matches!(KliniqError::from(InferenceError::NotConfigured), KliniqError::ConfigError(_)));
        assert!(KliniqError::from(InferenceError::Timeout).is_transient());

        let status = KliniqError::from(InferenceError::Status {
            status: 500,
            body: "overloaded".into(),
        });
        assert!(matches!(status, KliniqError::UpstreamError(ref msg) if msg.contains("overloaded")));
    }
}
