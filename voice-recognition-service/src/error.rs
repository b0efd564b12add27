use error_common::KliniqError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("ASR endpoint not configured")]
    NotConfigured,

    #[error("Speech recognition is disabled")]
    Disabled,

    #[error("Transcription request timed out")]
    Timeout,

    #[error("Transcription failed: {status}")]
    Status { status: u16 },

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type VoiceResult<T> = Result<T, VoiceError>;

impl From<VoiceError> for KliniqError {
    fn from(err: VoiceError) -> Self {
        match err {
            VoiceError::Config(_) | VoiceError::NotConfigured | VoiceError::Disabled => {
                KliniqError::ConfigError(err.to_string())
            }
            VoiceError::Timeout => KliniqError::Timeout(err.to_string()),
            VoiceError::Status { .. } | VoiceError::Transcription(_) => {
                KliniqError::UpstreamError(err.to_string())
            }
            VoiceError::Network(_) | VoiceError::Serialization(_) => {
                KliniqError::NetworkError(err.to_string())
            }
        }
    }
}
