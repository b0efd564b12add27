use kliniq_types::Language;
use serde::{Deserialize, Serialize};

/// Request body sent to the ASR endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranscriptionRequest {
    pub audio_url: String,
    pub language: Language,
}

/// Successful transcription
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranscriptionResult {
    pub text: String,
    pub language: Language,
    pub model: Option<String>,
}

/// Raw ASR response; either a transcript or `{error, text: ""}`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AsrResponse {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
