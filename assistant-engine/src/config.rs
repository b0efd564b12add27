use inference_service::InferenceConfig;
use serde::{Deserialize, Serialize};

/// Assistant behaviour configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssistantConfig {
    /// Turns sent to the model, counting the new user message
    pub history_window: usize,
    pub title_max_chars: usize,
    /// Fan translations out concurrently when populating a transcript cache
    pub concurrent_translations: bool,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self::with_generation(&InferenceConfig::default())
    }
}

impl AssistantConfig {
    /// Defaults with generation parameters taken from the inference configuration
    pub fn with_generation(inference: &InferenceConfig) -> Self {
        Self {
            history_window: 10,
            title_max_chars: 50,
            concurrent_translations: true,
            max_tokens: inference.max_tokens,
            temperature: inference.temperature,
            top_p: inference.top_p,
        }
    }

    /// Load configuration from environment variables
    pub fn from_env(inference: &InferenceConfig) -> Self {
        let defaults = Self::with_generation(inference);

        Self {
            history_window: std::env::var("ASSISTANT_HISTORY_WINDOW")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.history_window),
            title_max_chars: std::env::var("ASSISTANT_TITLE_MAX_CHARS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.title_max_chars),
            concurrent_translations: std::env::var("TRANSCRIPT_CONCURRENT_TRANSLATIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.concurrent_translations),
            ..defaults
        }
    }
}
