use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Inference client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InferenceConfig {
    /// Chat-completion endpoint; requests fail with `NotConfigured` when unset
    pub endpoint_url: Option<String>,
    pub timeout_secs: u64,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint_url: None,
            timeout_secs: 120,
            max_tokens: 1024,
            temperature: 0.7,
            top_p: 0.9,
        }
    }
}

impl InferenceConfig {
    pub fn with_endpoint(endpoint_url: impl Into<String>) -> Self {
        Self {
            endpoint_url: Some(endpoint_url.into()),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            endpoint_url: std::env::var("INFERENCE_ENDPOINT_URL")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            timeout_secs: env_or("INFERENCE_TIMEOUT_SECS", defaults.timeout_secs),
            max_tokens: env_or("INFERENCE_MAX_TOKENS", defaults.max_tokens),
            temperature: env_or("INFERENCE_TEMPERATURE", defaults.temperature),
            top_p: env_or("INFERENCE_TOP_P", defaults.top_p),
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
