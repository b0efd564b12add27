use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{VoiceError, VoiceResult};

/// Provider-specific configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SpeechProviderConfig {
    /// JSON-over-HTTP ASR endpoint taking `{audio_url, language}`
    Http {
        endpoint_url: Option<String>,
        api_key: Option<String>,
    },
    /// Speech recognition switched off; every request fails without a network call
    Disabled,
}

/// Speech client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpeechConfig {
    pub provider: SpeechProviderConfig,
    pub timeout_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            provider: SpeechProviderConfig::Http {
                endpoint_url: None,
                api_key: None,
            },
            timeout_secs: 60,
        }
    }
}

impl SpeechConfig {
    pub fn http(endpoint_url: impl Into<String>) -> Self {
        Self {
            provider: SpeechProviderConfig::Http {
                endpoint_url: Some(endpoint_url.into()),
                api_key: None,
            },
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> VoiceResult<Self> {
        let timeout_secs = std::env::var("SPEECH_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);

        let provider = match std::env::var("SPEECH_PROVIDER") {
            Ok(provider_type) => match provider_type.to_lowercase().as_str() {
                "http" | "asr" => SpeechProviderConfig::Http {
                    endpoint_url: non_empty_var("ASR_ENDPOINT_URL"),
                    api_key: non_empty_var("ASR_API_KEY"),
                },
                "disabled" | "none" => SpeechProviderConfig::Disabled,
                _ => {
                    return Err(VoiceError::Config(format!(
                        "Unknown speech provider: {}",
                        provider_type
                    )))
                }
            },
            // An unset endpoint is allowed; requests fail with NotConfigured
            Err(_) => SpeechProviderConfig::Http {
                endpoint_url: non_empty_var("ASR_ENDPOINT_URL"),
                api_key: non_empty_var("ASR_API_KEY"),
            },
        };

        Ok(Self {
            provider,
            timeout_secs,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
