// Logger configuration
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Used when `RUST_LOG` is not set
    pub default_filter: String,
    pub json: bool,
    pub redaction_enabled: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            default_filter: "kliniq_server=info,assistant_engine=info,tower_http=info,sqlx=warn"
                .to_string(),
            json: false,
            redaction_enabled: true,
        }
    }
}

impl LoggerConfig {
    /// Load configuration from environment
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_filter: env::var("KLINIQ_LOG_LEVEL").unwrap_or(defaults.default_filter),
            json: env::var("KLINIQ_LOG_JSON")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.json),
            redaction_enabled: env::var("KLINIQ_LOG_REDACTION")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.redaction_enabled),
        }
    }

    /// Raise every default directive to debug level
    pub fn verbose(mut self) -> Self {
        self.default_filter = self.default_filter.replace("=info", "=debug");
        self
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
