// Database configuration
use std::env;
use std::time::Duration;

use crate::error::{DatabaseError, DatabaseResult};

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 20,
            acquire_timeout: Duration::from_secs(30),
        }
    }

    /// Load configuration from environment.
    ///
    /// Returns `Ok(None)` when `DATABASE_URL` is unset so callers can fall back
    /// to an in-memory store.
    pub fn from_env() -> DatabaseResult<Option<Self>> {
        let url = match env::var("DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => url,
            _ => return Ok(None),
        };

        let mut config = Self::new(url);

        if let Ok(value) = env::var("DATABASE_MAX_CONNECTIONS") {
            config.max_connections = value.parse().map_err(|_| {
                DatabaseError::ConfigError(format!("DATABASE_MAX_CONNECTIONS is not a number: {}", value))
            })?;
        }

        if let Ok(value) = env::var("DATABASE_ACQUIRE_TIMEOUT_SECS") {
            let secs: u64 = value.parse().map_err(|_| {
                DatabaseError::ConfigError(format!(
                    "DATABASE_ACQUIRE_TIMEOUT_SECS is not a number: {}",
                    value
                ))
            })?;
            config.acquire_timeout = Duration::from_secs(secs);
        }

        Ok(Some(config))
    }
}
