//! Logging for the Kliniq assistant engine with PII redaction
//!
//! Chat messages, model replies and voice transcripts are patient data. They
//! reach the logs only through [`PiiRedactor::preview`], which masks (or
//! hashes, for correlation) e-mail addresses, phone numbers and Kliniq
//! patient numbers and bounds the length of what is written.
//!
//! # Detected Data Types
//!
//! - **Email Addresses**: `ada@example.com` → `EMAIL[x1Yz..]`
//! - **Phone Numbers**: `+234 803 123 4567`, `08031234567`, other `+CC` numbers
//! - **Patient Numbers**: `KLQ-7F3A2B` → `PATIENT[..]`
//!
//! # Example
//!
//! ```rust
//! use logger_redacted::{PiiRedactor, RedactionConfig};
//!
//! let redactor = PiiRedactor::new(RedactionConfig {
//!     hash_for_correlation: false,
//!     ..Default::default()
//! });
//! assert_eq!(redactor.redact("mail ada@example.com"), "mail ***@***");
//! ```

pub mod config;
pub mod redactor;
pub mod subscriber;

pub use config::*;
pub use redactor::*;
pub use subscriber::*;

/// Build the redactor matching a logger configuration
pub fn redactor_for(config: &LoggerConfig) -> PiiRedactor {
    if config.redaction_enabled {
        PiiRedactor::default()
    } else {
        PiiRedactor::passthrough()
    }
}
