//! Common error handling utilities for the Kliniq assistant engine
//!
//! Each service crate keeps its own `thiserror` enum close to the code that
//! raises it. This crate provides the workspace-wide [`KliniqError`] those
//! enums fold into at process boundaries (binary entry points, background
//! jobs), together with stable error codes for API responses and log search.
//!
//! # Error Categories
//!
//! - **Network / Timeout**: inference, speech and translation calls
//! - **Upstream**: a model service answered with a non-success status
//! - **Persistence**: the store failed; fatal to the request in flight
//! - **Validation / NotFound**: caller supplied bad or unknown identifiers
//! - **Configuration**: missing endpoints, bad environment values
//!
//! # Example
//!
//! ```rust
//! use error_common::{KliniqError, Result};
//!
//! fn require_endpoint(url: Option<&str>) -> Result<&str> {
//!     url.ok_or_else(|| KliniqError::ConfigError("INFERENCE_ENDPOINT_URL is not set".into()))
//! }
//!
//! let err = require_endpoint(None).unwrap_err();
//! assert_eq!(err.code(), error_common::codes::system::CONFIGURATION);
//! ```

pub mod codes;
pub mod types;

pub use types::*;
