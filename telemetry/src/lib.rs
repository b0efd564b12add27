//! Metrics for the Kliniq assistant core
//!
//! Recording goes through the `metrics` facade, so every `record_*` call is a
//! no-op until a recorder is installed. The server installs the Prometheus
//! recorder from [`exporter::install_prometheus`] and serves the rendered text
//! at `/metrics`.
//!
//! # Metrics
//!
//! - `kliniq_action_blocks_dropped_total`: action-call blocks that failed to parse
//! - `kliniq_actions_dispatched_total{action,outcome}`: executed action calls
//! - `kliniq_transcript_cache_total{result}`: transcript lookups (hit / miss)
//! - `kliniq_translation_fallbacks_total{language}`: origin text stored in place of a translation
//! - `kliniq_inference_duration_seconds{outcome}`: inference round trips

pub mod error;
pub mod exporter;
pub mod metrics;

pub use error::*;
pub use exporter::*;
pub use metrics::*;
