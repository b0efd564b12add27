//! Shared vocabulary for the Kliniq assistant engine.
//!
//! Kept dependency-light so that the speech, inference and assistant crates
//! can agree on the supported language set without depending on each other.

pub mod language;

pub use language::*;
