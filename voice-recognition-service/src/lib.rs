//! Speech recognition client for Kliniq voice messages
//!
//! Voice messages are stored as blob URLs. The ASR service fetches the audio
//! itself, so a transcription is a single JSON round trip:
//!
//! ```text
//! POST {ASR_ENDPOINT_URL}
//! {"audio_url": "https://...", "language": "yoruba"}
//!
//! 200 {"text": "...", "language": "yoruba", "model": "..."}
//! 200 {"error": "Failed to fetch audio: ...", "text": ""}
//! ```
//!
//! Timeouts, non-success statuses and `error` payloads all become a
//! [`VoiceError`]. There is no retry.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use kliniq_types::Language;
//! use voice_recognition_service::{SpeechClient, SpeechConfig, VoiceService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = VoiceService::new(SpeechConfig::from_env()?)?;
//! let result = service
//!     .transcribe("https://blob.example/voice/123.webm", Language::Yoruba)
//!     .await?;
//! println!("Transcription: {}", result.text);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod providers;
pub mod service;
pub mod transcription;

pub use config::*;
pub use error::*;
pub use service::*;
pub use transcription::*;
