//! Inference and translation clients for the Kliniq assistant engine
//!
//! [`HttpInferenceClient`] wraps a chat-completion service:
//!
//! ```text
//! POST {INFERENCE_ENDPOINT_URL}
//! {"messages": [{"role": "system", "content": "..."}], "max_tokens": 1024, "temperature": 0.7, "top_p": 0.9}
//!
//! 200 {"response": "...", "usage": {"prompt_tokens": 1, "completion_tokens": 2, "total_tokens": 3}, "model": "..."}
//! ```
//!
//! [`LlmTranslator`] is a [`Translator`] built on any [`InferenceClient`].

pub mod client;
pub mod config;
pub mod error;
pub mod translation;

pub use client::*;
pub use config::*;
pub use error::*;
pub use translation::*;
