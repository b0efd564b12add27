//! Kliniq assistant core
//!
//! Two independent state machines sit on top of the inference and speech
//! clients:
//!
//! - [`ChatOrchestrator`] runs a chat turn. It assembles the topic directive and
//!   history window, calls the model, extracts `<TOOL_CALL>` action blocks from
//!   the reply, dispatches them against the care store and persists the turn
//!   log together with the action side effects in one transaction.
//! - [`TranscriptCacheManager`] serves voice message transcripts in any of the
//!   supported languages, transcribing once and translating lazily.
//!
//! ```rust,no_run
//! use assistant_engine::{AssistantConfig, ChatOrchestrator, ChatTopic, ChatTurnRequest, MemoryStore};
//! use inference_service::{HttpInferenceClient, InferenceConfig};
//! use kliniq_types::Language;
//! use std::sync::Arc;
//! use uuid::Uuid;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryStore::new();
//! let patient = store.insert_patient(Uuid::new_v4(), Some(Language::Yoruba));
//!
//! let inference = HttpInferenceClient::new(&InferenceConfig::from_env())?;
//! let orchestrator = ChatOrchestrator::new(Arc::new(store), Arc::new(inference), AssistantConfig::default());
//!
//! let response = orchestrator
//!     .handle_turn(ChatTurnRequest {
//!         patient_id: patient.patient_id,
//!         session_id: None,
//!         message: "I have had a fever since Monday".to_string(),
//!         topic: ChatTopic::Triage,
//!         domain_context: None,
//!     })
//!     .await?;
//! println!("{}", response.reply);
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod config;
pub mod context;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod store;
pub mod transcripts;
pub mod triage;

pub use actions::{
    annotate_reply, extract_action_calls, ActionCall, ActionDispatcher, ActionFailure, ActionResult, AssistantAction,
    Extraction,
};
pub use config::AssistantConfig;
pub use context::{assemble_messages, language_directive, system_prompt, ChatTopic, TurnContext};
pub use error::*;
pub use models::*;
pub use orchestrator::*;
pub use store::{
    CareActions, ChatStore, ChatTransaction, MemoryStore, PgStore, StoreError, StoreResult, VoiceMessageStore,
};
pub use transcripts::*;
pub use triage::*;
