//! Persistence seams for the assistant core
//!
//! Chat turns run their action side effects and the session replacement in
//! one [`ChatTransaction`]; dropping it without `commit` discards everything.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use database_layer::DatabaseError;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{AppointmentRequest, ChatSession, HospitalLink, PatientProfile, TriageCase, VoiceMessage};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("Stored data is invalid: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Domain operations the action dispatcher performs
#[async_trait]
pub trait CareActions: Send {
    /// The patient's earliest hospital link
    async fn first_hospital_link(&mut self, patient_id: Uuid) -> StoreResult<Option<HospitalLink>>;

    async fn create_appointment_request(&mut self, request: &AppointmentRequest) -> StoreResult<()>;

    /// The patient's active triage case opened from chat, if any
    async fn active_adhoc_triage(&mut self, patient_id: Uuid) -> StoreResult<Option<TriageCase>>;

    /// Insert or overwrite by id
    async fn save_triage_case(&mut self, case: &TriageCase) -> StoreResult<()>;
}

/// Unit of work for one chat turn
#[async_trait]
pub trait ChatTransaction: CareActions {
    /// Write the session row, including its whole turn log
    async fn replace_session(&mut self, session: &ChatSession) -> StoreResult<()>;

    async fn commit(self: Box<Self>) -> StoreResult<()>;
}

#[async_trait]
pub trait ChatStore: Send + Sync {
    async fn patient_profile(&self, patient_id: Uuid) -> StoreResult<Option<PatientProfile>>;

    async fn chat_session(&self, session_id: Uuid) -> StoreResult<Option<ChatSession>>;

    async fn begin(&self) -> StoreResult<Box<dyn ChatTransaction>>;

    async fn is_healthy(&self) -> bool {
        true
    }
}

#[async_trait]
pub trait VoiceMessageStore: Send + Sync {
    async fn voice_message(&self, message_id: Uuid) -> StoreResult<Option<VoiceMessage>>;

    /// Persist `original_language` and the transcript map in one write
    async fn save_voice_message(&self, message: &VoiceMessage) -> StoreResult<()>;
}
