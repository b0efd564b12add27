use error_common::KliniqError;
use inference_service::InferenceError;
use thiserror::Error;
use uuid::Uuid;
use voice_recognition_service::VoiceError;

use crate::store::StoreError;

/// Errors from chat turns and triage assessment
#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Patient profile not found: {0}")]
    PatientNotFound(Uuid),

    #[error("Chat session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("Message must not be empty")]
    EmptyMessage,

    #[error("Inference failed: {0}")]
    Inference(#[from] InferenceError),

    #[error("Persistence failure: {0}")]
    Store(#[from] StoreError),
}

pub type AssistantResult<T> = Result<T, AssistantError>;

/// Errors from transcript requests
#[derive(Error, Debug)]
pub enum TranscriptError {
    #[error("Message not found: {0}")]
    MessageNotFound(Uuid),

    #[error("Message has no audio attachment")]
    NoAudioAttachment(Uuid),

    #[error(transparent)]
    Speech(#[from] VoiceError),

    #[error("Persistence failure: {0}")]
    Store(#[from] StoreError),
}

pub type TranscriptResult<T> = Result<T, TranscriptError>;

impl From<AssistantError> for KliniqError {
    fn from(err: AssistantError) -> Self {
        match err {
            AssistantError::PatientNotFound(_) | AssistantError::SessionNotFound(_) => {
                KliniqError::NotFound(err.to_string())
            }
            AssistantError::EmptyMessage => KliniqError::ValidationError(err.to_string()),
            AssistantError::Inference(e) => e.into(),
            AssistantError::Store(e) => KliniqError::PersistenceError(e.to_string()),
        }
    }
}

impl From<TranscriptError> for KliniqError {
    fn from(err: TranscriptError) -> Self {
        match err {
            TranscriptError::MessageNotFound(_) => KliniqError::NotFound(err.to_string()),
            TranscriptError::NoAudioAttachment(_) => KliniqError::ValidationError(err.to_string()),
            TranscriptError::Speech(e) => e.into(),
            TranscriptError::Store(e) => KliniqError::PersistenceError(e.to_string()),
        }
    }
}
