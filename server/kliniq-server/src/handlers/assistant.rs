use assistant_engine::{ChatTopic, ChatTurnRequest, ChatTurnResponse};
use axum::{extract::State, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{api_success, ApiResult};
use crate::middleware::AuthenticatedPatient;
use crate::server::KliniqServer;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: Option<Uuid>,
    #[serde(default)]
    pub topic: ChatTopic,
    /// Doctor notes, upcoming visits and similar
    pub context: Option<String>,
}

/// Run one assistant chat turn for the calling patient
pub async fn chat(
    State(server): State<KliniqServer>,
    AuthenticatedPatient(patient_id): AuthenticatedPatient,
    Json(request): Json<ChatRequest>,
) -> ApiResult<ChatTurnResponse> {
    let response = server
        .orchestrator
        .handle_turn(ChatTurnRequest {
            patient_id,
            session_id: request.session_id,
            message: request.message,
            topic: request.topic,
            domain_context: request.context,
        })
        .await?;

    Ok(api_success(response))
}
