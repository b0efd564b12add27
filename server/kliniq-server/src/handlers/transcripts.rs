use assistant_engine::{TranscriptRequest, TranscriptView};
use axum::{
    extract::{Path, State},
    Json,
};
use kliniq_types::Language;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{api_success, ApiResult};
use crate::middleware::AuthenticatedPatient;
use crate::server::KliniqServer;

#[derive(Debug, Default, Deserialize)]
pub struct TranscriptBody {
    /// Defaults to the viewer's preferred language
    pub view_language: Option<Language>,
    /// Corrects the spoken language of the recording
    pub override_language: Option<Language>,
}

/// Transcript of a voice message in the requested language
pub async fn get_transcript(
    State(server): State<KliniqServer>,
    AuthenticatedPatient(viewer_id): AuthenticatedPatient,
    Path(message_id): Path<Uuid>,
    body: Option<Json<TranscriptBody>>,
) -> ApiResult<TranscriptView> {
    // Every field is optional, so an empty POST is a valid request
    let body = body.map(|Json(body)| body).unwrap_or_default();

    let view_language = match body.view_language {
        Some(language) => language,
        None => server
            .chat_store
            .patient_profile(viewer_id)
            .await?
            .map(|profile| profile.language())
            .unwrap_or_default(),
    };

    let view = server
        .transcripts
        .get_transcript(TranscriptRequest {
            message_id,
            view_language,
            override_language: body.override_language,
        })
        .await?;

    Ok(api_success(view))
}
