use axum::{extract::State, Json};
use inference_service::{translate_with_fallback, TranslationOutcome};
use kliniq_types::Language;
use serde::Deserialize;

use crate::error::{api_success, ApiError, ApiResult};
use crate::middleware::AuthenticatedPatient;
use crate::server::KliniqServer;

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub source_language: Language,
    pub target_language: Language,
}

/// Translate text; on failure the original text is returned with the error
pub async fn translate(
    State(server): State<KliniqServer>,
    _patient: AuthenticatedPatient,
    Json(request): Json<TranslateRequest>,
) -> ApiResult<TranslationOutcome> {
    if request.text.trim().is_empty() {
        return Err(ApiError::validation("text must not be empty"));
    }

    let outcome = translate_with_fallback(
        server.translator.as_ref(),
        &request.text,
        request.source_language,
        request.target_language,
    )
    .await;

    Ok(api_success(outcome))
}
