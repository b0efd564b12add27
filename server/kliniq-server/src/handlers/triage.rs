use assistant_engine::TriageAssessment;
use axum::{extract::State, Json};
use kliniq_types::Language;
use serde::Deserialize;

use crate::error::{api_success, ApiResult};
use crate::middleware::AuthenticatedPatient;
use crate::server::KliniqServer;

#[derive(Debug, Deserialize)]
pub struct AssessRequest {
    pub symptoms: String,
    /// Defaults to the patient's preferred language
    pub language: Option<Language>,
    pub additional_info: Option<String>,
}

/// One-shot symptom assessment
pub async fn assess(
    State(server): State<KliniqServer>,
    AuthenticatedPatient(patient_id): AuthenticatedPatient,
    Json(request): Json<AssessRequest>,
) -> ApiResult<TriageAssessment> {
    let language = match request.language {
        Some(language) => language,
        None => server
            .chat_store
            .patient_profile(patient_id)
            .await?
            .map(|profile| profile.language())
            .unwrap_or_default(),
    };

    let assessment = server
        .assessor
        .assess(&request.symptoms, language, request.additional_info.as_deref())
        .await?;

    Ok(api_success(assessment))
}
