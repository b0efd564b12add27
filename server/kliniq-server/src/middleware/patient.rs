//! Caller identity extraction
//!
//! Authentication happens at the gateway in front of this service, which
//! forwards the verified patient id in the `x-patient-id` header.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::error::ApiError;

pub const PATIENT_ID_HEADER: &str = "x-patient-id";

/// The patient on whose behalf the request is made
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedPatient(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedPatient
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(PATIENT_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| ApiError::authentication("Missing x-patient-id header"))?;

        Uuid::parse_str(value.trim())
            .map(AuthenticatedPatient)
            .map_err(|_| ApiError::authentication("Invalid x-patient-id header"))
    }
}
