use assistant_engine::{AssistantError, StoreError, TranscriptError};
use error_common::KliniqError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

/// Standard API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Error type/code
    pub error_type: String,
    /// Human-readable error message
    pub message: String,
    /// Timestamp when error occurred
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Suggested actions for resolving the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

/// Body returned when speech recognition fails for a transcript request
#[derive(Debug, Serialize, Deserialize)]
pub struct SpeechFailureResponse {
    pub error: String,
    pub text: String,
}

/// Standard API success response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

/// Main API error enum
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Authentication error: {message}")]
    Authentication { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("Speech recognition failed: {message}")]
    SpeechFailed { message: String },

    #[error("Upstream service error: {message}")]
    Upstream { message: String },

    #[error("Service unavailable: {message}")]
    ServiceUnavailable { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl ApiError {
    /// Create a simple validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an authentication error
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Authentication { .. } => StatusCode::UNAUTHORIZED,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::SpeechFailed { .. } | ApiError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            ApiError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "validation_error",
            ApiError::Authentication { .. } => "authentication_error",
            ApiError::NotFound { .. } => "not_found",
            ApiError::SpeechFailed { .. } => "speech_error",
            ApiError::Upstream { .. } => "upstream_error",
            ApiError::ServiceUnavailable { .. } => "service_unavailable",
            ApiError::Internal { .. } => "internal_error",
        }
    }

    /// Get suggested actions for resolving the error
    pub fn suggestions(&self) -> Option<Vec<String>> {
        match self {
            ApiError::Validation { .. } => Some(vec![
                "Check the request payload for invalid fields".to_string(),
                "Languages must be one of english, yoruba, hausa or igbo".to_string(),
            ]),
            ApiError::Authentication { .. } => {
                Some(vec!["Send the patient id in the x-patient-id header".to_string()])
            }
            ApiError::ServiceUnavailable { .. } => Some(vec![
                "Try again in a few moments".to_string(),
                "Contact support if the issue persists".to_string(),
            ]),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4().to_string();
        let status_code = self.status_code();

        // Log the error with correlation ID
        error!(
            error_id = %error_id,
            error_type = %self.error_type(),
            status_code = %status_code.as_u16(),
            error = %self,
            "API error occurred"
        );

        if let ApiError::SpeechFailed { message } = self {
            let body = SpeechFailureResponse {
                error: message,
                text: String::new(),
            };
            return (status_code, Json(body)).into_response();
        }

        let error_response = ApiErrorResponse {
            error_id,
            error_type: self.error_type().to_string(),
            message: self.to_string(),
            timestamp: chrono::Utc::now(),
            suggestions: self.suggestions(),
        };

        (status_code, Json(error_response)).into_response()
    }
}

impl From<KliniqError> for ApiError {
    fn from(err: KliniqError) -> Self {
        match err {
            KliniqError::ValidationError(message) => ApiError::Validation { message },
            KliniqError::NotFound(message) => ApiError::NotFound { message },
            KliniqError::PersistenceError(message) => ApiError::ServiceUnavailable { message },
            KliniqError::NetworkError(_) | KliniqError::Timeout(_) | KliniqError::UpstreamError(_) => {
                ApiError::Upstream {
                    message: format!("[{}] {}", err.code(), err),
                }
            }
            KliniqError::ConfigError(_)
            | KliniqError::ServerError(_)
            | KliniqError::InternalError(_)
            | KliniqError::Other(_) => ApiError::internal(format!("[{}] {}", err.code(), err)),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        KliniqError::PersistenceError(err.to_string()).into()
    }
}

impl From<AssistantError> for ApiError {
    fn from(err: AssistantError) -> Self {
        KliniqError::from(err).into()
    }
}

impl From<TranscriptError> for ApiError {
    fn from(err: TranscriptError) -> Self {
        match err {
            // Callers expect the `{error, text}` body for recognition failures
            TranscriptError::Speech(e) => ApiError::SpeechFailed { message: e.to_string() },
            other => KliniqError::from(other).into(),
        }
    }
}

/// Helper function to create successful API responses
pub fn api_success<T>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse { success: true, data })
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;
