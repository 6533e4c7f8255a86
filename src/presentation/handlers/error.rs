use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::services::PipelineError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_error: Option<String>,
}

/// Error body returned to HTTP callers. Never carries internal debug output.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                error: message.into(),
                stage: None,
                provider_error: None,
            },
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn from_pipeline(error: &PipelineError, expose_provider_errors: bool) -> Self {
        let (status, message) = match error {
            PipelineError::Validation(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
            PipelineError::Conversion(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Audio could not be converted to a supported format".to_string(),
            ),
            PipelineError::Transcription(_) => (
                StatusCode::BAD_GATEWAY,
                "Transcription service request failed".to_string(),
            ),
            PipelineError::Translation(_) => (
                StatusCode::BAD_GATEWAY,
                "Translation service request failed".to_string(),
            ),
        };

        let provider_error = expose_provider_errors
            .then(|| error.provider_payload().map(str::to_string))
            .flatten();

        Self {
            status,
            body: ErrorResponse {
                error: message,
                stage: Some(error.stage().as_str().to_string()),
                provider_error,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
