use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::ocr::{DecodeError, EngineError};

#[derive(Error, Debug)]
pub enum TranscriptorError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Image decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("{0}")]
    Engine(#[from] EngineError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl TranscriptorError {
    pub fn status(&self) -> StatusCode {
        match self {
            TranscriptorError::Validation(_) => StatusCode::BAD_REQUEST,
            TranscriptorError::Decode(_) => StatusCode::UNPROCESSABLE_ENTITY,
            TranscriptorError::Engine(EngineError::NotAvailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            TranscriptorError::Engine(EngineError::Runtime(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            TranscriptorError::NotFound(_) => StatusCode::NOT_FOUND,
            TranscriptorError::Conflict(_) => StatusCode::CONFLICT,
            TranscriptorError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            TranscriptorError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for TranscriptorError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            TranscriptorError::Validation(msg)
            | TranscriptorError::NotFound(msg)
            | TranscriptorError::Conflict(msg)
            | TranscriptorError::PayloadTooLarge(msg) => msg.clone(),
            TranscriptorError::Internal(_) => {
                tracing::error!(error = %self, "Internal error");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, TranscriptorError>;
