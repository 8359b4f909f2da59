//! # V1 API Response Envelope & Error Contract
//!
//! Every v1 endpoint returns an [`ApiResponse<T>`] envelope:
//!
//! ```json
//! {
//!   "data": { ... },                                    // present on success
//!   "error": { "code": "unsupported_image", "message": "..." }  // present on error
//! }
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::TranscriptorError;
use crate::ocr::EngineError;

/// Machine-readable error code included in every error response.
///
/// Serialized as a snake_case string on the wire (e.g. `"invalid_request"`).
/// Each variant maps to a fixed HTTP status code via [`ErrorCode::status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Malformed form data, missing file or unknown language. HTTP 400.
    InvalidRequest,
    /// HTTP 404.
    NotFound,
    /// HTTP 409.
    Conflict,
    /// The upload exceeds `MAX_UPLOAD_BYTES`. HTTP 413.
    PayloadTooLarge,
    /// The upload is not a readable png/jpg/jpeg/bmp/tiff image. HTTP 422.
    UnsupportedImage,
    /// The engine ran and failed. HTTP 500.
    OcrFailed,
    /// The engine or the requested language model is not installed. HTTP 503.
    EngineUnavailable,
    /// Internal details are never leaked to the client. HTTP 500.
    InternalError,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedImage => StatusCode::UNPROCESSABLE_ENTITY,
            Self::OcrFailed | Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::EngineUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequest => write!(f, "invalid_request"),
            Self::NotFound => write!(f, "not_found"),
            Self::Conflict => write!(f, "conflict"),
            Self::PayloadTooLarge => write!(f, "payload_too_large"),
            Self::UnsupportedImage => write!(f, "unsupported_image"),
            Self::OcrFailed => write!(f, "ocr_failed"),
            Self::EngineUnavailable => write!(f, "engine_unavailable"),
            Self::InternalError => write!(f, "internal_error"),
        }
    }
}

/// Structured error payload within the API envelope.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ApiError {
    pub code: ErrorCode,
    /// Human-readable description safe to display to end users.
    pub message: String,
}

/// Canonical v1 API response envelope.
///
/// On success `data` is present and `error` is absent; on error the reverse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,

    /// HTTP status to use in the response. Not serialized on the wire.
    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// Success response with data (HTTP 200).
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            status: StatusCode::OK,
        }
    }

    /// Error response. HTTP status is derived from the [`ErrorCode`].
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        let status = code.status();
        Self {
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
            status,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status;
        match serde_json::to_value(&self) {
            Ok(body) => (status, Json(body)).into_response(),
            Err(_) => {
                let body = serde_json::json!({
                    "error": {
                        "code": "internal_error",
                        "message": "An internal error occurred"
                    }
                });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

impl<T: Serialize> From<TranscriptorError> for ApiResponse<T> {
    /// Convert a [`TranscriptorError`] into a v1 [`ApiResponse`].
    ///
    /// For `internal_error` responses a generic message is returned and the
    /// real error is logged.
    fn from(err: TranscriptorError) -> Self {
        match err {
            TranscriptorError::Validation(msg) => ApiResponse::error(ErrorCode::InvalidRequest, msg),
            TranscriptorError::NotFound(msg) => ApiResponse::error(ErrorCode::NotFound, msg),
            TranscriptorError::Conflict(msg) => ApiResponse::error(ErrorCode::Conflict, msg),
            TranscriptorError::PayloadTooLarge(msg) => {
                ApiResponse::error(ErrorCode::PayloadTooLarge, msg)
            }

            TranscriptorError::Decode(e) => {
                ApiResponse::error(ErrorCode::UnsupportedImage, e.to_string())
            }

            TranscriptorError::Engine(e @ EngineError::NotAvailable(_)) => {
                ApiResponse::error(ErrorCode::EngineUnavailable, e.to_string())
            }

            TranscriptorError::Engine(e @ EngineError::Runtime(_)) => {
                tracing::error!(error = %e, "OCR failed");
                ApiResponse::error(ErrorCode::OcrFailed, e.to_string())
            }

            ref internal @ TranscriptorError::Internal(_) => {
                tracing::error!(error = %internal, "Internal error mapped to v1 response");
                ApiResponse::error(ErrorCode::InternalError, "An internal error occurred")
            }
        }
    }
}
