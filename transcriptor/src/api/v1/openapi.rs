use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use super::response;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Transcriptor API",
        version = "1.0.0",
        description = "Extract text from png, jpg, jpeg, bmp and tiff images with Tesseract OCR.",
    ),
    paths(
        handlers::health::health_check,
        handlers::languages::list_languages,
        handlers::ocr::extract_text,
    ),
    components(schemas(
        // Response envelope
        response::ErrorCode,
        response::ApiError,
        // OCR
        dto::LanguageOption,
        dto::LanguagesResponse,
        dto::OcrResponse,
        // Health (handler-local types)
        handlers::health::HealthData,
        handlers::health::OcrStatus,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "ocr", description = "Languages and text extraction"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
