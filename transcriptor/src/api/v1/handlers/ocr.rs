use std::sync::Arc;

use axum::extract::{Multipart, State};

use crate::api::extractors::read_upload_form;
use crate::api::state::AppState;
use crate::api::v1::dto::OcrResponse;
use crate::api::v1::response::{ApiError, ApiResponse};
use crate::error::Result;
use crate::models::{sanitize_filename, ExtractedText};
use crate::ocr::{decode_image, Recognition};

/// `POST /api/v1/ocr`
///
/// Multipart form with a `file` field and an optional `language` (code or
/// display name, defaults to the configured language). Stateless: nothing is
/// kept after the response.
#[utoipa::path(
    post,
    path = "/api/v1/ocr",
    tag = "ocr",
    operation_id = "ocr.extract",
    request_body(content_type = "multipart/form-data", content = String, description = "Image `file` with an optional `language` field"),
    responses(
        (status = 200, description = "Recognition finished", body = OcrResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 413, description = "Upload exceeds the size limit", body = ApiError),
        (status = 422, description = "Not a supported image", body = ApiError),
        (status = 500, description = "OCR failed", body = ApiError),
        (status = 503, description = "OCR engine unavailable", body = ApiError),
    )
)]
pub async fn extract_text(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResponse<OcrResponse> {
    match run(&state, &mut multipart).await {
        Ok(response) => ApiResponse::success(response),
        Err(e) => e.into(),
    }
}

async fn run(state: &AppState, multipart: &mut Multipart) -> Result<OcrResponse> {
    let form = read_upload_form(multipart).await?;
    let language = form
        .language
        .unwrap_or(state.config.ocr.default_language);

    let image = decode_image(&form.filename, &form.bytes)?;
    let recognition = state.ocr.recognize(Arc::new(image), language).await?;

    let filename = sanitize_filename(&form.filename);
    let (text, empty) = match recognition {
        Recognition::Text(text) => (text, false),
        Recognition::Empty => (String::new(), true),
    };

    let extracted = ExtractedText {
        text,
        source_filename: filename.clone(),
        language,
    };

    tracing::info!(
        filename = %filename,
        language = language.code(),
        empty,
        "API extraction finished"
    );

    Ok(OcrResponse {
        download_filename: extracted.download_filename(),
        text: extracted.text,
        empty,
        language: language.code().to_string(),
        filename,
    })
}
