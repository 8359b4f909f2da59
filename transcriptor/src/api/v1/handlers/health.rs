use axum::extract::State;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::v1::response::ApiResponse;

/// Health data returned inside the v1 envelope.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthData {
    /// `"ok"`, or `"degraded"` when OCR is unavailable.
    pub status: String,
    pub version: String,
    pub ocr: OcrStatus,
    pub active_sessions: usize,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct OcrStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    pub languages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// `GET /api/v1/health`
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health status", body = HealthData),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> ApiResponse<HealthData> {
    let ocr = &state.ocr;
    let ocr_status = OcrStatus {
        status: if ocr.is_available() { "ok" } else { "unavailable" }.to_string(),
        engine: ocr.engine_name().map(str::to_string),
        languages: ocr
            .available_languages()
            .iter()
            .map(|l| l.code().to_string())
            .collect(),
        reason: ocr.unavailable_reason().map(str::to_string),
    };

    ApiResponse::success(HealthData {
        status: if ocr.is_available() { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ocr: ocr_status,
        active_sessions: state.sessions.len(),
    })
}
