use axum::extract::State;

use crate::api::state::AppState;
use crate::api::v1::dto::{LanguageOption, LanguagesResponse};
use crate::api::v1::response::ApiResponse;
use crate::models::Language;

/// `GET /api/v1/languages`
///
/// The languages offered for recognition, in selector order.
#[utoipa::path(
    get,
    path = "/api/v1/languages",
    tag = "ocr",
    operation_id = "languages.list",
    responses(
        (status = 200, description = "Offered languages", body = LanguagesResponse),
    )
)]
pub async fn list_languages(State(state): State<AppState>) -> ApiResponse<LanguagesResponse> {
    let loaded = state.ocr.available_languages();
    let languages = Language::ALL
        .into_iter()
        .map(|language| LanguageOption::new(language, loaded.contains(&language)))
        .collect();

    ApiResponse::success(LanguagesResponse {
        languages,
        default: state.config.ocr.default_language.code().to_string(),
    })
}
