use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use super::frontend::serve_asset;
use super::v1;
use super::web;
use super::AppState;

pub fn create_router(state: AppState) -> Router {
    let max_body = state.config.server.max_upload_bytes;

    Router::new()
        .route("/", get(web::index))
        .route("/language", post(web::select_language))
        .route("/upload", post(web::upload))
        .route("/extract", post(web::extract))
        .route("/download", post(web::download))
        .route("/reset", post(web::reset))
        .route("/preview", get(web::preview))
        .route("/assets/{*path}", get(serve_asset))
        .nest("/api/v1", v1::router::v1_router())
        // Enforced inside the extractors so handlers can report it.
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
