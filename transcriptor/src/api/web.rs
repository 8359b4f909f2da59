//! Handlers for the interactive page.
//!
//! Each handler loads the caller's session, runs one controller step and
//! commits the result. State-changing requests answer with a redirect to `/`
//! so a reload never repeats them; the notice they leave is shown once.

use axum::extract::{Form, Multipart, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use super::extractors::{read_upload_form, session_cookie, session_id};
use super::pages;
use super::AppState;
use crate::controller::{self, TextDownload};
use crate::error::TranscriptorError;
use crate::models::Language;
use crate::session::{Notice, Session};

#[derive(Debug, Deserialize)]
pub struct LanguageForm {
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DownloadForm {
    #[serde(default)]
    pub text: String,
}

fn load(state: &AppState, jar: &CookieJar) -> Session {
    state.sessions.open(session_id(jar).as_deref())
}

fn commit_and_redirect(state: &AppState, jar: CookieJar, session: Session) -> Response {
    let jar = jar.add(session_cookie(&session.id));
    state.sessions.commit(session);
    (jar, Redirect::to("/")).into_response()
}

/// Apply a submitted language, leaving an error notice if it is not one of
/// the offered options.
fn apply_language(mut session: Session, submitted: Option<&str>) -> Session {
    let Some(value) = submitted.filter(|v| !v.trim().is_empty()) else {
        return session;
    };

    match value.parse::<Language>() {
        Ok(language) => controller::select_language(session, language),
        Err(e) => {
            session.notice = Some(Notice::error("Invalid language selection.", Some(e)));
            session
        }
    }
}

/// `GET /`
pub async fn index(State(state): State<AppState>, jar: CookieJar) -> Response {
    let mut session = load(&state, &jar);
    let notice = session.take_notice();
    let page = pages::render_page(&session, notice.as_ref(), &state.ocr);

    let jar = jar.add(session_cookie(&session.id));
    state.sessions.commit(session);
    (jar, Html(page)).into_response()
}

/// `POST /language`
pub async fn select_language(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LanguageForm>,
) -> Response {
    let session = apply_language(load(&state, &jar), form.language.as_deref());
    commit_and_redirect(&state, jar, session)
}

/// `POST /upload`
///
/// Multipart form with `file` and an optional `language`. The image is
/// decoded right away so the page can preview it or explain why it failed.
pub async fn upload(
    State(state): State<AppState>,
    jar: CookieJar,
    mut multipart: Multipart,
) -> Response {
    let mut session = load(&state, &jar);

    session = match read_upload_form(&mut multipart).await {
        Ok(form) => {
            if let Some(language) = form.language {
                session = controller::select_language(session, language);
            }
            controller::upload(session, &form.filename, form.bytes)
        }
        Err(e) => {
            tracing::warn!(session = %session.id, "Upload rejected: {}", e);
            let message = match &e {
                TranscriptorError::PayloadTooLarge(_) => format!(
                    "The file is too large. Uploads are limited to {:.1} MB.",
                    state.config.server.max_upload_bytes as f64 / (1024.0 * 1024.0)
                ),
                _ => "The upload could not be processed.".to_string(),
            };
            session.notice = Some(Notice::error(message, Some(e.to_string())));
            session
        }
    };

    commit_and_redirect(&state, jar, session)
}

/// `POST /extract`
///
/// Blocks until the engine returns; the page shows a busy indicator meanwhile.
pub async fn extract(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LanguageForm>,
) -> Response {
    let mut session = load(&state, &jar);
    session.notice = None;
    let session = apply_language(session, form.language.as_deref());

    let session = if matches!(session.notice, Some(Notice::Error { .. })) {
        session
    } else {
        controller::extract(session, &state.ocr).await
    };

    commit_and_redirect(&state, jar, session)
}

/// Browsers submit textarea content with CRLF line breaks. Convert back
/// unless the extracted text itself used them.
fn normalize_newlines(submitted: String, extracted: Option<&str>) -> String {
    match extracted {
        Some(original) if original.contains('\r') => submitted,
        _ if submitted.contains("\r\n") => submitted.replace("\r\n", "\n"),
        _ => submitted,
    }
}

/// `POST /download`
///
/// Returns the posted text, as currently shown in the review step, as a
/// UTF-8 attachment. Refused with 409 while the session has no extracted text.
pub async fn download(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<DownloadForm>,
) -> Response {
    let session = load(&state, &jar);
    let text = normalize_newlines(form.text, session.extracted_text());
    let (session, result) = controller::download(session, text);
    let jar = jar.add(session_cookie(&session.id));

    match result {
        Ok(file) => {
            tracing::info!(
                session = %session.id,
                filename = %file.filename,
                bytes = file.content.len(),
                "Text downloaded"
            );
            state.sessions.commit(session);
            (jar, file).into_response()
        }
        Err(e) => {
            let message = match &e {
                TranscriptorError::Conflict(msg) => msg.clone(),
                other => other.to_string(),
            };
            let notice = Notice::error(message, None);
            let page = pages::render_page(&session, Some(&notice), &state.ocr);
            let status = e.status();
            state.sessions.commit(session);
            (status, jar, Html(page)).into_response()
        }
    }
}

/// `POST /reset`
pub async fn reset(State(state): State<AppState>, jar: CookieJar) -> Response {
    let session = controller::reset(load(&state, &jar));
    commit_and_redirect(&state, jar, session)
}

/// `GET /preview`
///
/// The bytes of the session's uploaded image.
pub async fn preview(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, TranscriptorError> {
    let not_found = || TranscriptorError::NotFound("No image has been uploaded".to_string());

    let id = session_id(&jar).ok_or_else(not_found)?;
    let (bytes, mime) = state
        .sessions
        .peek(&id, |session| {
            session
                .upload
                .as_ref()
                .map(|upload| (upload.bytes.clone(), upload.mime_type()))
        })
        .flatten()
        .ok_or_else(not_found)?;

    Ok((
        [
            (header::CONTENT_TYPE, mime),
            (header::CACHE_CONTROL, "no-store"),
        ],
        bytes,
    )
        .into_response())
}

/// `Content-Disposition` value for `filename`, with an RFC 5987
/// `filename*` parameter when the name is not plain ASCII.
pub fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '_' })
        .collect();

    if fallback == filename {
        return format!("attachment; filename=\"{filename}\"");
    }

    let encoded: String = filename
        .bytes()
        .map(|b| {
            if b.is_ascii_alphanumeric() || b"-._~".contains(&b) {
                (b as char).to_string()
            } else {
                format!("%{b:02X}")
            }
        })
        .collect();

    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}

impl IntoResponse for TextDownload {
    fn into_response(self) -> Response {
        let disposition = match HeaderValue::from_str(&content_disposition(&self.filename)) {
            Ok(value) => value,
            Err(e) => {
                return TranscriptorError::Internal(format!("Invalid download filename: {e}"))
                    .into_response()
            }
        };

        (
            StatusCode::OK,
            [
                (
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("text/plain; charset=utf-8"),
                ),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            self.content,
        )
            .into_response()
    }
}
