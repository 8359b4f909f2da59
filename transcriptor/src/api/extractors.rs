use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::error::{Result, TranscriptorError};
use crate::models::Language;

pub const SESSION_COOKIE: &str = "transcriptor_session";

pub fn session_id(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|c| c.value().to_string())
}

pub fn session_cookie(id: &str) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Fields of an upload form: `file` plus an optional `language`.
#[derive(Debug)]
pub struct UploadForm {
    pub filename: String,
    pub bytes: Bytes,
    pub language: Option<Language>,
}

fn multipart_error(context: &str, e: MultipartError) -> TranscriptorError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        TranscriptorError::PayloadTooLarge(format!("{context}: {}", e.body_text()))
    } else {
        TranscriptorError::Validation(format!("{context}: {}", e.body_text()))
    }
}

pub async fn read_upload_form(multipart: &mut Multipart) -> Result<UploadForm> {
    let mut file: Option<(String, Bytes)> = None;
    let mut language: Option<Language> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Invalid upload", e))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error("Failed to read file", e))?;
                file = Some((filename, bytes));
            }
            "language" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| multipart_error("Failed to read language", e))?;
                if !value.trim().is_empty() {
                    language = Some(value.parse().map_err(TranscriptorError::Validation)?);
                }
            }
            _ => {}
        }
    }

    let (filename, bytes) = file
        .ok_or_else(|| TranscriptorError::Validation("Missing 'file' field".to_string()))?;

    // Browsers submit an empty, unnamed part when no file was picked.
    if filename.trim().is_empty() && bytes.is_empty() {
        return Err(TranscriptorError::Validation(
            "Choose an image to upload".to_string(),
        ));
    }

    Ok(UploadForm {
        filename,
        bytes,
        language,
    })
}
