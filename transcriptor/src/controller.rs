//! Interaction flow of the transcriptor page.
//!
//! Every operation takes the caller's [`Session`] by value and returns the
//! updated one. Nothing here touches HTTP or the session store.

use std::sync::Arc;

use axum::body::Bytes;
use tracing::{info, warn};

use crate::error::{Result, TranscriptorError};
use crate::models::{ExtractedText, Language, UploadedImage};
use crate::ocr::{decode_as, decode_image, EngineError, OcrProvider, Recognition};
use crate::session::{Notice, Session};

pub const MSG_DECODE_FAILED: &str =
    "Could not open the image file. Are you sure it is a valid format?";
pub const MSG_NO_UPLOAD: &str = "Upload an image before extracting text.";
pub const MSG_EMPTY_RESULT: &str = "No text could be extracted from the image, or the text is empty.";
pub const MSG_ENGINE_MISSING: &str =
    "Tesseract error: the OCR engine is not installed or cannot be found.";
pub const MSG_ENGINE_FAILED: &str = "An unexpected error occurred during OCR.";
pub const MSG_NOTHING_TO_DOWNLOAD: &str = "There is no extracted text to download.";

/// A text file ready to be sent to the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDownload {
    pub filename: String,
    pub content: String,
}

pub fn select_language(mut session: Session, language: Language) -> Session {
    session.language = language;
    session
}

/// Decode a new upload. It replaces the previous image whether or not it
/// decodes; a failure is reported and nothing else happens.
pub fn upload(mut session: Session, filename: &str, bytes: Bytes) -> Session {
    session.upload = None;

    match decode_image(filename, &bytes) {
        Ok(image) => {
            let (width, height) = image.dimensions();
            info!(
                session = %session.id,
                filename,
                width,
                height,
                bytes = bytes.len(),
                "Image uploaded"
            );
            session.upload = Some(UploadedImage::new(filename, bytes, &image));
            session.notice = None;
        }
        Err(e) => {
            warn!(session = %session.id, filename, "Rejected upload: {}", e);
            session.notice = Some(Notice::error(MSG_DECODE_FAILED, Some(e.to_string())));
        }
    }

    session
}

/// Run OCR on the uploaded image with the session's language.
///
/// Non-empty text replaces the stored text, an empty result clears it, and
/// a failure leaves it untouched.
pub async fn extract(mut session: Session, ocr: &OcrProvider) -> Session {
    let Some(upload) = session.upload.as_ref() else {
        session.notice = Some(Notice::error(MSG_NO_UPLOAD, None));
        return session;
    };

    let source_filename = upload.filename.clone();
    let language = session.language;

    let image = match decode_as(&upload.bytes, upload.format) {
        Ok(image) => image,
        Err(e) => {
            warn!(session = %session.id, filename = %source_filename, "Stored upload no longer decodes: {}", e);
            session.notice = Some(Notice::error(MSG_DECODE_FAILED, Some(e.to_string())));
            return session;
        }
    };

    match ocr.recognize(Arc::new(image), language).await {
        Ok(Recognition::Text(text)) => {
            session.extracted = Some(ExtractedText {
                text,
                source_filename,
                language,
            });
            session.notice = None;
        }
        Ok(Recognition::Empty) => {
            session.extracted = None;
            session.notice = Some(Notice::Warning(MSG_EMPTY_RESULT.to_string()));
        }
        Err(e) => {
            warn!(session = %session.id, language = language.code(), "OCR failed: {}", e);
            session.notice = Some(engine_notice(&e));
        }
    }

    session
}

/// Error notice for a failed engine call.
pub fn engine_notice(err: &EngineError) -> Notice {
    match err {
        EngineError::NotAvailable(reason) => Notice::error(
            MSG_ENGINE_MISSING,
            Some(format!("{} {reason}", crate::ocr::ENGINE_REMEDIATION)),
        ),
        EngineError::Runtime(message) => Notice::error(MSG_ENGINE_FAILED, Some(message.clone())),
    }
}

/// Export the text currently shown in the review step, edits included.
///
/// Refused while there is no extracted text, even if an image is loaded.
pub fn download(mut session: Session, current_text: String) -> (Session, Result<TextDownload>) {
    let Some(extracted) = session.extracted.as_mut() else {
        return (
            session,
            Err(TranscriptorError::Conflict(MSG_NOTHING_TO_DOWNLOAD.to_string())),
        );
    };

    extracted.text = current_text.clone();
    let download = TextDownload {
        filename: extracted.download_filename(),
        content: current_text,
    };
    (session, Ok(download))
}

/// Forget the upload and any extracted text; the language choice stays.
pub fn reset(mut session: Session) -> Session {
    session.upload = None;
    session.extracted = None;
    session.notice = None;
    session
}
