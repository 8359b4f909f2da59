//! Per-session state.
//!
//! A [`Session`] is the whole context of one browser session. Handlers load
//! it from the [`SessionStore`], hand it by value to the controller, and
//! commit whatever comes back. Sessions never share data with each other.

mod store;

pub use store::{SessionStore, SessionSweeper};

use chrono::{DateTime, Utc};

use crate::models::{ExtractedText, Language, UploadedImage};

/// Message shown once on the next page render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error {
        message: String,
        detail: Option<String>,
    },
    Warning(String),
}

impl Notice {
    pub fn error(message: impl Into<String>, detail: Option<String>) -> Self {
        Self::Error {
            message: message.into(),
            detail,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub language: Language,
    pub upload: Option<UploadedImage>,
    pub extracted: Option<ExtractedText>,
    pub notice: Option<Notice>,
    pub last_active: DateTime<Utc>,
}

impl Session {
    pub fn new(id: impl Into<String>, language: Language) -> Self {
        Self {
            id: id.into(),
            language,
            upload: None,
            extracted: None,
            notice: None,
            last_active: Utc::now(),
        }
    }

    /// The text the review step shows, if there is one.
    pub fn extracted_text(&self) -> Option<&str> {
        self.extracted.as_ref().map(|e| e.text.as_str())
    }

    /// Download is offered only while non-empty extracted text exists.
    pub fn can_download(&self) -> bool {
        self.extracted.is_some()
    }

    /// True while nothing distinguishes this session from a fresh one.
    pub fn is_blank(&self, default_language: Language) -> bool {
        self.language == default_language
            && self.upload.is_none()
            && self.extracted.is_none()
            && self.notice.is_none()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }
}
