use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::config::OcrConfig;
use crate::models::Language;

use super::engine::{EngineError, OcrEngine};
use super::tesseract::TesseractEngine;
use super::DecodedImage;

/// Outcome of a recognition call that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recognition {
    Text(String),
    /// The engine ran but found no text (blank or whitespace-only output).
    Empty,
}

#[derive(Clone)]
enum OcrBackend {
    Local {
        engine: Arc<dyn OcrEngine>,
        languages: Vec<Language>,
    },
    Unavailable {
        reason: String,
    },
}

#[derive(Clone)]
pub struct OcrProvider {
    backend: OcrBackend,
}

impl OcrProvider {
    /// Build the Tesseract-backed provider described by `config`.
    pub fn new(config: &OcrConfig) -> Self {
        Self::with_engine(Arc::new(TesseractEngine::new(config.data_path.clone())))
    }

    /// Wrap an arbitrary engine, probing every offered language.
    ///
    /// The provider is usable as long as at least one language loads;
    /// requests for a missing language still fail with `NotAvailable`.
    pub fn with_engine(engine: Arc<dyn OcrEngine>) -> Self {
        let mut languages = Vec::new();
        let mut failures = Vec::new();

        for language in Language::ALL {
            match engine.probe(language.code()) {
                Ok(()) => languages.push(language),
                Err(e) => {
                    warn!(engine = engine.name(), language = language.code(), "{}", e);
                    failures.push(e.to_string());
                }
            }
        }

        if languages.is_empty() {
            let reason = failures.join("; ");
            warn!("OCR engine unavailable: {}", reason);
            return Self::unavailable(reason);
        }

        info!(
            engine = engine.name(),
            languages = ?languages.iter().map(Language::code).collect::<Vec<_>>(),
            "OCR engine initialized"
        );
        Self {
            backend: OcrBackend::Local { engine, languages },
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            backend: OcrBackend::Unavailable {
                reason: reason.into(),
            },
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.backend, OcrBackend::Unavailable { .. })
    }

    pub fn engine_name(&self) -> Option<&'static str> {
        match &self.backend {
            OcrBackend::Local { engine, .. } => Some(engine.name()),
            OcrBackend::Unavailable { .. } => None,
        }
    }

    /// Languages whose model loaded at startup.
    pub fn available_languages(&self) -> &[Language] {
        match &self.backend {
            OcrBackend::Local { languages, .. } => languages,
            OcrBackend::Unavailable { .. } => &[],
        }
    }

    pub fn unavailable_reason(&self) -> Option<&str> {
        match &self.backend {
            OcrBackend::Local { .. } => None,
            OcrBackend::Unavailable { reason } => Some(reason),
        }
    }

    /// Run recognition on the blocking pool and classify the result.
    ///
    /// There is no timeout: the call lasts as long as the engine needs.
    pub async fn recognize(
        &self,
        image: Arc<DecodedImage>,
        language: Language,
    ) -> Result<Recognition, EngineError> {
        let engine = match &self.backend {
            OcrBackend::Local { engine, .. } => Arc::clone(engine),
            OcrBackend::Unavailable { reason } => {
                return Err(EngineError::NotAvailable(reason.clone()))
            }
        };

        let started = Instant::now();
        let (width, height) = image.dimensions();
        let text = tokio::task::spawn_blocking(move || engine.recognize(&image, language.code()))
            .await
            .map_err(|e| EngineError::Runtime(format!("OCR task panicked: {e}")))??;

        info!(
            language = language.code(),
            width,
            height,
            chars = text.chars().count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "OCR completed"
        );

        if text.trim().is_empty() {
            Ok(Recognition::Empty)
        } else {
            Ok(Recognition::Text(text))
        }
    }
}
