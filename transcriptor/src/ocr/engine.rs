use thiserror::Error;

use super::DecodedImage;

/// Shown next to [`EngineError::NotAvailable`] so the operator knows what to fix.
pub const ENGINE_REMEDIATION: &str = "Make sure Tesseract and the language data for the selected \
language are installed (e.g. `apt-get install tesseract-ocr tesseract-ocr-spa`), or point \
OCR_DATA_PATH / TESSDATA_PREFIX at a directory containing the .traineddata files.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The engine or the requested language model could not be loaded.
    #[error("OCR engine not available: {0}")]
    NotAvailable(String),

    /// Anything that went wrong once the engine was running.
    #[error("OCR engine failed: {0}")]
    Runtime(String),
}

/// A text recognition engine.
///
/// Calls are blocking and may take seconds for large images; async callers
/// go through [`super::OcrProvider`], which moves them onto the blocking pool.
pub trait OcrEngine: Send + Sync {
    /// Short identifier used in logs and health output.
    fn name(&self) -> &'static str;

    /// Recognize the text in `image` using the model for `language_code`.
    ///
    /// An image without text is a successful, empty (or whitespace-only) result.
    fn recognize(&self, image: &DecodedImage, language_code: &str) -> Result<String, EngineError>;

    /// Check that the engine can serve `language_code` without running recognition.
    fn probe(&self, language_code: &str) -> Result<(), EngineError> {
        let _ = language_code;
        Ok(())
    }
}
