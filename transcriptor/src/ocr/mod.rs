//! OCR (Optical Character Recognition) Module
//!
//! Turns uploaded image bytes into text.
//!
//! # Architecture
//!
//! - `loader` decodes uploads (PNG, JPEG, BMP, TIFF) into a [`DecodedImage`]
//! - `OcrEngine` is the narrow seam to the recognizer:
//!   `recognize(image, language_code) -> Result<String, EngineError>`
//! - `TesseractEngine` implements it locally via leptess
//! - `OcrProvider` owns the engine (or the reason it is unavailable), runs
//!   calls on the blocking pool and classifies results as text or empty
//!
//! # Configuration
//!
//! Controlled via `OcrConfig` (see `config.rs`):
//! - `data_path`: tessdata directory, defaults to Tesseract's own lookup
//! - `default_language`: language preselected for new sessions
//!
//! # Usage
//!
//! ```rust,ignore
//! let ocr = OcrProvider::new(&config.ocr);
//! let image = decode_image("receipt.png", &bytes)?;
//! let result = ocr.recognize(Arc::new(image), Language::English).await?;
//! ```

mod engine;
mod loader;
mod provider;
mod tesseract;

pub use engine::{EngineError, OcrEngine, ENGINE_REMEDIATION};
pub use loader::{
    check_extension, decode_as, decode_image, DecodeError, DecodedImage, SupportedFormat,
    SUPPORTED_EXTENSIONS,
};
pub use provider::{OcrProvider, Recognition};
pub use tesseract::TesseractEngine;
