use axum::body::Bytes;

use super::Language;
use crate::ocr::{DecodedImage, SupportedFormat};

/// Prefix of every downloaded text file.
pub const DOWNLOAD_PREFIX: &str = "texto_extraido_";

/// Reduce a client supplied filename to a bare name that is safe inside a
/// `Content-Disposition` header.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .filter(|c| !c.is_control() && *c != '"')
        .collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned.to_string()
    }
}

/// `receipt.png` -> `texto_extraido_receipt.png.txt`
pub fn download_filename(original: &str) -> String {
    format!("{DOWNLOAD_PREFIX}{}.txt", sanitize_filename(original))
}

/// The image most recently uploaded in a session. Only the encoded bytes
/// are kept; extraction decodes them again using the sniffed `format`.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: String,
    pub bytes: Bytes,
    pub format: SupportedFormat,
    pub width: u32,
    pub height: u32,
}

impl UploadedImage {
    pub fn new(filename: &str, bytes: Bytes, image: &DecodedImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            filename: sanitize_filename(filename),
            bytes,
            format: image.format(),
            width,
            height,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Text produced by a successful extraction. `text` follows the user's
/// edits; `source_filename` is the upload it was extracted from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    pub source_filename: String,
    pub language: Language,
}

impl ExtractedText {
    pub fn download_filename(&self) -> String {
        download_filename(&self.source_filename)
    }
}
