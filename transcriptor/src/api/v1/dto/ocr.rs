use serde::{Deserialize, Serialize};

/// Result of `POST /api/v1/ocr`.
///
/// Wire format:
/// ```json
/// {
///   "text": "Total: 12,50 €",
///   "empty": false,
///   "language": "spa",
///   "filename": "receipt.png",
///   "downloadFilename": "texto_extraido_receipt.png.txt"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OcrResponse {
    /// Recognized text exactly as the engine returned it; `""` when `empty`.
    pub text: String,
    /// The engine ran but found no text.
    pub empty: bool,
    pub language: String,
    /// Sanitized name of the uploaded file.
    pub filename: String,
    /// Name the text would be saved under.
    pub download_filename: String,
}
