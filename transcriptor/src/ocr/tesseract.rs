use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use leptess::LepTess;
use tracing::debug;

use super::engine::{EngineError, OcrEngine};
use super::DecodedImage;

/// Local Tesseract engine backed by `leptess`.
///
/// One `LepTess` instance is kept per language and reused; the lock also
/// keeps recognition calls from running in parallel.
pub struct TesseractEngine {
    data_path: Option<String>,
    instances: Mutex<HashMap<String, LepTess>>,
}

impl TesseractEngine {
    pub fn new(data_path: Option<String>) -> Self {
        Self {
            data_path,
            instances: Mutex::new(HashMap::new()),
        }
    }

    fn create(&self, language_code: &str) -> Result<LepTess, EngineError> {
        LepTess::new(self.data_path.as_deref(), language_code).map_err(|e| {
            EngineError::NotAvailable(format!(
                "Tesseract could not load language '{language_code}': {e}"
            ))
        })
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn recognize(&self, image: &DecodedImage, language_code: &str) -> Result<String, EngineError> {
        let png = image
            .to_png()
            .map_err(|e| EngineError::Runtime(format!("Failed to encode image: {e}")))?;

        let mut instances = self.instances.lock().unwrap_or_else(PoisonError::into_inner);
        if !instances.contains_key(language_code) {
            debug!(language = language_code, "Creating Tesseract instance");
            let lt = self.create(language_code)?;
            instances.insert(language_code.to_string(), lt);
        }
        let lt = instances
            .get_mut(language_code)
            .ok_or_else(|| EngineError::Runtime("Tesseract instance missing".to_string()))?;

        lt.set_image_from_mem(&png)
            .map_err(|e| EngineError::Runtime(format!("Failed to set image: {e}")))?;
        lt.get_utf8_text()
            .map_err(|e| EngineError::Runtime(format!("Failed to extract text: {e}")))
    }

    fn probe(&self, language_code: &str) -> Result<(), EngineError> {
        let mut instances = self.instances.lock().unwrap_or_else(PoisonError::into_inner);
        if !instances.contains_key(language_code) {
            let lt = self.create(language_code)?;
            instances.insert(language_code.to_string(), lt);
        }
        Ok(())
    }
}
