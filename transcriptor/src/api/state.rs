use std::sync::Arc;

use crate::config::Config;
use crate::ocr::OcrProvider;
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub ocr: OcrProvider,
    /// One isolated [`crate::session::Session`] per browser session.
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Config, ocr: OcrProvider) -> Self {
        let sessions = SessionStore::new(&config.session, config.ocr.default_language);
        Self {
            config: Arc::new(config),
            ocr,
            sessions,
        }
    }
}
