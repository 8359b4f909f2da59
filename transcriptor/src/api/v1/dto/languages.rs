use serde::{Deserialize, Serialize};

use crate::models::Language;

/// One entry of the language selector.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LanguageOption {
    /// Display name, e.g. `"Spanish"`.
    pub name: String,
    /// Engine language code, e.g. `"spa"`.
    pub code: String,
    /// Whether the model for this language loaded at startup.
    pub available: bool,
}

impl LanguageOption {
    pub fn new(language: Language, available: bool) -> Self {
        Self {
            name: language.display_name().to_string(),
            code: language.code().to_string(),
            available,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LanguagesResponse {
    pub languages: Vec<LanguageOption>,
    /// Code preselected for new sessions.
    pub default: String,
}
