use serde::{Deserialize, Serialize};

/// A recognition language offered to the user.
///
/// The set is closed: every value maps to exactly one Tesseract language
/// code, and nothing outside this list can be selected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    Spanish,
    English,
}

impl Language {
    /// Options in the order they are presented.
    pub const ALL: [Language; 2] = [Language::Spanish, Language::English];

    /// Tesseract language code passed to the engine.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Spanish => "spa",
            Self::English => "eng",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Spanish => "Spanish",
            Self::English => "English",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    /// Accepts either the display name or the engine code of an option.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|lang| {
                lang.code().eq_ignore_ascii_case(wanted)
                    || lang.display_name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| {
                let options = Self::ALL
                    .iter()
                    .map(|lang| format!("{} ({})", lang.display_name(), lang.code()))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("Unknown language '{wanted}', expected one of: {options}")
            })
    }
}
