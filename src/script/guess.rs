//! Dominant-script guessing
//!
//! A presence test: a single Devanagari character classifies the whole text
//! as Devanagari, even inside otherwise Latin text. Devanagari is checked
//! before Tamil, Latin is the fallback.

use serde::Serialize;

use super::stats::{is_devanagari, is_tamil};

/// Writing systems the OCR pipeline distinguishes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    Devanagari,
    Tamil,
    #[default]
    Latin,
}

/// Language codes that map to the Devanagari script
const DEVANAGARI_CODES: &[&str] = &["hin", "mar", "nep", "san", "hi", "mr", "ne", "sa"];

/// Language codes that map to the Tamil script
const TAMIL_CODES: &[&str] = &["tam", "ta"];

impl Script {
    /// Tesseract traineddata code for this script's primary language
    pub fn tesseract_code(self) -> &'static str {
        match self {
            Self::Devanagari => "hin",
            Self::Tamil => "tam",
            Self::Latin => "eng",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Devanagari => "devanagari",
            Self::Tamil => "tamil",
            Self::Latin => "latin",
        }
    }

    pub fn is_default(self) -> bool {
        self == Self::Latin
    }

    /// Resolve the target script of a (possibly composite) language hint.
    ///
    /// `"eng+hin"` resolves to Devanagari: any Devanagari-family part wins,
    /// then any Tamil-family part, otherwise Latin.
    pub fn from_hint(hint: &str) -> Self {
        let hint = hint.to_ascii_lowercase();
        let parts = || hint.split('+').map(str::trim);
        if parts().any(|p| DEVANAGARI_CODES.contains(&p)) {
            Self::Devanagari
        } else if parts().any(|p| TAMIL_CODES.contains(&p)) {
            Self::Tamil
        } else {
            Self::Latin
        }
    }
}

impl std::fmt::Display for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Guess the dominant script of `text`
pub fn guess_script(text: &str) -> Script {
    if text.chars().any(is_devanagari) {
        Script::Devanagari
    } else if text.chars().any(is_tamil) {
        Script::Tamil
    } else {
        Script::Latin
    }
}
