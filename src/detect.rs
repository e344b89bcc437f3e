//! Source-language detection
//!
//! Recognized text carries no language tag. Detection feeds the translation
//! chain's explicit-source stage; a text that cannot be classified yields
//! `None` and the chain runs in auto mode.

use lingua::{Language, LanguageDetector, LanguageDetectorBuilder};

/// Languages the OCR pipeline reads, plus common Latin-script neighbours
const SUPPORTED: &[Language] = &[
    Language::English,
    Language::Hindi,
    Language::Marathi,
    Language::Tamil,
    Language::Spanish,
    Language::French,
    Language::German,
    Language::Portuguese,
    Language::Italian,
];

/// Guess the ISO 639-1 code of a text
pub trait SourceDetector: Send + Sync {
    fn detect(&self, text: &str) -> Option<String>;
}

/// Statistical detector over [`SUPPORTED`]; models load on first use
pub struct LinguaDetector {
    detector: LanguageDetector,
}

impl LinguaDetector {
    pub fn new() -> Self {
        Self {
            detector: LanguageDetectorBuilder::from_languages(SUPPORTED).build(),
        }
    }
}

impl Default for LinguaDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceDetector for LinguaDetector {
    fn detect(&self, text: &str) -> Option<String> {
        let text = text.trim();
        if !text.chars().any(char::is_alphabetic) {
            return None;
        }

        let detected = self.detector.detect_language_of(text);
        match detected {
            Some(language) => {
                let code = language.iso_code_639_1().to_string();
                tracing::debug!(language = %code, chars = text.chars().count(), "Detected source language");
                Some(code)
            }
            None => {
                tracing::debug!("Source language undetermined");
                None
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Detector returning a fixed answer
    pub struct FixedDetector(pub Option<&'static str>);

    impl SourceDetector for FixedDetector {
        fn detect(&self, _text: &str) -> Option<String> {
            self.0.map(String::from)
        }
    }
}
