//! OCR Types
//!
//! Candidate results, per-page selections and error types for the
//! recognition pipeline.

use serde::Serialize;

use crate::script::Script;

/// Fixed engine configuration passed to every recognition call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// OCR engine mode (3 = default, LSTM when available)
    pub oem: u8,
    /// Page segmentation mode (6 = assume a single uniform block of text)
    pub psm: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { oem: 3, psm: 6 }
    }
}

/// Raw text recognized under one language hypothesis
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedText {
    pub hypothesis: String,
    pub text: String,
}

/// Scored OCR candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OcrCandidate {
    /// Language hypothesis given to the engine (e.g. `"eng+hin"`)
    pub hypothesis: String,
    /// Recognized text (trimmed)
    pub text: String,
    /// Script-aware quality score
    pub score: f64,
}

/// Outcome of the two-pass selection on one page
#[derive(Debug, Clone, Serialize)]
pub struct PageRecognition {
    /// Page index (0-indexed, document order)
    pub page_index: usize,
    /// Winning candidate, re-scored against the guessed script
    pub selected: OcrCandidate,
    /// Script guessed from the broad-pass winner
    pub script: Script,
    /// Whether the refinement pass produced the winner
    pub refined: bool,
}

/// Recognized text of a whole document
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentText {
    /// Newline-joined text of every page that yielded something
    pub text: String,
    /// Pages that contributed text
    pub pages: Vec<PageRecognition>,
    /// Number of pages processed (including empty ones)
    pub page_count: usize,
}

impl DocumentText {
    /// Nothing recoverable from any page
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// OCR error types
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("Recognition unavailable for hypothesis '{hypothesis}': {reason}")]
    RecognitionUnavailable { hypothesis: String, reason: String },

    #[error("Failed to decode image: {0}")]
    ImageDecode(String),

    #[error("Failed to rasterize document: {0}")]
    Rasterize(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl OcrError {
    pub fn unavailable(hypothesis: &str, reason: impl Into<String>) -> Self {
        Self::RecognitionUnavailable {
            hypothesis: hypothesis.to_string(),
            reason: reason.into(),
        }
    }
}
