//! OCR Module
//!
//! Recovers text from scanned pages by running several language hypotheses
//! through a recognition engine and keeping the output that looks most like
//! real text in the script it claims to be.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docbabel::ocr::{OcrSelector, OcrSelectorConfig, TesseractEngine};
//! use docbabel::pdf::PdftoppmRasterizer;
//!
//! let selector = OcrSelector::new(
//!     Arc::new(TesseractEngine::default()),
//!     Arc::new(PdftoppmRasterizer::default()),
//!     OcrSelectorConfig::default(),
//! );
//!
//! let document = selector.recognize_document(&bytes)?;
//! if document.is_empty() {
//!     // nothing recoverable
//! }
//! ```

mod engine;
mod preprocess;
mod runner;
mod selector;
mod types;

pub use engine::{RecognitionEngine, TesseractEngine};
pub use preprocess::{autocontrast, preprocess, UPSCALE_FACTOR, UPSCALE_THRESHOLD};
pub use runner::CandidateRunner;
pub use selector::{refinement_hypotheses, OcrSelector, OcrSelectorConfig, DEFAULT_CANDIDATES, DEFAULT_DPI};
pub use types::{DocumentText, EngineConfig, OcrCandidate, OcrError, PageRecognition, RecognizedText};

#[cfg(test)]
pub(crate) use engine::MockEngine;
