//! Candidate runner
//!
//! Runs one recognition call per language hypothesis. A failing hypothesis is
//! skipped, never retried.

use std::sync::Arc;

use image::GrayImage;

use super::engine::RecognitionEngine;
use super::types::RecognizedText;

pub struct CandidateRunner {
    engine: Arc<dyn RecognitionEngine>,
}

impl CandidateRunner {
    pub fn new(engine: Arc<dyn RecognitionEngine>) -> Self {
        Self { engine }
    }

    /// Recognize `image` under each hypothesis, in order.
    ///
    /// Returns trimmed text for every hypothesis whose call succeeded.
    pub fn recognize<S: AsRef<str>>(&self, image: &GrayImage, hypotheses: &[S]) -> Vec<RecognizedText> {
        let mut results = Vec::with_capacity(hypotheses.len());
        for hypothesis in hypotheses {
            let hypothesis = hypothesis.as_ref();
            match self.engine.recognize(image, hypothesis) {
                Ok(text) => results.push(RecognizedText {
                    hypothesis: hypothesis.to_string(),
                    text: text.trim().to_string(),
                }),
                Err(e) => {
                    tracing::debug!(
                        engine = self.engine.name(),
                        hypothesis = %hypothesis,
                        error = %e,
                        "Skipping OCR hypothesis"
                    );
                }
            }
        }
        results
    }
}
