//! Script-aware OCR selection
//!
//! Two-pass best-of selection per page:
//!
//! 1. Broad pass over the multilingual candidate set, each output scored
//!    against its own hypothesis.
//! 2. Guess the dominant script of the broad-pass winner and re-run a
//!    narrowed set (`[script, eng+script]`, or `[eng]` for Latin).
//! 3. Re-score both winners against the guessed script; the refined result
//!    wins ties.
//!
//! Documents are processed page by page; a page without usable text is
//! skipped rather than failing the document.

use std::sync::Arc;

use image::{DynamicImage, GrayImage};

use crate::pdf::{self, PageRasterizer};
use crate::script::{guess_script, Script, ScriptScorer};

use super::engine::RecognitionEngine;
use super::preprocess::preprocess;
use super::runner::CandidateRunner;
use super::types::{DocumentText, OcrCandidate, OcrError, PageRecognition, RecognizedText};

/// Default broad-pass hypotheses: each supported script alone plus common
/// Latin pairings
pub const DEFAULT_CANDIDATES: &[&str] = &["eng", "hin", "tam", "spa", "eng+hin", "eng+tam", "eng+spa"];

/// Default rasterization resolution for PDF pages
pub const DEFAULT_DPI: u32 = 300;

/// OCR selector configuration
#[derive(Debug, Clone)]
pub struct OcrSelectorConfig {
    /// Broad-pass hypotheses, in order
    pub candidates: Vec<String>,
    /// Resolution used when rasterizing PDF pages
    pub dpi: u32,
}

impl Default for OcrSelectorConfig {
    fn default() -> Self {
        Self {
            candidates: DEFAULT_CANDIDATES.iter().map(|c| c.to_string()).collect(),
            dpi: DEFAULT_DPI,
        }
    }
}

pub struct OcrSelector {
    runner: CandidateRunner,
    scorer: ScriptScorer,
    rasterizer: Arc<dyn PageRasterizer>,
    config: OcrSelectorConfig,
}

impl OcrSelector {
    pub fn new(
        engine: Arc<dyn RecognitionEngine>,
        rasterizer: Arc<dyn PageRasterizer>,
        config: OcrSelectorConfig,
    ) -> Self {
        Self {
            runner: CandidateRunner::new(engine),
            scorer: ScriptScorer::default(),
            rasterizer,
            config,
        }
    }

    /// Use a custom scorer (alternate weights)
    pub fn with_scorer(mut self, scorer: ScriptScorer) -> Self {
        self.scorer = scorer;
        self
    }

    /// Recognize an uploaded document: PDFs are rasterized page by page,
    /// anything else is decoded as a single image.
    ///
    /// An empty [`DocumentText`] means nothing was recoverable; deciding
    /// whether that is an error is left to the caller.
    pub fn recognize_document(&self, bytes: &[u8]) -> Result<DocumentText, OcrError> {
        let pages = if pdf::is_pdf(bytes) {
            self.rasterizer.rasterize(bytes, self.config.dpi)?
        } else {
            let image = image::load_from_memory(bytes).map_err(|e| OcrError::ImageDecode(e.to_string()))?;
            vec![image]
        };
        Ok(self.recognize_pages(&pages))
    }

    /// Run the two-pass selection over every page, in order
    pub fn recognize_pages(&self, pages: &[DynamicImage]) -> DocumentText {
        let mut recognized = Vec::new();
        for (index, page) in pages.iter().enumerate() {
            match self.recognize_page(index, page) {
                Some(result) => recognized.push(result),
                None => tracing::warn!(page = index, "No usable text recognized on page"),
            }
        }

        let text = recognized
            .iter()
            .map(|p| p.selected.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        tracing::info!(
            pages = pages.len(),
            recognized = recognized.len(),
            chars = text.chars().count(),
            "OCR finished"
        );

        DocumentText {
            text,
            pages: recognized,
            page_count: pages.len(),
        }
    }

    /// Two-pass selection on one raster page
    pub fn recognize_page(&self, page_index: usize, page: &DynamicImage) -> Option<PageRecognition> {
        let image = preprocess(page);
        let result = self.select(&image)?;
        Some(PageRecognition { page_index, ..result })
    }

    /// Two-pass selection on an already preprocessed image
    pub fn select(&self, image: &GrayImage) -> Option<PageRecognition> {
        let first_pass = self.best_of(&self.runner.recognize(image, self.config.candidates.as_slice()));

        let guessed = first_pass
            .as_ref()
            .map(|c| guess_script(&c.text))
            .unwrap_or_default();
        let refine_set = refinement_hypotheses(guessed);
        let refined = self.best_of(&self.runner.recognize(image, refine_set.as_slice()));

        let hint = guessed.tesseract_code();
        let rescore = |c: OcrCandidate| OcrCandidate {
            score: self.scorer.score(&c.text, hint),
            ..c
        };

        let (selected, refined_won) = match (first_pass.map(rescore), refined.map(rescore)) {
            (Some(first), Some(refined)) if refined.score >= first.score => (refined, true),
            (Some(first), _) => (first, false),
            (None, Some(refined)) => (refined, true),
            (None, None) => return None,
        };

        tracing::debug!(
            script = %guessed,
            hypothesis = %selected.hypothesis,
            score = selected.score,
            refined = refined_won,
            "OCR candidate selected"
        );

        if selected.text.is_empty() {
            return None;
        }

        Some(PageRecognition {
            page_index: 0,
            selected,
            script: guessed,
            refined: refined_won,
        })
    }

    /// Highest-scoring candidate; the earliest wins on equal scores
    fn best_of(&self, recognized: &[RecognizedText]) -> Option<OcrCandidate> {
        let mut best: Option<OcrCandidate> = None;
        for candidate in recognized {
            let score = self.scorer.score(&candidate.text, &candidate.hypothesis);
            tracing::trace!(hypothesis = %candidate.hypothesis, score, "Scored OCR candidate");
            if best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(OcrCandidate {
                    hypothesis: candidate.hypothesis.clone(),
                    text: candidate.text.clone(),
                    score,
                });
            }
        }
        best
    }
}

/// Narrowed hypothesis set for a guessed script
pub fn refinement_hypotheses(script: Script) -> Vec<String> {
    let latin = Script::Latin.tesseract_code();
    if script.is_default() {
        vec![latin.to_string()]
    } else {
        let code = script.tesseract_code();
        vec![code.to_string(), format!("{}+{}", latin, code)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::engine::MockEngine;
    use image::{Luma, Rgb, RgbImage};

    /// Rasterizer that hands back prepared pages
    struct StaticPages(Vec<DynamicImage>);

    impl PageRasterizer for StaticPages {
        fn rasterize(&self, _document: &[u8], _dpi: u32) -> Result<Vec<DynamicImage>, OcrError> {
            Ok(self.0.clone())
        }
    }

    fn build(engine: MockEngine) -> (OcrSelector, Arc<MockEngine>) {
        let engine = Arc::new(engine);
        let selector = OcrSelector::new(
            engine.clone(),
            Arc::new(StaticPages(vec![page(), page()])),
            OcrSelectorConfig::default(),
        );
        (selector, engine)
    }

    fn page() -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_pixel(16, 16, Luma([255])))
    }

    fn blank() -> GrayImage {
        GrayImage::from_pixel(4, 4, Luma([255]))
    }

    #[test]
    fn test_refinement_hypotheses() {
        assert_eq!(refinement_hypotheses(Script::Latin), vec!["eng"]);
        assert_eq!(refinement_hypotheses(Script::Devanagari), vec!["hin", "eng+hin"]);
        assert_eq!(refinement_hypotheses(Script::Tamil), vec!["tam", "eng+tam"]);
    }

    #[test]
    fn test_latin_document_runs_broad_then_eng() {
        let (selector, engine) = build(MockEngine::new([
            ("eng", "The quick brown fox"),
            ("spa", "Th3 qu1ck br0wn f0x"),
        ]));

        let result = selector.select(&blank()).unwrap();

        assert_eq!(result.script, Script::Latin);
        assert_eq!(result.selected.text, "The quick brown fox");
        // Identical refined output ties and wins
        assert!(result.refined);

        let calls = engine.calls();
        assert_eq!(&calls[..DEFAULT_CANDIDATES.len()], DEFAULT_CANDIDATES);
        assert_eq!(&calls[DEFAULT_CANDIDATES.len()..], &["eng"]);
    }

    #[test]
    fn test_noisy_latin_winner_overturned_by_tamil_refinement() {
        let eng_text = "Total 2024 amount 5512 due ப";
        let tam_text = "தமிழ் உரை ~~~ ### *** !!!";
        let (selector, engine) = build(MockEngine::new([
            ("eng", eng_text),
            ("tam", tam_text),
            ("eng+tam", tam_text),
        ]));

        let scorer = ScriptScorer::default();
        // The broad pass prefers the Latin reading...
        assert!(scorer.score(eng_text, "eng") > scorer.score(tam_text, "tam"));
        // ...but against a Tamil hint the Tamil reading is better
        assert!(scorer.score(tam_text, "tam") > scorer.score(eng_text, "tam"));

        let result = selector.select(&blank()).unwrap();

        assert_eq!(result.script, Script::Tamil);
        assert!(result.refined);
        assert_eq!(result.selected.hypothesis, "tam");
        assert_eq!(result.selected.text, tam_text);
        assert!((result.selected.score - scorer.score(tam_text, "tam")).abs() < 1e-9);

        let calls = engine.calls();
        assert_eq!(&calls[DEFAULT_CANDIDATES.len()..], &["tam", "eng+tam"]);
    }

    #[test]
    fn test_tie_between_passes_prefers_refined() {
        let good = "नमस्ते दुनिया यह एक परीक्षण है";
        let (selector, _) = build(MockEngine::new([
            ("eng+hin", good),
            // refinement runs "hin" and "eng+hin" again; make "hin" worse but
            // keep "eng+hin" identical so the tie goes to refined
            ("hin", "न ~~ ## ~~ ##"),
        ]));

        let result = selector.select(&blank()).unwrap();
        assert_eq!(result.script, Script::Devanagari);
        assert_eq!(result.selected.text, good);
        assert_eq!(result.selected.hypothesis, "eng+hin");
        assert!(result.refined);
    }

    #[test]
    fn test_refined_loses_when_strictly_worse() {
        // Engine that answers differently on the second call for "eng"
        struct Flaky(std::sync::Mutex<u32>);
        impl RecognitionEngine for Flaky {
            fn name(&self) -> &'static str {
                "flaky"
            }
            fn recognize(&self, _image: &GrayImage, hypothesis: &str) -> Result<String, OcrError> {
                if hypothesis != "eng" {
                    return Err(OcrError::unavailable(hypothesis, "unsupported"));
                }
                let mut calls = self.0.lock().unwrap();
                *calls += 1;
                Ok(if *calls == 1 { "clean latin text" } else { "~~ #" }.to_string())
            }
        }

        let selector = OcrSelector::new(
            Arc::new(Flaky(std::sync::Mutex::new(0))),
            Arc::new(StaticPages(vec![])),
            OcrSelectorConfig::default(),
        );
        let result = selector.select(&blank()).unwrap();
        assert!(!result.refined);
        assert_eq!(result.selected.text, "clean latin text");
    }

    #[test]
    fn test_nothing_recognized() {
        let (selector, _) = build(MockEngine::default());
        assert!(selector.select(&blank()).is_none());

        let (selector, _) = selector_with_blank_text();
        assert!(selector.select(&blank()).is_none());
    }

    fn selector_with_blank_text() -> (OcrSelector, Arc<MockEngine>) {
        build(MockEngine::new([("eng", "   "), ("hin", "\n")]))
    }

    #[test]
    fn test_pdf_pages_joined_in_order() {
        let (selector, _) = build(MockEngine::new([("eng", "page text")]));
        let doc = selector.recognize_document(b"%PDF-1.4 fake").unwrap();
        assert_eq!(doc.page_count, 2);
        assert_eq!(doc.pages.len(), 2);
        assert_eq!(doc.pages[1].page_index, 1);
        assert_eq!(doc.text, "page text\npage text");
    }

    #[test]
    fn test_empty_pages_contribute_nothing() {
        let (selector, _) = build(MockEngine::default());
        let doc = selector.recognize_pages(&[page(), page(), page()]);
        assert!(doc.is_empty());
        assert_eq!(doc.page_count, 3);
        assert!(doc.pages.is_empty());
    }

    #[test]
    fn test_image_bytes_are_decoded() {
        let (selector, _) = build(MockEngine::new([("eng", "from png")]));
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([255, 255, 255])));
        let mut png = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let doc = selector.recognize_document(&png).unwrap();
        assert_eq!(doc.text, "from png");
        assert_eq!(doc.page_count, 1);
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let (selector, _) = build(MockEngine::default());
        assert!(matches!(
            selector.recognize_document(b"not an image"),
            Err(OcrError::ImageDecode(_))
        ));
    }
}
