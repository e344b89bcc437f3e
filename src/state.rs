//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::detect::{LinguaDetector, SourceDetector};
use crate::ocr::{OcrSelector, TesseractEngine};
use crate::pdf::PdftoppmRasterizer;
use crate::translate::{build_providers, ProviderError, TranslationOrchestrator};

/// Error type for state initialization
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Failed to initialize translation providers: {0}")]
    Providers(#[from] ProviderError),
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    ocr: Arc<OcrSelector>,
    translator: TranslationOrchestrator,
    detector: Arc<dyn SourceDetector>,
}

impl AppState {
    /// Build engines and providers from configuration
    pub fn new(config: Config) -> Result<Self, StateError> {
        let engine = TesseractEngine::new(&config.ocr.tesseract_bin, config.engine_config());
        if !engine.is_available() {
            tracing::warn!(binary = %config.ocr.tesseract_bin, "Tesseract not found, OCR requests will fail");
        }

        let rasterizer = PdftoppmRasterizer::new(&config.ocr.pdftoppm_bin);
        if !rasterizer.is_available() {
            tracing::warn!(binary = %config.ocr.pdftoppm_bin, "pdftoppm not found, PDF uploads will fail");
        }

        let ocr = OcrSelector::new(Arc::new(engine), Arc::new(rasterizer), config.selector_config());

        let providers = build_providers(&config.translation.providers)?;
        let translator = TranslationOrchestrator::new(providers, config.translation.chain.clone());

        Ok(Self::from_parts(config, ocr, translator, Arc::new(LinguaDetector::new())))
    }

    /// Assemble state from pre-built components
    pub fn from_parts(
        config: Config,
        ocr: OcrSelector,
        translator: TranslationOrchestrator,
        detector: Arc<dyn SourceDetector>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                ocr: Arc::new(ocr),
                translator,
                detector,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Shared OCR selector, cloneable into blocking tasks
    pub fn ocr(&self) -> Arc<OcrSelector> {
        Arc::clone(&self.inner.ocr)
    }

    pub fn translator(&self) -> &TranslationOrchestrator {
        &self.inner.translator
    }

    /// Source-language detector, cloneable into blocking tasks
    pub fn detector(&self) -> Arc<dyn SourceDetector> {
        Arc::clone(&self.inner.detector)
    }
}
