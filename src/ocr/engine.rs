//! Recognition engines
//!
//! Defines the engine trait and the Tesseract implementation that drives the
//! `tesseract` command-line tool.

use std::path::PathBuf;
use std::process::Command;

use image::GrayImage;

use super::types::{EngineConfig, OcrError};

/// Text recognition engine
///
/// Implementations must be reentrant: one engine is shared by every request.
pub trait RecognitionEngine: Send + Sync {
    /// Engine name for logs
    fn name(&self) -> &'static str;

    /// Recognize text in `image` under a language hypothesis such as
    /// `"eng"` or `"eng+hin"`
    fn recognize(&self, image: &GrayImage, hypothesis: &str) -> Result<String, OcrError>;
}

/// Tesseract OCR engine (local binary)
pub struct TesseractEngine {
    /// Path or name of the tesseract binary
    binary: String,
    /// Engine mode and page segmentation
    config: EngineConfig,
}

impl TesseractEngine {
    pub fn new(binary: &str, config: EngineConfig) -> Self {
        Self {
            binary: binary.to_string(),
            config,
        }
    }

    /// Check if tesseract is installed
    pub fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn scratch_path() -> PathBuf {
        std::env::temp_dir().join(format!("ocr_input_{}.png", uuid::Uuid::new_v4()))
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new("tesseract", EngineConfig::default())
    }
}

impl RecognitionEngine for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn recognize(&self, image: &GrayImage, hypothesis: &str) -> Result<String, OcrError> {
        let input_path = Self::scratch_path();
        image
            .save_with_format(&input_path, image::ImageFormat::Png)
            .map_err(|e| OcrError::unavailable(hypothesis, format!("failed to write temp image: {}", e)))?;

        // Output base "stdout" makes tesseract print the text instead of writing a file
        let output = Command::new(&self.binary)
            .arg(&input_path)
            .arg("stdout")
            .arg("-l")
            .arg(hypothesis)
            .arg("--oem")
            .arg(self.config.oem.to_string())
            .arg("--psm")
            .arg(self.config.psm.to_string())
            .output();

        let _ = std::fs::remove_file(&input_path);

        let output = output
            .map_err(|e| OcrError::unavailable(hypothesis, format!("failed to run tesseract: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::unavailable(
                hypothesis,
                format!("tesseract exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Scripted engine for tests: returns canned text per hypothesis and fails
/// for hypotheses it does not know.
#[cfg(test)]
#[derive(Default)]
pub struct MockEngine {
    pub responses: std::collections::HashMap<String, String>,
    /// Hypotheses in call order
    pub calls: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockEngine {
    pub fn new<'a>(responses: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            responses: responses
                .into_iter()
                .map(|(h, t)| (h.to_string(), t.to_string()))
                .collect(),
            calls: Default::default(),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl RecognitionEngine for MockEngine {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn recognize(&self, _image: &GrayImage, hypothesis: &str) -> Result<String, OcrError> {
        self.calls.lock().unwrap().push(hypothesis.to_string());
        self.responses
            .get(hypothesis)
            .cloned()
            .ok_or_else(|| OcrError::unavailable(hypothesis, "no traineddata"))
    }
}
