//! poppler `pdftoppm` backend

use std::path::{Path, PathBuf};
use std::process::Command;

use image::DynamicImage;

use super::PageRasterizer;
use crate::ocr::OcrError;

/// Output file prefix; pdftoppm appends `-<page>.png`
const PAGE_PREFIX: &str = "page";

/// Rasterizer that shells out to `pdftoppm -r <dpi> -png`
pub struct PdftoppmRasterizer {
    binary: String,
}

impl PdftoppmRasterizer {
    pub fn new(binary: &str) -> Self {
        Self {
            binary: binary.to_string(),
        }
    }

    /// Check if pdftoppm is installed
    pub fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("-v")
            .output()
            .is_ok()
    }
}

impl Default for PdftoppmRasterizer {
    fn default() -> Self {
        Self::new("pdftoppm")
    }
}

/// Scratch directory removed on drop
struct ScratchDir(PathBuf);

impl ScratchDir {
    fn create() -> std::io::Result<Self> {
        let path = std::env::temp_dir().join(format!("pdf_pages_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&path)?;
        Ok(Self(path))
    }

    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

impl PageRasterizer for PdftoppmRasterizer {
    fn rasterize(&self, document: &[u8], dpi: u32) -> Result<Vec<DynamicImage>, OcrError> {
        let scratch = ScratchDir::create()?;
        let input_path = scratch.path().join("input.pdf");
        std::fs::write(&input_path, document)?;

        let output = Command::new(&self.binary)
            .arg("-r")
            .arg(dpi.to_string())
            .arg("-png")
            .arg(&input_path)
            .arg(scratch.path().join(PAGE_PREFIX))
            .output()
            .map_err(|e| OcrError::Rasterize(format!("Failed to run pdftoppm: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Rasterize(format!(
                "pdftoppm exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let pages = collect_pages(scratch.path())?;
        tracing::debug!(pages = pages.len(), dpi, "Rasterized PDF with pdftoppm");
        Ok(pages)
    }
}

/// Load rendered pages in page order.
///
/// pdftoppm zero-pads page numbers to a common width, so name order is page
/// order. A page that fails to decode is skipped; only a document where no
/// rendered page decodes is an error.
fn collect_pages(dir: &Path) -> Result<Vec<DynamicImage>, OcrError> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension().map_or(false, |ext| ext == "png")
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map_or(false, |n| n.starts_with(PAGE_PREFIX))
        })
        .collect();
    files.sort();

    let mut pages = Vec::with_capacity(files.len());
    let mut last_error = None;
    for path in &files {
        match image::open(path) {
            Ok(page) => pages.push(page),
            Err(e) => {
                tracing::warn!(page = %path.display(), error = %e, "Skipping undecodable rendered page");
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) if pages.is_empty() => Err(OcrError::ImageDecode(format!(
            "None of {} rendered page(s) could be decoded: {}",
            files.len(),
            e
        ))),
        _ => Ok(pages),
    }
}
