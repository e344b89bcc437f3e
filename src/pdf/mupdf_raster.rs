//! MuPDF backend
//!
//! Renders pages in-process. MuPDF documents are not thread-safe, so each
//! call opens its own document and drops it before returning.

use image::{DynamicImage, RgbImage};
use mupdf::{Colorspace, Document, Matrix};

use super::PageRasterizer;
use crate::ocr::OcrError;

/// PDF user space is 72 points per inch
const POINTS_PER_INCH: f32 = 72.0;

#[derive(Default)]
pub struct MupdfRasterizer;

impl MupdfRasterizer {
    pub fn new() -> Self {
        Self
    }
}

impl PageRasterizer for MupdfRasterizer {
    fn rasterize(&self, document: &[u8], dpi: u32) -> Result<Vec<DynamicImage>, OcrError> {
        let doc = Document::from_bytes(document, "application/pdf").map_err(mupdf_error)?;
        let page_count = doc.page_count().map_err(mupdf_error)?;

        let scale = dpi as f32 / POINTS_PER_INCH;
        let matrix = Matrix::new_scale(scale, scale);
        let colorspace = Colorspace::device_rgb();

        let mut pages = Vec::with_capacity(page_count.max(0) as usize);
        let mut last_error = None;
        for index in 0..page_count {
            let rendered = doc
                .load_page(index)
                .and_then(|page| page.to_pixmap(&matrix, &colorspace, false, false))
                .map_err(mupdf_error)
                .and_then(|pixmap| pixmap_to_image(&pixmap));
            match rendered {
                Ok(image) => pages.push(image),
                Err(e) => {
                    tracing::warn!(page = index, error = %e, "Skipping page that failed to render");
                    last_error = Some(e);
                }
            }
        }

        if let Some(e) = last_error.filter(|_| pages.is_empty()) {
            return Err(e);
        }

        tracing::debug!(pages = pages.len(), dpi, "Rasterized PDF with MuPDF");
        Ok(pages)
    }
}

fn pixmap_to_image(pixmap: &mupdf::Pixmap) -> Result<DynamicImage, OcrError> {
    let width = pixmap.width() as u32;
    let height = pixmap.height() as u32;
    let samples = pixmap.samples();
    let n = pixmap.n() as usize;

    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height as usize {
        for x in 0..width as usize {
            let offset = (y * width as usize + x) * n;
            let r = samples.get(offset).copied().unwrap_or(255);
            let g = samples.get(offset + 1).copied().unwrap_or(r);
            let b = samples.get(offset + 2).copied().unwrap_or(r);
            rgb.extend_from_slice(&[r, g, b]);
        }
    }

    RgbImage::from_raw(width, height, rgb)
        .map(DynamicImage::ImageRgb8)
        .ok_or_else(|| OcrError::Rasterize("Failed to create page image buffer".to_string()))
}

fn mupdf_error(err: mupdf::Error) -> OcrError {
    OcrError::Rasterize(err.to_string())
}
