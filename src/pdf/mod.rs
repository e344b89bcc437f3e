//! PDF page rasterization
//!
//! Scanned PDFs carry their text as page images, so OCR needs each page as a
//! raster. Two backends:
//!
//! - `pdftoppm` (poppler, external binary) - default
//! - MuPDF (linked, `pdf-mupdf` feature)

mod pdftoppm;

#[cfg(feature = "pdf-mupdf")]
mod mupdf_raster;

use image::DynamicImage;

use crate::ocr::OcrError;

pub use pdftoppm::PdftoppmRasterizer;

#[cfg(feature = "pdf-mupdf")]
pub use mupdf_raster::MupdfRasterizer;

/// PDF files start with this signature
const PDF_MAGIC: &[u8] = b"%PDF";

/// Renders document pages to images
pub trait PageRasterizer: Send + Sync {
    /// Rasterize every page at `dpi`, in document order
    fn rasterize(&self, document: &[u8], dpi: u32) -> Result<Vec<DynamicImage>, OcrError>;
}

/// Check whether bytes look like a PDF document
pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}
