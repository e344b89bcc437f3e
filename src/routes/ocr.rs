//! OCR endpoint
//!
//! The request body is the raw document: a PNG/JPEG/TIFF image or a PDF.
//! Recognition shells out to tesseract per hypothesis, so it runs on the
//! blocking pool.

use axum::{body::Bytes, extract::State, routing::post, Json, Router};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::script::Script;
use crate::state::AppState;

/// Response for a recognized document
#[derive(Debug, Serialize)]
pub struct OcrResponse {
    pub text: String,
    /// Character count of `text`
    pub chars: usize,
    /// Pages processed, including ones without text
    pub pages: usize,
    /// ISO 639-1 code of the recognized text, when it can be determined
    pub detected_language: Option<String>,
    /// Winning hypothesis per page that produced text
    pub selections: Vec<PageSelection>,
}

#[derive(Debug, Serialize)]
pub struct PageSelection {
    pub page: usize,
    pub hypothesis: String,
    pub script: Script,
    pub score: f64,
    pub refined: bool,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(recognize))
}

/// POST /api/v1/ocr
async fn recognize(State(state): State<AppState>, body: Bytes) -> Result<Json<OcrResponse>> {
    if body.is_empty() {
        return Err(AppError::BadRequest("Request body is empty".to_string()));
    }
    tracing::debug!(bytes = body.len(), "OCR request");

    let selector = state.ocr();
    let detector = state.detector();
    let (document, detected_language) = tokio::task::spawn_blocking(move || {
        selector.recognize_document(&body).map(|document| {
            let language = if document.is_empty() {
                None
            } else {
                detector.detect(&document.text)
            };
            (document, language)
        })
    })
    .await
    .map_err(|e| AppError::Internal(format!("OCR task failed: {}", e)))??;

    if document.is_empty() {
        tracing::info!(pages = document.page_count, "No text recognized");
        return Err(AppError::NothingRecognized);
    }

    let selections = document
        .pages
        .iter()
        .map(|page| PageSelection {
            page: page.page_index,
            hypothesis: page.selected.hypothesis.clone(),
            script: page.script,
            score: page.selected.score,
            refined: page.refined,
        })
        .collect();

    Ok(Json(OcrResponse {
        chars: document.text.chars().count(),
        pages: document.page_count,
        text: document.text,
        detected_language,
        selections,
    }))
}
