//! Error types for the docbabel server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::ocr::OcrError;
use crate::translate::{StageFailure, TranslateError};

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    #[error("{0}")]
    Translate(#[from] TranslateError),

    #[error("No text could be recognized in the document")]
    NothingRecognized,

    #[error("All translation stages failed: {}", summarize(.0))]
    TranslationFailed(Vec<StageFailure>),
}

fn summarize(failures: &[StageFailure]) -> String {
    if failures.is_empty() {
        return "no translation providers configured".to_string();
    }
    failures
        .iter()
        .map(|f| format!("{} ({}): {}", f.stage, f.provider, f.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Ocr(e) => match e {
                OcrError::ImageDecode(_) => (
                    StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    "unsupported_document",
                    "Upload a PNG, JPEG, TIFF or PDF document".to_string(),
                ),
                OcrError::Rasterize(_) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "unreadable_pdf",
                    "Failed to render PDF pages".to_string(),
                ),
                _ => {
                    tracing::error!("OCR error: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "ocr_error",
                        "OCR engine failure".to_string(),
                    )
                }
            },
            AppError::Translate(e) => {
                let status = match e {
                    TranslateError::InputTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                    _ => StatusCode::BAD_REQUEST,
                };
                (status, "invalid_translation_request", e.to_string())
            }
            AppError::NothingRecognized => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "nothing_recognized",
                "No text could be recognized in the document".to_string(),
            ),
            AppError::TranslationFailed(failures) => {
                tracing::error!(stages = failures.len(), "Translation failed: {}", summarize(failures));
                (
                    StatusCode::BAD_GATEWAY,
                    "translation_failed",
                    "Translation failed, please try again later".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
            details: if cfg!(debug_assertions) {
                Some(self.to_string())
            } else {
                None
            },
        });

        (status, body).into_response()
    }
}
