//! Translation endpoint

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::translate::normalize_detected_source;

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub target_lang: String,
    /// Language the caller believes the text is in; detected when absent,
    /// empty or "auto"
    #[serde(default)]
    pub source_lang: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub translated_text: String,
    pub provider: Option<String>,
    pub stage: Option<String>,
    /// Source language handed to the chain, caller-supplied or detected
    pub source_lang: Option<String>,
    /// Provider calls made across all stages
    pub attempts: usize,
    /// Source already matched the target
    pub noop: bool,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(translate))
}

/// POST /api/v1/translate
async fn translate(State(state): State<AppState>, Json(request): Json<TranslateRequest>) -> Result<Json<TranslateResponse>> {
    let source_lang = match normalize_detected_source(request.source_lang.as_deref()) {
        Some(code) => Some(code),
        None => {
            let detector = state.detector();
            let text = request.text.clone();
            tokio::task::spawn_blocking(move || detector.detect(&text))
                .await
                .map_err(|e| AppError::Internal(format!("Language detection failed: {}", e)))?
        }
    };

    let outcome = state
        .translator()
        .translate(&request.text, &request.target_lang, source_lang.as_deref())
        .await?;

    let Some(translated_text) = outcome.text else {
        return Err(AppError::TranslationFailed(outcome.failures));
    };

    tracing::info!(
        provider = ?outcome.provider_used,
        stage = ?outcome.stage,
        source = ?source_lang,
        attempts = outcome.attempts,
        "Translation completed"
    );

    Ok(Json(TranslateResponse {
        translated_text,
        provider: outcome.provider_used,
        stage: outcome.stage,
        source_lang,
        attempts: outcome.attempts,
        noop: outcome.noop_request,
    }))
}
