//! Translation Types
//!
//! Chunks, outcomes and the error taxonomy of the translation pipeline.

use serde::Serialize;

/// Bounded slice of input text sent to a provider in one call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextChunk {
    pub content: String,
    /// Position in the original text; reassembly follows this order
    pub sequence_index: usize,
}

/// Terminal result of one orchestration run
#[derive(Debug, Clone, Serialize)]
pub struct TranslationOutcome {
    /// Translated text, `None` when every stage failed
    pub text: Option<String>,
    /// Provider that produced `text`
    pub provider_used: Option<String>,
    /// Label of the winning stage (`"primary"`, `"small-chunk-A"`, `"pivot"`, ...)
    pub stage: Option<String>,
    /// Provider calls made across all stages
    pub attempts: usize,
    /// Source already matched the target, so unchanged output was accepted
    pub noop_request: bool,
    /// Why each earlier stage was abandoned
    pub failures: Vec<StageFailure>,
}

impl TranslationOutcome {
    pub fn is_success(&self) -> bool {
        self.text.is_some()
    }

    /// Distinguishes "input already matched target" from a real translation
    pub fn is_noop_request(&self) -> bool {
        self.noop_request
    }
}

/// Record of an abandoned stage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageFailure {
    pub stage: String,
    pub provider: String,
    pub reason: String,
}

/// Errors raised by a single provider call
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    /// Network failure, timeout or unreachable service
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    /// The service answered but refused the request (quota, unsupported pair)
    #[error("Provider rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The service answered with an unparseable body
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("Provider returned an empty translation")]
    EmptyResponse,
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ProviderError::Rejected {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => ProviderError::Unavailable(err.to_string()),
        }
    }
}

/// Why a stage was abandoned; absorbed by the orchestrator
#[derive(Debug, Clone, thiserror::Error)]
pub enum StageError {
    #[error("chunk {chunk} failed after {attempts} attempt(s): {source}")]
    Chunk {
        chunk: usize,
        attempts: usize,
        #[source]
        source: ProviderError,
    },

    #[error("combined translation is empty")]
    EmptyResult,

    #[error("translation is unchanged from the input")]
    NoChangeDetected,
}

/// Caller-facing validation failures, reported before any provider call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslateError {
    #[error("No text to translate")]
    InputEmpty,

    #[error("Text too long to translate ({chars} chars, limit {limit})")]
    InputTooLarge { chars: usize, limit: usize },

    #[error("Invalid target language code: '{0}'. Use an ISO code like en, hi, ta")]
    InvalidTargetLanguage(String),
}
