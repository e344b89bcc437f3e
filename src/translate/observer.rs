//! Orchestration events
//!
//! The orchestrator reports progress through an injected observer instead of
//! logging directly, so tests can assert on the sequence of stages tried.

use super::types::StageError;

/// One step of an orchestration run
#[derive(Debug, Clone)]
pub enum TranslationEvent {
    StageEntered {
        stage: String,
        provider: String,
        chunks: usize,
    },
    ChunkRetry {
        stage: String,
        provider: String,
        chunk: usize,
        attempt: usize,
        reason: String,
    },
    StageSucceeded {
        stage: String,
        provider: String,
    },
    StageFailed {
        stage: String,
        provider: String,
        error: StageError,
    },
    StageSkipped {
        stage: String,
        reason: &'static str,
    },
    Exhausted {
        attempts: usize,
    },
}

pub trait TranslationObserver: Send + Sync {
    fn on_event(&self, event: &TranslationEvent);
}

/// Forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl TranslationObserver for TracingObserver {
    fn on_event(&self, event: &TranslationEvent) {
        match event {
            TranslationEvent::StageEntered {
                stage,
                provider,
                chunks,
            } => {
                tracing::debug!(stage = %stage, provider = %provider, chunks, "Entering translation stage");
            }
            TranslationEvent::ChunkRetry {
                stage,
                provider,
                chunk,
                attempt,
                reason,
            } => {
                tracing::debug!(
                    stage = %stage,
                    provider = %provider,
                    chunk,
                    attempt,
                    reason = %reason,
                    "Chunk translation failed, retrying"
                );
            }
            TranslationEvent::StageSucceeded { stage, provider } => {
                tracing::info!(stage = %stage, provider = %provider, "Translation stage succeeded");
            }
            TranslationEvent::StageFailed { stage, provider, error } => {
                tracing::warn!(stage = %stage, provider = %provider, error = %error, "Translation stage failed");
            }
            TranslationEvent::StageSkipped { stage, reason } => {
                tracing::debug!(stage = %stage, reason, "Translation stage skipped");
            }
            TranslationEvent::Exhausted { attempts } => {
                tracing::error!(attempts, "All translation stages failed");
            }
        }
    }
}
