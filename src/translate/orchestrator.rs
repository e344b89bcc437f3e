//! Translation orchestrator
//!
//! Walks the stage plan until one stage yields a usable translation. Stage
//! failures are absorbed and recorded; only validation errors reach the
//! caller as `Err`.

use std::sync::Arc;

use super::attempt::ChunkTranslator;
use super::chunker::split_text;
use super::observer::{TracingObserver, TranslationEvent, TranslationObserver};
use super::provider::TranslationProvider;
use super::sanitize::{normalize_detected_source, sanitize, validate_target_language};
use super::stages::{ChainConfig, Stage, StageKind, StagePlan};
use super::types::{StageError, StageFailure, TextChunk, TranslateError, TranslationOutcome};

pub struct TranslationOrchestrator {
    providers: Vec<Arc<dyn TranslationProvider>>,
    config: ChainConfig,
    observer: Arc<dyn TranslationObserver>,
}

impl TranslationOrchestrator {
    pub fn new(providers: Vec<Arc<dyn TranslationProvider>>, config: ChainConfig) -> Self {
        Self {
            providers,
            config,
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn TranslationObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Translate `text` into `target`.
    ///
    /// `detected_source` is the caller's guess at the input language; empty
    /// or `"auto"` means unknown. When it equals the target, output identical
    /// to the input is accepted.
    pub async fn translate(
        &self,
        text: &str,
        target: &str,
        detected_source: Option<&str>,
    ) -> Result<TranslationOutcome, TranslateError> {
        let clean = sanitize(text);
        if clean.trim().is_empty() {
            return Err(TranslateError::InputEmpty);
        }
        let chars = clean.chars().count();
        if chars > self.config.max_input_chars {
            return Err(TranslateError::InputTooLarge {
                chars,
                limit: self.config.max_input_chars,
            });
        }
        let target = validate_target_language(target)?;
        let detected = normalize_detected_source(detected_source);
        let noop_request = detected.as_deref() == Some(target.as_str());

        let plan = StagePlan::build(self.providers.len(), &self.config, &clean, &target, detected.as_deref());
        for (stage, reason) in &plan.skipped {
            self.observer.on_event(&TranslationEvent::StageSkipped {
                stage: stage.clone(),
                reason: *reason,
            });
        }

        tracing::debug!(
            chars,
            target = %target,
            detected = ?detected,
            stages = plan.stages.len(),
            "Starting translation"
        );

        let mut outcome = TranslationOutcome {
            text: None,
            provider_used: None,
            stage: None,
            attempts: 0,
            noop_request,
            failures: Vec::new(),
        };

        for stage in &plan.stages {
            let Some(provider) = self.providers.get(stage.provider) else {
                continue;
            };
            let chunks = split_text(&clean, stage.chunk_size);
            self.observer.on_event(&TranslationEvent::StageEntered {
                stage: stage.label.clone(),
                provider: provider.name().to_string(),
                chunks: chunks.len(),
            });

            let mut translator =
                ChunkTranslator::new(provider.as_ref(), self.observer.as_ref(), self.config.retry, &stage.label);
            let result = run_stage(&mut translator, stage, &chunks, &target)
                .await
                .and_then(|translated| accept(translated, &clean, noop_request));
            outcome.attempts += translator.calls();

            match result {
                Ok(translated) => {
                    self.observer.on_event(&TranslationEvent::StageSucceeded {
                        stage: stage.label.clone(),
                        provider: provider.name().to_string(),
                    });
                    outcome.text = Some(translated);
                    outcome.provider_used = Some(provider.name().to_string());
                    outcome.stage = Some(stage.label.clone());
                    return Ok(outcome);
                }
                Err(error) => {
                    outcome.failures.push(StageFailure {
                        stage: stage.label.clone(),
                        provider: provider.name().to_string(),
                        reason: error.to_string(),
                    });
                    self.observer.on_event(&TranslationEvent::StageFailed {
                        stage: stage.label.clone(),
                        provider: provider.name().to_string(),
                        error,
                    });
                }
            }
        }

        self.observer.on_event(&TranslationEvent::Exhausted {
            attempts: outcome.attempts,
        });
        Ok(outcome)
    }
}

async fn run_stage(
    translator: &mut ChunkTranslator<'_>,
    stage: &Stage,
    chunks: &[TextChunk],
    target: &str,
) -> Result<String, StageError> {
    let source = stage.source.code();
    match &stage.kind {
        StageKind::Direct => translator.translate_chunks(chunks, source, target).await,
        StageKind::Pivot { via } => {
            let intermediate = translator.translate_chunks(chunks, source, via).await?;
            let second_hop = split_text(&intermediate, stage.chunk_size);
            translator.translate_chunks(&second_hop, via, target).await
        }
    }
}

/// Output must differ from the input unless the source already matched the
/// target.
fn accept(translated: String, input: &str, noop_request: bool) -> Result<String, StageError> {
    if translated.trim().is_empty() {
        return Err(StageError::EmptyResult);
    }
    if !noop_request && translated.trim() == input.trim() {
        return Err(StageError::NoChangeDetected);
    }
    Ok(translated)
}
