//! Per-stage chunk translation with bounded retries

use super::chunker::reassemble;
use super::observer::{TranslationEvent, TranslationObserver};
use super::provider::TranslationProvider;
use super::types::{ProviderError, StageError, TextChunk};

/// How many times a single chunk is sent before the stage gives up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts_per_chunk: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { attempts_per_chunk: 2 }
    }
}

/// Translates every chunk of one stage through one provider
pub struct ChunkTranslator<'a> {
    provider: &'a dyn TranslationProvider,
    observer: &'a dyn TranslationObserver,
    policy: RetryPolicy,
    stage: &'a str,
    calls: usize,
}

impl<'a> ChunkTranslator<'a> {
    pub fn new(
        provider: &'a dyn TranslationProvider,
        observer: &'a dyn TranslationObserver,
        policy: RetryPolicy,
        stage: &'a str,
    ) -> Self {
        Self {
            provider,
            observer,
            policy,
            stage,
            calls: 0,
        }
    }

    /// Provider calls made so far
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// Translate all chunks in order and reassemble them.
    ///
    /// The first chunk that stays empty or failing after the retry budget
    /// aborts the stage.
    pub async fn translate_chunks(
        &mut self,
        chunks: &[TextChunk],
        source: &str,
        target: &str,
    ) -> Result<String, StageError> {
        let mut translated = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            translated.push(self.translate_chunk(chunk, source, target).await?);
        }

        let combined = reassemble(translated.as_slice());
        if combined.trim().is_empty() {
            return Err(StageError::EmptyResult);
        }
        Ok(combined)
    }

    async fn translate_chunk(&mut self, chunk: &TextChunk, source: &str, target: &str) -> Result<String, StageError> {
        let attempts = self.policy.attempts_per_chunk.max(1);
        let mut last_error = ProviderError::EmptyResponse;

        for attempt in 1..=attempts {
            self.calls += 1;
            match self.provider.translate(&chunk.content, source, target).await {
                Ok(text) if !text.trim().is_empty() => return Ok(text.trim().to_string()),
                Ok(_) => last_error = ProviderError::EmptyResponse,
                Err(e) => last_error = e,
            }

            if attempt < attempts {
                self.observer.on_event(&TranslationEvent::ChunkRetry {
                    stage: self.stage.to_string(),
                    provider: self.provider.name().to_string(),
                    chunk: chunk.sequence_index,
                    attempt,
                    reason: last_error.to_string(),
                });
            }
        }

        Err(StageError::Chunk {
            chunk: chunk.sequence_index,
            attempts,
            source: last_error,
        })
    }
}
