//! Resilient translation
//!
//! Long text is split into sentence-aligned chunks and pushed through an
//! ordered chain of public translation services. Each stage either yields a
//! complete translation or is abandoned with a recorded reason:
//!
//! ```text
//! primary -> secondary -> tertiary -> small-chunk-* -> pivot -> explicit-source
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! let providers = build_providers(&ProviderSettings::default())?;
//! let orchestrator = TranslationOrchestrator::new(providers, ChainConfig::default());
//! let outcome = orchestrator.translate("नमस्ते", "en", Some("hi")).await?;
//! ```

mod attempt;
mod chunker;
mod observer;
mod orchestrator;
mod provider;
mod sanitize;
mod stages;
mod types;

pub use attempt::{ChunkTranslator, RetryPolicy};
pub use chunker::{reassemble, split_text, CHUNK_JOIN};
pub use observer::{TracingObserver, TranslationEvent, TranslationObserver};
pub use orchestrator::TranslationOrchestrator;
pub use provider::{
    build_http_client, build_providers, GoogleProvider, LibreTranslateProvider, MyMemoryProvider, ProviderKind,
    ProviderSettings, TranslationProvider,
};
pub use sanitize::{normalize_detected_source, sanitize, validate_target_language};
pub use stages::{ChainConfig, SourceMode, Stage, StageKind, StagePlan};
pub use types::{ProviderError, StageError, StageFailure, TextChunk, TranslateError, TranslationOutcome};

#[cfg(test)]
pub(crate) use provider::testing::ScriptedProvider;
