//! Fallback chain as data
//!
//! Each request walks an ordered list of [`Stage`] descriptors; the plan is
//! built up front from the provider count, the input and the languages.

use super::attempt::RetryPolicy;
use super::chunker::split_text;

/// Translation chain tuning
#[derive(Debug, Clone)]
pub struct ChainConfig {
    /// Chunk size for the regular stages
    pub chunk_size: usize,
    /// Chunk size for the small-chunk retry stages
    pub small_chunk_size: usize,
    /// Intermediate language for the pivot stage
    pub pivot_language: String,
    pub retry: RetryPolicy,
    /// Inputs longer than this are refused before any provider call
    pub max_input_chars: usize,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1800,
            small_chunk_size: 800,
            pivot_language: "en".to_string(),
            retry: RetryPolicy::default(),
            max_input_chars: 12000,
        }
    }
}

/// Source language sent to the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceMode {
    Auto,
    Detected(String),
}

impl SourceMode {
    pub fn code(&self) -> &str {
        match self {
            SourceMode::Auto => "auto",
            SourceMode::Detected(code) => code,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageKind {
    /// source -> target in one hop
    Direct,
    /// source -> `via`, then `via` -> target, both through the same provider
    Pivot { via: String },
}

/// One step of the fallback chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    pub label: String,
    /// Index into the orchestrator's provider list
    pub provider: usize,
    pub chunk_size: usize,
    pub source: SourceMode,
    pub kind: StageKind,
}

/// Ordered stages for one request, plus the ones left out and why
#[derive(Debug, Clone, Default)]
pub struct StagePlan {
    pub stages: Vec<Stage>,
    pub skipped: Vec<(String, &'static str)>,
}

impl StagePlan {
    /// Build the chain:
    ///
    /// 1. every provider at the regular chunk size (`primary`, `secondary`,
    ///    `tertiary`, then `fallback-N`)
    /// 2. every provider at the small chunk size, only when that split
    ///    yields more chunks (`small-chunk-A`, `small-chunk-B`, ...)
    /// 3. `pivot` through the first provider, unless the target is the
    ///    pivot language
    /// 4. `explicit-source` through the first provider, when a source
    ///    language was detected
    pub fn build(
        provider_count: usize,
        config: &ChainConfig,
        text: &str,
        target: &str,
        detected_source: Option<&str>,
    ) -> Self {
        let mut plan = StagePlan::default();
        if provider_count == 0 {
            return plan;
        }

        for provider in 0..provider_count {
            plan.stages.push(Stage {
                label: ordinal_label(provider),
                provider,
                chunk_size: config.chunk_size,
                source: SourceMode::Auto,
                kind: StageKind::Direct,
            });
        }

        let regular = split_text(text, config.chunk_size).len();
        let small = split_text(text, config.small_chunk_size).len();
        if small > regular {
            for provider in 0..provider_count {
                plan.stages.push(Stage {
                    label: format!("small-chunk-{}", provider_letter(provider)),
                    provider,
                    chunk_size: config.small_chunk_size,
                    source: SourceMode::Auto,
                    kind: StageKind::Direct,
                });
            }
        } else {
            plan.skipped.push(("small-chunk".to_string(), "smaller chunks would not split the text further"));
        }

        if target.eq_ignore_ascii_case(&config.pivot_language) {
            plan.skipped.push(("pivot".to_string(), "target is the pivot language"));
        } else {
            plan.stages.push(Stage {
                label: "pivot".to_string(),
                provider: 0,
                chunk_size: config.chunk_size,
                source: SourceMode::Auto,
                kind: StageKind::Pivot {
                    via: config.pivot_language.clone(),
                },
            });
        }

        match detected_source {
            Some(source) => plan.stages.push(Stage {
                label: "explicit-source".to_string(),
                provider: 0,
                chunk_size: config.chunk_size,
                source: SourceMode::Detected(source.to_string()),
                kind: StageKind::Direct,
            }),
            None => plan
                .skipped
                .push(("explicit-source".to_string(), "no detected source language")),
        }

        plan
    }

    pub fn labels(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.label.as_str()).collect()
    }
}

fn ordinal_label(index: usize) -> String {
    match index {
        0 => "primary".to_string(),
        1 => "secondary".to_string(),
        2 => "tertiary".to_string(),
        n => format!("fallback-{}", n + 1),
    }
}

fn provider_letter(index: usize) -> String {
    match u8::try_from(index) {
        Ok(i) if i < 26 => char::from(b'A' + i).to_string(),
        _ => (index + 1).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_text(chars: usize) -> String {
        "Sentence number one is here. ".repeat(chars / 29 + 1).chars().take(chars).collect()
    }

    #[test]
    fn test_full_chain_for_long_text() {
        let plan = StagePlan::build(3, &ChainConfig::default(), &long_text(2000), "hi", Some("ta"));
        assert_eq!(
            plan.labels(),
            vec![
                "primary",
                "secondary",
                "tertiary",
                "small-chunk-A",
                "small-chunk-B",
                "small-chunk-C",
                "pivot",
                "explicit-source",
            ]
        );
        assert!(plan.skipped.is_empty());

        let explicit = plan.stages.last().unwrap();
        assert_eq!(explicit.source, SourceMode::Detected("ta".to_string()));
        assert_eq!(explicit.provider, 0);
    }

    #[test]
    fn test_small_chunk_stage_skipped_for_short_text() {
        let plan = StagePlan::build(2, &ChainConfig::default(), "Short text.", "hi", None);
        assert_eq!(plan.labels(), vec!["primary", "secondary", "pivot"]);
        let skipped: Vec<&str> = plan.skipped.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(skipped, vec!["small-chunk", "explicit-source"]);
    }

    #[test]
    fn test_pivot_skipped_when_target_is_english() {
        let plan = StagePlan::build(1, &ChainConfig::default(), "Short text.", "EN", None);
        assert_eq!(plan.labels(), vec!["primary"]);
    }

    #[test]
    fn test_pivot_stage_routes_through_first_provider() {
        let plan = StagePlan::build(3, &ChainConfig::default(), "x", "ta", None);
        let pivot = plan.stages.iter().find(|s| s.label == "pivot").unwrap();
        assert_eq!(pivot.provider, 0);
        assert_eq!(pivot.kind, StageKind::Pivot { via: "en".to_string() });
        assert_eq!(pivot.source.code(), "auto");
    }

    #[test]
    fn test_extra_providers_get_fallback_labels() {
        let plan = StagePlan::build(5, &ChainConfig::default(), "x", "en", None);
        assert_eq!(
            plan.labels(),
            vec!["primary", "secondary", "tertiary", "fallback-4", "fallback-5"]
        );
    }

    #[test]
    fn test_no_providers_no_stages() {
        let plan = StagePlan::build(0, &ChainConfig::default(), "x", "hi", Some("en"));
        assert!(plan.stages.is_empty());
    }

    #[test]
    fn test_provider_letters() {
        assert_eq!(provider_letter(0), "A");
        assert_eq!(provider_letter(25), "Z");
        assert_eq!(provider_letter(26), "27");
    }
}
