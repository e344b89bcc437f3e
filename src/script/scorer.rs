//! Candidate quality scoring
//!
//! Turns [`ScriptStats`] and a language hint into one scalar so that OCR
//! outputs produced under different language hypotheses can be compared.

use serde::Serialize;

use super::guess::Script;
use super::stats::ScriptStats;

/// Characters at which the length bonus saturates
pub const LENGTH_BONUS_CAP: f64 = 200.0;

/// Weights of the scoring formula
///
/// `score = target_script·s + alnum·a + length_bonus·l − noise_penalty·n`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreWeights {
    pub target_script: f64,
    pub alnum: f64,
    pub length_bonus: f64,
    pub noise_penalty: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            target_script: 2.5,
            alnum: 0.8,
            length_bonus: 0.5,
            noise_penalty: 1.0,
        }
    }
}

/// Scores recognized text against a language hypothesis
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptScorer {
    weights: ScoreWeights,
}

impl ScriptScorer {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Score `text` for the language hint (`"hin"`, `"eng+tam"`, ...).
    ///
    /// Whitespace-only text scores exactly `0.0`, which callers treat as
    /// unusable.
    pub fn score(&self, text: &str, language_hint: &str) -> f64 {
        let text = text.trim();
        if text.is_empty() {
            return 0.0;
        }
        self.score_stats(&ScriptStats::compute(text), Script::from_hint(language_hint))
    }

    /// Score precomputed statistics against a target script
    pub fn score_stats(&self, stats: &ScriptStats, target: Script) -> f64 {
        let target_script = match target {
            Script::Devanagari => stats.dev_ratio,
            Script::Tamil => stats.tam_ratio,
            Script::Latin => stats.latin_ratio,
        };
        let alnum_like = stats.latin_ratio + stats.dev_ratio + stats.tam_ratio + stats.digit_ratio;
        let noise_penalty = (1.0 - stats.printable_ratio).max(0.0);
        let length_bonus = (stats.length as f64 / LENGTH_BONUS_CAP).min(1.0);

        let w = &self.weights;
        w.target_script * target_script + w.alnum * alnum_like + w.length_bonus * length_bonus
            - w.noise_penalty * noise_penalty
    }
}
