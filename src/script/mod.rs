//! Script heuristics
//!
//! Character-class statistics, candidate scoring and dominant-script
//! guessing for Latin, Devanagari and Tamil text.

mod guess;
mod scorer;
mod stats;

pub use guess::{guess_script, Script};
pub use scorer::{ScoreWeights, ScriptScorer, LENGTH_BONUS_CAP};
pub use stats::{is_devanagari, is_tamil, ScriptStats, DEVANAGARI_RANGE, TAMIL_RANGE};
