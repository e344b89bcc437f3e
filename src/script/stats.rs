//! Character-class statistics
//!
//! Counts how much of a string belongs to each script the OCR pipeline
//! cares about. Ratios are always relative to the character count, with a
//! floor of 1 so empty input never divides by zero.

use serde::Serialize;
use unicode_properties::{GeneralCategory, UnicodeGeneralCategory};

/// Devanagari block (Hindi, Marathi, Nepali, Sanskrit)
pub const DEVANAGARI_RANGE: std::ops::RangeInclusive<char> = '\u{0900}'..='\u{097F}';

/// Tamil block
pub const TAMIL_RANGE: std::ops::RangeInclusive<char> = '\u{0B80}'..='\u{0BFF}';

/// Punctuation counted toward `punct_ratio`
const PUNCTUATION: &[char] = &[',', '.', ';', ':', '/', '\\', '-', '_'];

/// Immutable character-class breakdown of one string
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScriptStats {
    pub latin_ratio: f64,
    pub dev_ratio: f64,
    pub tam_ratio: f64,
    pub digit_ratio: f64,
    pub space_ratio: f64,
    pub punct_ratio: f64,
    pub printable_ratio: f64,
    /// Length in characters (not bytes)
    pub length: usize,
}

impl ScriptStats {
    /// Compute statistics for `text`
    pub fn compute(text: &str) -> Self {
        let mut length = 0usize;
        let mut latin = 0usize;
        let mut dev = 0usize;
        let mut tam = 0usize;
        let mut digits = 0usize;
        let mut spaces = 0usize;
        let mut punct = 0usize;
        let mut printable = 0usize;

        for ch in text.chars() {
            length += 1;
            if ch.is_ascii_alphabetic() {
                latin += 1;
            } else if is_devanagari(ch) {
                dev += 1;
            } else if is_tamil(ch) {
                tam += 1;
            }
            if is_decimal_digit(ch) {
                digits += 1;
            }
            if ch == ' ' {
                spaces += 1;
            }
            if PUNCTUATION.contains(&ch) {
                punct += 1;
            }
            if is_printable(ch) {
                printable += 1;
            }
        }

        let total = length.max(1) as f64;
        Self {
            latin_ratio: latin as f64 / total,
            dev_ratio: dev as f64 / total,
            tam_ratio: tam as f64 / total,
            digit_ratio: digits as f64 / total,
            space_ratio: spaces as f64 / total,
            punct_ratio: punct as f64 / total,
            printable_ratio: printable as f64 / total,
            length,
        }
    }
}

pub fn is_devanagari(ch: char) -> bool {
    DEVANAGARI_RANGE.contains(&ch)
}

pub fn is_tamil(ch: char) -> bool {
    TAMIL_RANGE.contains(&ch)
}

/// Decimal digits in any script (`Nd`), so `४` counts but `²` and `Ⅻ` do not
fn is_decimal_digit(ch: char) -> bool {
    ch.general_category() == GeneralCategory::DecimalNumber
}

/// Printable means a visible glyph or the ASCII space.
///
/// Control, format (ZWJ/ZWNJ), surrogate, private-use and unassigned code
/// points are not printable, nor is any separator other than U+0020.
fn is_printable(ch: char) -> bool {
    if ch == ' ' {
        return true;
    }
    !matches!(
        ch.general_category(),
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::Unassigned
            | GeneralCategory::SpaceSeparator
            | GeneralCategory::LineSeparator
            | GeneralCategory::ParagraphSeparator
    )
}
