//! Input preparation
//!
//! Providers choke on invisible formatting characters, so they are removed
//! once before the first stage.

use super::types::TranslateError;

/// Zero-width space through right-to-left mark
const ZERO_WIDTH: std::ops::RangeInclusive<char> = '\u{200B}'..='\u{200F}';

/// Bidirectional embedding and override controls
const BIDI_CONTROLS: std::ops::RangeInclusive<char> = '\u{202A}'..='\u{202E}';

/// Strip zero-width and bidi control characters and carriage returns
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|&ch| ch != '\r' && !ZERO_WIDTH.contains(&ch) && !BIDI_CONTROLS.contains(&ch))
        .collect()
}

/// Normalize a target language code and check it is plausibly ISO-shaped
/// (`hi`, `tam`, `zh-cn`).
pub fn validate_target_language(code: &str) -> Result<String, TranslateError> {
    let normalized = code.trim().to_lowercase();
    match normalized.chars().count() {
        2 | 3 | 5 => Ok(normalized),
        _ => Err(TranslateError::InvalidTargetLanguage(code.to_string())),
    }
}

/// Normalize a caller-supplied detected source language.
///
/// Empty or `"auto"` means no hint.
pub fn normalize_detected_source(code: Option<&str>) -> Option<String> {
    code.map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty() && c != "auto")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_invisible_characters() {
        let dirty = "he\u{200B}llo\u{200F} \u{202A}wor\u{202E}ld\r\n";
        assert_eq!(sanitize(dirty), "hello world\n");
    }

    #[test]
    fn test_sanitize_keeps_indic_text() {
        // ZWJ (U+200D) is inside the stripped range; plain Devanagari is untouched
        assert_eq!(sanitize("नमस्ते"), "नमस्ते");
        assert_eq!(sanitize("வணக்கம்"), "வணக்கம்");
    }

    #[test]
    fn test_validate_target_language() {
        assert_eq!(validate_target_language(" HI ").unwrap(), "hi");
        assert_eq!(validate_target_language("tam").unwrap(), "tam");
        assert_eq!(validate_target_language("zh-CN").unwrap(), "zh-cn");
        assert!(validate_target_language("").is_err());
        assert!(validate_target_language("h").is_err());
        assert!(validate_target_language("hind").is_err());
        assert!(validate_target_language("english").is_err());
    }

    #[test]
    fn test_normalize_detected_source() {
        assert_eq!(normalize_detected_source(Some(" EN ")), Some("en".to_string()));
        assert_eq!(normalize_detected_source(Some("auto")), None);
        assert_eq!(normalize_detected_source(Some("")), None);
        assert_eq!(normalize_detected_source(None), None);
    }
}
