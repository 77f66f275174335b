//! Conversion results and request validation reports.

use serde::{Deserialize, Serialize};

use crate::model::StructureInfo;

/// Result of a format conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    /// Converted content (the original text when a fallback was applied)
    pub content: String,

    /// Format actually produced
    pub format: String,

    /// Input text
    pub original_text: String,

    /// Seconds spent on this call
    pub conversion_time: f64,

    /// Structure counts, when a secondary analysis ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure_info: Option<StructureInfo>,

    /// Whether the content came from the result cache
    pub cache_hit: bool,

    /// Failure descriptor, present only on fallback results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl ConversionResult {
    /// Create a result for `content` in `format`.
    pub fn new(content: String, format: impl Into<String>, original_text: &str) -> Self {
        Self {
            content,
            format: format.into(),
            original_text: original_text.to_string(),
            conversion_time: 0.0,
            structure_info: None,
            cache_hit: false,
            error: None,
        }
    }

    /// Create a degraded result carrying the original text.
    pub fn fallback(original_text: &str, error: ErrorInfo) -> Self {
        Self {
            error: Some(error),
            ..Self::new(original_text.to_string(), "text", original_text)
        }
    }

    /// Check if this result was produced by the fallback path.
    pub fn is_fallback(&self) -> bool {
        self.error.as_ref().is_some_and(|e| e.fallback_applied)
    }
}

/// Description of a renderer failure absorbed by the converter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Failure message
    pub message: String,

    /// Failure kind name
    pub kind: String,

    /// Whether the original text was returned in place of the conversion
    pub fallback_applied: bool,
}

impl ErrorInfo {
    /// Create a descriptor for an applied fallback.
    pub fn fallback(message: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: kind.into(),
            fallback_applied: true,
        }
    }
}

/// Outcome of [`Converter::validate_conversion_request`](super::Converter::validate_conversion_request).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// No errors were found
    pub valid: bool,

    /// Problems that would make the conversion fail
    pub errors: Vec<String>,

    /// Problems worth reporting that do not block the conversion
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub(crate) fn from_parts(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_result() {
        let result = ConversionResult::fallback("原文", ErrorInfo::fallback("boom", "RenderError"));
        assert_eq!(result.content, "原文");
        assert_eq!(result.format, "text");
        assert!(result.is_fallback());
        assert!(!result.cache_hit);
    }

    #[test]
    fn test_optional_fields_skipped() {
        let result = ConversionResult::new("x".into(), "markdown", "x");
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("structure_info").is_none());
        assert!(json.get("error").is_none());
        assert_eq!(json["format"], "markdown");
    }

    #[test]
    fn test_validation_report_validity() {
        assert!(ValidationReport::from_parts(vec![], vec!["w".into()]).valid);
        assert!(!ValidationReport::from_parts(vec!["e".into()], vec![]).valid);
    }
}
