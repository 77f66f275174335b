//! Error types for structmd library.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::io;
use thiserror::Error;

/// Result type alias for structmd operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during structure analysis and conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// A request field had the wrong type.
    #[error("{field} must be a string, got {actual_type}")]
    Validation {
        /// Name of the offending field
        field: String,
        /// Type that was actually supplied
        actual_type: String,
    },

    /// The requested output format has no registered renderer.
    #[error("Unsupported format: {format}. Supported formats: {}", .supported.join(", "))]
    UnsupportedFormat {
        /// Format that was requested
        format: String,
        /// Formats the converter can produce
        supported: Vec<String>,
    },

    /// Error while inferring document structure.
    #[error("Text analysis error: {0}")]
    Analysis(String),

    /// Error during rendering (Markdown, etc.).
    #[error("Rendering error: {0}")]
    Render(String),

    /// An option value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Build a validation error for `field` holding a value of `actual_type`.
    pub fn validation(field: impl Into<String>, actual_type: impl Into<String>) -> Self {
        Error::Validation {
            field: field.into(),
            actual_type: actual_type.into(),
        }
    }

    /// Stable kind name, reported in fallback descriptors.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation { .. } => "ValidationError",
            Error::UnsupportedFormat { .. } => "UnsupportedFormatError",
            Error::Analysis(_) => "TextAnalysisError",
            Error::Render(_) => "RenderError",
            Error::InvalidConfig(_) => "ConfigError",
            Error::Json(_) => "JsonError",
            Error::Io(_) => "IoError",
        }
    }

    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Validation { .. } => "VALIDATION_ERROR",
            Error::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            Error::Analysis(_) => "TEXT_ANALYSIS_ERROR",
            Error::Render(_) => "FORMAT_CONVERSION_ERROR",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
            Error::Json(_) => "SERIALIZATION_ERROR",
            Error::Io(_) => "FILE_OPERATION_ERROR",
        }
    }

    /// Whether this error is a caller mistake rather than an internal fault.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            Error::Validation { .. } | Error::UnsupportedFormat { .. }
        )
    }

    /// Convert into a response body for host web layers.
    pub fn to_response(&self) -> ErrorResponse {
        let details = match self {
            Error::Validation { field, actual_type } => json!({
                "field_name": field,
                "field_value": actual_type,
            }),
            Error::UnsupportedFormat { format, supported } => json!({
                "requested_format": format,
                "supported_formats": supported,
            }),
            _ => json!({}),
        };

        ErrorResponse {
            message: self.to_string(),
            code: self.code().to_string(),
            kind: self.kind().to_string(),
            details,
        }
    }
}

/// Serializable error body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    /// Human-readable message
    pub message: String,
    /// Machine-readable code
    pub code: String,
    /// Error kind name
    pub kind: String,
    /// Structured details
    pub details: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::validation("text", "number");
        assert_eq!(err.to_string(), "text must be a string, got number");

        let err = Error::UnsupportedFormat {
            format: "pdf".to_string(),
            supported: vec!["text".to_string(), "markdown".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Unsupported format: pdf. Supported formats: text, markdown"
        );
    }

    #[test]
    fn test_error_kind_and_code() {
        let err = Error::Render("boom".into());
        assert_eq!(err.kind(), "RenderError");
        assert!(!err.is_request_error());

        let err = Error::Analysis("line table exhausted".into());
        assert_eq!(err.kind(), "TextAnalysisError");
        assert_eq!(err.code(), "TEXT_ANALYSIS_ERROR");
        assert_eq!(err.to_string(), "Text analysis error: line table exhausted");

        let err = Error::validation("target_format", "null");
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert!(err.is_request_error());
    }

    #[test]
    fn test_error_response_details() {
        let err = Error::UnsupportedFormat {
            format: "pdf".to_string(),
            supported: vec!["text".to_string(), "markdown".to_string()],
        };
        let response = err.to_response();
        assert_eq!(response.code, "UNSUPPORTED_FORMAT");
        assert_eq!(response.details["requested_format"], "pdf");
        assert_eq!(response.details["supported_formats"][1], "markdown");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
