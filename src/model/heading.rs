//! Heading type.

use serde::{Deserialize, Serialize};

/// A line classified as a heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading text as it appeared in the input (trimmed)
    pub text: String,

    /// Heading level (1-6)
    pub level: u8,

    /// Index into the preprocessed line sequence
    pub line_number: usize,

    /// Classifier certainty in [0, 1]
    pub confidence: f64,
}

impl Heading {
    /// Create a new heading. The level is clamped to 1-6 and the confidence
    /// to [0, 1].
    pub fn new(text: impl Into<String>, level: u8, line_number: usize, confidence: f64) -> Self {
        Self {
            text: text.into(),
            level: level.clamp(1, 6),
            line_number,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}
