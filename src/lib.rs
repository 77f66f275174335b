//! # structmd
//!
//! Structure inference and Markdown rendering for plain OCR text.
//!
//! This library takes unstructured text lines, classifies them as headings,
//! list items and paragraphs with weighted heuristics, and renders the result
//! as Markdown. A [`Converter`] wraps the pipeline with result caching,
//! timing statistics and a fallback that returns the original text whenever
//! rendering fails.
//!
//! ## Quick Start
//!
//! ```
//! use structmd::Converter;
//!
//! fn main() -> structmd::Result<()> {
//!     let converter = Converter::new();
//!     let result = converter.convert_format("第一章 概述\n- 苹果\n- 香蕉", "markdown")?;
//!
//!     assert_eq!(result.content, "# 概述\n\n- 苹果\n- 香蕉");
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Heading detection**: chapter and section markers, numbering, keywords
//! - **List detection**: bullets, numerals, letters, indentation and nesting
//! - **Markdown escaping**: paragraph text never turns into markup by accident
//! - **Caching**: bounded FIFO caches keyed by MD5 content hash
//! - **Fail-safe conversion**: renderer failures degrade to plain text

pub mod analyze;
pub mod cache;
pub mod convert;
pub mod error;
pub mod export;
pub mod model;
pub mod render;

// Re-export commonly used types
pub use analyze::{AnalyzerOptions, AnalyzerStats, StructureAnalyzer};
pub use convert::{
    CacheStats, ConversionResult, ConvertOptions, Converter, ErrorInfo, Formatter,
    FormatterRegistry, PerformanceStats, ValidationReport,
};
pub use error::{Error, ErrorResponse, Result};
pub use export::ExportDescriptor;
pub use model::{Heading, ListItem, ListKind, StructureInfo, Table, TextStructure};
pub use render::{MarkdownRenderer, RenderOptions};

use std::path::Path;

/// Convert plain text to Markdown with default options.
///
/// # Example
///
/// ```
/// assert_eq!(structmd::to_markdown("- 苹果\n- 香蕉"), "- 苹果\n- 香蕉");
/// ```
pub fn to_markdown(text: &str) -> String {
    render::to_markdown(text)
}

/// Analyze the structure of plain text with default options.
///
/// # Example
///
/// ```
/// let structure = structmd::analyze("第一章 概述\n正文内容在这里。");
/// assert_eq!(structure.headings[0].level, 1);
/// assert_eq!(structure.paragraphs.len(), 1);
/// ```
pub fn analyze(text: &str) -> TextStructure {
    StructureAnalyzer::new().analyze_text(text)
}

/// Read a UTF-8 text file and convert it.
///
/// # Example
///
/// ```no_run
/// let result = structmd::convert_file("scan.txt", "markdown")?;
/// println!("{}", result.content);
/// # Ok::<(), structmd::Error>(())
/// ```
pub fn convert_file<P: AsRef<Path>>(path: P, target_format: &str) -> Result<ConversionResult> {
    let text = std::fs::read_to_string(path)?;
    Converter::new().convert_format(&text, target_format)
}

/// Builder for a configured [`Converter`].
///
/// # Example
///
/// ```
/// use structmd::StructMd;
///
/// let converter = StructMd::new()
///     .with_max_heading(2)
///     .with_cache_capacity(10)
///     .without_escaping()
///     .build();
///
/// let result = converter.convert_format("第三节 结果", "markdown")?;
/// assert_eq!(result.content, "## 结果");
/// # Ok::<(), structmd::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct StructMd {
    options: ConvertOptions,
}

impl StructMd {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum emitted heading level.
    pub fn with_max_heading(mut self, level: u8) -> Self {
        self.options.render = self.options.render.with_max_heading(level);
        self
    }

    /// Set the heading score threshold.
    pub fn with_heading_threshold(mut self, threshold: f64) -> Self {
        self.options.analyzer = self.options.analyzer.with_score_threshold(threshold);
        self
    }

    /// Set the result cache capacity.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.options = self.options.with_cache_capacity(capacity);
        self
    }

    /// Disable Markdown escaping of paragraph text.
    pub fn without_escaping(mut self) -> Self {
        self.options.render = self.options.render.with_escape(false);
        self
    }

    /// Omit structure counts from results.
    pub fn without_structure_info(mut self) -> Self {
        self.options = self.options.with_structure_info(false);
        self
    }

    /// Get the accumulated options.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Build the converter.
    pub fn build(self) -> Converter {
        Converter::with_options(self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_options() {
        let builder = StructMd::new()
            .with_max_heading(3)
            .with_heading_threshold(0.8)
            .with_cache_capacity(5)
            .without_escaping()
            .without_structure_info();

        let options = builder.options();
        assert_eq!(options.render.max_heading_level, 3);
        assert_eq!(options.analyzer.heading_score_threshold, 0.8);
        assert_eq!(options.cache_capacity, 5);
        assert!(!options.render.escape_special_chars);
        assert!(!options.include_structure_info);
    }

    #[test]
    fn test_builder_default_matches_converter_defaults() {
        assert_eq!(StructMd::default().options(), &ConvertOptions::default());
    }

    #[test]
    fn test_built_converter_uses_options() {
        let converter = StructMd::new().with_cache_capacity(2).build();
        assert_eq!(converter.cache_stats().max_cache_size, 2);
    }

    #[test]
    fn test_analyze_convenience() {
        let structure = analyze("- 苹果\n- 香蕉");
        assert_eq!(structure.lists.len(), 2);
        assert!(structure.headings.is_empty());
    }

    #[test]
    fn test_convert_file_missing() {
        let result = convert_file("/nonexistent/structmd/input.txt", "markdown");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
