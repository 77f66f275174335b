//! Format conversion with caching, telemetry and fallback.
//!
//! The [`Converter`] is the public entry point. It dispatches a text to the
//! [`Formatter`] registered for the requested format, caches the output by
//! content hash and absorbs every renderer failure into a degraded result
//! that carries the original text.
//!
//! Formatters are pluggable: implement [`Formatter`] and register it to add
//! an output format without changing callers.
//!
//! # Example
//!
//! ```
//! use structmd::Converter;
//!
//! fn main() -> structmd::Result<()> {
//!     let converter = Converter::new();
//!
//!     let result = converter.convert_format("第一章 概述\n- 苹果\n- 香蕉", "markdown")?;
//!     assert!(result.content.starts_with("# 概述"));
//!
//!     let again = converter.convert_format("第一章 概述\n- 苹果\n- 香蕉", "markdown")?;
//!     assert!(again.cache_hit);
//!     Ok(())
//! }
//! ```

mod result;
mod stats;

pub use result::{ConversionResult, ErrorInfo, ValidationReport};
pub use stats::{CacheStats, PerformanceStats};

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use indexmap::IndexMap;
use serde_json::Value;

use crate::analyze::{AnalyzerOptions, StructureAnalyzer};
use crate::cache::{content_hash, BoundedCache};
use crate::error::{Error, Result};
use crate::export::{self, ExportDescriptor};
use crate::model::StructureInfo;
use crate::render::{MarkdownRenderer, RenderOptions};

use stats::{CacheCounters, PerformanceMonitor};

/// Name of the pass-through format.
pub const TEXT_FORMAT: &str = "text";

/// Options for the converter.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    /// Options for the shared analyzer
    pub analyzer: AnalyzerOptions,

    /// Options for the built-in Markdown renderer
    pub render: RenderOptions,

    /// Number of conversion results kept in the cache
    pub cache_capacity: usize,

    /// Number of recent durations kept for timing statistics
    pub duration_window: usize,

    /// Inputs with more characters than this are counted as large
    pub large_text_threshold: usize,

    /// Inputs with more characters than this get a validation warning
    pub large_input_warning: usize,

    /// Attach structure counts to rendered results
    pub include_structure_info: bool,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set analyzer options.
    pub fn with_analyzer_options(mut self, options: AnalyzerOptions) -> Self {
        self.analyzer = options;
        self
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }

    /// Set the result cache capacity.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity.max(1);
        self
    }

    /// Set the number of durations kept for timing statistics.
    pub fn with_duration_window(mut self, window: usize) -> Self {
        self.duration_window = window.max(1);
        self
    }

    /// Set the large text threshold (in characters).
    pub fn with_large_text_threshold(mut self, chars: usize) -> Self {
        self.large_text_threshold = chars;
        self
    }

    /// Set the size (in characters) above which validation warns.
    pub fn with_large_input_warning(mut self, chars: usize) -> Self {
        self.large_input_warning = chars;
        self
    }

    /// Enable or disable structure counts on results.
    pub fn with_structure_info(mut self, include: bool) -> Self {
        self.include_structure_info = include;
        self
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            analyzer: AnalyzerOptions::default(),
            render: RenderOptions::default(),
            cache_capacity: 50,
            duration_window: 100,
            large_text_threshold: 5_000,
            large_input_warning: 100_000,
            include_structure_info: true,
        }
    }
}

/// Trait for output formatters.
///
/// Implement this trait to add support for a new output format.
pub trait Formatter: Send + Sync {
    /// Format name, matched case-insensitively (e.g. `"markdown"`).
    fn name(&self) -> &str;

    /// Convert plain text to this format.
    fn convert(&self, text: &str) -> Result<String>;

    /// Analyzer used by this formatter, if any. The converter uses it to
    /// attach structure counts to results.
    fn analyzer(&self) -> Option<&StructureAnalyzer> {
        None
    }
}

/// Registry for output formatters, in registration order.
pub struct FormatterRegistry {
    formatters: IndexMap<String, Arc<dyn Formatter>>,
}

impl FormatterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            formatters: IndexMap::new(),
        }
    }

    /// Create a registry with the default formatters (Markdown).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.insert(Arc::new(MarkdownRenderer::new()));
        registry
    }

    /// Register a formatter, replacing any formatter with the same name.
    ///
    /// The `text` name is reserved for the pass-through format.
    pub fn register(&mut self, formatter: Arc<dyn Formatter>) -> Result<()> {
        let name = normalize_format(formatter.name());
        if name.is_empty() || name == TEXT_FORMAT {
            return Err(Error::InvalidConfig(format!(
                "formatter name '{}' is reserved",
                formatter.name()
            )));
        }
        self.formatters.insert(name, formatter);
        Ok(())
    }

    fn insert(&mut self, formatter: Arc<dyn Formatter>) {
        self.formatters
            .insert(normalize_format(formatter.name()), formatter);
    }

    /// Get a formatter by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Formatter>> {
        self.formatters.get(&normalize_format(name)).cloned()
    }

    /// Check if a formatter is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.formatters.contains_key(&normalize_format(name))
    }

    /// Registered formatter names.
    pub fn names(&self) -> Vec<String> {
        self.formatters.keys().cloned().collect()
    }

    /// Number of registered formatters.
    pub fn len(&self) -> usize {
        self.formatters.len()
    }

    /// Check if no formatter is registered.
    pub fn is_empty(&self) -> bool {
        self.formatters.is_empty()
    }
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.formatters.keys()).finish()
    }
}

/// Cached part of a conversion; timing and cache flags are per call.
#[derive(Debug, Clone)]
struct CachedConversion {
    content: String,
    format: String,
    structure_info: Option<StructureInfo>,
}

impl CachedConversion {
    fn to_result(&self, original_text: &str) -> ConversionResult {
        let mut result = ConversionResult::new(self.content.clone(), &self.format, original_text);
        result.structure_info = self.structure_info;
        result
    }
}

/// Conversion orchestrator.
///
/// Owns the shared analyzer, the formatter registry, the result cache and
/// the telemetry counters. All methods take `&self`; one converter can serve
/// many threads.
#[derive(Debug)]
pub struct Converter {
    options: ConvertOptions,
    analyzer: Arc<StructureAnalyzer>,
    registry: FormatterRegistry,
    cache: Mutex<BoundedCache<CachedConversion>>,
    counters: Mutex<CacheCounters>,
    monitor: Mutex<PerformanceMonitor>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Converter {
    /// Create a converter with default options and the Markdown formatter.
    pub fn new() -> Self {
        Self::with_options(ConvertOptions::default())
    }

    /// Create a converter with custom options.
    pub fn with_options(options: ConvertOptions) -> Self {
        let analyzer = Arc::new(StructureAnalyzer::with_options(options.analyzer.clone()));
        let mut registry = FormatterRegistry::new();
        registry.insert(Arc::new(MarkdownRenderer::with_analyzer(
            Arc::clone(&analyzer),
            options.render.clone(),
        )));

        Self {
            cache: Mutex::new(BoundedCache::new(options.cache_capacity)),
            counters: Mutex::new(CacheCounters::default()),
            monitor: Mutex::new(PerformanceMonitor::new(options.duration_window)),
            analyzer,
            registry,
            options,
        }
    }

    /// Register an additional formatter, or replace one by name.
    pub fn register_formatter(&mut self, formatter: Arc<dyn Formatter>) -> Result<()> {
        self.registry.register(formatter)
    }

    /// Get the converter options.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Get the analyzer shared with the built-in Markdown formatter.
    pub fn analyzer(&self) -> &Arc<StructureAnalyzer> {
        &self.analyzer
    }

    /// Get the formatter registry.
    pub fn registry(&self) -> &FormatterRegistry {
        &self.registry
    }

    /// Convert `text` to `target_format`.
    ///
    /// Only [`Error::UnsupportedFormat`] is returned as an error. Renderer
    /// errors and panics produce a `text` result holding the original input
    /// with an [`ErrorInfo`] attached.
    pub fn convert_format(&self, text: &str, target_format: &str) -> Result<ConversionResult> {
        let start = Instant::now();
        lock(&self.counters).total_requests += 1;
        lock(&self.monitor).total_conversions += 1;

        let format = normalize_format(target_format);

        if format == TEXT_FORMAT {
            let mut result = ConversionResult::new(text.to_string(), TEXT_FORMAT, text);
            result.conversion_time = self.finish(start);
            return Ok(result);
        }

        let formatter = self
            .registry
            .get(&format)
            .ok_or_else(|| Error::UnsupportedFormat {
                format: format.clone(),
                supported: self.get_supported_formats(),
            })?;

        let key = content_hash([text, ":", format.as_str()]);
        let cached = lock(&self.cache).get(&key);
        if let Some(cached) = cached {
            lock(&self.counters).hits += 1;
            log::debug!("conversion cache hit for {} ({})", key, format);
            let mut result = cached.to_result(text);
            result.cache_hit = true;
            result.conversion_time = self.finish(start);
            return Ok(result);
        }

        lock(&self.counters).misses += 1;
        if text.chars().count() > self.options.large_text_threshold {
            lock(&self.monitor).large_text_conversions += 1;
        }

        match run_formatter(formatter.as_ref(), text) {
            Ok(content) => {
                let structure_info = if self.options.include_structure_info {
                    structure_info(formatter.as_ref(), text)
                } else {
                    None
                };

                let cached = CachedConversion {
                    content,
                    format,
                    structure_info,
                };
                let mut result = cached.to_result(text);

                if let Some(evicted) = lock(&self.cache).insert(key, cached) {
                    log::debug!("conversion cache evicted {}", evicted);
                }

                result.conversion_time = self.finish(start);
                Ok(result)
            }
            Err(error) => {
                log::error!("Format conversion failed: {}", error.message);
                log::warn!("returning original text in place of {} output", format);
                let mut result = ConversionResult::fallback(text, error);
                result.conversion_time = self.finish(start);
                Ok(result)
            }
        }
    }

    /// Convert untyped request fields.
    ///
    /// Fails with [`Error::Validation`] when `text` or `target_format` is not
    /// a JSON string.
    pub fn convert_value(&self, text: &Value, target_format: &Value) -> Result<ConversionResult> {
        let text = expect_str("text", text)?;
        let target_format = expect_str("target_format", target_format)?;
        self.convert_format(text, target_format)
    }

    /// Formats this converter can produce: `text` followed by every
    /// registered formatter.
    pub fn get_supported_formats(&self) -> Vec<String> {
        std::iter::once(TEXT_FORMAT.to_string())
            .chain(self.registry.names())
            .collect()
    }

    /// Check if a format is supported, ignoring case and surrounding
    /// whitespace.
    pub fn is_format_supported(&self, name: &str) -> bool {
        let name = normalize_format(name);
        name == TEXT_FORMAT || self.registry.contains(&name)
    }

    /// Check a conversion request without running it.
    pub fn validate_conversion_request(&self, text: &str, target_format: &str) -> ValidationReport {
        self.validate_parts(Some(text), Some(target_format))
    }

    /// Check untyped request fields without running the conversion.
    pub fn validate_request_value(&self, text: &Value, target_format: &Value) -> ValidationReport {
        self.validate_parts(text.as_str(), target_format.as_str())
    }

    fn validate_parts(&self, text: Option<&str>, target_format: Option<&str>) -> ValidationReport {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        match text {
            None => errors.push("Text must be a string".to_string()),
            Some(text) => {
                if text.trim().is_empty() {
                    warnings.push("Input text is empty or contains only whitespace".to_string());
                }
                if text.chars().count() > self.options.large_input_warning {
                    warnings.push("Input text is very large, conversion may take longer".to_string());
                }
            }
        }

        match target_format {
            None => errors.push("Target format must be a string".to_string()),
            Some(format) if !self.is_format_supported(format) => errors.push(format!(
                "Unsupported format '{}'. Supported formats: {}",
                format,
                self.get_supported_formats().join(", ")
            )),
            Some(_) => {}
        }

        ValidationReport::from_parts(errors, warnings)
    }

    /// Describe a downloadable file for `content` in `format`.
    ///
    /// Without a filename one is generated from the current time; a given
    /// filename gets the format's extension.
    pub fn prepare_export(
        &self,
        content: &str,
        format: &str,
        filename: Option<&str>,
    ) -> Result<ExportDescriptor> {
        let format = normalize_format(format);
        if !self.is_format_supported(&format) {
            return Err(Error::UnsupportedFormat {
                format,
                supported: self.get_supported_formats(),
            });
        }
        Ok(export::describe(content, &format, filename))
    }

    /// Snapshot of the result cache counters.
    pub fn cache_stats(&self) -> CacheStats {
        let (cache_size, max_cache_size) = {
            let cache = lock(&self.cache);
            (cache.len(), cache.capacity())
        };
        let counters = lock(&self.counters);

        CacheStats {
            hits: counters.hits,
            misses: counters.misses,
            total_requests: counters.total_requests,
            hit_rate: counters.hit_rate(),
            cache_size,
            max_cache_size,
        }
    }

    /// Snapshot of conversion timings, including the analyzer's counters.
    pub fn performance_stats(&self) -> PerformanceStats {
        let mut stats = lock(&self.monitor).snapshot(self.options.large_text_threshold);
        stats.analyzer_stats = Some(self.analyzer.stats());
        stats
    }

    /// Drop all cached results and structures and reset the cache counters.
    pub fn clear_cache(&self) {
        lock(&self.cache).clear();
        *lock(&self.counters) = CacheCounters::default();
        self.analyzer.clear_cache();
        log::debug!("conversion and structure caches cleared");
    }

    /// Reset timing statistics and the analyzer's counters.
    pub fn reset_performance_stats(&self) {
        lock(&self.monitor).reset();
        self.analyzer.reset_stats();
    }

    /// Change the result cache capacity, evicting the oldest entries that no
    /// longer fit. Returns the number of evicted entries.
    pub fn resize_cache(&self, capacity: usize) -> Result<usize> {
        if capacity == 0 {
            return Err(Error::InvalidConfig(
                "cache size must be at least 1".to_string(),
            ));
        }
        let evicted = lock(&self.cache).resize(capacity);
        log::debug!("conversion cache resized to {} ({} evicted)", capacity, evicted);
        Ok(evicted)
    }

    fn finish(&self, start: Instant) -> f64 {
        let elapsed = start.elapsed().as_secs_f64();
        lock(&self.monitor).record(elapsed);
        elapsed
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

/// Trim and lowercase a format name.
pub fn normalize_format(name: &str) -> String {
    name.trim().to_lowercase()
}

/// JSON type name of a value, as reported in validation errors.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn expect_str<'a>(field: &str, value: &'a Value) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| Error::validation(field, json_type_name(value)))
}

fn run_formatter(formatter: &dyn Formatter, text: &str) -> std::result::Result<String, ErrorInfo> {
    match panic::catch_unwind(AssertUnwindSafe(|| formatter.convert(text))) {
        Ok(Ok(content)) => Ok(content),
        Ok(Err(err)) => Err(ErrorInfo::fallback(err.to_string(), err.kind())),
        Err(payload) => Err(ErrorInfo::fallback(panic_message(payload.as_ref()), "Panic")),
    }
}

fn structure_info(formatter: &dyn Formatter, text: &str) -> Option<StructureInfo> {
    let analyzer = formatter.analyzer()?;
    let lines: Vec<&str> = text.split('\n').collect();

    match panic::catch_unwind(AssertUnwindSafe(|| analyzer.analyze(&lines).info())) {
        Ok(info) => Some(info),
        Err(payload) => {
            let error = Error::Analysis(panic_message(payload.as_ref()));
            log::warn!("{}; omitting structure info", error);
            None
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "formatter panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_convert_options_builder() {
        let options = ConvertOptions::new()
            .with_cache_capacity(0)
            .with_duration_window(10)
            .with_structure_info(false);

        assert_eq!(options.cache_capacity, 1);
        assert_eq!(options.duration_window, 10);
        assert!(!options.include_structure_info);
        assert_eq!(ConvertOptions::default().large_text_threshold, 5_000);
    }

    #[test]
    fn test_registry_with_defaults() {
        let registry = FormatterRegistry::with_defaults();
        assert!(registry.contains("markdown"));
        assert!(registry.contains(" MarkDown "));
        assert!(!registry.contains("html"));
        assert_eq!(registry.names(), vec!["markdown".to_string()]);
    }

    #[test]
    fn test_registry_rejects_reserved_name() {
        struct Plain;
        impl Formatter for Plain {
            fn name(&self) -> &str {
                "Text"
            }
            fn convert(&self, text: &str) -> Result<String> {
                Ok(text.to_string())
            }
        }

        let mut registry = FormatterRegistry::new();
        let err = registry.register(Arc::new(Plain)).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_supported_formats() {
        let converter = Converter::new();
        assert_eq!(converter.get_supported_formats(), vec!["text", "markdown"]);
        assert!(converter.is_format_supported("  TEXT "));
        assert!(converter.is_format_supported("Markdown"));
        assert!(!converter.is_format_supported("pdf"));
    }

    #[test]
    fn test_text_target_is_identity() {
        let converter = Converter::new();
        let result = converter.convert_format("# 原样\n内容", " Text ").unwrap();
        assert_eq!(result.content, "# 原样\n内容");
        assert_eq!(result.format, "text");
        assert!(!result.cache_hit);
        assert!(result.structure_info.is_none());
        assert_eq!(converter.cache_stats().cache_size, 0);
    }

    #[test]
    fn test_structure_info_attached() {
        let converter = Converter::new();
        let result = converter
            .convert_format("第一章 概述\n- 苹果\n- 香蕉", "markdown")
            .unwrap();
        let info = result.structure_info.unwrap();
        assert_eq!(info.headings_count, 1);
        assert_eq!(info.lists_count, 2);
        assert_eq!(info.tables_count, 0);
    }

    #[test]
    fn test_json_type_names() {
        assert_eq!(json_type_name(&json!(1)), "number");
        assert_eq!(json_type_name(&json!(null)), "null");
        assert_eq!(json_type_name(&json!([1])), "array");
        assert_eq!(json_type_name(&json!({})), "object");
        assert_eq!(json_type_name(&json!(true)), "boolean");
    }

    #[test]
    fn test_resize_cache_rejects_zero() {
        let converter = Converter::new();
        assert!(matches!(
            converter.resize_cache(0),
            Err(Error::InvalidConfig(_))
        ));
        assert_eq!(converter.resize_cache(10).unwrap(), 0);
        assert_eq!(converter.cache_stats().max_cache_size, 10);
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn Any + Send> = Box::new(42);
        assert_eq!(panic_message(payload.as_ref()), "formatter panicked");
    }
}
