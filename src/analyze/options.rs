//! Analyzer options and configuration.

/// Options for structure analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerOptions {
    /// Shortest line (in characters) that may become a heading
    pub min_heading_length: usize,

    /// Longest line (in characters) that may become a heading
    pub max_heading_length: usize,

    /// Minimum aggregate score for a heading candidate
    pub heading_score_threshold: f64,

    /// Candidates need a confidence strictly above this floor
    pub confidence_floor: f64,

    /// Number of analyzed structures kept in the cache
    pub cache_capacity: usize,

    /// Inputs with more characters than this are counted as large
    pub large_input_threshold: usize,
}

impl AnalyzerOptions {
    /// Create new analyzer options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the accepted heading length range (in characters).
    pub fn with_heading_length(mut self, min: usize, max: usize) -> Self {
        self.min_heading_length = min.min(max);
        self.max_heading_length = max.max(min);
        self
    }

    /// Set the heading score threshold.
    pub fn with_score_threshold(mut self, threshold: f64) -> Self {
        self.heading_score_threshold = threshold;
        self
    }

    /// Set the confidence floor.
    pub fn with_confidence_floor(mut self, floor: f64) -> Self {
        self.confidence_floor = floor.clamp(0.0, 1.0);
        self
    }

    /// Set the cache capacity.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity.max(1);
        self
    }

    /// Set the large input threshold (in characters).
    pub fn with_large_input_threshold(mut self, chars: usize) -> Self {
        self.large_input_threshold = chars;
        self
    }
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            min_heading_length: 2,
            max_heading_length: 100,
            heading_score_threshold: 0.5,
            confidence_floor: 0.3,
            cache_capacity: 100,
            large_input_threshold: 10_000,
        }
    }
}
