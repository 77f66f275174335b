//! Converter telemetry.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::analyze::AnalyzerStats;

/// Snapshot of result cache counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Requests answered from the cache
    pub hits: u64,

    /// Requests that had to be rendered
    pub misses: u64,

    /// All conversion requests, including `text` targets and unsupported formats
    pub total_requests: u64,

    /// `hits / total_requests`
    pub hit_rate: f64,

    /// Entries currently cached
    pub cache_size: usize,

    /// Cache capacity
    pub max_cache_size: usize,
}

/// Snapshot of conversion timings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceStats {
    /// Conversion calls, including unsupported formats
    pub total_conversions: u64,

    /// Rendered inputs above the large text threshold
    pub large_text_conversions: u64,

    /// Large text threshold, in characters
    pub large_text_threshold: usize,

    /// `large_text_conversions / total_conversions`
    pub large_text_ratio: f64,

    /// Durations currently in the rolling window
    pub recorded_conversions: usize,

    /// Mean duration over the window, in seconds
    pub average_conversion_time: f64,

    /// Shortest duration in the window, in seconds
    pub min_conversion_time: f64,

    /// Longest duration in the window, in seconds
    pub max_conversion_time: f64,

    /// Counters of the shared analyzer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzer_stats: Option<AnalyzerStats>,
}

#[derive(Debug, Default)]
pub(crate) struct CacheCounters {
    pub hits: u64,
    pub misses: u64,
    pub total_requests: u64,
}

impl CacheCounters {
    pub fn hit_rate(&self) -> f64 {
        if self.total_requests > 0 {
            self.hits as f64 / self.total_requests as f64
        } else {
            0.0
        }
    }
}

/// Rolling record of the most recent conversion durations.
#[derive(Debug)]
pub(crate) struct PerformanceMonitor {
    durations: VecDeque<f64>,
    window: usize,
    pub total_conversions: u64,
    pub large_text_conversions: u64,
}

impl PerformanceMonitor {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            durations: VecDeque::with_capacity(window),
            window,
            total_conversions: 0,
            large_text_conversions: 0,
        }
    }

    pub fn record(&mut self, seconds: f64) {
        if self.durations.len() == self.window {
            self.durations.pop_front();
        }
        self.durations.push_back(seconds);
    }

    pub fn snapshot(&self, large_text_threshold: usize) -> PerformanceStats {
        let recorded = self.durations.len();
        let (average, min, max) = if recorded > 0 {
            let sum: f64 = self.durations.iter().sum();
            let min = self.durations.iter().copied().fold(f64::INFINITY, f64::min);
            let max = self.durations.iter().copied().fold(0.0, f64::max);
            (sum / recorded as f64, min, max)
        } else {
            (0.0, 0.0, 0.0)
        };

        let large_text_ratio = if self.total_conversions > 0 {
            self.large_text_conversions as f64 / self.total_conversions as f64
        } else {
            0.0
        };

        PerformanceStats {
            total_conversions: self.total_conversions,
            large_text_conversions: self.large_text_conversions,
            large_text_threshold,
            large_text_ratio,
            recorded_conversions: recorded,
            average_conversion_time: average,
            min_conversion_time: min,
            max_conversion_time: max,
            analyzer_stats: None,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.window);
    }
}
