//! Structure inference for plain text lines.
//!
//! The analyzer classifies each line as a heading, a list item or paragraph
//! text, using the rule table in [`rules`] and the marker patterns in
//! [`lists`]. Results are cached by content hash and the analyzer keeps
//! running counters; both live behind mutexes so one analyzer can be shared
//! between threads.
//!
//! # Example
//!
//! ```
//! use structmd::StructureAnalyzer;
//!
//! let analyzer = StructureAnalyzer::new();
//! let structure = analyzer.analyze(&["第一章 概述", "这是正文。", "- 苹果", "- 香蕉"]);
//!
//! assert_eq!(structure.headings.len(), 1);
//! assert_eq!(structure.lists.len(), 2);
//! assert_eq!(structure.paragraphs, vec!["这是正文。".to_string()]);
//! ```

pub mod lists;
mod options;
pub mod rules;

pub use options::AnalyzerOptions;

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::cache::{content_hash, BoundedCache};
use crate::model::{Heading, ListItem, TextStructure};

/// A preprocessed line: the caller's line and its trimmed text.
#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    raw: &'a str,
    text: &'a str,
}

/// Snapshot of analyzer counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerStats {
    /// Calls to [`StructureAnalyzer::analyze`]
    pub total_analyses: u64,

    /// Calls answered from the cache
    pub cache_hits: u64,

    /// `cache_hits / total_analyses`
    pub cache_hit_rate: f64,

    /// Mean duration of uncached analyses, in seconds
    pub average_analysis_time: f64,

    /// Uncached inputs above the large input threshold
    pub large_text_count: u64,

    /// Structures currently cached
    pub cache_size: usize,

    /// Cache capacity
    pub max_cache_size: usize,
}

#[derive(Debug, Default)]
struct Counters {
    total_analyses: u64,
    cache_hits: u64,
    computed: u64,
    average_analysis_time: f64,
    large_text_count: u64,
}

/// Heuristic classifier for headings, lists and paragraphs.
#[derive(Debug)]
pub struct StructureAnalyzer {
    options: AnalyzerOptions,
    cache: Mutex<BoundedCache<TextStructure>>,
    counters: Mutex<Counters>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl StructureAnalyzer {
    /// Create an analyzer with default options.
    pub fn new() -> Self {
        Self::with_options(AnalyzerOptions::default())
    }

    /// Create an analyzer with custom options.
    pub fn with_options(options: AnalyzerOptions) -> Self {
        Self {
            cache: Mutex::new(BoundedCache::new(options.cache_capacity)),
            counters: Mutex::new(Counters::default()),
            options,
        }
    }

    /// Get the analyzer options.
    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    /// Analyze an ordered sequence of lines.
    ///
    /// Line numbers in the result index the preprocessed sequence: every
    /// line trimmed, empty lines dropped. Identical input always yields an
    /// identical structure.
    pub fn analyze<S: AsRef<str>>(&self, lines: &[S]) -> TextStructure {
        let start = Instant::now();
        lock(&self.counters).total_analyses += 1;

        if lines.is_empty() {
            return TextStructure::default();
        }

        let raw_lines: Vec<&str> = lines.iter().map(|l| l.as_ref()).collect();
        let key = content_hash(join_lines(&raw_lines));

        if let Some(cached) = lock(&self.cache).get(&key) {
            lock(&self.counters).cache_hits += 1;
            log::debug!("structure cache hit for {}", key);
            return cached;
        }

        let total_chars: usize = raw_lines.iter().map(|l| l.chars().count()).sum();
        let is_large = total_chars > self.options.large_input_threshold;

        let processed = preprocess(&raw_lines);
        let headings = self.classify_headings(&processed);
        let claimed: HashSet<usize> = headings.iter().map(|h| h.line_number).collect();
        let lists = classify_lists(&processed, &claimed);
        let paragraphs = extract_paragraphs(&processed, &headings, &lists);

        log::debug!(
            "analyzed {} lines: {} headings, {} list items, {} paragraphs",
            processed.len(),
            headings.len(),
            lists.len(),
            paragraphs.len()
        );

        let structure = TextStructure {
            headings,
            paragraphs,
            lists,
            tables: Vec::new(),
            raw_lines: raw_lines.iter().map(|l| l.to_string()).collect(),
        };

        if let Some(evicted) = lock(&self.cache).insert(key, structure.clone()) {
            log::debug!("structure cache evicted {}", evicted);
        }

        let elapsed = start.elapsed().as_secs_f64();
        let mut counters = lock(&self.counters);
        counters.computed += 1;
        counters.average_analysis_time +=
            (elapsed - counters.average_analysis_time) / counters.computed as f64;
        if is_large {
            counters.large_text_count += 1;
        }

        structure
    }

    /// Split text on newlines and analyze it.
    pub fn analyze_text(&self, text: &str) -> TextStructure {
        let lines: Vec<&str> = text.split('\n').collect();
        self.analyze(&lines)
    }

    /// Aggregate heading score of a single line.
    pub fn heading_score(&self, line: &str) -> f64 {
        rules::heading_score(line.trim())
    }

    /// Check if a single line qualifies as a heading candidate.
    pub fn is_heading_candidate(&self, line: &str) -> bool {
        rules::is_candidate(
            line.trim(),
            self.options.min_heading_length,
            self.options.max_heading_length,
            self.options.heading_score_threshold,
        )
    }

    /// Detect headings in already preprocessed lines.
    pub fn detect_headings<S: AsRef<str>>(&self, lines: &[S]) -> Vec<Heading> {
        let raw: Vec<&str> = lines.iter().map(|l| l.as_ref()).collect();
        self.classify_headings(&preprocess(&raw))
    }

    /// Detect list items in already preprocessed lines.
    ///
    /// Indentation is measured on the lines as given.
    pub fn detect_lists<S: AsRef<str>>(&self, lines: &[S]) -> Vec<ListItem> {
        let raw: Vec<&str> = lines.iter().map(|l| l.as_ref()).collect();
        classify_lists(&preprocess(&raw), &HashSet::new())
    }

    fn classify_headings(&self, lines: &[Line<'_>]) -> Vec<Heading> {
        let total = lines.len();
        lines
            .iter()
            .enumerate()
            .filter(|(_, line)| self.is_heading_candidate(line.text))
            .filter_map(|(i, line)| {
                let (level, confidence) = rules::level_and_confidence(line.text, i, total);
                (confidence > self.options.confidence_floor)
                    .then(|| Heading::new(line.text, level, i, confidence))
            })
            .collect()
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> AnalyzerStats {
        let (cache_size, max_cache_size) = {
            let cache = lock(&self.cache);
            (cache.len(), cache.capacity())
        };
        let counters = lock(&self.counters);

        let cache_hit_rate = if counters.total_analyses > 0 {
            counters.cache_hits as f64 / counters.total_analyses as f64
        } else {
            0.0
        };

        AnalyzerStats {
            total_analyses: counters.total_analyses,
            cache_hits: counters.cache_hits,
            cache_hit_rate,
            average_analysis_time: counters.average_analysis_time,
            large_text_count: counters.large_text_count,
            cache_size,
            max_cache_size,
        }
    }

    /// Number of cached structures.
    pub fn cache_len(&self) -> usize {
        lock(&self.cache).len()
    }

    /// Drop all cached structures.
    pub fn clear_cache(&self) {
        lock(&self.cache).clear();
    }

    /// Reset all counters to zero.
    pub fn reset_stats(&self) {
        *lock(&self.counters) = Counters::default();
    }
}

impl Default for StructureAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn join_lines<'a>(lines: &'a [&'a str]) -> impl Iterator<Item = &'a str> + 'a {
    lines
        .iter()
        .enumerate()
        .flat_map(|(i, line)| [if i == 0 { "" } else { "\n" }, *line])
}

fn preprocess<'a>(lines: &[&'a str]) -> Vec<Line<'a>> {
    lines
        .iter()
        .map(|&raw| Line {
            raw,
            text: raw.trim(),
        })
        .filter(|line| !line.text.is_empty())
        .collect()
}

fn classify_lists(lines: &[Line<'_>], claimed: &HashSet<usize>) -> Vec<ListItem> {
    let mut items: Vec<ListItem> = lines
        .iter()
        .enumerate()
        .filter(|(i, _)| !claimed.contains(i))
        .filter_map(|(i, line)| lists::parse_item(line.raw, i))
        .collect();
    lists::adjust_nesting(&mut items);
    items
}

fn extract_paragraphs(lines: &[Line<'_>], headings: &[Heading], lists: &[ListItem]) -> Vec<String> {
    let used: HashSet<usize> = headings
        .iter()
        .map(|h| h.line_number)
        .chain(lists.iter().map(|l| l.line_number))
        .collect();

    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        if used.contains(&i) {
            if !current.is_empty() {
                paragraphs.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(line.text);
        }
    }

    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }

    paragraphs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ListKind;

    #[test]
    fn test_empty_input() {
        let analyzer = StructureAnalyzer::new();
        let empty: [&str; 0] = [];
        let structure = analyzer.analyze(&empty);
        assert!(structure.is_empty());
        assert!(structure.raw_lines.is_empty());
        assert_eq!(analyzer.stats().total_analyses, 1);
    }

    #[test]
    fn test_whitespace_only_lines() {
        let analyzer = StructureAnalyzer::new();
        let structure = analyzer.analyze(&["   ", "\t", ""]);
        assert!(structure.is_empty());
        assert_eq!(structure.raw_lines.len(), 3);
    }

    #[test]
    fn test_line_numbers_index_preprocessed_lines() {
        let analyzer = StructureAnalyzer::new();
        let structure = analyzer.analyze(&["", "第一章 概述", "", "", "- 苹果", "   "]);

        assert_eq!(structure.headings[0].line_number, 0);
        assert_eq!(structure.lists[0].line_number, 1);
    }

    #[test]
    fn test_chapter_heading() {
        let analyzer = StructureAnalyzer::new();
        let structure = analyzer.analyze(&["第一章 概述", "这是概述内容，介绍了整个系统的背景和设计目标以及后续的安排计划。"]);

        let heading = &structure.headings[0];
        assert_eq!(heading.text, "第一章 概述");
        assert_eq!(heading.level, 1);
        assert!((heading.confidence - 1.0).abs() < 1e-9);
        assert_eq!(structure.paragraphs.len(), 1);
    }

    #[test]
    fn test_list_detection_with_indentation() {
        let analyzer = StructureAnalyzer::new();
        let structure = analyzer.analyze(&[
            "- 水果类食品",
            "  - 苹果和梨",
            "- 蔬菜类食品",
            "1. 准备材料",
        ]);

        let levels: Vec<usize> = structure.lists.iter().map(|l| l.level).collect();
        assert_eq!(levels, vec![0, 1, 0, 0]);
        assert_eq!(structure.lists[3].kind, ListKind::Ordered);
        assert!(structure.headings.is_empty());
    }

    #[test]
    fn test_lines_claimed_once() {
        let analyzer = StructureAnalyzer::new();
        let structure = analyzer.analyze(&[
            "第一章 概述",
            "1. 准备材料",
            "2. 开始制作",
            "1.1 背景介绍",
            "正文内容在这里。",
        ]);

        let mut seen = HashSet::new();
        for n in structure
            .headings
            .iter()
            .map(|h| h.line_number)
            .chain(structure.lists.iter().map(|l| l.line_number))
        {
            assert!(seen.insert(n), "line {} claimed twice", n);
        }
        assert_eq!(structure.headings.len(), 2);
        assert_eq!(structure.lists.len(), 2);
    }

    #[test]
    fn test_paragraph_runs() {
        let analyzer = StructureAnalyzer::new();
        let structure = analyzer.analyze(&[
            "这是第一段的第一句话，内容比较长，足以避免被识别为标题。",
            "这是第一段的第二句话，同样比较长，也不会被识别为标题。",
            "- 列表项",
            "这是第二段落的内容，它出现在列表之后，所以是一个新的段落。",
        ]);

        assert_eq!(structure.paragraphs.len(), 2);
        assert!(structure.paragraphs[0].contains("第一句话"));
        assert!(structure.paragraphs[0].contains(" 这是第一段的第二句话"));
    }

    #[test]
    fn test_cache_hit_and_stats() {
        let analyzer = StructureAnalyzer::new();
        let lines = ["第一章 概述", "正文内容在这里。"];

        let first = analyzer.analyze(&lines);
        let second = analyzer.analyze(&lines);
        assert_eq!(first, second);

        let stats = analyzer.stats();
        assert_eq!(stats.total_analyses, 2);
        assert_eq!(stats.cache_hits, 1);
        assert!((stats.cache_hit_rate - 0.5).abs() < 1e-9);
        assert_eq!(stats.cache_size, 1);

        analyzer.clear_cache();
        analyzer.reset_stats();
        assert_eq!(analyzer.cache_len(), 0);
        assert_eq!(analyzer.stats().total_analyses, 0);
    }

    #[test]
    fn test_cache_capacity_bound() {
        let analyzer = StructureAnalyzer::with_options(AnalyzerOptions::new().with_cache_capacity(3));
        for i in 0..10 {
            analyzer.analyze(&[format!("第{}行内容", i)]);
        }
        assert_eq!(analyzer.cache_len(), 3);
    }

    #[test]
    fn test_large_input_counted() {
        let analyzer =
            StructureAnalyzer::with_options(AnalyzerOptions::new().with_large_input_threshold(10));
        analyzer.analyze(&["这一行的字符数量超过了十个字符"]);
        analyzer.analyze(&["短"]);
        assert_eq!(analyzer.stats().large_text_count, 1);
    }

    #[test]
    fn test_join_lines_matches_newline_join() {
        let lines = ["a", "b", "c"];
        assert_eq!(content_hash(join_lines(&lines)), content_hash(["a\nb\nc"]));
    }
}
