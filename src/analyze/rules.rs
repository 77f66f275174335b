//! Heading classification rules.
//!
//! Classification is table driven. Every line is checked against
//! [`HEADING_RULES`] in order and the first matching rule supplies the
//! structural score weight, the heading level and the base confidence. The
//! remaining signals (keywords, length, punctuation) are added on top by
//! [`heading_score`].

use once_cell::sync::Lazy;
use regex::Regex;

use super::lists;

/// Keywords whose presence hints at a heading.
pub const HEADING_INDICATORS: &[&str] = &["第", "章", "节", "部分", "概述", "总结", "介绍", "说明"];

/// Sentence-terminal punctuation.
pub const TERMINAL_PUNCTUATION: &[char] = &['。', '！', '？'];

const KEYWORD_WEIGHT: f64 = 0.3;
const SHORT_LINE_WEIGHT: f64 = 0.3;
const MEDIUM_LINE_WEIGHT: f64 = 0.1;
const NO_TERMINAL_WEIGHT: f64 = 0.2;
const LONG_SENTENCE_PENALTY: f64 = -0.3;
const LONG_COLON_PENALTY: f64 = -0.2;

const SHORT_LINE: usize = 20;
const MEDIUM_LINE: usize = 40;
const LONG_COLON_LINE: usize = 30;
const LONG_HEADING: usize = 50;

const DEFAULT_LEVEL: u8 = 1;
const DEFAULT_CONFIDENCE: f64 = 0.5;

// Float sums such as 0.6 + 0.1 - 0.2 land just below 0.5.
const SCORE_EPSILON: f64 = 1e-9;

/// How a rule recognizes a line.
#[derive(Debug)]
pub enum Matcher {
    /// Regex anchored at the start of the line
    Prefix(Regex),
    /// Any of the keywords occurs in the line
    Keywords(&'static [&'static str]),
}

impl Matcher {
    fn matches(&self, line: &str) -> bool {
        match self {
            Matcher::Prefix(re) => re.is_match(line),
            Matcher::Keywords(words) => words.iter().any(|w| line.contains(w)),
        }
    }
}

/// One row of the heading rule table.
#[derive(Debug)]
pub struct HeadingRule {
    /// Rule name, used in debug output
    pub name: &'static str,
    /// Line recognizer
    pub matcher: Matcher,
    /// Heading level assigned on match
    pub level: u8,
    /// Base confidence assigned on match
    pub confidence: f64,
    /// Contribution to the candidacy score
    pub weight: f64,
}

impl HeadingRule {
    fn prefix(name: &'static str, pattern: &str, level: u8, confidence: f64, weight: f64) -> Self {
        Self {
            name,
            matcher: Matcher::Prefix(Regex::new(pattern).unwrap()),
            level,
            confidence,
            weight,
        }
    }

    fn keywords(name: &'static str, words: &'static [&'static str], level: u8) -> Self {
        Self {
            name,
            matcher: Matcher::Keywords(words),
            level,
            confidence: 0.7,
            weight: 0.0,
        }
    }

    /// Check if the rule applies to a trimmed line.
    pub fn matches(&self, line: &str) -> bool {
        self.matcher.matches(line)
    }
}

/// Ordered heading rules; the first match wins.
pub static HEADING_RULES: Lazy<Vec<HeadingRule>> = Lazy::new(|| {
    vec![
        HeadingRule::prefix("chapter", r"^第[一二三四五六七八九十]+章", 1, 0.9, 0.6),
        HeadingRule::prefix("section", r"^第[一二三四五六七八九十]+节", 2, 0.8, 0.6),
        HeadingRule::prefix("numbered_section", r"^\d+\.\d+", 2, 0.8, 0.4),
        HeadingRule::prefix("numbered_main", r"^\d+\.", 1, 0.8, 0.4),
        HeadingRule::keywords("summary_keyword", &["概述", "总结", "介绍"], 2),
        HeadingRule::keywords("part_keyword", &["部分", "章节"], 1),
    ]
});

/// Find the first rule matching a trimmed line.
pub fn matching_rule(line: &str) -> Option<&'static HeadingRule> {
    HEADING_RULES.iter().find(|rule| rule.matches(line))
}

/// Check if a line ends with sentence-terminal punctuation.
pub fn ends_with_terminal(line: &str) -> bool {
    line.ends_with(TERMINAL_PUNCTUATION)
}

/// Lines longer than 40 characters that end like a sentence.
pub fn is_long_sentence(line: &str) -> bool {
    line.chars().count() > MEDIUM_LINE && ends_with_terminal(line)
}

/// Aggregate heading score of a trimmed line.
///
/// List-marker lines are not special-cased here; candidacy checks them
/// separately.
pub fn heading_score(line: &str) -> f64 {
    let len = line.chars().count();
    let mut score = matching_rule(line).map_or(0.0, |rule| rule.weight);

    if HEADING_INDICATORS.iter().any(|k| line.contains(k)) {
        score += KEYWORD_WEIGHT;
    }

    if len <= SHORT_LINE {
        score += SHORT_LINE_WEIGHT;
    } else if len <= MEDIUM_LINE {
        score += MEDIUM_LINE_WEIGHT;
    }

    let terminal = ends_with_terminal(line);
    if !terminal {
        score += NO_TERMINAL_WEIGHT;
    }

    if len > MEDIUM_LINE && terminal {
        score += LONG_SENTENCE_PENALTY;
    }

    if len > LONG_COLON_LINE && (line.ends_with('：') || line.ends_with(':')) {
        score += LONG_COLON_PENALTY;
    }

    score
}

/// Check if a trimmed line may become a heading.
pub fn is_candidate(line: &str, min_len: usize, max_len: usize, threshold: f64) -> bool {
    let len = line.chars().count();
    if len < min_len || len > max_len {
        return false;
    }

    if lists::is_list_line(line) || is_long_sentence(line) {
        return false;
    }

    heading_score(line) + SCORE_EPSILON >= threshold
}

/// Level and confidence for a heading candidate at `line_number` of
/// `total_lines` preprocessed lines.
pub fn level_and_confidence(line: &str, line_number: usize, total_lines: usize) -> (u8, f64) {
    let (level, mut confidence) = matching_rule(line)
        .map_or((DEFAULT_LEVEL, DEFAULT_CONFIDENCE), |rule| {
            (rule.level, rule.confidence)
        });

    let position = if total_lines > 0 {
        line_number as f64 / total_lines as f64
    } else {
        0.0
    };
    if position < 0.1 {
        confidence += 0.1;
    } else if position > 0.9 {
        confidence += 0.05;
    }

    let len = line.chars().count();
    if len <= SHORT_LINE {
        confidence += 0.1;
    } else if len > LONG_HEADING {
        confidence -= 0.1;
    }

    (level, confidence.clamp(0.0, 1.0))
}
