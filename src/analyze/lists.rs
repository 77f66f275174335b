//! List item detection and nesting.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{ListItem, ListKind};

static UNORDERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-•*·○]\s+(.+)").unwrap());

static ORDERED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+|[一二三四五六七八九十]+|[A-Z]|[a-z])[.)]\s+(.+)").unwrap()
});

/// Items further apart than this (in preprocessed lines) belong to
/// different lists.
pub const GROUP_GAP: usize = 2;

/// Check if a trimmed line starts with a recognized list marker.
pub fn is_list_line(line: &str) -> bool {
    UNORDERED.is_match(line) || ORDERED.is_match(line)
}

/// Remove a leading list marker, if any, from a trimmed line.
pub fn strip_marker(line: &str) -> &str {
    if let Some(text) = UNORDERED.captures(line).and_then(|caps| caps.get(1)) {
        return text.as_str();
    }
    if let Some(text) = ORDERED.captures(line).and_then(|caps| caps.get(2)) {
        return text.as_str();
    }
    line
}

/// Match a list marker on `raw`, returning the kind and the item text.
///
/// The marker is matched on the trimmed line; indentation is measured on
/// `raw` itself.
pub fn parse_item(raw: &str, line_number: usize) -> Option<ListItem> {
    let line = raw.trim();
    if line.is_empty() {
        return None;
    }

    let (kind, text) = if let Some(caps) = UNORDERED.captures(line) {
        (ListKind::Unordered, caps.get(1)?.as_str())
    } else if let Some(caps) = ORDERED.captures(line) {
        (ListKind::Ordered, caps.get(2)?.as_str())
    } else {
        return None;
    };

    Some(ListItem::new(
        text.trim(),
        kind,
        indentation_level(raw),
        line_number,
    ))
}

/// Nesting level implied by leading whitespace: one level per tab when tabs
/// are present, otherwise one level per two spaces.
pub fn indentation_level(raw: &str) -> usize {
    let leading = &raw[..raw.len() - raw.trim_start().len()];
    if leading.contains('\t') {
        leading.matches('\t').count()
    } else {
        leading.chars().count() / 2
    }
}

/// Normalize levels so the shallowest item is 0, then treat an item less
/// than half as long as its predecessor as the predecessor's sub-item.
/// The length rule is not applied across a gap of more than
/// [`GROUP_GAP`] lines.
pub fn adjust_nesting(items: &mut [ListItem]) {
    let Some(min_level) = items.iter().map(|item| item.level).min() else {
        return;
    };
    for item in items.iter_mut() {
        item.level -= min_level;
    }

    for i in 1..items.len() {
        let (before, after) = items.split_at_mut(i);
        let previous = &before[i - 1];
        let current = &mut after[0];

        if current.line_number - previous.line_number > GROUP_GAP {
            continue;
        }

        let current_len = current.text.chars().count();
        let previous_len = previous.text.chars().count();
        if current_len * 2 < previous_len {
            current.level = current.level.max(previous.level + 1);
        }
    }
}
