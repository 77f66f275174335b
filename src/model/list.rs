//! List item types.

use serde::{Deserialize, Serialize};

/// Kind of list a marker introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    /// Numbered or lettered item (`1.`, `a)`, `一.`)
    Ordered,
    /// Bulleted item (`-`, `•`, `*`, `·`, `○`)
    Unordered,
}

impl ListKind {
    /// Lowercase name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ListKind::Ordered => "ordered",
            ListKind::Unordered => "unordered",
        }
    }
}

/// A line classified as a list item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    /// Item text with the marker removed
    pub text: String,

    /// Ordered or unordered
    #[serde(rename = "type")]
    pub kind: ListKind,

    /// Nesting depth; the shallowest item of a structure is 0
    pub level: usize,

    /// Index into the preprocessed line sequence
    pub line_number: usize,
}

impl ListItem {
    /// Create a new list item.
    pub fn new(text: impl Into<String>, kind: ListKind, level: usize, line_number: usize) -> Self {
        Self {
            text: text.into(),
            kind,
            level,
            line_number,
        }
    }

    /// Create an unordered item.
    pub fn unordered(text: impl Into<String>, level: usize, line_number: usize) -> Self {
        Self::new(text, ListKind::Unordered, level, line_number)
    }

    /// Create an ordered item.
    pub fn ordered(text: impl Into<String>, level: usize, line_number: usize) -> Self {
        Self::new(text, ListKind::Ordered, level, line_number)
    }

    /// Check if this is an ordered item.
    pub fn is_ordered(&self) -> bool {
        self.kind == ListKind::Ordered
    }
}
