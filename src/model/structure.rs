//! Whole-document structure.

use super::{Heading, ListItem, Table};
use serde::{Deserialize, Serialize};

/// The inferred skeleton of a text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextStructure {
    /// Detected headings in line order
    pub headings: Vec<Heading>,

    /// Runs of unclaimed lines, each joined with single spaces
    pub paragraphs: Vec<String>,

    /// Detected list items in line order
    pub lists: Vec<ListItem>,

    /// Always empty; table recognition is not implemented
    pub tables: Vec<Table>,

    /// The input lines exactly as supplied
    pub raw_lines: Vec<String>,
}

impl TextStructure {
    /// Create an empty structure holding only the raw lines.
    pub fn empty(raw_lines: Vec<String>) -> Self {
        Self {
            raw_lines,
            ..Self::default()
        }
    }

    /// Check if nothing was recognized (no headings, lists or paragraphs).
    pub fn is_empty(&self) -> bool {
        self.headings.is_empty() && self.lists.is_empty() && self.paragraphs.is_empty()
    }

    /// Element counts.
    pub fn info(&self) -> StructureInfo {
        StructureInfo {
            headings_count: self.headings.len(),
            paragraphs_count: self.paragraphs.len(),
            lists_count: self.lists.len(),
            tables_count: self.tables.len(),
        }
    }
}

/// Element counts of a [`TextStructure`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureInfo {
    /// Number of headings
    pub headings_count: usize,
    /// Number of paragraphs
    pub paragraphs_count: usize,
    /// Number of list items
    pub lists_count: usize,
    /// Number of tables
    pub tables_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structure_info_counts() {
        let structure = TextStructure {
            headings: vec![Heading::new("概述", 1, 0, 0.9)],
            paragraphs: vec!["正文".to_string(), "更多正文".to_string()],
            lists: vec![ListItem::unordered("苹果", 0, 2)],
            ..Default::default()
        };

        let info = structure.info();
        assert_eq!(info.headings_count, 1);
        assert_eq!(info.paragraphs_count, 2);
        assert_eq!(info.lists_count, 1);
        assert_eq!(info.tables_count, 0);
        assert!(!structure.is_empty());
    }

    #[test]
    fn test_heading_new_clamps() {
        let heading = Heading::new("x", 9, 0, 1.4);
        assert_eq!(heading.level, 6);
        assert_eq!(heading.confidence, 1.0);
    }
}
