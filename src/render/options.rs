//! Rendering options and configuration.

/// Options for rendering a structure as Markdown.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Maximum heading level (1-6)
    pub max_heading_level: u8,

    /// Spaces of indentation per list nesting level
    pub indent_width: usize,

    /// Character to use for unordered list markers
    pub unordered_marker: char,

    /// Escape special Markdown characters in paragraphs
    pub escape_special_chars: bool,

    /// Normalize paragraph text to Unicode NFC
    pub normalize_unicode: bool,

    /// List items further apart than this many lines start a new group
    pub list_group_gap: usize,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum heading level.
    pub fn with_max_heading(mut self, level: u8) -> Self {
        self.max_heading_level = level.clamp(1, 6);
        self
    }

    /// Set list indentation width.
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Set unordered list marker.
    pub fn with_list_marker(mut self, marker: char) -> Self {
        self.unordered_marker = marker;
        self
    }

    /// Enable or disable Markdown escaping.
    pub fn with_escape(mut self, escape: bool) -> Self {
        self.escape_special_chars = escape;
        self
    }

    /// Enable or disable NFC normalization.
    pub fn with_normalize_unicode(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }

    /// Set the line gap that separates list groups.
    pub fn with_list_group_gap(mut self, gap: usize) -> Self {
        self.list_group_gap = gap;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_heading_level: 6,
            indent_width: 2,
            unordered_marker: '-',
            escape_special_chars: true,
            normalize_unicode: true,
            list_group_gap: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options_builder() {
        let options = RenderOptions::new()
            .with_max_heading(9)
            .with_indent_width(4)
            .with_list_marker('*')
            .with_escape(false);

        assert_eq!(options.max_heading_level, 6);
        assert_eq!(options.indent_width, 4);
        assert_eq!(options.unordered_marker, '*');
        assert!(!options.escape_special_chars);
        assert!(options.normalize_unicode);
    }

    #[test]
    fn test_max_heading_lower_bound() {
        assert_eq!(RenderOptions::new().with_max_heading(0).max_heading_level, 1);
    }
}
