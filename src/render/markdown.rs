//! Markdown rendering for analyzed text.

use std::sync::Arc;

use crate::analyze::StructureAnalyzer;
use crate::convert::Formatter;
use crate::error::Result;
use crate::model::{Heading, ListItem, TextStructure};

use super::cleanup::{clean_heading, clean_list_item, clean_paragraph, escape_markdown};
use super::RenderOptions;

/// Convert plain text to Markdown with default options.
pub fn to_markdown(text: &str) -> String {
    MarkdownRenderer::new().render(text)
}

/// Markdown renderer.
///
/// Splits the input into lines, runs the analyzer and emits headings, then
/// list groups, then paragraphs.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    analyzer: Arc<StructureAnalyzer>,
    options: RenderOptions,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer with its own analyzer.
    pub fn new() -> Self {
        Self::with_options(RenderOptions::default())
    }

    /// Create a renderer with custom options and its own analyzer.
    pub fn with_options(options: RenderOptions) -> Self {
        Self::with_analyzer(Arc::new(StructureAnalyzer::new()), options)
    }

    /// Create a renderer sharing an existing analyzer.
    pub fn with_analyzer(analyzer: Arc<StructureAnalyzer>, options: RenderOptions) -> Self {
        Self { analyzer, options }
    }

    /// Get the render options.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Get the analyzer used by this renderer.
    pub fn analyzer(&self) -> &Arc<StructureAnalyzer> {
        &self.analyzer
    }

    /// Render text to Markdown. Empty or whitespace-only input yields an
    /// empty string.
    pub fn render(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return String::new();
        }

        let lines: Vec<&str> = text.split('\n').collect();
        let structure = self.analyzer.analyze(&lines);
        self.render_structure(&structure)
    }

    /// Render an already analyzed structure.
    ///
    /// Headings come first, then the list block, then the paragraph block.
    /// Heading lines are followed by a blank line; the list and paragraph
    /// blocks are joined by a single newline, so CommonMark readers treat
    /// the first paragraph line as a lazy continuation of the last list
    /// item.
    pub fn render_structure(&self, structure: &TextStructure) -> String {
        if structure.is_empty() {
            return self.format_paragraphs(&structure.raw_lines);
        }

        let mut parts: Vec<String> = structure
            .headings
            .iter()
            .map(|heading| self.heading_line(heading))
            .collect();
        parts.push(self.format_lists(&structure.lists));
        parts.push(self.format_paragraphs(&structure.paragraphs));

        let parts: Vec<String> = parts
            .into_iter()
            .filter(|part| !part.trim().is_empty())
            .collect();

        let mut output: Vec<&str> = Vec::with_capacity(parts.len() * 2);
        for (i, part) in parts.iter().enumerate() {
            output.push(part);
            if part.starts_with('#') && i + 1 < parts.len() {
                output.push("");
            }
        }

        output.join("\n")
    }

    /// Format headings, separated by blank lines.
    pub fn format_headings(&self, headings: &[Heading]) -> String {
        headings
            .iter()
            .filter(|heading| !heading.text.trim().is_empty())
            .map(|heading| self.heading_line(heading))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Format list items.
    ///
    /// Items closer than the group gap form one block; blocks are separated
    /// by a blank line.
    pub fn format_lists(&self, items: &[ListItem]) -> String {
        let mut groups: Vec<Vec<String>> = Vec::new();
        let mut previous_line: Option<usize> = None;

        for item in items {
            let text = clean_list_item(&item.text);
            if text.is_empty() {
                continue;
            }

            let starts_group = match previous_line {
                Some(prev) => item.line_number.saturating_sub(prev) > self.options.list_group_gap,
                None => true,
            };
            if starts_group {
                groups.push(Vec::new());
            }
            previous_line = Some(item.line_number);

            let indent = " ".repeat(self.options.indent_width * item.level);
            let marker = if item.is_ordered() {
                "1.".to_string()
            } else {
                self.options.unordered_marker.to_string()
            };

            if let Some(group) = groups.last_mut() {
                group.push(format!("{}{} {}", indent, marker, text));
            }
        }

        groups
            .iter()
            .map(|group| group.join("\n"))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Format paragraphs, separated by blank lines.
    pub fn format_paragraphs<S: AsRef<str>>(&self, paragraphs: &[S]) -> String {
        paragraphs
            .iter()
            .map(|p| clean_paragraph(p.as_ref(), self.options.normalize_unicode))
            .filter(|p| !p.is_empty())
            .map(|p| {
                if self.options.escape_special_chars {
                    escape_markdown(&p)
                } else {
                    p
                }
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn heading_line(&self, heading: &Heading) -> String {
        let level = heading.level.clamp(1, self.options.max_heading_level.max(1));
        format!("{} {}", "#".repeat(level as usize), clean_heading(&heading.text))
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for MarkdownRenderer {
    fn name(&self) -> &str {
        "markdown"
    }

    fn convert(&self, text: &str) -> Result<String> {
        Ok(self.render(text))
    }

    fn analyzer(&self) -> Option<&StructureAnalyzer> {
        Some(&self.analyzer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(to_markdown(""), "");
        assert_eq!(to_markdown("  \n\t\n "), "");
    }

    #[test]
    fn test_chapter_heading() {
        let md = to_markdown("第一章 概述");
        assert!(md.lines().any(|line| line == "# 概述"), "{}", md);
    }

    #[test]
    fn test_unordered_list() {
        let md = to_markdown("- 苹果\n- 香蕉");
        assert_eq!(md, "- 苹果\n- 香蕉");
    }

    #[test]
    fn test_ordered_list_always_uses_one() {
        let md = to_markdown("1. 准备材料\n2. 开始制作\n3. 完成");
        assert_eq!(md, "1. 准备材料\n1. 开始制作\n1. 完成");
    }

    #[test]
    fn test_paragraph_escaping() {
        let md = to_markdown("这里有#标记的一段比较长的正文内容，用来测试转义。");
        assert!(md.contains(r"\#标记"), "{}", md);
    }

    #[test]
    fn test_blank_line_after_heading() {
        let md = to_markdown("第一章 概述\n- 苹果\n- 香蕉");
        assert_eq!(md, "# 概述\n\n- 苹果\n- 香蕉");
    }

    #[test]
    fn test_no_trailing_blank_after_last_heading() {
        let md = to_markdown("第一章 概述");
        assert_eq!(md, "# 概述");
    }

    #[test]
    fn test_format_headings() {
        let renderer = MarkdownRenderer::new();
        let headings = vec![
            Heading::new("第一章 概述", 1, 0, 0.9),
            Heading::new("   ", 2, 1, 0.9),
            Heading::new("1.1 背景", 2, 2, 0.9),
        ];
        assert_eq!(renderer.format_headings(&headings), "# 概述\n\n## 背景");
    }

    #[test]
    fn test_format_headings_respects_max_level() {
        let renderer = MarkdownRenderer::with_options(RenderOptions::new().with_max_heading(2));
        let headings = vec![Heading::new("深层标题", 5, 0, 0.9)];
        assert_eq!(renderer.format_headings(&headings), "## 深层标题");
    }

    #[test]
    fn test_format_lists_groups_and_indents() {
        let renderer = MarkdownRenderer::new();
        let items = vec![
            ListItem::unordered("水果", 0, 0),
            ListItem::unordered("苹果", 1, 1),
            ListItem::unordered("   ", 0, 2),
            ListItem::ordered("第一步", 0, 6),
        ];
        assert_eq!(renderer.format_lists(&items), "- 水果\n  - 苹果\n\n1. 第一步");
    }

    #[test]
    fn test_format_paragraphs() {
        let renderer = MarkdownRenderer::new();
        let paragraphs = ["第一段\n续行", "", "第二段"];
        assert_eq!(renderer.format_paragraphs(&paragraphs), "第一段 续行\n\n第二段");
    }

    #[test]
    fn test_escape_disabled() {
        let renderer = MarkdownRenderer::with_options(RenderOptions::new().with_escape(false));
        assert_eq!(renderer.format_paragraphs(&["a#b"]), "a#b");
    }

    #[test]
    fn test_mixed_document() {
        let text = "第一章 概述\n\
                    本章介绍系统的整体设计思路，以及各模块之间的关系和约束条件。\n\
                    - 苹果\n\
                    - 香蕉\n\
                    第二章 实现";
        let md = to_markdown(text);
        assert_eq!(
            md,
            "# 概述\n\n# 实现\n\n- 苹果\n- 香蕉\n本章介绍系统的整体设计思路，以及各模块之间的关系和约束条件。"
        );
    }

    #[test]
    fn test_formatter_impl() {
        let renderer = MarkdownRenderer::new();
        assert_eq!(Formatter::name(&renderer), "markdown");
        assert!(renderer.convert("第一章 概述").is_ok());
        assert!(Formatter::analyzer(&renderer).is_some());
    }
}
