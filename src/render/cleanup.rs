//! Text cleanup applied before emitting Markdown.
//!
//! Headings lose their enumeration prefixes and trailing punctuation, list
//! items lose their markers, and paragraphs get whitespace normalization
//! followed by escaping of characters Markdown would otherwise interpret.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::analyze::lists;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Heading prefix and suffix patterns, applied in order.
static HEADING_STRIP: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^\d+(\.\d+)*\.?\s*",
        r"^第[一二三四五六七八九十]+[章节部分]\.?\s*",
        r"^[一二三四五六七八九十]+[、.]\s*",
        r"^[一二三四五六七八九十]+\s+",
        r"[。！？：；]+$",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

static ESCAPE_ORDERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^(\d+)\.").unwrap());
static ESCAPE_BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^([-+*])\s").unwrap());
static ESCAPE_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]*)\]\(([^)]*)\)").unwrap());

/// Collapse runs of whitespace into one space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Strip numbering, chapter markers and terminal punctuation from a heading.
///
/// Falls back to the trimmed input when nothing would remain.
pub fn clean_heading(text: &str) -> String {
    let mut cleaned = text.trim().to_string();
    for re in HEADING_STRIP.iter() {
        cleaned = re.replace(&cleaned, "").into_owned();
        cleaned = cleaned.trim().to_string();
    }
    let cleaned = collapse_whitespace(&cleaned);

    if cleaned.is_empty() {
        text.trim().to_string()
    } else {
        cleaned
    }
}

/// Strip a leading list marker from an item's text.
pub fn clean_list_item(text: &str) -> String {
    collapse_whitespace(lists::strip_marker(text.trim()))
}

/// Normalize paragraph whitespace.
///
/// Double newlines survive as paragraph breaks, single newlines become
/// spaces and repeated whitespace collapses.
pub fn clean_paragraph(text: &str, normalize_unicode: bool) -> String {
    let joined = text
        .split("\n\n")
        .map(collapse_whitespace)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");

    if normalize_unicode {
        joined.nfc().collect()
    } else {
        joined
    }
}

/// Escape characters that would change the meaning of paragraph text in
/// Markdown.
pub fn escape_markdown(text: &str) -> String {
    let escaped = text.replace('#', r"\#");
    let escaped = ESCAPE_ORDERED.replace_all(&escaped, r"${1}\.");
    let escaped = ESCAPE_BULLET.replace_all(&escaped, r"\${1} ");
    let escaped = escaped.replace('`', r"\`");
    ESCAPE_LINK
        .replace_all(&escaped, r"\[${1}\]\(${2}\)")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_heading() {
        assert_eq!(clean_heading("第一章 概述"), "概述");
        assert_eq!(clean_heading("1. 第一章 概述。"), "概述");
        assert_eq!(clean_heading("第二节 详细说明："), "详细说明");
        assert_eq!(clean_heading("  三、  总结  "), "总结");
        assert_eq!(clean_heading("1.2 第三章 测试内容。"), "测试内容");
        assert_eq!(clean_heading("项目   背景"), "项目 背景");
    }

    #[test]
    fn test_clean_heading_keeps_text_when_everything_strips() {
        assert_eq!(clean_heading("第一章"), "第一章");
        assert_eq!(clean_heading("1.2"), "1.2");
    }

    #[test]
    fn test_clean_list_item() {
        assert_eq!(clean_list_item("- 苹果"), "苹果");
        assert_eq!(clean_list_item("3) 收尾"), "收尾");
        assert_eq!(clean_list_item("苹果   和梨"), "苹果 和梨");
    }

    #[test]
    fn test_clean_paragraph() {
        assert_eq!(
            clean_paragraph("第一行\n第二行\n\n  新段落   内容 ", true),
            "第一行 第二行\n\n新段落 内容"
        );
        assert_eq!(clean_paragraph("\n\n  \n\n", true), "");
    }

    #[test]
    fn test_clean_paragraph_nfc() {
        // "e" + combining acute accent
        assert_eq!(clean_paragraph("caf\u{0065}\u{0301}", true), "caf\u{00e9}");
        assert_eq!(
            clean_paragraph("caf\u{0065}\u{0301}", false),
            "caf\u{0065}\u{0301}"
        );
    }

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("这里有#标记"), r"这里有\#标记");
        assert_eq!(escape_markdown("1. 不是列表"), r"1\. 不是列表");
        assert_eq!(escape_markdown("- 不是列表"), r"\- 不是列表");
        assert_eq!(escape_markdown("a-b c"), "a-b c");
        assert_eq!(escape_markdown("用`code`"), r"用\`code\`");
        assert_eq!(
            escape_markdown("见[链接](http://x)"),
            r"见\[链接\]\(http://x\)"
        );
    }
}
