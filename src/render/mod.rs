//! Rendering module for converting analyzed text to Markdown.

pub mod cleanup;
mod markdown;
mod options;

pub use markdown::{to_markdown, MarkdownRenderer};
pub use options::RenderOptions;
