//! Document structure types produced by the analyzer.
//!
//! A [`TextStructure`] is the skeleton inferred from a sequence of plain text
//! lines. Line numbers always index the *preprocessed* line sequence (lines
//! stripped, empty lines dropped), never the caller's original input.

mod heading;
mod list;
mod structure;
mod table;

pub use heading::Heading;
pub use list::{ListItem, ListKind};
pub use structure::{StructureInfo, TextStructure};
pub use table::Table;
