//! Table type.

use serde::{Deserialize, Serialize};

/// A table region. Table recognition is not performed, so analyzed
/// structures never contain tables; the type keeps the structure shape stable
/// for consumers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Header cells
    pub headers: Vec<String>,

    /// Body rows
    pub rows: Vec<Vec<String>>,

    /// First line of the table in the preprocessed sequence
    pub line_start: usize,

    /// Last line of the table in the preprocessed sequence
    pub line_end: usize,
}
