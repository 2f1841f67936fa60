//! Canonical cell content.
//!
//! Every cell of a processed row holds one [`CellContent`] value. The same
//! value drives sorting, filtering and display of that cell.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

/// The string, number or boolean value used for sorting, filtering and
/// display of one cell.
///
/// # Example
///
/// ```
/// use lattice_table::CellContent;
///
/// let content = CellContent::from("b2999");
/// assert_eq!(content.as_text(), "b2999");
///
/// let content = CellContent::from(42);
/// assert_eq!(content.to_string(), "42");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    /// Boolean content.
    Bool(bool),
    /// Numeric content.
    Number(f64),
    /// Text content.
    Text(String),
}

impl CellContent {
    /// Returns the string form of the content.
    ///
    /// Text content is borrowed; numbers and booleans are formatted.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            CellContent::Text(s) => Cow::Borrowed(s.as_str()),
            other => Cow::Owned(other.to_string()),
        }
    }

    /// Attempts to get the content as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellContent::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Attempts to get the content as a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellContent::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to get the content as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellContent::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            CellContent::Bool(_) => 0,
            CellContent::Number(_) => 1,
            CellContent::Text(_) => 2,
        }
    }

    /// Compares two values by the natural ordering of their kind.
    ///
    /// Values of different kinds order `Bool < Number < Text`, which keeps
    /// the comparison a total order over mixed columns.
    pub fn natural_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CellContent::Text(a), CellContent::Text(b)) => a.cmp(b),
            (CellContent::Number(a), CellContent::Number(b)) => a.total_cmp(b),
            (CellContent::Bool(a), CellContent::Bool(b)) => a.cmp(b),
            (a, b) => a.kind_rank().cmp(&b.kind_rank()),
        }
    }
}

impl fmt::Display for CellContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellContent::Text(s) => f.write_str(s),
            CellContent::Number(n) => write!(f, "{n}"),
            CellContent::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<String> for CellContent {
    fn from(s: String) -> Self {
        CellContent::Text(s)
    }
}

impl From<&str> for CellContent {
    fn from(s: &str) -> Self {
        CellContent::Text(s.to_string())
    }
}

impl From<&String> for CellContent {
    fn from(s: &String) -> Self {
        CellContent::Text(s.clone())
    }
}

impl From<f64> for CellContent {
    fn from(n: f64) -> Self {
        CellContent::Number(n)
    }
}

impl From<f32> for CellContent {
    fn from(n: f32) -> Self {
        CellContent::Number(n as f64)
    }
}

impl From<i64> for CellContent {
    fn from(n: i64) -> Self {
        CellContent::Number(n as f64)
    }
}

impl From<i32> for CellContent {
    fn from(n: i32) -> Self {
        CellContent::Number(n as f64)
    }
}

impl From<u32> for CellContent {
    fn from(n: u32) -> Self {
        CellContent::Number(n as f64)
    }
}

impl From<usize> for CellContent {
    fn from(n: usize) -> Self {
        CellContent::Number(n as f64)
    }
}

impl From<bool> for CellContent {
    fn from(b: bool) -> Self {
        CellContent::Bool(b)
    }
}
