//! Processed rows.

use std::sync::Arc;

use crate::content::CellContent;

/// Key identifying a row within one ingested data set.
///
/// A key is the 0-based position of the record in the input data at
/// ingestion time. It is stable across sorting, filtering and paging of the
/// same data set; a new ingestion reassigns keys from 0.
pub type RowKey = usize;

/// A record together with its precomputed per-column content.
///
/// `content[i]` is the canonical content of column `i` for this record,
/// computed once when the data is ingested.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedRow<R> {
    key: RowKey,
    record: R,
    content: Vec<CellContent>,
}

/// Processed rows are shared between the sorted, filtered and visible views.
pub type SharedRow<R> = Arc<ProcessedRow<R>>;

impl<R> ProcessedRow<R> {
    /// Creates a processed row.
    pub fn new(key: RowKey, record: R, content: Vec<CellContent>) -> Self {
        Self {
            key,
            record,
            content,
        }
    }

    /// Returns the row key.
    pub fn key(&self) -> RowKey {
        self.key
    }

    /// Returns the underlying record.
    pub fn record(&self) -> &R {
        &self.record
    }

    /// Returns the content of every column, in column order.
    pub fn content(&self) -> &[CellContent] {
        &self.content
    }

    /// Returns the content of one column.
    pub fn cell(&self, column: usize) -> Option<&CellContent> {
        self.content.get(column)
    }
}
