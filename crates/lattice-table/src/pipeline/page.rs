//! Paging: the visible window of the filtered rows.

use crate::row::SharedRow;

/// Returns the number of pages `total` rows occupy at `page_size` rows per
/// page. A zero page size yields zero pages.
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        0
    } else {
        total.div_ceil(page_size)
    }
}

/// Returns the rows of the zero-based page `page_index`.
///
/// An index past the last page yields an empty window, as does a zero page
/// size.
pub fn page<R>(rows: &[SharedRow<R>], page_index: usize, page_size: usize) -> Vec<SharedRow<R>> {
    let start = page_index.saturating_mul(page_size);
    if page_size == 0 || start >= rows.len() {
        return Vec::new();
    }
    let end = start.saturating_add(page_size).min(rows.len());
    rows[start..end].to_vec()
}
