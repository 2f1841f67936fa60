//! The table data pipeline.
//!
//! Raw records flow through four stages, in order:
//!
//! ```text
//! records ──> process ──> sort ──> filter ──> page ──> visible rows
//!               │          │         │          │
//!        per-column     in place   subset    window
//!          content
//! ```
//!
//! Each stage is a plain function over [`SharedRow`](crate::SharedRow)s, so
//! a later stage can be re-run without repeating the earlier, more expensive
//! ones. The [`TableController`](crate::TableController) decides which
//! stages a trigger invalidates.

mod filter;
mod page;
mod process;
mod sort;

pub use filter::{FilterSet, filter, filter_rows};
pub use page::{page, page_count};
pub use process::process;
pub use sort::{compare_cells, numeric_prefix, sort};
