//! Lattice Table - a sortable, filterable, paginated table data pipeline.
//!
//! Given a list of records and a set of [`Column`] definitions, a
//! [`TableController`] computes the content of every cell once, then keeps
//! three derived views consistent as the user sorts, filters and pages:
//!
//! - the processed rows, in sort order
//! - the rows that pass every column filter
//! - the rows of the current page
//!
//! Row selection is tracked by [`RowKey`] and survives sorting, filtering
//! and paging. The host is notified through the controller's
//! [`Signal`]s.
//!
//! # Example
//!
//! ```
//! use lattice_table::{Column, TableController};
//!
//! struct Item {
//!     name: &'static str,
//!     stock: u32,
//! }
//!
//! let table = TableController::new();
//! table
//!     .set_model(
//!         vec![
//!             Column::function("Name", |i: &Item| i.name),
//!             Column::function("Stock", |i: &Item| i.stock).numeric(true),
//!         ],
//!         vec![
//!             Item { name: "bolt", stock: 120 },
//!             Item { name: "nut", stock: 8 },
//!             Item { name: "washer", stock: 40 },
//!         ],
//!     )
//!     .unwrap();
//!
//! table.set_filter(0, "t").unwrap();
//! let names: Vec<_> = table.visible_rows().iter().map(|r| r.record().name).collect();
//! assert_eq!(names, vec!["bolt", "nut"]);
//! ```

mod column;
mod config;
mod content;
mod controller;
mod error;
mod observe;
pub mod pipeline;
mod renderer;
mod row;
mod selection;

pub use column::{Column, ColumnBuilder, ExtractFn, FunctionColumn, RendererColumn};
pub use config::{DEFAULT_PAGE_SIZE, RendererPoolingMode, TableConfig};
pub use content::CellContent;
pub use controller::{SortSpec, TableController};
pub use error::{BoxError, Result, TableError};
pub use observe::{Stage, StageObserver, StageReport};
pub use renderer::{CellRenderer, RendererFactory, RendererHandle, RendererLease};
pub use row::{ProcessedRow, RowKey, SharedRow};
pub use selection::{SelectionChange, SelectionEvent, SelectionTracker};

pub use lattice_table_core::{ConnectionId, Signal};
