//! Logging facilities for Lattice Table.
//!
//! This module provides:
//! - Integration with the `tracing` crate for structured logging
//! - Target names for filtering logs by subsystem
//! - Performance tracing hooks for profiling pipeline stages
//!
//! # Tracing Integration
//!
//! Lattice Table uses the `tracing` crate for instrumentation. To see logs,
//! you need to install a tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("lattice_table=debug")
//!         .init();
//!
//!     // Your application code...
//! }
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "lattice_table_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "lattice_table_core::signal";
    /// Row processing, sorting, filtering and paging stages.
    pub const PIPELINE: &str = "lattice_table::pipeline";
    /// Selection tracking target.
    pub const SELECTION: &str = "lattice_table::selection";
    /// Table controller target.
    pub const CONTROLLER: &str = "lattice_table::controller";
    /// Performance spans.
    pub const PERF: &str = "lattice_table::perf";
}

/// A guard that keeps a tracing span entered until it is dropped.
///
/// This is useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}
