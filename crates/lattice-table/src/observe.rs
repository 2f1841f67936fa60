//! Pipeline stage observation.
//!
//! The controller reports the start and end of every stage run to an
//! optional host-owned [`StageObserver`]. Every stage run is also wrapped in
//! a [`PerfSpan`](lattice_table_core::PerfSpan) for `tracing` subscribers.

use std::fmt;
use std::time::Duration;

/// A stage of the table pipeline.
///
/// Stages are ordered: a change re-runs its own stage and every stage after
/// it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Extracting per-column content from every record.
    Process,
    /// Reordering processed rows by the sort column.
    Sort,
    /// Selecting rows that match the filter patterns.
    Filter,
    /// Slicing filtered rows into the current page.
    Page,
}

impl Stage {
    /// Returns the stage name used in spans and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Process => "process",
            Stage::Sort => "sort",
            Stage::Filter => "filter",
            Stage::Page => "page",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Summary of one completed stage run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageReport {
    /// Rows fed into the stage.
    pub rows_in: usize,
    /// Rows produced by the stage.
    pub rows_out: usize,
    /// Wall-clock time spent in the stage.
    pub elapsed: Duration,
}

/// Receives stage boundary notifications from a table controller.
pub trait StageObserver: Send + Sync {
    /// Called before a stage runs.
    fn stage_started(&self, _stage: Stage) {}

    /// Called after a stage completed successfully.
    fn stage_finished(&self, _stage: Stage, _report: StageReport) {}
}
