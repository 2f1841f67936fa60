//! Row processing: records to per-column content.

use std::sync::Arc;

use lattice_table_core::logging::targets;

use crate::column::{Column, FunctionColumn};
use crate::config::RendererPoolingMode;
use crate::content::CellContent;
use crate::error::{BoxError, Result, TableError};
use crate::renderer::{RendererHandle, RendererLease};
use crate::row::{ProcessedRow, RowKey, SharedRow};

/// How one column turns a record into content for the current run.
enum ExtractionStep<'c, R> {
    Function(&'c FunctionColumn<R>),
    /// One renderer reused for every record.
    Pooled(RendererLease<R>),
    /// A fresh renderer for every cell.
    PerCell(&'c RendererHandle<R>),
}

impl<R: 'static> ExtractionStep<'_, R> {
    fn extract(&mut self, key: RowKey, column: usize, record: &R) -> Result<CellContent> {
        let rendered: std::result::Result<CellContent, BoxError> = match self {
            ExtractionStep::Function(c) => c.extract(record),
            ExtractionStep::Pooled(lease) => lease.render(record),
            ExtractionStep::PerCell(handle) => {
                let mut lease = acquire(handle, column)?;
                lease.render(record)
            }
        };
        rendered.map_err(|source| TableError::extraction(key, column, source))
    }
}

fn acquire<R: 'static>(handle: &RendererHandle<R>, column: usize) -> Result<RendererLease<R>> {
    handle
        .acquire()
        .map_err(|source| TableError::RendererUnavailable { column, source })
}

fn resolve_steps<R: 'static>(
    columns: &[Column<R>],
    pooling: RendererPoolingMode,
) -> Result<Vec<ExtractionStep<'_, R>>> {
    let mut steps = Vec::with_capacity(columns.len());
    for (index, column) in columns.iter().enumerate() {
        let step = match (column, pooling) {
            (Column::Function(c), _) => ExtractionStep::Function(c),
            (Column::Renderer(c), RendererPoolingMode::PerColumn) => {
                ExtractionStep::Pooled(acquire(c.renderer(), index)?)
            }
            (Column::Renderer(c), RendererPoolingMode::PerCell) => {
                ExtractionStep::PerCell(c.renderer())
            }
        };
        steps.push(step);
    }
    Ok(steps)
}

/// Computes the canonical content of every column for every record.
///
/// Keys are assigned from the position of each record in `records`. A
/// renderer that cannot be instantiated fails with
/// [`TableError::RendererUnavailable`]. All
/// renderer instances acquired for the run are disposed before this
/// function returns, whether it succeeds or fails.
pub fn process<R: 'static>(
    records: Vec<R>,
    columns: &[Column<R>],
    pooling: RendererPoolingMode,
) -> Result<Vec<SharedRow<R>>> {
    if records.is_empty() {
        return Ok(Vec::new());
    }

    let mut steps = resolve_steps(columns, pooling)?;
    let mut rows = Vec::with_capacity(records.len());

    for (key, record) in records.into_iter().enumerate() {
        let content = steps
            .iter_mut()
            .enumerate()
            .map(|(column, step)| step.extract(key, column, &record))
            .collect::<Result<Vec<_>>>()?;
        rows.push(Arc::new(ProcessedRow::new(key, record, content)));
    }

    // Pooled renderers are released here.
    drop(steps);

    tracing::debug!(
        target: targets::PIPELINE,
        rows = rows.len(),
        columns = columns.len(),
        ?pooling,
        "processed rows"
    );
    Ok(rows)
}
