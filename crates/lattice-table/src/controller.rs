//! The table controller.
//!
//! [`TableController`] owns the derived views of one data set and keeps
//! them consistent. Each trigger re-runs the first stage it invalidates and
//! every stage after it:
//!
//! | Trigger                | Stages re-run                 |
//! |------------------------|-------------------------------|
//! | `set_model`            | process, sort, filter, page   |
//! | `set_sort_column`      | sort, filter, page            |
//! | `set_filter`           | filter, page                  |
//! | `set_page`             | page                          |
//! | `set_page_size`        | page                          |
//! | `toggle_selection`     | none                          |
//!
//! A stage replaces the stored view only after it succeeds, so a failed
//! trigger leaves the previous views intact.
//!
//! # Notifications
//!
//! [`selection_changed`](TableController::selection_changed) and
//! [`view_changed`](TableController::view_changed) are emitted after the
//! controller state is unlocked, so slots may read from the controller or
//! issue further triggers. Stage observers, extractors and renderers run
//! while the state is locked and must not call back into the controller.
//!
//! # Example
//!
//! ```
//! use lattice_table::{Column, TableController};
//!
//! let table = TableController::new();
//! table
//!     .set_model(
//!         vec![
//!             Column::function("Name", |p: &(String, u32)| p.0.clone()),
//!             Column::function("Age", |p: &(String, u32)| p.1).numeric(true),
//!         ],
//!         vec![("Ada".to_string(), 36), ("Alan".to_string(), 41)],
//!     )
//!     .unwrap();
//!
//! table.set_sort_column(1).unwrap();
//! table.set_sort_column(1).unwrap();
//! assert_eq!(table.visible_rows()[0].record().0, "Alan");
//! ```

use std::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use parking_lot::RwLock;

use lattice_table_core::logging::targets;
use lattice_table_core::{PerfSpan, Signal};

use crate::column::Column;
use crate::config::TableConfig;
use crate::error::{Result, TableError};
use crate::observe::{Stage, StageObserver, StageReport};
use crate::pipeline::{self, FilterSet};
use crate::row::{RowKey, SharedRow};
use crate::selection::{SelectionEvent, SelectionTracker};

/// The active sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SortSpec {
    /// Index of the sort column.
    pub column: usize,
    /// Whether rows are in descending order.
    pub descending: bool,
}

/// Derived views of one ingested data set.
struct Model<R> {
    columns: Vec<Column<R>>,
    /// Processed rows, kept in sort order.
    processed: Vec<SharedRow<R>>,
    filters: FilterSet,
    filtered: Vec<SharedRow<R>>,
    visible: Vec<SharedRow<R>>,
    sort: SortSpec,
    page_index: usize,
}

impl<R> Model<R> {
    fn check_column(&self, index: usize) -> Result<()> {
        if index < self.columns.len() {
            Ok(())
        } else {
            Err(TableError::ColumnOutOfRange {
                index,
                count: self.columns.len(),
            })
        }
    }

    fn run_sort(&mut self, runner: &StageRunner) {
        let SortSpec { column, descending } = self.sort;
        let numeric = self
            .columns
            .get(column)
            .is_some_and(|c| c.is_numeric());
        let rows = self.processed.len();
        runner.run(
            Stage::Sort,
            rows,
            || pipeline::sort(&mut self.processed, column, descending, numeric),
            |_| rows,
        );
    }

    fn run_filter(&mut self, runner: &StageRunner) {
        self.filtered = runner.run(
            Stage::Filter,
            self.processed.len(),
            || pipeline::filter_rows(&self.processed, &self.filters),
            Vec::len,
        );
    }

    fn run_page(&mut self, runner: &StageRunner, page_size: usize) {
        let pages = pipeline::page_count(self.filtered.len(), page_size);
        if self.page_index >= pages {
            self.page_index = pages.saturating_sub(1);
        }
        let page_index = self.page_index;
        self.visible = runner.run(
            Stage::Page,
            self.filtered.len(),
            || pipeline::page(&self.filtered, page_index, page_size),
            Vec::len,
        );
    }

    fn page_count(&self, page_size: usize) -> usize {
        pipeline::page_count(self.filtered.len(), page_size)
    }
}

struct TableState<R> {
    model: Option<Model<R>>,
    selection: SelectionTracker,
    page_size: usize,
}

/// Wraps every stage run in a perf span and reports it to the observer.
struct StageRunner {
    observer: Option<Arc<dyn StageObserver>>,
}

impl StageRunner {
    fn try_run<T, E>(
        &self,
        stage: Stage,
        rows_in: usize,
        run: impl FnOnce() -> std::result::Result<T, E>,
        rows_out: impl FnOnce(&T) -> usize,
    ) -> std::result::Result<T, E> {
        let _span = PerfSpan::new(stage.name());
        if let Some(observer) = &self.observer {
            observer.stage_started(stage);
        }
        let started = Instant::now();
        let output = run()?;
        let report = StageReport {
            rows_in,
            rows_out: rows_out(&output),
            elapsed: started.elapsed(),
        };
        tracing::trace!(
            target: targets::CONTROLLER,
            stage = stage.name(),
            rows_in = report.rows_in,
            rows_out = report.rows_out,
            elapsed_us = report.elapsed.as_micros() as u64,
            "stage finished"
        );
        if let Some(observer) = &self.observer {
            observer.stage_finished(stage, report);
        }
        Ok(output)
    }

    fn run<T>(
        &self,
        stage: Stage,
        rows_in: usize,
        run: impl FnOnce() -> T,
        rows_out: impl FnOnce(&T) -> usize,
    ) -> T {
        match self.try_run(stage, rows_in, || Ok::<T, Infallible>(run()), rows_out) {
            Ok(output) => output,
            Err(never) => match never {},
        }
    }
}

/// Signals owed to the host once the state lock is released.
#[must_use]
struct Notifications {
    view: Option<Stage>,
    selection: Option<SelectionEvent>,
}

/// Counts one in-flight asynchronous ingestion for as long as it lives.
struct LoadingGuard<'a>(&'a AtomicUsize);

impl<'a> LoadingGuard<'a> {
    fn enter(pending: &'a AtomicUsize) -> Self {
        pending.fetch_add(1, Ordering::SeqCst);
        Self(pending)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Drives the table pipeline for records of type `R`.
///
/// The controller starts out empty. [`set_model`](Self::set_model) or
/// [`set_model_async`](Self::set_model_async) installs columns and data;
/// every other trigger then works against that data set.
pub struct TableController<R> {
    state: RwLock<TableState<R>>,
    config: TableConfig,
    observer: RwLock<Option<Arc<dyn StageObserver>>>,
    pending_loads: AtomicUsize,

    /// Emitted after every selection change, including the bulk clear that
    /// follows a new ingestion.
    pub selection_changed: Signal<SelectionEvent>,

    /// Emitted after every successful trigger with the earliest stage that
    /// was re-run.
    pub view_changed: Signal<Stage>,
}

impl<R: Send + Sync + 'static> Default for TableController<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Send + Sync + 'static> TableController<R> {
    /// Creates an empty controller with the default configuration.
    pub fn new() -> Self {
        Self::from_valid_config(TableConfig::default())
    }

    /// Creates an empty controller with the given configuration.
    pub fn with_config(config: TableConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: TableConfig) -> Self {
        Self {
            state: RwLock::new(TableState {
                model: None,
                selection: SelectionTracker::new(),
                page_size: config.page_size,
            }),
            config,
            observer: RwLock::new(None),
            pending_loads: AtomicUsize::new(0),
            selection_changed: Signal::new(),
            view_changed: Signal::new(),
        }
    }

    /// Installs a stage observer, replacing any previous one.
    pub fn set_stage_observer(&self, observer: Arc<dyn StageObserver>) {
        *self.observer.write() = Some(observer);
    }

    /// Removes the stage observer.
    pub fn clear_stage_observer(&self) {
        *self.observer.write() = None;
    }

    fn runner(&self) -> StageRunner {
        StageRunner {
            observer: self.observer.read().clone(),
        }
    }

    // =========================================================================
    // Triggers
    // =========================================================================

    /// Ingests a new data set.
    ///
    /// Keys are reassigned from 0, the selection is cleared, the sort is
    /// reset to the first column ascending, filters are cleared and the
    /// first page is shown. On error the previous data set stays in place.
    pub fn set_model(&self, columns: Vec<Column<R>>, records: Vec<R>) -> Result<()> {
        let notifications = self.ingest(columns, records)?;
        self.publish(notifications);
        Ok(())
    }

    /// Ingests a data set once `data` resolves.
    ///
    /// [`is_loading`](Self::is_loading) reports `true` from this call until
    /// the returned future completes or is dropped. The visible rows are
    /// unchanged while loading, and other triggers keep working against the
    /// current data set. When ingestions overlap, the last one to resolve
    /// wins.
    pub fn set_model_async<F>(
        &self,
        columns: Vec<Column<R>>,
        data: F,
    ) -> impl Future<Output = Result<()>>
    where
        F: Future<Output = Vec<R>>,
    {
        let guard = LoadingGuard::enter(&self.pending_loads);
        tracing::debug!(target: targets::CONTROLLER, "waiting for table data");
        async move {
            let records = data.await;
            let outcome = self.ingest(columns, records);
            drop(guard);
            outcome.map(|notifications| self.publish(notifications))
        }
    }

    fn ingest(&self, columns: Vec<Column<R>>, records: Vec<R>) -> Result<Notifications> {
        if columns.is_empty() {
            let err = TableError::configuration("a table needs at least one column");
            tracing::warn!(target: targets::CONTROLLER, error = %err, "rejected model");
            return Err(err);
        }

        let runner = self.runner();
        let mut state = self.state.write();
        let record_count = records.len();
        let processed = runner
            .try_run(
                Stage::Process,
                record_count,
                || pipeline::process(records, &columns, self.config.pooling),
                Vec::len,
            )
            .inspect_err(|err| {
                tracing::warn!(target: targets::CONTROLLER, error = %err, "failed to process rows");
            })?;

        let mut model = Model {
            filters: FilterSet::new(columns.len()),
            columns,
            processed,
            filtered: Vec::new(),
            visible: Vec::new(),
            sort: SortSpec::default(),
            page_index: 0,
        };
        model.run_sort(&runner);
        model.run_filter(&runner);
        model.run_page(&runner, state.page_size);

        tracing::debug!(
            target: targets::CONTROLLER,
            rows = record_count,
            columns = model.columns.len(),
            "ingested model"
        );
        state.model = Some(model);
        let selection = (!state.selection.is_empty()).then(|| state.selection.reset());
        Ok(Notifications {
            view: Some(Stage::Process),
            selection,
        })
    }

    /// Sorts by `column`.
    ///
    /// Choosing the active sort column flips the direction; choosing another
    /// column sorts it ascending.
    pub fn set_sort_column(&self, column: usize) -> Result<()> {
        let runner = self.runner();
        {
            let mut state = self.state.write();
            let page_size = state.page_size;
            let model = state.model.as_mut().ok_or(TableError::NoModel)?;
            model.check_column(column)?;
            model.sort = if model.sort.column == column {
                SortSpec {
                    column,
                    descending: !model.sort.descending,
                }
            } else {
                SortSpec {
                    column,
                    descending: false,
                }
            };
            model.run_sort(&runner);
            model.run_filter(&runner);
            model.run_page(&runner, page_size);
            tracing::debug!(
                target: targets::CONTROLLER,
                column,
                descending = model.sort.descending,
                "changed sort column"
            );
        }
        self.view_changed.emit(Stage::Sort);
        Ok(())
    }

    /// Sets the filter pattern of `column` and returns to the first page.
    ///
    /// An empty pattern removes the constraint. An invalid pattern is
    /// rejected: the column keeps its previous pattern and the view does not
    /// change.
    pub fn set_filter(&self, column: usize, pattern: &str) -> Result<()> {
        let runner = self.runner();
        {
            let mut state = self.state.write();
            let page_size = state.page_size;
            let model = state.model.as_mut().ok_or(TableError::NoModel)?;
            model.check_column(column)?;
            if let Err(err) = model.filters.set(column, pattern) {
                tracing::warn!(
                    target: targets::CONTROLLER,
                    column,
                    pattern,
                    error = %err,
                    "rejected filter pattern"
                );
                return Err(err);
            }
            model.page_index = 0;
            model.run_filter(&runner);
            model.run_page(&runner, page_size);
        }
        self.view_changed.emit(Stage::Filter);
        Ok(())
    }

    /// Shows the 1-based page `page`.
    ///
    /// Returns `false` and leaves the view unchanged when `page` is outside
    /// `1..=number_of_pages()`.
    pub fn set_page(&self, page: usize) -> bool {
        let runner = self.runner();
        {
            let mut state = self.state.write();
            let page_size = state.page_size;
            let Some(model) = state.model.as_mut() else {
                return false;
            };
            let pages = model.page_count(page_size);
            if page == 0 || page > pages {
                tracing::trace!(target: targets::CONTROLLER, page, pages, "ignored page request");
                return false;
            }
            model.page_index = page - 1;
            model.run_page(&runner, page_size);
        }
        self.view_changed.emit(Stage::Page);
        true
    }

    /// Changes the number of rows per page.
    ///
    /// The current page is kept when it still exists, otherwise the last
    /// page is shown.
    pub fn set_page_size(&self, page_size: usize) -> Result<()> {
        if page_size == 0 {
            return Err(TableError::configuration("page_size must be greater than zero"));
        }
        let runner = self.runner();
        {
            let mut state = self.state.write();
            state.page_size = page_size;
            let Some(model) = state.model.as_mut() else {
                return Ok(());
            };
            model.run_page(&runner, page_size);
        }
        self.view_changed.emit(Stage::Page);
        Ok(())
    }

    /// Flips the selection state of the row with `key`.
    ///
    /// The row does not need to be visible. The returned event is also
    /// emitted on [`selection_changed`](Self::selection_changed).
    pub fn toggle_selection(&self, key: RowKey) -> Result<SelectionEvent> {
        if !self.config.selectable {
            return Err(TableError::SelectionDisabled);
        }
        let event = {
            let mut state = self.state.write();
            let rows = state
                .model
                .as_ref()
                .ok_or(TableError::NoModel)?
                .processed
                .len();
            if key >= rows {
                return Err(TableError::UnknownRowKey(key));
            }
            state.selection.toggle(key)
        };
        self.selection_changed.emit(event.clone());
        Ok(event)
    }

    /// Deselects every row and emits a bulk clear event.
    pub fn reset_selection(&self) -> SelectionEvent {
        let event = self.state.write().selection.reset();
        self.selection_changed.emit(event.clone());
        event
    }

    fn publish(&self, notifications: Notifications) {
        if let Some(event) = notifications.selection {
            self.selection_changed.emit(event);
        }
        if let Some(stage) = notifications.view {
            self.view_changed.emit(stage);
        }
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Returns the rows of the current page.
    pub fn visible_rows(&self) -> Vec<SharedRow<R>> {
        self.state
            .read()
            .model
            .as_ref()
            .map(|m| m.visible.clone())
            .unwrap_or_default()
    }

    /// Returns the number of pages of filtered rows.
    pub fn number_of_pages(&self) -> usize {
        let state = self.state.read();
        state
            .model
            .as_ref()
            .map_or(0, |m| m.page_count(state.page_size))
    }

    /// Returns the 1-based index of the current page.
    pub fn current_page(&self) -> usize {
        self.state
            .read()
            .model
            .as_ref()
            .map_or(0, |m| m.page_index)
            + 1
    }

    /// Returns the number of rows per page.
    pub fn page_size(&self) -> usize {
        self.state.read().page_size
    }

    /// Returns `true` while an asynchronous ingestion is pending.
    pub fn is_loading(&self) -> bool {
        self.pending_loads.load(Ordering::SeqCst) > 0
    }

    /// Returns `true` if no model has been set.
    pub fn is_empty(&self) -> bool {
        self.state.read().model.is_none()
    }

    /// Returns `true` if rows are sorted by `column`.
    pub fn is_sorted_by_column(&self, column: usize) -> bool {
        self.sort_spec().is_some_and(|s| s.column == column)
    }

    /// Returns the active sort, or `None` when no model is set.
    pub fn sort_spec(&self) -> Option<SortSpec> {
        self.state.read().model.as_ref().map(|m| m.sort)
    }

    /// Returns the title of every column.
    pub fn column_titles(&self) -> Vec<String> {
        self.state
            .read()
            .model
            .as_ref()
            .map(|m| m.columns.iter().map(|c| c.title().to_string()).collect())
            .unwrap_or_default()
    }

    /// Returns the table caption.
    pub fn title(&self) -> &str {
        &self.config.title
    }

    /// Returns the configuration the controller was created with.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Returns `true` if rows can be selected.
    pub fn is_selectable(&self) -> bool {
        self.config.selectable
    }

    /// Returns the filter pattern of every column, `""` for no constraint.
    pub fn filters(&self) -> Vec<String> {
        self.state
            .read()
            .model
            .as_ref()
            .map(|m| m.filters.patterns())
            .unwrap_or_default()
    }

    /// Returns the number of ingested rows.
    pub fn processed_row_count(&self) -> usize {
        self.state
            .read()
            .model
            .as_ref()
            .map_or(0, |m| m.processed.len())
    }

    /// Returns the number of rows passing the filters.
    pub fn filtered_row_count(&self) -> usize {
        self.state
            .read()
            .model
            .as_ref()
            .map_or(0, |m| m.filtered.len())
    }

    /// Returns `true` if the row with `key` is selected.
    pub fn is_selected(&self, key: RowKey) -> bool {
        self.state.read().selection.is_selected(key)
    }

    /// Returns the selected keys in ascending order.
    pub fn selected_keys(&self) -> Vec<RowKey> {
        let mut keys: Vec<RowKey> = self
            .state
            .read()
            .selection
            .selected_keys()
            .iter()
            .copied()
            .collect();
        keys.sort_unstable();
        keys
    }
}
