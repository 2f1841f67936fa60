//! Selection tracking for table rows.
//!
//! [`SelectionTracker`] keeps the set of selected [`RowKey`]s. Keys are
//! independent of the sorted, filtered or paged view, so a row stays
//! selected while it is hidden by a filter and shows up selected again
//! when the filter changes.
//!
//! # Example
//!
//! ```
//! use lattice_table::SelectionTracker;
//!
//! let mut selection = SelectionTracker::new();
//!
//! let event = selection.toggle(7);
//! assert_eq!(event.changed_key(), Some(7));
//! assert_eq!(event.new_value(), Some(true));
//! assert!(selection.is_selected(7));
//!
//! let event = selection.reset();
//! assert!(event.is_bulk_clear());
//! assert!(selection.is_empty());
//! ```

use std::collections::HashSet;

use lattice_table_core::logging::targets;

use crate::row::RowKey;

/// The single-row change carried by a toggle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionChange {
    /// The row that was toggled.
    pub key: RowKey,
    /// Whether the row is selected after the toggle.
    pub selected: bool,
}

/// Notification describing the selection after a change.
///
/// A toggle carries the [`SelectionChange`] for the toggled key. A reset
/// carries no change and an empty key set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionEvent {
    /// Every key selected after the change.
    pub selected_keys: HashSet<RowKey>,
    /// The toggled row, absent for a bulk clear.
    pub change: Option<SelectionChange>,
}

impl SelectionEvent {
    /// Returns the toggled key, or `None` for a bulk clear.
    pub fn changed_key(&self) -> Option<RowKey> {
        self.change.map(|c| c.key)
    }

    /// Returns whether the toggled key is now selected, or `None` for a
    /// bulk clear.
    pub fn new_value(&self) -> Option<bool> {
        self.change.map(|c| c.selected)
    }

    /// Returns `true` if this event clears the whole selection.
    pub fn is_bulk_clear(&self) -> bool {
        self.change.is_none()
    }
}

/// The set of selected row keys.
#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    selected: HashSet<RowKey>,
}

impl SelectionTracker {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the selection state of `key`.
    pub fn toggle(&mut self, key: RowKey) -> SelectionEvent {
        let selected = if self.selected.remove(&key) {
            false
        } else {
            self.selected.insert(key);
            true
        };
        tracing::trace!(target: targets::SELECTION, key, selected, "toggled row selection");
        SelectionEvent {
            selected_keys: self.selected.clone(),
            change: Some(SelectionChange { key, selected }),
        }
    }

    /// Deselects every row.
    pub fn reset(&mut self) -> SelectionEvent {
        let cleared = self.selected.len();
        self.selected.clear();
        tracing::trace!(target: targets::SELECTION, cleared, "cleared selection");
        SelectionEvent {
            selected_keys: HashSet::new(),
            change: None,
        }
    }

    /// Returns `true` if `key` is selected.
    pub fn is_selected(&self, key: RowKey) -> bool {
        self.selected.contains(&key)
    }

    /// Returns the selected keys.
    pub fn selected_keys(&self) -> &HashSet<RowKey> {
        &self.selected
    }

    /// Returns the number of selected rows.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Returns `true` if no row is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
