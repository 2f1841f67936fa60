//! Filtering processed rows by per-column regular expressions.

use regex::Regex;

use lattice_table_core::logging::targets;

use crate::error::{Result, TableError};
use crate::row::{ProcessedRow, SharedRow};

/// One compiled pattern slot per column.
///
/// An empty slot imposes no constraint. Patterns are unanchored and
/// case-sensitive, and are matched against the string form of the cell.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    slots: Vec<Option<Regex>>,
}

impl FilterSet {
    /// Creates a filter set with `columns` empty slots.
    pub fn new(columns: usize) -> Self {
        Self {
            slots: vec![None; columns],
        }
    }

    /// Compiles one optional pattern per column.
    ///
    /// Fails on the first pattern that is not a valid regular expression.
    pub fn compile(patterns: &[Option<&str>]) -> Result<Self> {
        let mut set = Self::new(patterns.len());
        for (column, pattern) in patterns.iter().enumerate() {
            set.set(column, pattern.unwrap_or_default())?;
        }
        Ok(set)
    }

    /// Returns `true` if any slot holds a pattern.
    pub fn is_active(&self) -> bool {
        self.slots.iter().any(Option::is_some)
    }

    /// Replaces the pattern of one slot. An empty pattern clears the slot.
    ///
    /// On an invalid pattern the slot keeps its previous pattern. Slots past
    /// the end are created on demand.
    pub fn set(&mut self, column: usize, pattern: &str) -> Result<()> {
        let compiled = if pattern.is_empty() {
            None
        } else {
            let regex = Regex::new(pattern).map_err(|source| TableError::FilterSyntax {
                column,
                pattern: pattern.to_string(),
                source,
            })?;
            Some(regex)
        };
        if column >= self.slots.len() {
            self.slots.resize(column + 1, None);
        }
        self.slots[column] = compiled;
        Ok(())
    }

    /// Returns the pattern of one slot, or `""` for an empty slot.
    pub fn pattern(&self, column: usize) -> &str {
        self.slots
            .get(column)
            .and_then(|slot| slot.as_ref())
            .map_or("", Regex::as_str)
    }

    /// Returns the pattern of every slot.
    pub fn patterns(&self) -> Vec<String> {
        (0..self.slots.len())
            .map(|column| self.pattern(column).to_string())
            .collect()
    }

    /// Returns `true` if the row passes every non-empty slot.
    ///
    /// A slot for a column the row does not have is matched against `""`.
    pub fn matches<R>(&self, row: &ProcessedRow<R>) -> bool {
        self.slots.iter().enumerate().all(|(column, slot)| match slot {
            None => true,
            Some(regex) => match row.cell(column) {
                Some(cell) => regex.is_match(&cell.as_text()),
                None => regex.is_match(""),
            },
        })
    }
}

/// Returns the rows that pass `filters`, preserving their order.
pub fn filter_rows<R>(rows: &[SharedRow<R>], filters: &FilterSet) -> Vec<SharedRow<R>> {
    let filtered: Vec<SharedRow<R>> = if filters.is_active() {
        rows.iter()
            .filter(|row| filters.matches(row))
            .cloned()
            .collect()
    } else {
        rows.to_vec()
    };
    tracing::trace!(
        target: targets::PIPELINE,
        rows_in = rows.len(),
        rows_out = filtered.len(),
        "filtered rows"
    );
    filtered
}

/// Compiles `patterns` and returns the rows that pass all of them.
pub fn filter<R>(rows: &[SharedRow<R>], patterns: &[Option<&str>]) -> Result<Vec<SharedRow<R>>> {
    let filters = FilterSet::compile(patterns)?;
    Ok(filter_rows(rows, &filters))
}
