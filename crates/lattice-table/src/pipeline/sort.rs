//! Sorting processed rows by one column.

use std::cmp::Ordering;

use lattice_table_core::logging::targets;

use crate::content::CellContent;
use crate::row::SharedRow;

/// Extracts the leading number of a cell's string form.
///
/// Leading non-digit characters are skipped, then the longest
/// `digits[.digits][e[+-]digits]` prefix is parsed. Returns `NaN` when the
/// text contains no digit.
///
/// ```
/// use lattice_table::pipeline::numeric_prefix;
///
/// assert_eq!(numeric_prefix("id-042"), 42.0);
/// assert_eq!(numeric_prefix("3.5 kg"), 3.5);
/// assert!(numeric_prefix("none").is_nan());
/// ```
pub fn numeric_prefix(text: &str) -> f64 {
    let Some(start) = text.find(|c: char| c.is_ascii_digit()) else {
        return f64::NAN;
    };
    let bytes = &text.as_bytes()[start..];
    let digits_from = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = digits_from(0);
    if bytes.get(end) == Some(&b'.') {
        let fraction = digits_from(end + 1);
        if fraction > 0 {
            end += 1 + fraction;
        }
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_start = end + 1;
        if matches!(bytes.get(exp_start), Some(b'+' | b'-')) {
            exp_start += 1;
        }
        let exponent = digits_from(exp_start);
        if exponent > 0 {
            end = exp_start + exponent;
        }
    }

    text[start..start + end].parse().unwrap_or(f64::NAN)
}

/// Returns the number a cell sorts by in numeric mode.
///
/// Number cells sort by their value. Other cells sort by the
/// [`numeric_prefix`] of their string form.
fn numeric_key(cell: &CellContent) -> f64 {
    match cell {
        CellContent::Number(n) => *n,
        other => numeric_prefix(&other.as_text()),
    }
}

/// Compares two cells for sorting.
///
/// In numeric mode the numbers of both cells are compared first; cells with
/// equal numbers fall back to [`CellContent::natural_cmp`]. Cells without a
/// number order after all numbered cells and compare naturally among
/// themselves.
pub fn compare_cells(a: &CellContent, b: &CellContent, numeric: bool) -> Ordering {
    let keys = numeric.then(|| (numeric_key(a), numeric_key(b)));
    compare_keyed(a, b, keys)
}

/// Compares two cells given their numeric keys, if sorting numerically.
fn compare_keyed(a: &CellContent, b: &CellContent, keys: Option<(f64, f64)>) -> Ordering {
    keys.map_or(Ordering::Equal, |(x, y)| compare_parsed(x, y))
        .then_with(|| a.natural_cmp(b))
}

fn compare_parsed(x: f64, y: f64) -> Ordering {
    match (x.is_nan(), y.is_nan()) {
        (false, false) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) => Ordering::Equal,
    }
}

/// Sorts rows in place by the content of `column`.
///
/// The sort is stable: rows that compare equal keep their relative order.
/// `descending` reverses the final comparison.
pub fn sort<R>(rows: &mut [SharedRow<R>], column: usize, descending: bool, numeric: bool) {
    // Compute every numeric key once instead of once per comparison.
    let keys: Vec<f64> = if numeric {
        rows.iter()
            .map(|row| row.cell(column).map_or(f64::NAN, numeric_key))
            .collect()
    } else {
        Vec::new()
    };

    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.sort_by(|&i, &j| {
        let cmp = match (rows[i].cell(column), rows[j].cell(column)) {
            (Some(a), Some(b)) => compare_keyed(a, b, numeric.then(|| (keys[i], keys[j]))),
            _ => Ordering::Equal,
        };
        if descending { cmp.reverse() } else { cmp }
    });

    let sorted: Vec<SharedRow<R>> = order.iter().map(|&i| rows[i].clone()).collect();
    rows.clone_from_slice(&sorted);

    tracing::trace!(
        target: targets::PIPELINE,
        rows = rows.len(),
        column,
        descending,
        numeric,
        "sorted rows"
    );
}
