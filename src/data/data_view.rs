use std::collections::HashSet;
use tracing::debug;

use crate::data::datatable::{is_internal_key, DataRow};
use crate::data::datavalue_compare::compare_optional_datavalues;

/// Column the table falls back to when a sort cycle resets
pub const DEFAULT_SORT_COLUMN: &str = "state";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// The single active sort column and its direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub column: String,
    pub order: SortOrder,
}

impl SortState {
    pub fn ascending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            order: SortOrder::Ascending,
        }
    }
}

impl Default for SortState {
    fn default() -> Self {
        Self::ascending(DEFAULT_SORT_COLUMN)
    }
}

/// Derive the display column order: pinned columns in pin order, then every
/// non-internal key seen across the rows in first-seen order, each once.
pub fn derive_columns(rows: &[DataRow], pinned: &[String]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut columns = Vec::new();

    for name in pinned {
        if seen.insert(name.as_str()) {
            columns.push(name.clone());
        }
    }

    for row in rows {
        for key in row.keys() {
            if is_internal_key(key) {
                continue;
            }
            if seen.insert(key) {
                columns.push(key.to_string());
            }
        }
    }

    columns
}

/// Stable ascending sort of rows by one column
fn sorted_ascending(mut rows: Vec<DataRow>, column: &str) -> Vec<DataRow> {
    rows.sort_by(|a, b| compare_optional_datavalues(a.get(column), b.get(column)));
    rows
}

/// Dataset plus the sort and pin state layered over it.
///
/// Rows are never edited in place; every sort replaces the dataset with a
/// reordered copy.
#[derive(Debug, Clone)]
pub struct DataView {
    rows: Vec<DataRow>,
    sort_state: SortState,
    pinned_columns: Vec<String>,
    default_sort_column: String,
    columns: Vec<String>,
    /// False while rows are still in fetch order
    sort_applied: bool,
}

impl Default for DataView {
    fn default() -> Self {
        Self::new()
    }
}

impl DataView {
    /// Empty view with the default sort column
    pub fn new() -> Self {
        Self::with_default_sort_column(DEFAULT_SORT_COLUMN)
    }

    pub fn with_default_sort_column(column: impl Into<String>) -> Self {
        let column = column.into();
        Self {
            rows: Vec::new(),
            sort_state: SortState::ascending(column.clone()),
            pinned_columns: Vec::new(),
            default_sort_column: column,
            columns: Vec::new(),
            sort_applied: false,
        }
    }

    /// Replace the whole dataset
    pub fn set_rows(&mut self, rows: Vec<DataRow>) {
        self.rows = rows;
        self.sort_applied = false;
        self.refresh_columns();
    }

    /// Reorder the dataset ascending by the default column without touching sort state
    pub fn sort_by_default(&mut self) {
        let rows = std::mem::take(&mut self.rows);
        self.rows = sorted_ascending(rows, &self.default_sort_column);
        self.sort_applied = true;
    }

    /// Pin a column if it is unpinned, unpin it otherwise.
    /// Returns true if the column is pinned afterwards.
    pub fn toggle_pin(&mut self, column: &str) -> bool {
        let pinned = if let Some(pos) = self.pinned_columns.iter().position(|c| c == column) {
            self.pinned_columns.remove(pos);
            false
        } else {
            self.pinned_columns.push(column.to_string());
            true
        };
        debug!(target: "DataView", "toggle_pin({}) -> pinned={} {:?}", column, pinned, self.pinned_columns);
        self.refresh_columns();
        pinned
    }

    /// Advance the sort cycle for a column: ascending, then descending (the exact
    /// reverse), then back to the default column ascending.
    pub fn sort(&mut self, column: &str) -> &SortState {
        let rows = std::mem::take(&mut self.rows);

        if self.sort_state.column != column {
            self.sort_state = SortState::ascending(column);
            self.rows = sorted_ascending(rows, column);
        } else {
            match self.sort_state.order {
                SortOrder::Ascending => {
                    // Rows may still be in fetch order; a stable sort of already
                    // ascending rows leaves them untouched
                    self.sort_state.order = SortOrder::Descending;
                    let mut rows = sorted_ascending(rows, column);
                    rows.reverse();
                    self.rows = rows;
                }
                SortOrder::Descending => {
                    self.sort_state = SortState::ascending(self.default_sort_column.clone());
                    self.rows = sorted_ascending(rows, &self.default_sort_column);
                }
            }
        }

        self.sort_applied = true;
        debug!(
            target: "DataView",
            "sort({}) -> {} {:?} over {} rows",
            column,
            self.sort_state.column,
            self.sort_state.order,
            self.rows.len()
        );
        &self.sort_state
    }

    fn refresh_columns(&mut self) {
        self.columns = derive_columns(&self.rows, &self.pinned_columns);
    }

    pub fn rows(&self) -> &[DataRow] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Current display column order
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn get_pinned_columns(&self) -> &[String] {
        &self.pinned_columns
    }

    pub fn is_pinned(&self, column: &str) -> bool {
        self.pinned_columns.iter().any(|c| c == column)
    }

    /// Whether the rows reflect `sort_state` rather than fetch order
    pub fn is_sort_applied(&self) -> bool {
        self.sort_applied
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort_state
    }

    pub fn default_sort_column(&self) -> &str {
        &self.default_sort_column
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn states() -> Vec<DataRow> {
        vec![
            DataRow::new().with("state", "Texas").with("pop", 29_000_000),
            DataRow::new().with("state", "Ohio").with("pop", 11_800_000),
            DataRow::new().with("state", "Maine").with("pop", 1_390_000),
        ]
    }

    fn names(view: &DataView) -> Vec<String> {
        view.rows()
            .iter()
            .map(|r| r.get("state").map(|v| v.to_string()).unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_default_sort_state() {
        let view = DataView::new();
        assert_eq!(view.sort_state(), &SortState::ascending("state"));
        assert!(view.column_names().is_empty());
    }

    #[test]
    fn test_sort_cycle() {
        let mut view = DataView::new();
        view.set_rows(states());

        view.sort("pop");
        assert_eq!(names(&view), vec!["Maine", "Ohio", "Texas"]);
        assert_eq!(view.sort_state().order, SortOrder::Ascending);

        view.sort("pop");
        assert_eq!(names(&view), vec!["Texas", "Ohio", "Maine"]);
        assert_eq!(view.sort_state().order, SortOrder::Descending);

        view.sort("pop");
        assert_eq!(names(&view), vec!["Maine", "Ohio", "Texas"]);
        assert_eq!(view.sort_state(), &SortState::default());
    }

    #[test]
    fn test_sort_default_column_goes_descending_first() {
        let mut view = DataView::new();
        view.set_rows(vec![
            DataRow::new().with("state", "Ohio"),
            DataRow::new().with("state", "Texas"),
            DataRow::new().with("state", "Maine"),
        ]);
        view.sort("state");
        assert_eq!(view.sort_state().order, SortOrder::Descending);
        // Fetch order is not mistaken for ascending order
        assert_eq!(names(&view), vec!["Texas", "Ohio", "Maine"]);
    }

    #[test]
    fn test_descending_is_exact_reverse_with_ties() {
        let mut view = DataView::new();
        view.set_rows(vec![
            DataRow::new().with("state", "A").with("region", "west"),
            DataRow::new().with("state", "B").with("region", "east"),
            DataRow::new().with("state", "C").with("region", "west"),
        ]);
        view.sort("region");
        assert_eq!(names(&view), vec!["B", "A", "C"]);
        view.sort("region");
        // Reverse of the ascending result, not a descending comparator run
        assert_eq!(names(&view), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_sort_applied_tracking() {
        let mut view = DataView::new();
        view.set_rows(states());
        assert!(!view.is_sort_applied());

        view.sort("pop");
        assert!(view.is_sort_applied());
        view.toggle_pin("pop");
        assert!(view.is_sort_applied());

        view.set_rows(states());
        assert!(!view.is_sort_applied());
        view.sort_by_default();
        assert!(view.is_sort_applied());
    }

    #[test]
    fn test_toggle_pin_preserves_order() {
        let mut view = DataView::new();
        assert!(view.toggle_pin("pop"));
        assert!(view.toggle_pin("capital"));
        assert_eq!(view.get_pinned_columns(), &["pop", "capital"]);
        assert!(!view.toggle_pin("pop"));
        assert_eq!(view.get_pinned_columns(), &["capital"]);
    }

    #[test]
    fn test_pin_does_not_reorder_rows() {
        let mut view = DataView::new();
        view.set_rows(states());
        view.sort("pop");
        let before = view.rows().to_vec();
        view.toggle_pin("state");
        assert_eq!(view.rows(), before.as_slice());
        assert_eq!(view.sort_state().column, "pop");
    }

    #[test]
    fn test_derive_columns_pinned_first() {
        let rows = vec![
            DataRow::new().with("state", "Ohio").with("pop", 1).with("_id", 1),
            DataRow::new().with("capital", "Columbus").with("state", "Ohio"),
        ];
        let cols = derive_columns(&rows, &["capital".to_string()]);
        assert_eq!(cols, vec!["capital", "state", "pop"]);
    }

    #[test]
    fn test_custom_default_sort_column() {
        let mut view = DataView::with_default_sort_column("pop");
        view.set_rows(states());
        view.sort("state");
        view.sort("state");
        view.sort("state");
        assert_eq!(view.sort_state(), &SortState::ascending("pop"));
        assert_eq!(names(&view), vec!["Maine", "Ohio", "Texas"]);
    }
}
