//! Header cells and sort indicators.

use crate::model::{ColumnSpec, SortDirection, SortSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortIndicator {
    Ascending,
    Descending,
    /// Not sorted, but a click would sort it.
    Sortable,
    /// Not sorted and the table is read-only.
    Unsorted,
    /// The column cannot be sorted.
    Disabled,
}

impl SortIndicator {
    /// Icon class the original markup used.
    pub fn css_class(&self) -> &'static str {
        match self {
            SortIndicator::Ascending => "fa-sort-up",
            SortIndicator::Descending => "fa-sort-down",
            SortIndicator::Sortable => "fa-sort",
            SortIndicator::Unsorted | SortIndicator::Disabled => "",
        }
    }

    /// Glyph for text rendering.
    pub fn glyph(&self) -> &'static str {
        match self {
            SortIndicator::Ascending => "▲",
            SortIndicator::Descending => "▼",
            SortIndicator::Sortable => "↕",
            SortIndicator::Unsorted | SortIndicator::Disabled => "",
        }
    }
}

pub fn sort_indicator(column: &ColumnSpec, sorting: &SortSpec, editable: bool) -> SortIndicator {
    if !column.is_sortable() {
        return SortIndicator::Disabled;
    }
    match sorting.get(column.field()) {
        Some(key) if key.dir == SortDirection::Asc => SortIndicator::Ascending,
        Some(_) => SortIndicator::Descending,
        None if editable => SortIndicator::Sortable,
        None => SortIndicator::Unsorted,
    }
}

/// One rendered header cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    pub field: String,
    pub label: String,
    pub indicator: SortIndicator,
    /// Clicking toggles the sort. Also where resize drags start.
    pub clickable: bool,
}

impl HeaderView {
    /// Label with the indicator glyph appended.
    pub fn text(&self) -> String {
        match self.indicator.glyph() {
            "" => self.label.clone(),
            glyph => format!("{} {}", self.label, glyph),
        }
    }
}

pub fn header_cells(columns: &[ColumnSpec], sorting: &SortSpec, editable: bool) -> Vec<HeaderView> {
    columns
        .iter()
        .map(|column| {
            let indicator = sort_indicator(column, sorting, editable);
            HeaderView {
                field: column.field().to_string(),
                label: column.label().to_string(),
                indicator,
                clickable: editable && indicator != SortIndicator::Disabled,
            }
        })
        .collect()
}
