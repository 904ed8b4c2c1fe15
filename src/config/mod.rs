//! Configuration module.
//!
//! [`TableConfig`] is the resolved set of widget options. It is built from a
//! TOML [`ConfigFile`] by [`merge_config`] or assembled directly by library
//! callers.

pub mod loader;

pub use loader::{
    apply_env_overrides, default_config_path, default_log_path, load_config_file,
    load_config_with_precedence, merge_config, ColumnConfig, ConfigError, ConfigFile,
    CurrencyFormatSection,
};

use crate::format::Formats;
use crate::model::{ColumnSpec, SortSpec};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Default overall table width, percent of the container.
pub const DEFAULT_WIDTH: f64 = 100.0;

/// Default minimum column width in pixels.
pub const DEFAULT_COLUMN_MIN_WIDTH: f64 = 50.0;

/// Default page size.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

/// Localizable strings shown by the widget.
///
/// `showing` takes `{0}` (first item), `{1}` (last item) and `{2}` (filtered total).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Resources {
    pub first_page: String,
    pub previous_page: String,
    pub next_page: String,
    pub last_page: String,
    pub no_data: String,
    pub showing: String,
    pub page: String,
    pub per_page: String,
    pub loading_error: String,
    pub try_again: String,
}

impl Default for Resources {
    fn default() -> Self {
        Self {
            first_page: "First Page".to_string(),
            previous_page: "Previous Page".to_string(),
            next_page: "Next Page".to_string(),
            last_page: "Last Page".to_string(),
            no_data: "There are no records to show.".to_string(),
            showing: "Showing {0} - {1} of {2}".to_string(),
            page: "Page".to_string(),
            per_page: "Per Page".to_string(),
            loading_error: "There was a problem loading the table.".to_string(),
            try_again: "Try Again".to_string(),
        }
    }
}

/// Resolved widget configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TableConfig {
    /// Widget id, used as the persistence key prefix.
    pub id: String,
    pub columns: Vec<ColumnSpec>,
    pub url: String,
    pub request_method: String,
    pub searchable: bool,
    /// Client-side filtering and paging when true, server-side otherwise.
    pub load_all_data: bool,
    /// Minimum column width in pixels.
    pub column_min_width: f64,
    /// Initial table width, percent.
    pub width: f64,
    /// Enables sort, resize and search chrome.
    pub editable: bool,
    pub page_dropdown: bool,
    /// Extra toolbar content, passed through to the render layer.
    pub header_buttons: Option<String>,
    /// Initial values. With a snapshot sink these are the only source; with a
    /// key/value store the stored values win.
    pub items_per_page: Option<usize>,
    pub current_start_item: Option<usize>,
    pub search_query: Option<String>,
    pub sorting: Option<SortSpec>,
    pub formats: Formats,
    pub resources: Resources,
    /// Log file for the binary.
    pub log_file_path: PathBuf,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            id: "table".to_string(),
            columns: Vec::new(),
            url: String::new(),
            request_method: "GET".to_string(),
            searchable: true,
            load_all_data: true,
            column_min_width: DEFAULT_COLUMN_MIN_WIDTH,
            width: DEFAULT_WIDTH,
            editable: true,
            page_dropdown: true,
            header_buttons: None,
            items_per_page: None,
            current_start_item: None,
            search_query: None,
            sorting: None,
            formats: Formats::default(),
            resources: Resources::default(),
            log_file_path: default_log_path(),
        }
    }
}

impl TableConfig {
    /// Defaults with the given id and columns.
    pub fn new(id: impl Into<String>, columns: Vec<ColumnSpec>) -> Self {
        Self {
            id: id.into(),
            columns,
            ..Self::default()
        }
    }

    pub fn column(&self, field: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.field() == field)
    }

    pub fn column_index(&self, field: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.field() == field)
    }

    /// Check the invariants the engine relies on.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` for an empty id, a duplicate column
    /// field, or an explicit zero page size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.id.trim().is_empty() {
            return Err(ConfigError::Validation("table id must not be empty".to_string()));
        }
        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.field()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate column field {:?}",
                    column.field()
                )));
            }
        }
        if self.items_per_page == Some(0) {
            return Err(ConfigError::Validation(
                "items_per_page must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
