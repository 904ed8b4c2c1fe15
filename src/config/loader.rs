//! Configuration file loading with precedence handling.

use super::{Resources, TableConfig};
use crate::format::{CurrencyFormat, Formats};
use crate::model::{ColumnKind, ColumnSpec, LinkSpec, SortDirection, SortKey, SortSpec};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A column entry cannot become a column spec.
    #[error("Invalid column {field:?}: {reason}")]
    InvalidColumn {
        /// Field name as written in the file.
        field: String,
        /// Reason for failure.
        reason: String,
    },

    /// The resolved configuration breaks a table invariant.
    #[error("Invalid table configuration: {0}")]
    Validation(String),
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, widget defaults are used.
/// Corresponds to `~/.config/tablestate/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Widget id (persistence key prefix).
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub request_method: Option<String>,

    #[serde(default)]
    pub searchable: Option<bool>,

    /// Client-side paging and filtering.
    #[serde(default)]
    pub load_all_data: Option<bool>,

    /// Minimum column width in pixels.
    #[serde(default)]
    pub column_min_width: Option<f64>,

    /// Table width in percent.
    #[serde(default)]
    pub width: Option<f64>,

    #[serde(default)]
    pub editable: Option<bool>,

    #[serde(default)]
    pub page_dropdown: Option<bool>,

    #[serde(default)]
    pub header_buttons: Option<String>,

    #[serde(default)]
    pub items_per_page: Option<usize>,

    #[serde(default)]
    pub current_start_item: Option<usize>,

    #[serde(default)]
    pub search_query: Option<String>,

    /// Initial sort keys, primary first.
    #[serde(default)]
    pub sorting: Option<Vec<SortEntry>>,

    /// Pattern used to parse date values from the data source.
    #[serde(default)]
    pub data_date_format: Option<String>,

    /// Pattern used to display date values.
    #[serde(default)]
    pub display_date_format: Option<String>,

    #[serde(default)]
    pub display_currency_format: Option<CurrencyFormatSection>,

    /// Strings shown by the widget. Missing entries keep their English default.
    #[serde(default)]
    pub resources: Option<Resources>,

    #[serde(default)]
    pub columns: Option<Vec<ColumnConfig>>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// One `[[columns]]` entry.
///
/// ```toml
/// [[columns]]
/// field = "price"
/// label = "Price"
/// data_type = "currency"
/// width = 20.0
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ColumnConfig {
    pub field: String,

    #[serde(default)]
    pub label: Option<String>,

    /// One of `string`, `int`, `date`, `currency` (case-insensitive).
    #[serde(default)]
    pub data_type: Option<String>,

    #[serde(default)]
    pub sortable: Option<bool>,

    /// Width in percent of the table width.
    #[serde(default)]
    pub width: Option<f64>,

    #[serde(default)]
    pub links: Option<Vec<LinkSpec>>,
}

/// One `[[sorting]]` entry.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SortEntry {
    pub field: String,

    /// `ASC` or `DESC`, ascending when omitted.
    #[serde(default)]
    pub dir: Option<SortDirection>,

    /// Defaults to the matching column's data type.
    #[serde(default)]
    pub data_type: Option<String>,
}

/// `[display_currency_format]` section. Missing entries keep their default.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CurrencyFormatSection {
    #[serde(default)]
    pub symbol: Option<String>,

    /// Template where `%s` is the symbol and `%v` the number.
    #[serde(default)]
    pub format: Option<String>,

    #[serde(default)]
    pub decimal: Option<String>,

    #[serde(default)]
    pub thousand: Option<String>,

    #[serde(default)]
    pub precision: Option<usize>,
}

impl CurrencyFormatSection {
    fn resolve(self) -> CurrencyFormat {
        let defaults = CurrencyFormat::default();
        CurrencyFormat {
            symbol: self.symbol.unwrap_or(defaults.symbol),
            format: self.format.unwrap_or(defaults.format),
            decimal: self.decimal.unwrap_or(defaults.decimal),
            thousand: self.thousand.unwrap_or(defaults.thousand),
            precision: self.precision.unwrap_or(defaults.precision),
        }
    }
}

fn parse_kind(field: &str, raw: Option<&str>) -> Result<ColumnKind, ConfigError> {
    match raw {
        None => Ok(ColumnKind::String),
        Some(raw) => raw.parse().map_err(|e: crate::model::UnknownDataType| {
            ConfigError::InvalidColumn {
                field: field.to_string(),
                reason: e.to_string(),
            }
        }),
    }
}

impl ColumnConfig {
    fn into_spec(self) -> Result<ColumnSpec, ConfigError> {
        let kind = parse_kind(&self.field, self.data_type.as_deref())?;
        let mut spec =
            ColumnSpec::new(self.field.clone(), kind).map_err(|e| ConfigError::InvalidColumn {
                field: self.field.clone(),
                reason: e.to_string(),
            })?;
        if let Some(label) = self.label {
            spec = spec.with_label(label);
        }
        if let Some(sortable) = self.sortable {
            spec = spec.with_sortable(sortable);
        }
        if let Some(width) = self.width {
            spec = spec.with_width(width);
        }
        if let Some(links) = self.links {
            spec = spec.with_links(links);
        }
        Ok(spec)
    }
}

fn resolve_sorting(
    entries: Vec<SortEntry>,
    columns: &[ColumnSpec],
) -> Result<SortSpec, ConfigError> {
    let mut keys = Vec::with_capacity(entries.len());
    for entry in entries {
        let kind = match entry.data_type.as_deref() {
            Some(raw) => parse_kind(&entry.field, Some(raw))?,
            None => columns
                .iter()
                .find(|c| c.field() == entry.field)
                .map(|c| c.kind())
                .unwrap_or_default(),
        };
        keys.push(SortKey::new(
            entry.field,
            entry.dir.unwrap_or(SortDirection::Asc),
            kind,
        ));
    }
    Ok(SortSpec::from_keys(keys))
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/tablestate/tablestate.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("tablestate").join("tablestate.log")
    } else {
        PathBuf::from("tablestate.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
/// Returns `Err` if file exists but cannot be read or parsed.
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/tablestate/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tablestate").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (like CLI `--config`)
/// 2. `TABLESTATE_CONFIG` environment variable
/// 3. Default path `~/.config/tablestate/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var("TABLESTATE_CONFIG") {
        if env_path.is_empty() {
            return Err(ConfigError::InvalidPath(
                "TABLESTATE_CONFIG is set but empty".to_string(),
            ));
        }
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `TABLESTATE_LOG`: Override log file path
pub fn apply_env_overrides(mut config: TableConfig) -> TableConfig {
    if let Ok(path) = std::env::var("TABLESTATE_LOG") {
        if !path.is_empty() {
            config.log_file_path = PathBuf::from(path);
        }
    }

    config
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
///
/// # Errors
///
/// Returns `ConfigError::InvalidColumn` when a column or sort entry names an
/// unknown data type or an unusable field.
pub fn merge_config(config_file: Option<ConfigFile>) -> Result<TableConfig, ConfigError> {
    let defaults = TableConfig::default();

    let Some(config) = config_file else {
        return Ok(defaults);
    };

    let columns = config
        .columns
        .unwrap_or_default()
        .into_iter()
        .map(ColumnConfig::into_spec)
        .collect::<Result<Vec<_>, _>>()?;

    let sorting = config
        .sorting
        .map(|entries| resolve_sorting(entries, &columns))
        .transpose()?;

    let formats = Formats {
        data_date: config
            .data_date_format
            .unwrap_or(defaults.formats.data_date),
        display_date: config
            .display_date_format
            .unwrap_or(defaults.formats.display_date),
        currency: config
            .display_currency_format
            .map(CurrencyFormatSection::resolve)
            .unwrap_or(defaults.formats.currency),
    };

    Ok(TableConfig {
        id: config.id.unwrap_or(defaults.id),
        columns,
        url: config.url.unwrap_or(defaults.url),
        request_method: config.request_method.unwrap_or(defaults.request_method),
        searchable: config.searchable.unwrap_or(defaults.searchable),
        load_all_data: config.load_all_data.unwrap_or(defaults.load_all_data),
        column_min_width: config
            .column_min_width
            .unwrap_or(defaults.column_min_width),
        width: config.width.unwrap_or(defaults.width),
        editable: config.editable.unwrap_or(defaults.editable),
        page_dropdown: config.page_dropdown.unwrap_or(defaults.page_dropdown),
        header_buttons: config.header_buttons,
        items_per_page: config.items_per_page,
        current_start_item: config.current_start_item,
        search_query: config.search_query,
        sorting,
        formats,
        resources: config.resources.unwrap_or(defaults.resources),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    })
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
