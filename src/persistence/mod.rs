//! Persistence adapter.
//!
//! Per-widget state is either written key by key into a [`KeyValueStore`]
//! under `"{id}.{key}"`, or handed as a whole [`StateSnapshot`] to a caller
//! supplied [`SnapshotSink`] on every mutation. Debouncing snapshot saves is
//! the sink's business.

pub mod store;

pub use store::{JsonFileStore, MemoryStore};

use crate::config::{TableConfig, DEFAULT_ITEMS_PER_PAGE, DEFAULT_WIDTH};
use crate::model::{PersistenceError, SortSpec};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

// ===== Traits =====

/// Named string values that outlive one widget instance.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns `PersistenceError` when the value cannot be stored.
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

/// Receives the full widget state after each mutation.
pub trait SnapshotSink {
    /// # Errors
    ///
    /// Returns `PersistenceError` when the sink refuses or fails to save.
    fn save(&mut self, snapshot: &StateSnapshot) -> Result<(), PersistenceError>;
}

impl<F> SnapshotSink for F
where
    F: FnMut(&StateSnapshot) -> Result<(), PersistenceError>,
{
    fn save(&mut self, snapshot: &StateSnapshot) -> Result<(), PersistenceError> {
        self(snapshot)
    }
}

// ===== Keys and snapshot =====

/// A value that a mutation changed and that must be written back.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PersistKey {
    ItemsPerPage,
    CurrentStartItem,
    SearchQuery,
    /// Overall table width.
    Width,
    Sorting,
    /// Width of the column with this field.
    ColumnWidth(String),
}

impl PersistKey {
    /// Key name below the widget id.
    pub fn name(&self) -> String {
        match self {
            PersistKey::ItemsPerPage => "itemsPerPage".to_string(),
            PersistKey::CurrentStartItem => "currentStartItem".to_string(),
            PersistKey::SearchQuery => "searchQuery".to_string(),
            PersistKey::Width => "width".to_string(),
            PersistKey::Sorting => "sorting".to_string(),
            PersistKey::ColumnWidth(field) => format!("{}.width", field),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnWidth {
    pub field: String,
    /// Percent of the table width. `None` until the layout has measured it.
    pub width: Option<f64>,
}

/// Everything a snapshot sink receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub items_per_page: usize,
    pub current_start_item: usize,
    pub search_query: String,
    pub width: f64,
    pub sorting: SortSpec,
    pub column_widths: Vec<ColumnWidth>,
}

impl StateSnapshot {
    /// Stored string form of one key, `None` when there is nothing to write.
    fn value_of(&self, key: &PersistKey) -> Option<String> {
        match key {
            PersistKey::ItemsPerPage => Some(self.items_per_page.to_string()),
            PersistKey::CurrentStartItem => Some(self.current_start_item.to_string()),
            PersistKey::SearchQuery => Some(self.search_query.clone()),
            PersistKey::Width => Some(format!("{:.2}", self.width)),
            PersistKey::Sorting => Some(self.sorting.to_json()),
            PersistKey::ColumnWidth(field) => self
                .column_widths
                .iter()
                .find(|c| &c.field == field)
                .and_then(|c| c.width)
                .map(|w| format!("{:.2}", w)),
        }
    }
}

/// Initial state read at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoredState {
    pub items_per_page: usize,
    pub current_start_item: usize,
    pub search_query: String,
    pub sorting: SortSpec,
    /// Table width in percent.
    pub width: f64,
    /// One entry per configured column, in column order.
    pub column_widths: Vec<Option<f64>>,
}

fn parse_positive(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

fn parse_count(raw: &str) -> Option<usize> {
    parse_positive(raw).map(|v| v as usize).filter(|v| *v > 0)
}

// ===== StateStore =====

enum Backend {
    KeyValue(Box<dyn KeyValueStore>),
    Snapshot(Box<dyn SnapshotSink>),
}

/// The adapter a table writes through.
pub struct StateStore {
    prefix: String,
    backend: Backend,
}

impl fmt::Debug for StateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self.backend {
            Backend::KeyValue(_) => "key-value",
            Backend::Snapshot(_) => "snapshot",
        };
        f.debug_struct("StateStore")
            .field("prefix", &self.prefix)
            .field("mode", &mode)
            .finish()
    }
}

impl StateStore {
    /// Write individual keys under `"{id}."`.
    pub fn key_value(id: &str, store: impl KeyValueStore + 'static) -> Self {
        Self {
            prefix: id.to_string(),
            backend: Backend::KeyValue(Box::new(store)),
        }
    }

    /// Send a full snapshot to `sink` on every mutation.
    pub fn snapshot(id: &str, sink: impl SnapshotSink + 'static) -> Self {
        Self {
            prefix: id.to_string(),
            backend: Backend::Snapshot(Box::new(sink)),
        }
    }

    pub fn is_snapshot(&self) -> bool {
        matches!(self.backend, Backend::Snapshot(_))
    }

    fn full_key(&self, key: &PersistKey) -> String {
        format!("{}.{}", self.prefix, key.name())
    }

    /// Stored raw value. Always `None` for a snapshot sink.
    pub fn read(&self, key: &PersistKey) -> Option<String> {
        match &self.backend {
            Backend::KeyValue(store) => store.get(&self.full_key(key)),
            Backend::Snapshot(_) => None,
        }
    }

    /// Initial values for a widget.
    ///
    /// A key/value store wins over the configuration, which wins over the
    /// defaults. Zero or unparsable stored numbers count as absent. A
    /// configured positive column width beats the stored one.
    pub fn restore(&self, config: &TableConfig) -> RestoredState {
        let items_per_page = self
            .read(&PersistKey::ItemsPerPage)
            .and_then(|raw| parse_count(&raw))
            .or(config.items_per_page.filter(|n| *n > 0))
            .unwrap_or(DEFAULT_ITEMS_PER_PAGE);

        let current_start_item = self
            .read(&PersistKey::CurrentStartItem)
            .and_then(|raw| parse_count(&raw))
            .or(config.current_start_item)
            .unwrap_or(0);

        let search_query = self
            .read(&PersistKey::SearchQuery)
            .or_else(|| config.search_query.clone())
            .unwrap_or_default();

        let sorting = match self.read(&PersistKey::Sorting) {
            Some(raw) if !raw.trim().is_empty() => SortSpec::from_json(&raw).unwrap_or_else(|e| {
                warn!(table = %self.prefix, error = %e, "Ignoring unreadable stored sorting");
                SortSpec::new()
            }),
            _ => config.sorting.clone().unwrap_or_default(),
        };

        let width = self
            .read(&PersistKey::Width)
            .and_then(|raw| parse_positive(&raw))
            .or(Some(config.width).filter(|w| w.is_finite() && *w > 0.0))
            .unwrap_or(DEFAULT_WIDTH);

        let column_widths = config
            .columns
            .iter()
            .map(|column| {
                column.width().or_else(|| {
                    self.read(&PersistKey::ColumnWidth(column.field().to_string()))
                        .and_then(|raw| parse_positive(&raw))
                })
            })
            .collect();

        debug!(table = %self.prefix, items_per_page, current_start_item, "Restored table state");

        RestoredState {
            items_per_page,
            current_start_item,
            search_query,
            sorting,
            width,
            column_widths,
        }
    }

    /// Write back what a mutation changed. Failures are logged, never returned.
    pub fn persist(&mut self, keys: &[PersistKey], snapshot: &StateSnapshot) {
        if keys.is_empty() {
            return;
        }
        match &mut self.backend {
            Backend::KeyValue(store) => {
                for key in keys {
                    let Some(value) = snapshot.value_of(key) else {
                        continue;
                    };
                    let full_key = format!("{}.{}", self.prefix, key.name());
                    if let Err(e) = store.set(&full_key, &value) {
                        warn!(key = %full_key, error = %e, "Failed to persist table state");
                    }
                }
            }
            Backend::Snapshot(sink) => {
                if let Err(e) = sink.save(snapshot) {
                    warn!(table = %self.prefix, error = %e, "State sink failed");
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "state_store_tests.rs"]
mod tests;
