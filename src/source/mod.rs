//! Data source contract.
//!
//! The engine never performs I/O. Each load is described by a [`DataRequest`]
//! ticket; whoever drives the table fetches it (async runtime, thread, or a
//! plain call through [`DataSource`]) and hands the result back together with
//! the ticket's generation.

use crate::model::{FetchError, SortDirection, SortSpec};
use serde::{Deserialize, Serialize};

pub mod file;

pub use file::FileSource;

/// Raw row as delivered by the data source, before coercion.
pub type RawRow = serde_json::Map<String, serde_json::Value>;

/// Sort entry sent with a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortParam {
    pub field: String,
    pub dir: SortDirection,
    /// Priority, 0 for the primary key.
    pub index: usize,
}

/// Query parameters of a data request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    pub start_item: usize,
    pub items: usize,
    pub query: String,
    /// `None` when unsorted.
    pub sort: Option<Vec<SortParam>>,
    /// Cache-busting token.
    pub t: f64,
}

impl QueryParams {
    pub fn new(start_item: usize, items: usize, query: &str, sorting: &SortSpec) -> Self {
        let sort = (!sorting.is_empty()).then(|| {
            sorting
                .keys()
                .iter()
                .enumerate()
                .map(|(index, key)| SortParam {
                    field: key.field.clone(),
                    dir: key.dir,
                    index,
                })
                .collect()
        });
        Self {
            start_item,
            items,
            query: query.to_string(),
            sort,
            t: rand::random::<f64>(),
        }
    }

    /// Flat key/value pairs for a query string. `sort` is JSON-encoded and
    /// omitted when unsorted.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("startItem", self.start_item.to_string()),
            ("items", self.items.to_string()),
            ("query", self.query.clone()),
        ];
        if let Some(sort) = &self.sort {
            pairs.push((
                "sort",
                serde_json::to_string(sort).unwrap_or_else(|_| "[]".to_string()),
            ));
        }
        pairs.push(("t", self.t.to_string()));
        pairs
    }
}

/// Monotonic id of a data request. Only the latest one may complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestGeneration(u64);

impl RequestGeneration {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

/// A pending data load.
#[derive(Debug, Clone, PartialEq)]
pub struct DataRequest {
    pub generation: RequestGeneration,
    pub method: String,
    pub url: String,
    pub params: QueryParams,
}

/// Response of a data request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPayload {
    pub rows: Vec<RawRow>,
    /// Count after the server-side search filter. Ignored in load-all mode.
    #[serde(default)]
    pub filtered_total: usize,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PayloadShape {
    Payload(DataPayload),
    Rows(Vec<RawRow>),
}

impl DataPayload {
    /// Payload holding every row, with `filtered_total` set to the row count.
    pub fn from_rows(rows: Vec<RawRow>) -> Self {
        let filtered_total = rows.len();
        Self {
            rows,
            filtered_total,
        }
    }

    /// Parse either `{ rows, filteredTotal }` or a bare array of rows.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Malformed` when the text is neither shape.
    pub fn from_json(text: &str) -> Result<Self, FetchError> {
        match serde_json::from_str::<PayloadShape>(text) {
            Ok(PayloadShape::Payload(payload)) => Ok(payload),
            Ok(PayloadShape::Rows(rows)) => Ok(Self::from_rows(rows)),
            Err(e) => Err(FetchError::Malformed(e.to_string())),
        }
    }
}

/// Something that can answer a data request synchronously.
pub trait DataSource {
    /// # Errors
    ///
    /// Returns `FetchError` for transport or payload failures.
    fn fetch(&mut self, request: &DataRequest) -> Result<DataPayload, FetchError>;
}

impl<F> DataSource for F
where
    F: FnMut(&DataRequest) -> Result<DataPayload, FetchError>,
{
    fn fetch(&mut self, request: &DataRequest) -> Result<DataPayload, FetchError> {
        self(request)
    }
}
