//! Local JSON data source.
//!
//! Loads a payload once and answers every request from memory. In paged mode
//! it slices `startItem..startItem + items` and reports the full row count as
//! the filtered total, like a server without search or sort support.

use super::{DataPayload, DataRequest, DataSource, RawRow};
use crate::model::FetchError;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FileSource {
    path: Option<PathBuf>,
    payload: DataPayload,
    paged: bool,
}

impl FileSource {
    /// Read a payload file.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Read` if the file cannot be read and
    /// `FetchError::Malformed` if it is not a payload.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FetchError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| FetchError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let payload = DataPayload::from_json(&text)?;
        tracing::debug!(path = %path.display(), rows = payload.rows.len(), "Loaded data file");
        Ok(Self {
            path: Some(path.to_path_buf()),
            payload,
            paged: false,
        })
    }

    pub fn from_payload(payload: DataPayload) -> Self {
        Self {
            path: None,
            payload,
            paged: false,
        }
    }

    /// Answer with one page per request instead of every row.
    pub fn paged(mut self, paged: bool) -> Self {
        self.paged = paged;
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn row_count(&self) -> usize {
        self.payload.rows.len()
    }

    pub fn rows(&self) -> &[RawRow] {
        &self.payload.rows
    }
}

impl DataSource for FileSource {
    fn fetch(&mut self, request: &DataRequest) -> Result<DataPayload, FetchError> {
        if !self.paged {
            return Ok(DataPayload::from_rows(self.payload.rows.clone()));
        }
        let total = self.payload.rows.len();
        let start = request.params.start_item.min(total);
        let end = start.saturating_add(request.params.items).min(total);
        Ok(DataPayload {
            rows: self.payload.rows[start..end].to_vec(),
            filtered_total: total,
        })
    }
}
