//! Records: one row of table data after ingestion.

use super::value::Value;
use std::collections::BTreeMap;

/// Field names starting with this prefix are internal metadata and never searched.
pub const INTERNAL_PREFIX: char = '_';

/// Position of a record in the payload it arrived in. 0-indexed.
///
/// This is the default sort key and the render key of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RecordIndex(usize);

impl RecordIndex {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl From<usize> for RecordIndex {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// A row of data keyed by field name.
///
/// Fields are fixed once ingestion has coerced them; sorting reorders
/// records, never their contents.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    index: RecordIndex,
    fields: BTreeMap<String, Value>,
}

static NULL: Value = Value::Null;

impl Record {
    pub fn new(index: RecordIndex, fields: BTreeMap<String, Value>) -> Self {
        Self { index, fields }
    }

    pub fn index(&self) -> RecordIndex {
        self.index
    }

    /// Value of `field`, `Value::Null` when absent.
    pub fn get(&self, field: &str) -> &Value {
        self.fields.get(field).unwrap_or(&NULL)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Fields whose names are not internal metadata.
    pub fn visible_fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields()
            .filter(|(name, _)| !name.starts_with(INTERNAL_PREFIX))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
