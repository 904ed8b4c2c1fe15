//! Sort specifications.
//!
//! A `SortSpec` is an ordered list of keys; the first key is the primary one.
//! It never holds two keys for the same field.

use super::column::ColumnKind;
use serde::{Deserialize, Serialize};

/// Direction of one sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// One entry in a sort spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortKey {
    pub field: String,
    pub dir: SortDirection,
    #[serde(default)]
    pub data_type: ColumnKind,
}

impl SortKey {
    pub fn new(field: impl Into<String>, dir: SortDirection, data_type: ColumnKind) -> Self {
        Self {
            field: field.into(),
            dir,
            data_type,
        }
    }
}

/// Ordered sort keys, primary first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct SortSpec(Vec<SortKey>);

impl SortSpec {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Build from keys, dropping any later key for a field already present.
    pub fn from_keys(keys: impl IntoIterator<Item = SortKey>) -> Self {
        let mut spec = Self::new();
        for key in keys {
            if spec.position(&key.field).is_none() {
                spec.0.push(key);
            }
        }
        spec
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn position(&self, field: &str) -> Option<usize> {
        self.0.iter().position(|k| k.field == field)
    }

    pub fn get(&self, field: &str) -> Option<&SortKey> {
        self.0.iter().find(|k| k.field == field)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Apply a header click for `field`.
    ///
    /// A plain click makes `field` the only key, starting ascending and then
    /// flipping. A multi-key click appends an unsorted field ascending, turns an
    /// ascending key descending and moves it to the end, and drops a descending key.
    pub fn toggle(&mut self, field: &str, data_type: ColumnKind, multi_key: bool) {
        match (self.position(field), multi_key) {
            (None, false) => {
                self.0.clear();
                self.0.push(SortKey::new(field, SortDirection::Asc, data_type));
            }
            (None, true) => {
                self.0.push(SortKey::new(field, SortDirection::Asc, data_type));
            }
            (Some(i), true) => {
                let mut key = self.0.remove(i);
                if key.dir == SortDirection::Asc {
                    key.dir = SortDirection::Desc;
                    self.0.push(key);
                }
            }
            (Some(i), false) => {
                let mut key = self.0.remove(i);
                key.dir = key.dir.flip();
                self.0.clear();
                self.0.push(key);
            }
        }
    }

    /// JSON text as persisted under the `sorting` key.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Vec<SortKey>>(raw).map(Self::from_keys)
    }
}

impl<'de> Deserialize<'de> for SortSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Vec::<SortKey>::deserialize(deserializer).map(Self::from_keys)
    }
}

#[cfg(test)]
#[path = "sort_tests.rs"]
mod tests;
