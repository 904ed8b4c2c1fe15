//! Ingestion-time type coercion.

use crate::format::{parse_date, unformat, Formats};
use crate::model::{ColumnKind, ColumnSpec, Record, RecordIndex, Value};
use crate::source::RawRow;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Fields that need coercion, grouped by kind once at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoercionPlan {
    kinds: HashMap<String, ColumnKind>,
}

impl CoercionPlan {
    pub fn new(columns: &[ColumnSpec]) -> Self {
        let kinds = columns
            .iter()
            .filter(|c| c.kind().needs_coercion())
            .map(|c| (c.field().to_string(), c.kind()))
            .collect();
        Self { kinds }
    }

    /// Fields of `kind`, in no particular order.
    pub fn fields_of(&self, kind: ColumnKind) -> impl Iterator<Item = &str> {
        self.kinds
            .iter()
            .filter(move |(_, k)| **k == kind)
            .map(|(f, _)| f.as_str())
    }

    /// Build the record for the row at load position `index`.
    pub fn record(&self, index: usize, row: &RawRow, formats: &Formats) -> Record {
        let fields: BTreeMap<String, Value> = row
            .iter()
            .map(|(field, raw)| {
                let value = match self.kinds.get(field) {
                    Some(kind) => coerce(*kind, field, raw, formats),
                    None => Value::from_json(raw),
                };
                (field.clone(), value)
            })
            .collect();
        Record::new(RecordIndex::new(index), fields)
    }
}

fn coerce(kind: ColumnKind, field: &str, raw: &serde_json::Value, formats: &Formats) -> Value {
    use serde_json::Value as Json;

    let value = match (kind, raw) {
        (_, Json::Null) => return Value::Null,
        (ColumnKind::Int, Json::Number(n)) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
        },
        (ColumnKind::Int, Json::Bool(b)) => Value::Int(i64::from(*b)),
        (ColumnKind::Int, Json::String(s)) => parse_int(s),
        (ColumnKind::Date, Json::String(s)) => parse_date(s, &formats.data_date)
            .map(Value::Date)
            .unwrap_or(Value::Null),
        (ColumnKind::Currency, Json::Number(n)) => {
            n.as_f64().map(Value::Number).unwrap_or(Value::Null)
        }
        (ColumnKind::Currency, Json::String(s)) => unformat(s, &formats.currency.decimal)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        _ => Value::Null,
    };

    if value.is_null() {
        debug!(field, kind = %kind, raw = %raw, "Value failed coercion, using null");
    }
    value
}

fn parse_int(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Value::Int(i);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
