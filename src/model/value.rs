//! Typed cell values.

use chrono::NaiveDateTime;
use std::cmp::Ordering;
use std::fmt;

/// Format used when a date value is stringified for search or plain display.
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single field value of a record after ingestion.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Missing, JSON `null`, or a value that failed coercion.
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Number(f64),
    Text(String),
    Date(NaiveDateTime),
}

impl Value {
    /// Convert an uncoerced JSON value.
    ///
    /// Arrays and objects are kept as their JSON text so they still take part
    /// in search.
    pub fn from_json(raw: &serde_json::Value) -> Self {
        match raw {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::Text(s.clone()),
            other => Value::Text(other.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&NaiveDateTime> {
        match self {
            Value::Date(d) => Some(d),
            _ => None,
        }
    }

    /// String form used by search. `None` for null values, which never match.
    pub fn search_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Value as the comparator sees it: text lower-cased, everything else untouched.
    pub fn sort_key(&self) -> Option<SortValue<'_>> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(SortValue::Bool(*b)),
            Value::Int(i) => Some(SortValue::Number(*i as f64)),
            Value::Number(n) => Some(SortValue::Number(*n)),
            Value::Date(d) => Some(SortValue::Date(d)),
            Value::Text(s) => Some(SortValue::Text(s.to_lowercase())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format(CANONICAL_DATE_FORMAT)),
        }
    }
}

/// Normalized, non-null value used for ordering.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue<'a> {
    Bool(bool),
    Number(f64),
    Date(&'a NaiveDateTime),
    Text(String),
}

impl SortValue<'_> {
    fn rank(&self) -> u8 {
        match self {
            SortValue::Bool(_) => 0,
            SortValue::Number(_) => 1,
            SortValue::Date(_) => 2,
            SortValue::Text(_) => 3,
        }
    }

    /// Ascending order. Values of different kinds order by kind; NaN ties.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Bool(a), SortValue::Bool(b)) => a.cmp(b),
            (SortValue::Number(a), SortValue::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (SortValue::Date(a), SortValue::Date(b)) => a.cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn from_json_keeps_integers_integral() {
        assert_eq!(Value::from_json(&json!(42)), Value::Int(42));
        assert_eq!(Value::from_json(&json!(2.5)), Value::Number(2.5));
    }

    #[test]
    fn from_json_stringifies_nested_values() {
        assert_eq!(
            Value::from_json(&json!([1, 2])),
            Value::Text("[1,2]".to_string())
        );
    }

    #[test]
    fn null_has_no_search_text() {
        assert_eq!(Value::Null.search_text(), None);
        assert_eq!(Value::Int(7).search_text(), Some("7".to_string()));
    }

    #[test]
    fn whole_floats_display_without_fraction() {
        assert_eq!(Value::Number(5.0).to_string(), "5");
        assert_eq!(Value::Number(1234.5).to_string(), "1234.5");
    }

    #[test]
    fn dates_display_in_canonical_format() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 0)
            .unwrap();
        assert_eq!(Value::Date(date).to_string(), "2024-03-09 07:05:00");
    }

    #[test]
    fn text_sort_key_is_lower_cased() {
        let value = Value::Text("ABC".to_string());
        assert_eq!(value.sort_key(), Some(SortValue::Text("abc".to_string())));
    }

    #[test]
    fn ints_and_floats_compare_numerically() {
        let a = Value::Int(3);
        let b = Value::Number(2.5);
        let ordering = a.sort_key().unwrap().compare(&b.sort_key().unwrap());
        assert_eq!(ordering, Ordering::Greater);
    }

    #[test]
    fn mixed_kinds_order_by_kind() {
        let number = Value::Int(100);
        let text = Value::Text("1".to_string());
        let ordering = number
            .sort_key()
            .unwrap()
            .compare(&text.sort_key().unwrap());
        assert_eq!(ordering, Ordering::Less);
    }
}
