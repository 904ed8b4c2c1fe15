//! Cell display values.

use crate::config::Resources;
use crate::engine::LoadPhase;
use crate::format::{format_date, format_money, Formats};
use crate::model::{ColumnKind, Value};

/// Text shown in a cell for `value`.
///
/// Currency columns go through the currency format and date columns through
/// the display date pattern. Null is empty. A value that did not coerce to
/// its column's kind falls back to its plain string form.
pub fn display_value(value: &Value, kind: ColumnKind, formats: &Formats) -> String {
    match (kind, value) {
        (_, Value::Null) => String::new(),
        (ColumnKind::Currency, v) => match v.as_f64() {
            Some(amount) => format_money(amount, &formats.currency),
            None => v.to_string(),
        },
        (ColumnKind::Date, Value::Date(date)) => format_date(date, &formats.display_date),
        (_, v) => v.to_string(),
    }
}

/// What the table body shows instead of, or as, its rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyState<'a> {
    /// Spinner while a load is in flight.
    Loading,
    /// Load failed; offers a retry that calls `refresh`.
    Error { message: &'a str, retry: &'a str },
    /// Nothing matched.
    NoData(&'a str),
    Rows,
}

pub fn body_state(phase: LoadPhase, filtered_total: usize, resources: &Resources) -> BodyState<'_> {
    match phase {
        LoadPhase::Loading => BodyState::Loading,
        LoadPhase::Error => BodyState::Error {
            message: &resources.loading_error,
            retry: &resources.try_again,
        },
        _ if filtered_total == 0 => BodyState::NoData(&resources.no_data),
        _ => BodyState::Rows,
    }
}
