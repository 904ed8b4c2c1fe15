//! Record comparator and search predicate.

use crate::model::{Record, SortDirection, SortSpec};
use std::cmp::Ordering;

/// Compare two records under `sorting`.
///
/// Keys are tried in priority order. A null sorts after every non-null value
/// in either direction; two nulls tie and the next key decides. Records that
/// tie on every key compare equal, so a stable sort keeps their prior order.
pub fn compare_records(a: &Record, b: &Record, sorting: &SortSpec) -> Ordering {
    for key in sorting.keys() {
        let ordering = match (a.get(&key.field).sort_key(), b.get(&key.field).sort_key()) {
            (None, None) => continue,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => {
                let ordering = x.compare(&y);
                match key.dir {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            }
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Load order.
pub fn default_compare(a: &Record, b: &Record) -> Ordering {
    a.index().cmp(&b.index())
}

/// Sort in place: by `sorting`, or back to load order when it is empty.
pub fn sort_records(records: &mut [Record], sorting: &SortSpec) {
    if sorting.is_empty() {
        records.sort_by(default_compare);
    } else {
        records.sort_by(|a, b| compare_records(a, b, sorting));
    }
}

/// Case-insensitive substring match over visible fields.
///
/// `query_lower` must already be lower-cased. Nulls never match.
pub fn matches_query(record: &Record, query_lower: &str) -> bool {
    record.visible_fields().any(|(_, value)| {
        value
            .search_text()
            .is_some_and(|text| text.to_lowercase().contains(query_lower))
    })
}
