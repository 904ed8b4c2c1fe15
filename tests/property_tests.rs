//! Property-based tests for the view-state pipeline.
//!
//! Tests validate:
//! 1. The comparator is a consistent order with nulls last
//! 2. Pagination yields a contiguous slice of the filtered set
//! 3. Narrowing a query never grows the filtered total
//! 4. Currency values survive format then unformat

use proptest::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tablestate::config::TableConfig;
use tablestate::engine::{compare_records, sort_records, Completion, ViewEngine};
use tablestate::format::{format_money, unformat, CurrencyFormat};
use tablestate::model::{
    ColumnKind, ColumnSpec, Record, RecordIndex, SortDirection, SortKey, SortSpec, Value,
};
use tablestate::persistence::RestoredState;
use tablestate::source::{DataPayload, RawRow};

// ===== Strategies =====

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        1 => Just(Value::Null),
        3 => (-50i64..50).prop_map(Value::Int),
    ]
}

fn text_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        1 => Just(Value::Null),
        3 => "[a-dA-D]{0,3}".prop_map(Value::Text),
    ]
}

fn records_strategy() -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec((value_strategy(), text_strategy()), 0..40).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (n, t))| {
                let mut fields = BTreeMap::new();
                fields.insert("n".to_string(), n);
                fields.insert("t".to_string(), t);
                Record::new(RecordIndex::new(i), fields)
            })
            .collect()
    })
}

fn direction_strategy() -> impl Strategy<Value = SortDirection> {
    prop_oneof![Just(SortDirection::Asc), Just(SortDirection::Desc)]
}

fn spec_strategy() -> impl Strategy<Value = SortSpec> {
    (direction_strategy(), direction_strategy(), any::<bool>()).prop_map(|(first, second, n_first)| {
        let n = SortKey::new("n", first, ColumnKind::Int);
        let t = SortKey::new("t", second, ColumnKind::String);
        if n_first {
            SortSpec::from_keys([n, t])
        } else {
            SortSpec::from_keys([t, n])
        }
    })
}

fn word_rows(words: &[String]) -> DataPayload {
    let rows: Vec<RawRow> = words
        .iter()
        .map(|w| {
            let mut row = RawRow::new();
            row.insert("word".to_string(), serde_json::Value::String(w.clone()));
            row
        })
        .collect();
    DataPayload::from_rows(rows)
}

fn loaded_engine(payload: DataPayload, items_per_page: usize) -> ViewEngine {
    let config = TableConfig::new(
        "words",
        vec![ColumnSpec::new("word", ColumnKind::String).expect("valid column")],
    );
    let restored = RestoredState {
        items_per_page,
        current_start_item: 0,
        search_query: String::new(),
        sorting: SortSpec::new(),
        width: 100.0,
        column_widths: vec![None],
    };
    let mut engine = ViewEngine::new(&config, restored);
    let generation = engine.request_data();
    assert_eq!(engine.complete(generation, Ok(payload)), Completion::Ingested);
    engine
}

// ===== Property 1: Comparator =====

proptest! {
    #[test]
    fn comparator_is_antisymmetric(records in records_strategy(), spec in spec_strategy()) {
        for a in &records {
            for b in &records {
                prop_assert_eq!(
                    compare_records(a, b, &spec),
                    compare_records(b, a, &spec).reverse()
                );
            }
        }
    }

    #[test]
    fn sorted_records_are_in_order(mut records in records_strategy(), spec in spec_strategy()) {
        sort_records(&mut records, &spec);
        for pair in records.windows(2) {
            prop_assert_ne!(compare_records(&pair[0], &pair[1], &spec), Ordering::Greater);
        }
    }

    #[test]
    fn nulls_sort_last_in_either_direction(
        mut records in records_strategy(),
        dir in direction_strategy(),
    ) {
        let spec = SortSpec::from_keys([SortKey::new("n", dir, ColumnKind::Int)]);
        sort_records(&mut records, &spec);
        let first_null = records.iter().position(|r| r.get("n").is_null());
        if let Some(first_null) = first_null {
            prop_assert!(records[first_null..].iter().all(|r| r.get("n").is_null()));
        }
    }

    #[test]
    fn empty_spec_restores_load_order(mut records in records_strategy(), spec in spec_strategy()) {
        sort_records(&mut records, &spec);
        sort_records(&mut records, &SortSpec::new());
        let indices: Vec<usize> = records.iter().map(|r| r.index().get()).collect();
        let expected: Vec<usize> = (0..records.len()).collect();
        prop_assert_eq!(indices, expected);
    }
}

// ===== Property 2: Pagination =====

proptest! {
    #[test]
    fn page_is_contiguous_slice(
        total in 0usize..120,
        items_per_page in 1usize..25,
        page_seed in any::<usize>(),
    ) {
        let words: Vec<String> = (0..total).map(|i| format!("w{i:03}")).collect();
        let mut engine = loaded_engine(word_rows(&words), items_per_page);
        let page_total = engine.page_total();
        prop_assert_eq!(page_total, total.div_ceil(items_per_page));

        if page_total > 0 {
            let page = page_seed % page_total + 1;
            if page != 1 {
                prop_assert!(engine.change_page(page).is_applied());
            }
            let start = (page - 1) * items_per_page;
            prop_assert_eq!(engine.current_start_item(), start);
            prop_assert_eq!(engine.current_start_item() % items_per_page, 0);

            let visible: Vec<usize> =
                engine.visible_page().iter().map(|r| r.index().get()).collect();
            let expected: Vec<usize> = (start..(start + items_per_page).min(total)).collect();
            prop_assert_eq!(visible, expected);
        } else {
            prop_assert!(engine.visible_page().is_empty());
        }
    }

    #[test]
    fn out_of_range_pages_change_nothing(total in 0usize..60, items_per_page in 1usize..10) {
        let words: Vec<String> = (0..total).map(|i| format!("w{i}")).collect();
        let mut engine = loaded_engine(word_rows(&words), items_per_page);
        let beyond = engine.page_total() + 1;
        prop_assert!(!engine.change_page(beyond).is_applied());
        prop_assert!(!engine.change_page(0).is_applied());
        prop_assert_eq!(engine.current_start_item(), 0);
    }
}

// ===== Property 3: Filter monotonicity =====

proptest! {
    #[test]
    fn longer_query_never_matches_more(
        words in prop::collection::vec("[a-c]{1,5}", 0..50),
        query in "[a-c]{0,2}",
        suffix in "[a-c]{1,2}",
    ) {
        let mut engine = loaded_engine(word_rows(&words), 10);
        let _ = engine.set_search_query(&query);
        let broad = engine.filtered_total();
        let _ = engine.set_search_query(&format!("{query}{suffix}"));
        let narrow = engine.filtered_total();
        prop_assert!(narrow <= broad);
    }

    #[test]
    fn query_matching_is_case_insensitive(words in prop::collection::vec("[a-c]{1,5}", 0..30)) {
        let mut engine = loaded_engine(word_rows(&words), 10);
        let _ = engine.set_search_query("ab");
        let lower = engine.filtered_total();
        let _ = engine.set_search_query("AB");
        prop_assert_eq!(engine.filtered_total(), lower);
        prop_assert_eq!(lower, words.iter().filter(|w| w.contains("ab")).count());
    }
}

// ===== Property 4: Currency round trip =====

proptest! {
    #[test]
    fn currency_survives_format_and_unformat(cents in -10_000_000i64..10_000_000) {
        let amount = cents as f64 / 100.0;
        let fmt = CurrencyFormat::default();
        let parsed = unformat(&format_money(amount, &fmt), &fmt.decimal);
        prop_assert!(parsed.is_some_and(|v| (v - amount).abs() < 0.005));
    }
}
