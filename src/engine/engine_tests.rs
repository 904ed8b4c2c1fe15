//! Tests for the view-state engine.

use super::*;
use crate::model::{SortDirection, SortKey, Value};
use crate::source::RawRow;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

// ===== Helpers =====

fn columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("name", ColumnKind::String).unwrap(),
        ColumnSpec::new("age", ColumnKind::Int).unwrap(),
        ColumnSpec::new("note", ColumnKind::String)
            .unwrap()
            .with_sortable(false),
    ]
}

fn restored() -> RestoredState {
    RestoredState {
        items_per_page: 10,
        current_start_item: 0,
        search_query: String::new(),
        sorting: SortSpec::new(),
        width: 100.0,
        column_widths: vec![None, None, None],
    }
}

fn engine_with(load_all_data: bool, restored: RestoredState) -> ViewEngine {
    let mut config = TableConfig::new("people", columns());
    config.load_all_data = load_all_data;
    ViewEngine::new(&config, restored)
}

fn row(value: serde_json::Value) -> RawRow {
    value.as_object().cloned().unwrap()
}

fn people(n: usize) -> DataPayload {
    DataPayload::from_rows(
        (0..n)
            .map(|i| row(json!({ "name": format!("person {:02}", i), "age": (i * 7) % 50 })))
            .collect(),
    )
}

/// Engine that has issued and completed its first load.
fn loaded(payload: DataPayload) -> ViewEngine {
    let mut engine = engine_with(true, restored());
    let generation = engine.request_data();
    assert_eq!(engine.complete(generation, Ok(payload)), Completion::Ingested);
    engine
}

fn visible_indices(engine: &ViewEngine) -> Vec<usize> {
    engine
        .visible_page()
        .iter()
        .map(|r| r.index().get())
        .collect()
}

// ===== Construction and loading =====

#[test]
fn new_engine_is_idle_with_empty_page() {
    let engine = engine_with(true, restored());
    assert_eq!(engine.phase(), LoadPhase::Idle);
    assert!(engine.visible_page().is_empty());
    assert_eq!(engine.page_total(), 0);
}

#[test]
fn restored_start_item_snaps_to_page_boundary() {
    let mut state = restored();
    state.current_start_item = 27;
    let engine = engine_with(true, state);
    assert_eq!(engine.current_start_item(), 20);
    assert_eq!(engine.current_page(), 3);
}

#[test]
fn request_data_enters_loading_and_queues_ticket() {
    let mut engine = engine_with(true, restored());
    let generation = engine.request_data();

    assert!(engine.is_loading());
    let request = engine.take_request().unwrap();
    assert_eq!(request.generation, generation);
    assert_eq!(request.method, "GET");
    assert_eq!(request.params.items, 10);
    assert_eq!(request.params.sort, None);
    assert!(engine.take_request().is_none());
}

#[test]
fn ingest_assigns_load_order_and_coerces_int_column() {
    let engine = loaded(DataPayload::from_rows(vec![
        row(json!({ "name": "a", "age": "41" })),
        row(json!({ "name": "b", "age": null })),
    ]));

    assert_eq!(engine.phase(), LoadPhase::Ready);
    let page = engine.visible_page();
    assert_eq!(page[0].get("age"), &Value::Int(41));
    assert!(page[1].get("age").is_null());
    assert_eq!(visible_indices(&engine), vec![0, 1]);
}

#[test]
fn data_callback_sees_payload_before_coercion() {
    let mut engine = engine_with(true, restored());
    engine.set_data_callback(|payload: &mut DataPayload| payload.rows.truncate(1));
    let generation = engine.request_data();
    let _ = engine.complete(generation, Ok(people(5)));

    assert_eq!(engine.filtered_total(), 1);
}

#[test]
fn stale_completion_is_discarded() {
    let mut engine = engine_with(true, restored());
    let first = engine.request_data();
    let second = engine.request_data();

    assert_eq!(engine.complete(first, Ok(people(3))), Completion::Stale);
    assert!(engine.is_loading());
    assert!(engine.records().is_none());

    assert_eq!(engine.complete(second, Ok(people(4))), Completion::Ingested);
    assert_eq!(engine.filtered_total(), 4);
    assert_eq!(engine.complete(second, Ok(people(9))), Completion::Stale);
    assert_eq!(engine.filtered_total(), 4);
}

#[test]
fn failed_load_enters_error_and_calls_hook() {
    let seen: Rc<RefCell<Vec<FetchError>>> = Rc::default();
    let log = Rc::clone(&seen);
    let mut engine = engine_with(true, restored());
    engine.set_error_callback(move |e: &FetchError| log.borrow_mut().push(e.clone()));

    let generation = engine.request_data();
    let error = FetchError::Transport("connection reset".to_string());
    assert_eq!(
        engine.complete(generation, Err(error.clone())),
        Completion::Failed
    );

    assert_eq!(engine.phase(), LoadPhase::Error);
    assert_eq!(engine.last_error(), Some(&error));
    assert_eq!(seen.borrow().as_slice(), &[error]);
}

#[test]
fn refresh_recovers_from_error() {
    let mut engine = engine_with(true, restored());
    let generation = engine.request_data();
    let _ = engine.complete(generation, Err(FetchError::Transport("down".to_string())));

    let mutation = engine.refresh();
    assert!(mutation.is_applied());
    assert!(engine.is_loading());
    assert!(engine.last_error().is_none());

    let request = engine.take_request().unwrap();
    let _ = engine.complete(request.generation, Ok(people(2)));
    assert_eq!(engine.phase(), LoadPhase::Ready);
}

// ===== Pagination =====

#[test]
fn third_page_of_twenty_five_holds_last_five() {
    let mut engine = loaded(people(25));
    assert_eq!(engine.page_total(), 3);

    let mutation = engine.change_page(3);
    assert_eq!(mutation.persist_keys(), &[PersistKey::CurrentStartItem]);
    assert_eq!(engine.current_start_item(), 20);
    assert_eq!(visible_indices(&engine), vec![20, 21, 22, 23, 24]);
}

#[test]
fn out_of_range_pages_are_ignored() {
    let mut engine = loaded(people(25));
    assert!(!engine.change_page(0).is_applied());
    assert!(!engine.change_page(4).is_applied());
    assert_eq!(engine.current_start_item(), 0);
}

#[test]
fn move_to_page_steps_and_jumps() {
    let mut engine = loaded(people(45));

    let _ = engine.move_to_page(PageMove::Forward, false);
    assert_eq!(engine.current_page(), 2);
    let _ = engine.move_to_page(PageMove::Forward, true);
    assert_eq!(engine.current_page(), 5);
    assert!(!engine.move_to_page(PageMove::Forward, false).is_applied());
    let _ = engine.move_to_page(PageMove::Back, false);
    assert_eq!(engine.current_page(), 4);
    let _ = engine.move_to_page(PageMove::Back, true);
    assert_eq!(engine.current_page(), 1);
    assert!(!engine.move_to_page(PageMove::Back, false).is_applied());
}

#[test]
fn items_per_page_resets_to_first_page() {
    let mut engine = loaded(people(25));
    let _ = engine.change_page(2);

    let mutation = engine.set_items_per_page(20);
    assert_eq!(
        mutation.persist_keys(),
        &[PersistKey::ItemsPerPage, PersistKey::CurrentStartItem]
    );
    assert_eq!(engine.current_start_item(), 0);
    assert_eq!(engine.page_total(), 2);
    assert_eq!(engine.visible_page().len(), 20);
}

#[test]
fn unchanged_or_zero_items_per_page_is_ignored() {
    let mut engine = loaded(people(5));
    assert!(!engine.set_items_per_page(10).is_applied());
    assert!(!engine.set_items_per_page(0).is_applied());
}

// ===== Search =====

#[test]
fn search_filters_and_counts() {
    let mut engine = loaded(DataPayload::from_rows(vec![
        row(json!({ "name": "ABCxyz" })),
        row(json!({ "name": "xyz" })),
        row(json!({ "name": "zabc" })),
    ]));

    let mutation = engine.set_search_query("abc");
    assert_eq!(
        mutation.persist_keys(),
        &[PersistKey::SearchQuery, PersistKey::CurrentStartItem]
    );
    assert_eq!(engine.filtered_total(), 2);
    assert_eq!(visible_indices(&engine), vec![0, 2]);

    assert!(!engine.set_search_query("abc").is_applied());
    let _ = engine.set_search_query("");
    assert_eq!(engine.filtered_total(), 3);
}

#[test]
fn search_resets_to_first_page() {
    let mut engine = loaded(people(30));
    let _ = engine.change_page(3);
    let _ = engine.set_search_query("person");
    assert_eq!(engine.current_start_item(), 0);
}

// ===== Sorting =====

#[test]
fn toggle_sort_cycles_through_directions() {
    let mut engine = loaded(people(3));

    let _ = engine.toggle_sort("name", ColumnKind::String, false);
    assert_eq!(
        engine.sorting().keys(),
        &[SortKey::new("name", SortDirection::Asc, ColumnKind::String)]
    );
    let _ = engine.toggle_sort("name", ColumnKind::String, false);
    assert_eq!(engine.sorting().keys()[0].dir, SortDirection::Desc);
    let mutation = engine.toggle_sort("name", ColumnKind::String, true);
    assert!(engine.sorting().is_empty());
    assert_eq!(
        mutation.persist_keys(),
        &[PersistKey::Sorting, PersistKey::CurrentStartItem]
    );
}

#[test]
fn clearing_sort_restores_load_order() {
    let mut engine = loaded(people(5));
    let _ = engine.toggle_sort("name", ColumnKind::String, false);
    let _ = engine.toggle_sort("name", ColumnKind::String, false);
    assert_eq!(visible_indices(&engine), vec![4, 3, 2, 1, 0]);

    let _ = engine.toggle_sort("name", ColumnKind::String, true);
    assert_eq!(visible_indices(&engine), vec![0, 1, 2, 3, 4]);
}

#[test]
fn sort_puts_nulls_last() {
    let mut engine = loaded(DataPayload::from_rows(vec![
        row(json!({ "name": "f1", "age": null })),
        row(json!({ "name": "f2", "age": 5 })),
        row(json!({ "name": "f3", "age": 2 })),
    ]));
    let _ = engine.toggle_sort("age", ColumnKind::Int, false);
    assert_eq!(visible_indices(&engine), vec![2, 1, 0]);
}

#[test]
fn unsortable_and_unknown_columns_are_ignored() {
    let mut engine = loaded(people(3));
    assert!(!engine.toggle_sort("note", ColumnKind::String, false).is_applied());
    assert!(!engine.toggle_sort("missing", ColumnKind::String, false).is_applied());
    assert!(engine.sorting().is_empty());
}

#[test]
fn restored_sorting_applies_on_ingest() {
    let mut state = restored();
    state.sorting = SortSpec::from_keys([SortKey::new("age", SortDirection::Desc, ColumnKind::Int)]);
    let mut engine = engine_with(true, state);
    let generation = engine.request_data();
    let _ = engine.complete(
        generation,
        Ok(DataPayload::from_rows(vec![
            row(json!({ "age": 1 })),
            row(json!({ "age": 3 })),
        ])),
    );
    assert_eq!(visible_indices(&engine), vec![1, 0]);
}

// ===== Loading guard =====

#[test]
fn mutations_while_loading_change_nothing() {
    let mut engine = loaded(people(25));
    let _ = engine.refresh();
    let before = format!("{:?}", engine);

    assert!(!engine.set_search_query("x").is_applied());
    assert!(!engine.set_items_per_page(50).is_applied());
    assert!(!engine.change_page(2).is_applied());
    assert!(!engine.toggle_sort("name", ColumnKind::String, false).is_applied());

    assert_eq!(format!("{:?}", engine), before);
}

// ===== Server-paged mode =====

#[test]
fn server_mode_reloads_on_search() {
    let mut engine = engine_with(false, restored());
    let generation = engine.request_data();
    let mut page = people(10);
    page.filtered_total = 95;
    let _ = engine.complete(generation, Ok(page));

    assert_eq!(engine.filtered_total(), 95);
    assert_eq!(engine.page_total(), 10);
    assert_eq!(engine.visible_page().len(), 10);

    let _ = engine.set_search_query("bob");
    assert!(engine.is_loading());
    let request = engine.take_request().unwrap();
    assert_eq!(request.params.query, "bob");
    assert_eq!(request.params.start_item, 0);
}

#[test]
fn server_mode_change_page_requests_offset() {
    let mut engine = engine_with(false, restored());
    let generation = engine.request_data();
    let mut page = people(10);
    page.filtered_total = 35;
    let _ = engine.complete(generation, Ok(page));

    let _ = engine.change_page(4);
    let request = engine.take_request().unwrap();
    assert_eq!(request.params.start_item, 30);
    assert_eq!(request.params.items, 10);
}

#[test]
fn server_mode_sort_sends_sort_params() {
    let mut engine = engine_with(false, restored());
    let generation = engine.request_data();
    let _ = engine.complete(generation, Ok(people(3)));

    let _ = engine.toggle_sort("age", ColumnKind::Int, false);
    let request = engine.take_request().unwrap();
    let sort = request.params.sort.unwrap();
    assert_eq!(sort[0].field, "age");
    assert_eq!(sort[0].dir, SortDirection::Asc);
}

#[test]
fn server_mode_truncates_oversized_page() {
    let mut engine = engine_with(false, restored());
    let generation = engine.request_data();
    let _ = engine.complete(generation, Ok(people(14)));
    assert_eq!(engine.visible_page().len(), 10);
}
