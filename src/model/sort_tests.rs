//! Tests for sort spec toggling and persistence.

use super::*;

fn fields(spec: &SortSpec) -> Vec<(&str, SortDirection)> {
    spec.keys().iter().map(|k| (k.field.as_str(), k.dir)).collect()
}

// ===== Single-key toggling =====

#[test]
fn plain_click_cycles_asc_desc() {
    let mut spec = SortSpec::new();
    spec.toggle("f1", ColumnKind::String, false);
    assert_eq!(fields(&spec), vec![("f1", SortDirection::Asc)]);

    spec.toggle("f1", ColumnKind::String, false);
    assert_eq!(fields(&spec), vec![("f1", SortDirection::Desc)]);

    spec.toggle("f1", ColumnKind::String, false);
    assert_eq!(fields(&spec), vec![("f1", SortDirection::Asc)]);
}

#[test]
fn multi_click_on_descending_key_removes_it() {
    let mut spec = SortSpec::new();
    spec.toggle("f1", ColumnKind::String, false);
    spec.toggle("f1", ColumnKind::String, false);
    spec.toggle("f1", ColumnKind::String, true);
    assert!(spec.is_empty());
}

#[test]
fn plain_click_on_new_field_replaces_all_keys() {
    let mut spec = SortSpec::new();
    spec.toggle("a", ColumnKind::String, false);
    spec.toggle("b", ColumnKind::Int, true);
    spec.toggle("c", ColumnKind::Date, false);
    assert_eq!(fields(&spec), vec![("c", SortDirection::Asc)]);
}

#[test]
fn plain_click_on_existing_secondary_key_keeps_only_that_key_flipped() {
    let mut spec = SortSpec::new();
    spec.toggle("a", ColumnKind::String, false);
    spec.toggle("b", ColumnKind::Int, true);
    spec.toggle("b", ColumnKind::Int, false);
    assert_eq!(fields(&spec), vec![("b", SortDirection::Desc)]);
}

// ===== Multi-key toggling =====

#[test]
fn multi_click_appends_new_field_ascending() {
    let mut spec = SortSpec::new();
    spec.toggle("a", ColumnKind::String, false);
    spec.toggle("b", ColumnKind::Int, true);
    assert_eq!(
        fields(&spec),
        vec![("a", SortDirection::Asc), ("b", SortDirection::Asc)]
    );
}

#[test]
fn multi_click_on_ascending_key_moves_it_to_the_end_descending() {
    let mut spec = SortSpec::new();
    spec.toggle("a", ColumnKind::String, false);
    spec.toggle("b", ColumnKind::Int, true);
    spec.toggle("c", ColumnKind::Int, true);
    spec.toggle("a", ColumnKind::String, true);
    assert_eq!(
        fields(&spec),
        vec![
            ("b", SortDirection::Asc),
            ("c", SortDirection::Asc),
            ("a", SortDirection::Desc),
        ]
    );
}

#[test]
fn existing_key_keeps_its_data_type() {
    let mut spec = SortSpec::new();
    spec.toggle("a", ColumnKind::Date, false);
    spec.toggle("a", ColumnKind::String, false);
    assert_eq!(spec.get("a").map(|k| k.data_type), Some(ColumnKind::Date));
}

// ===== Persistence =====

#[test]
fn json_uses_widget_field_names() {
    let spec = SortSpec::from_keys([SortKey::new("price", SortDirection::Desc, ColumnKind::Currency)]);
    assert_eq!(
        spec.to_json(),
        r#"[{"field":"price","dir":"DESC","dataType":"currency"}]"#
    );
}

#[test]
fn from_json_round_trips() {
    let spec = SortSpec::from_keys([
        SortKey::new("a", SortDirection::Asc, ColumnKind::String),
        SortKey::new("b", SortDirection::Desc, ColumnKind::Int),
    ]);
    assert_eq!(SortSpec::from_json(&spec.to_json()).unwrap(), spec);
}

#[test]
fn from_json_defaults_missing_data_type_to_string() {
    let spec = SortSpec::from_json(r#"[{"field":"a","dir":"ASC"}]"#).unwrap();
    assert_eq!(spec.keys()[0].data_type, ColumnKind::String);
}

#[test]
fn duplicate_fields_keep_first_entry() {
    let spec = SortSpec::from_json(
        r#"[{"field":"a","dir":"ASC"},{"field":"a","dir":"DESC"}]"#,
    )
    .unwrap();
    assert_eq!(fields(&spec), vec![("a", SortDirection::Asc)]);
}
