//! Link cells.

use super::cell::display_value;
use crate::format::Formats;
use crate::model::{ColumnSpec, LinkSpec, Record};
use serde_json::Value as Json;
use std::collections::BTreeMap;

/// Element a link renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkElement {
    /// `<a href=...>`
    Anchor,
    /// `<button data-href=...>`, chosen when the attributes carry a `btn` class.
    Button,
}

impl LinkElement {
    /// Attribute the resolved href is written to.
    pub fn href_attribute(&self) -> &'static str {
        match self {
            LinkElement::Anchor => "href",
            LinkElement::Button => "data-href",
        }
    }
}

/// A link with its label and href worked out for one record.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLink {
    pub element: LinkElement,
    /// When `icon` is set this is the icon's title rather than visible text.
    pub label: String,
    pub href: Option<String>,
    pub icon: Option<String>,
    pub attributes: BTreeMap<String, Json>,
}

fn has_btn_class(attributes: &BTreeMap<String, Json>) -> bool {
    match attributes.get("classList") {
        Some(Json::String(classes)) => classes.contains("btn"),
        Some(Json::Array(classes)) => classes.iter().any(|c| c.as_str() == Some("btn")),
        _ => false,
    }
}

/// Replace every `{field}` in `template` with that field's string form.
///
/// Placeholders naming fields the record does not have are left alone.
pub fn substitute_fields(template: &str, record: &Record) -> String {
    let mut href = template.to_string();
    for (field, value) in record.fields() {
        let placeholder = format!("{{{field}}}");
        if href.contains(&placeholder) {
            href = href.replace(&placeholder, &value.to_string());
        }
    }
    href
}

fn resolve(link: &LinkSpec, fallback_label: &str, record: &Record) -> ResolvedLink {
    let element = if has_btn_class(&link.attributes) {
        LinkElement::Button
    } else {
        LinkElement::Anchor
    };
    ResolvedLink {
        element,
        label: link
            .label
            .clone()
            .unwrap_or_else(|| fallback_label.to_string()),
        href: link.href.as_deref().map(|h| substitute_fields(h, record)),
        icon: link.icon.as_ref().map(|icon| icon.to_lowercase()),
        attributes: link.attributes.clone(),
    }
}

/// Links for `column` in `record`. Empty when the column has none.
pub fn resolve_links(column: &ColumnSpec, record: &Record, formats: &Formats) -> Vec<ResolvedLink> {
    if column.links().is_empty() {
        return Vec::new();
    }
    let label = display_value(record.get(column.field()), column.kind(), formats);
    column
        .links()
        .iter()
        .map(|link| resolve(link, &label, record))
        .collect()
}
