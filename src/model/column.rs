//! Column specifications.
//!
//! A column's `field` is its identity for the lifetime of a table. The
//! `ColumnKind` is resolved once when the spec is built and selects the
//! coercion, comparison and display strategy for every value in that column.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Data type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Raw value, compared case-insensitively when textual.
    #[default]
    String,
    /// Numeric cast at ingestion.
    Int,
    /// Parsed with the data date format at ingestion.
    Date,
    /// Formatting stripped to a plain number at ingestion.
    Currency,
}

impl ColumnKind {
    /// Lower-case name as it appears in configuration and persisted sort specs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::String => "string",
            ColumnKind::Int => "int",
            ColumnKind::Date => "date",
            ColumnKind::Currency => "currency",
        }
    }

    /// True for kinds whose raw values are rewritten at ingestion.
    pub fn needs_coercion(&self) -> bool {
        !matches!(self, ColumnKind::String)
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a data type name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown column data type: {0:?}")]
pub struct UnknownDataType(pub String);

impl FromStr for ColumnKind {
    type Err = UnknownDataType;

    /// Case-insensitive, matching how data types are written in markup.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "string" => Ok(ColumnKind::String),
            "int" => Ok(ColumnKind::Int),
            "date" => Ok(ColumnKind::Date),
            "currency" => Ok(ColumnKind::Currency),
            _ => Err(UnknownDataType(raw.to_string())),
        }
    }
}

/// A link rendered inside a cell instead of the plain value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkSpec {
    /// Link text. Falls back to the cell's display value.
    #[serde(default)]
    pub label: Option<String>,
    /// Target with `{field}` placeholders.
    #[serde(default)]
    pub href: Option<String>,
    /// Icon name; when present the label becomes the icon's title.
    #[serde(default)]
    pub icon: Option<String>,
    /// Extra attributes copied onto the link element.
    #[serde(default)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

/// Error returned when a column spec is invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidColumn {
    /// Field name is empty or whitespace-only.
    #[error("column field must not be empty")]
    EmptyField,
    /// Field name starts with the internal metadata prefix.
    #[error("column field {0:?} uses the reserved '_' prefix")]
    ReservedField(String),
}

/// One column of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    field: String,
    label: Option<String>,
    kind: ColumnKind,
    sortable: bool,
    width: Option<f64>,
    links: Vec<LinkSpec>,
}

impl ColumnSpec {
    /// Smart constructor: validates the field name.
    pub fn new(field: impl Into<String>, kind: ColumnKind) -> Result<Self, InvalidColumn> {
        let field = field.into();
        if field.trim().is_empty() {
            return Err(InvalidColumn::EmptyField);
        }
        if field.starts_with(crate::model::record::INTERNAL_PREFIX) {
            return Err(InvalidColumn::ReservedField(field));
        }
        Ok(Self {
            field,
            label: None,
            kind,
            sortable: true,
            width: None,
            links: Vec::new(),
        })
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Initial width as a percentage of the table width. Non-positive values are ignored.
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = (width > 0.0).then_some(width);
        self
    }

    pub fn with_sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn with_links(mut self, links: Vec<LinkSpec>) -> Self {
        self.links = links;
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Header text: the label, or the field name when no label is set.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.field)
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    /// Configured width percentage, if any.
    pub fn width(&self) -> Option<f64> {
        self.width
    }

    pub fn links(&self) -> &[LinkSpec] {
        &self.links
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Currency".parse::<ColumnKind>(), Ok(ColumnKind::Currency));
        assert_eq!("INT".parse::<ColumnKind>(), Ok(ColumnKind::Int));
        assert_eq!(" date ".parse::<ColumnKind>(), Ok(ColumnKind::Date));
    }

    #[test]
    fn kind_rejects_unknown_names() {
        assert_eq!(
            "decimal".parse::<ColumnKind>(),
            Err(UnknownDataType("decimal".to_string()))
        );
    }

    #[test]
    fn only_string_columns_skip_coercion() {
        assert!(!ColumnKind::String.needs_coercion());
        assert!(ColumnKind::Int.needs_coercion());
        assert!(ColumnKind::Date.needs_coercion());
        assert!(ColumnKind::Currency.needs_coercion());
    }

    #[test]
    fn column_rejects_empty_field() {
        assert_eq!(
            ColumnSpec::new("  ", ColumnKind::String),
            Err(InvalidColumn::EmptyField)
        );
    }

    #[test]
    fn column_rejects_internal_prefix() {
        assert!(matches!(
            ColumnSpec::new("_index", ColumnKind::Int),
            Err(InvalidColumn::ReservedField(_))
        ));
    }

    #[test]
    fn label_falls_back_to_field() {
        let column = ColumnSpec::new("name", ColumnKind::String).unwrap();
        assert_eq!(column.label(), "name");
        assert_eq!(column.with_label("Name").label(), "Name");
    }

    #[test]
    fn non_positive_width_is_treated_as_unset() {
        let column = ColumnSpec::new("name", ColumnKind::String)
            .unwrap()
            .with_width(0.0);
        assert_eq!(column.width(), None);
    }

    #[test]
    fn columns_are_sortable_by_default() {
        let column = ColumnSpec::new("name", ColumnKind::String).unwrap();
        assert!(column.is_sortable());
        assert!(!column.with_sortable(false).is_sortable());
    }
}
