//! View columns and the visibility resolver

use serde::{Deserialize, Serialize};

use crate::field::{FieldRegistry, FieldType};

/// Widget name of the drag handle used to reorder rows
pub const HANDLE_WIDGET: &str = "handle";

/// Kind of element a list view column represents
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnKind {
    /// Bound to a model field
    #[default]
    Field,
    /// Button column
    Button,
    /// Any other UI element
    Other(String),
}

impl From<String> for ColumnKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "field" => ColumnKind::Field,
            "button" | "button_group" => ColumnKind::Button,
            _ => ColumnKind::Other(s),
        }
    }
}

impl From<ColumnKind> for String {
    fn from(kind: ColumnKind) -> Self {
        match kind {
            ColumnKind::Field => "field".into(),
            ColumnKind::Button => "button".into(),
            ColumnKind::Other(s) => s,
        }
    }
}

/// The `invisible` attribute of a view column.
///
/// The host encodes "hidden" as boolean `true` or as the strings `"True"`
/// and `"1"`. Any other value (including other strings, which are
/// per-record conditions) leaves the column exported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Invisible {
    Flag(bool),
    Expr(String),
    Other(serde_json::Value),
}

impl Invisible {
    /// Whether this flag hides the column
    pub fn hides(&self) -> bool {
        match self {
            Invisible::Flag(b) => *b,
            Invisible::Expr(s) => s == "True" || s == "1",
            Invisible::Other(_) => false,
        }
    }
}

/// A column as described by the list view
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewColumn {
    #[serde(rename = "type", default)]
    pub kind: ColumnKind,
    #[serde(default)]
    pub name: String,
    /// Explicit column label
    #[serde(rename = "string", default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invisible: Option<Invisible>,
}

impl ViewColumn {
    /// A plain field column
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            kind: ColumnKind::Field,
            name: name.into(),
            ..Default::default()
        }
    }

    /// A button column
    pub fn button(name: impl Into<String>) -> Self {
        Self {
            kind: ColumnKind::Button,
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_widget(mut self, widget: impl Into<String>) -> Self {
        self.widget = Some(widget.into());
        self
    }

    pub fn with_invisible(mut self, invisible: Invisible) -> Self {
        self.invisible = Some(invisible);
        self
    }

    fn is_hidden(&self) -> bool {
        self.invisible.as_ref().is_some_and(Invisible::hides)
    }
}

/// A column selected for export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Field name
    pub name: String,
    /// Header text
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget: Option<String>,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            field_type,
            widget: None,
        }
    }
}

/// Resolve the ordered set of columns to export.
///
/// A column is dropped when it is not a field, is the drag handle, is
/// flagged invisible, or names a field missing from `fields`.
pub fn resolve_visible_columns(
    columns: &[ViewColumn],
    fields: &FieldRegistry,
) -> Vec<ColumnDescriptor> {
    let resolved: Vec<ColumnDescriptor> = columns
        .iter()
        .filter_map(|column| {
            if column.kind != ColumnKind::Field {
                return None;
            }
            if column.widget.as_deref() == Some(HANDLE_WIDGET) {
                return None;
            }
            if column.is_hidden() {
                return None;
            }
            let meta = fields.get(&column.name)?;

            let label = non_empty(column.label.as_deref())
                .or_else(|| non_empty(meta.label.as_deref()))
                .unwrap_or(&column.name)
                .to_string();

            Some(ColumnDescriptor {
                name: column.name.clone(),
                label,
                field_type: meta.field_type,
                widget: column.widget.clone(),
            })
        })
        .collect();

    log::debug!(
        "resolved {} exportable columns out of {}",
        resolved.len(),
        columns.len()
    );
    resolved
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}
