//! Field types and field metadata

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// The type of a model field, as far as exporting is concerned.
///
/// Host types the exporter has no special handling for (`char`, `text`,
/// `reference`, ...) collapse into [`FieldType::String`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Boolean,
    Many2one,
    Many2many,
    One2many,
    Date,
    Datetime,
    Selection,
    Integer,
    Float,
    Monetary,
    Html,
    #[default]
    String,
}

impl FieldType {
    /// Map a host type name onto a field type.
    pub fn from_host(name: &str) -> Self {
        match name {
            "boolean" => FieldType::Boolean,
            "many2one" => FieldType::Many2one,
            "many2many" => FieldType::Many2many,
            "one2many" => FieldType::One2many,
            "date" => FieldType::Date,
            "datetime" => FieldType::Datetime,
            "selection" => FieldType::Selection,
            "integer" => FieldType::Integer,
            "float" => FieldType::Float,
            "monetary" => FieldType::Monetary,
            "html" => FieldType::Html,
            _ => FieldType::String,
        }
    }

    /// Host name of this type
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Boolean => "boolean",
            FieldType::Many2one => "many2one",
            FieldType::Many2many => "many2many",
            FieldType::One2many => "one2many",
            FieldType::Date => "date",
            FieldType::Datetime => "datetime",
            FieldType::Selection => "selection",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Monetary => "monetary",
            FieldType::Html => "html",
            FieldType::String => "char",
        }
    }

    /// `many2many` or `one2many`
    pub fn is_x2many(&self) -> bool {
        matches!(self, FieldType::Many2many | FieldType::One2many)
    }

    /// `integer`, `float` or `monetary`
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FieldType::Integer | FieldType::Float | FieldType::Monetary
        )
    }
}

impl From<String> for FieldType {
    fn from(name: String) -> Self {
        FieldType::from_host(&name)
    }
}

impl From<FieldType> for String {
    fn from(ty: FieldType) -> Self {
        ty.as_str().to_string()
    }
}

/// One `(key, label)` entry of a selection field.
///
/// Keys are stored in their string form; integer keys are compared by
/// their decimal representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(serde_json::Value, String)", into = "(String, String)")]
pub struct SelectionOption {
    pub key: String,
    pub label: String,
}

impl SelectionOption {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

impl From<(serde_json::Value, String)> for SelectionOption {
    fn from((key, label): (serde_json::Value, String)) -> Self {
        let key = match key {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        Self { key, label }
    }
}

impl From<SelectionOption> for (String, String) {
    fn from(opt: SelectionOption) -> Self {
        (opt.key, opt.label)
    }
}

/// Metadata describing one model field
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldMetadata {
    /// Field type
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    /// Human readable label
    #[serde(rename = "string", default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Ordered options, only meaningful for selection fields
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selection: Vec<SelectionOption>,
}

impl FieldMetadata {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_selection<K, L, I>(mut self, options: I) -> Self
    where
        K: Into<String>,
        L: Into<String>,
        I: IntoIterator<Item = (K, L)>,
    {
        self.selection = options
            .into_iter()
            .map(|(k, l)| SelectionOption::new(k, l))
            .collect();
        self
    }

    /// Label for a stored selection key, if one is declared
    pub fn selection_label(&self, key: &str) -> Option<&str> {
        self.selection
            .iter()
            .find(|opt| opt.key == key)
            .map(|opt| opt.label.as_str())
    }
}

/// Field metadata of a model, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldRegistry {
    fields: AHashMap<String, FieldMetadata>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, meta: FieldMetadata) {
        self.fields.insert(name.into(), meta);
    }

    pub fn with(mut self, name: impl Into<String>, meta: FieldMetadata) -> Self {
        self.insert(name, meta);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldMetadata> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, FieldMetadata)> for FieldRegistry {
    fn from_iter<T: IntoIterator<Item = (S, FieldMetadata)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
