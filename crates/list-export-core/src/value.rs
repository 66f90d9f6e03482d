//! Raw record values and the JSON boundary adapter
//!
//! Records arrive from the host as loosely shaped JSON: a many2one may be an
//! `[id, name]` pair or an object, an x2many may be a list of ids, a list of
//! objects or a lazily loaded collection. [`RawValue::from_json`] decides the
//! shape once, so the formatters only ever match on a closed set of variants.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::field::FieldType;

/// Accepted textual date forms
const DATE_FORMATS: &[&str] = &["%Y-%m-%d"];

/// Accepted textual datetime forms
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// A related record as seen from a relational field
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordRef {
    pub id: Option<i64>,
    pub display_name: Option<String>,
}

impl RecordRef {
    pub fn new(id: i64, display_name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            display_name: Some(display_name.into()),
        }
    }

    /// Display name, or the empty string
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or("")
    }

    fn from_object(map: &serde_json::Map<String, Value>) -> Self {
        // Materialized records keep their values under `data`
        let source = match map.get("data") {
            Some(Value::Object(data)) => data,
            _ => map,
        };
        let display_name = ["display_name", "name"]
            .iter()
            .find_map(|key| match source.get(*key) {
                Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
                _ => None,
            });
        let id = source
            .get("id")
            .or_else(|| map.get("resId"))
            .and_then(Value::as_i64);
        Self { id, display_name }
    }
}

/// A raw field value, normalized from the host representation
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawValue {
    /// `null`, `undefined`, or a missing key
    #[default]
    Absent,
    Bool(bool),
    Number(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    /// Single related record (many2one)
    Reference(RecordRef),
    /// Plain list of related ids; entries that are not integer ids are
    /// kept as `None` so the list keeps its length
    Ids(Vec<Option<i64>>),
    /// List of related record objects
    Records(Vec<RecordRef>),
    /// Lazily loaded relation exposing its materialized records
    Collection(Vec<RecordRef>),
    /// Anything else, kept verbatim
    Json(Value),
}

impl RawValue {
    /// Absent, or the host's `false`-as-absence
    pub fn is_absent(&self) -> bool {
        matches!(self, RawValue::Absent | RawValue::Bool(false))
    }

    /// Host truthiness of the value
    pub fn is_truthy(&self) -> bool {
        match self {
            RawValue::Absent => false,
            RawValue::Bool(b) => *b,
            RawValue::Number(n) => *n != 0.0 && !n.is_nan(),
            RawValue::Text(s) => !s.is_empty(),
            RawValue::Json(Value::Null) => false,
            _ => true,
        }
    }

    /// Adapt a JSON value for a field of the given type.
    pub fn from_json(value: &Value, field_type: FieldType) -> Self {
        match value {
            Value::Null => RawValue::Absent,
            Value::Bool(b) => RawValue::Bool(*b),
            Value::Number(n) => n.as_f64().map_or(RawValue::Absent, RawValue::Number),
            Value::String(s) => Self::from_text(s, field_type),
            Value::Array(items) => Self::from_array(value, items, field_type),
            Value::Object(map) => Self::from_object(value, map, field_type),
        }
    }

    fn from_text(s: &str, field_type: FieldType) -> Self {
        match field_type {
            FieldType::Date => parse_date(s)
                .map(RawValue::Date)
                .or_else(|| parse_datetime(s).map(RawValue::DateTime))
                .unwrap_or_else(|| RawValue::Text(s.to_string())),
            FieldType::Datetime => parse_datetime(s)
                .map(RawValue::DateTime)
                .or_else(|| parse_date(s).map(RawValue::Date))
                .unwrap_or_else(|| RawValue::Text(s.to_string())),
            _ => RawValue::Text(s.to_string()),
        }
    }

    fn from_array(value: &Value, items: &[Value], field_type: FieldType) -> Self {
        match field_type {
            FieldType::Many2one => {
                let id = items.first().and_then(Value::as_i64);
                let display_name = match items.get(1) {
                    Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
                    _ => None,
                };
                RawValue::Reference(RecordRef { id, display_name })
            }
            FieldType::Many2many | FieldType::One2many => {
                if matches!(items.first(), Some(Value::Object(_))) {
                    RawValue::Records(
                        items
                            .iter()
                            .map(|item| match item {
                                Value::Object(map) => RecordRef::from_object(map),
                                _ => RecordRef::default(),
                            })
                            .collect(),
                    )
                } else {
                    let ids: Vec<Option<i64>> = items.iter().map(Value::as_i64).collect();
                    let invalid = ids.iter().filter(|id| id.is_none()).count();
                    if invalid > 0 {
                        log::warn!("relation value holds {invalid} non-integer ids");
                    }
                    RawValue::Ids(ids)
                }
            }
            _ => RawValue::Json(value.clone()),
        }
    }

    fn from_object(
        value: &Value,
        map: &serde_json::Map<String, Value>,
        field_type: FieldType,
    ) -> Self {
        if let Some(Value::Array(records)) = map.get("records") {
            return RawValue::Collection(
                records
                    .iter()
                    .filter_map(Value::as_object)
                    .map(RecordRef::from_object)
                    .collect(),
            );
        }
        match field_type {
            FieldType::Many2one => RawValue::Reference(RecordRef::from_object(map)),
            _ if map.contains_key("display_name") || map.contains_key("name") => {
                RawValue::Reference(RecordRef::from_object(map))
            }
            _ => RawValue::Json(value.clone()),
        }
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        RawValue::Number(n as f64)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<NaiveDate> for RawValue {
    fn from(d: NaiveDate) -> Self {
        RawValue::Date(d)
    }
}

impl From<NaiveDateTime> for RawValue {
    fn from(dt: NaiveDateTime) -> Self {
        RawValue::DateTime(dt)
    }
}

impl From<RecordRef> for RawValue {
    fn from(r: RecordRef) -> Self {
        RawValue::Reference(r)
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Parse a datetime in one of the host's textual forms, including RFC 3339
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.naive_utc())
        })
}

/// One record: field name to host JSON value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordRow {
    values: BTreeMap<String, Value>,
}

impl RecordRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: Value) -> Self {
        self.values.insert(field.into(), value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.values.insert(field.into(), value);
    }

    /// Raw JSON value of a field, if present
    pub fn json(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Adapted value of a field; missing keys are [`RawValue::Absent`]
    pub fn value(&self, field: &str, field_type: FieldType) -> RawValue {
        self.values
            .get(field)
            .map_or(RawValue::Absent, |v| RawValue::from_json(v, field_type))
    }

    /// Record id, when the row carries one under `id`
    pub fn id(&self) -> Option<i64> {
        self.values.get("id").and_then(Value::as_i64)
    }
}

impl From<serde_json::Map<String, Value>> for RecordRow {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        Self {
            values: map.into_iter().collect(),
        }
    }
}
