//! The serialized export request sent to the download endpoint

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

fn default_model() -> String {
    "export".to_string()
}

fn default_domain() -> Value {
    Value::Array(Vec::new())
}

fn default_context() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Everything the server needs to rebuild the export.
///
/// The filter expression and context always travel with the payload, so
/// both "select all" and plain multi-select resolve against the full
/// matching set rather than the loaded page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportPayload {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub field_names: Vec<String>,
    #[serde(default = "default_domain")]
    pub domain: Value,
    #[serde(default = "default_context")]
    pub context: Value,
    #[serde(default)]
    pub selected_ids: Vec<i64>,
    #[serde(default)]
    pub is_domain_selected: bool,
    #[serde(default)]
    pub total_count: u64,
}

impl Default for ExportPayload {
    fn default() -> Self {
        Self {
            model: default_model(),
            headers: Vec::new(),
            field_names: Vec::new(),
            domain: default_domain(),
            context: default_context(),
            selected_ids: Vec::new(),
            is_domain_selected: false,
            total_count: 0,
        }
    }
}

impl ExportPayload {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    /// Header for each requested field; missing headers fall back to the field name
    pub fn column_headers(&self) -> Vec<String> {
        self.field_names
            .iter()
            .enumerate()
            .map(|(i, name)| self.headers.get(i).cloned().unwrap_or_else(|| name.clone()))
            .collect()
    }
}
