//! The record source: what the list view knows about its selection

use list_export_core::{FieldRegistry, RecordRow, ViewColumn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Page size assumed when the source does not report one
pub const DEFAULT_PAGE_SIZE: u64 = 80;

/// A selected row of the list view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedRecord {
    /// Stable record id
    pub id: i64,
    /// Loaded field values
    #[serde(default)]
    pub data: RecordRow,
}

impl SelectedRecord {
    pub fn new(id: i64, data: RecordRow) -> Self {
        Self { id, data }
    }
}

/// Selection state, counts and metadata of the current list view.
pub trait RecordSource {
    /// Technical name of the listed model
    fn model(&self) -> &str;

    /// Columns of the list view, in display order
    fn view_columns(&self) -> &[ViewColumn];

    /// Field metadata of the listed model
    fn fields(&self) -> &FieldRegistry;

    /// Selected records, in display order
    fn selection(&self) -> &[SelectedRecord];

    /// Number of records matching the active filter
    fn total_count(&self) -> u64;

    /// Records loaded per page, if the view reports it
    fn page_size(&self) -> Option<u64>;

    /// Active filter expression
    fn domain(&self) -> &Value;

    /// Active evaluation context
    fn context(&self) -> &Value;

    /// Explicit "all matching records selected" signal.
    ///
    /// `None` means the host does not provide one.
    fn full_set_signal(&self) -> Option<bool>;
}

/// A captured list view state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListSnapshot {
    pub model: String,
    #[serde(default)]
    pub columns: Vec<ViewColumn>,
    #[serde(default)]
    pub fields: FieldRegistry,
    #[serde(default)]
    pub selection: Vec<SelectedRecord>,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub page_size: Option<u64>,
    #[serde(default = "empty_domain")]
    pub domain: Value,
    #[serde(default = "empty_context")]
    pub context: Value,
    #[serde(default)]
    pub is_domain_selected: Option<bool>,
}

fn empty_domain() -> Value {
    Value::Array(Vec::new())
}

fn empty_context() -> Value {
    Value::Object(serde_json::Map::new())
}

impl ListSnapshot {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            columns: Vec::new(),
            fields: FieldRegistry::new(),
            selection: Vec::new(),
            total_count: 0,
            page_size: None,
            domain: empty_domain(),
            context: empty_context(),
            is_domain_selected: None,
        }
    }
}

impl RecordSource for ListSnapshot {
    fn model(&self) -> &str {
        &self.model
    }

    fn view_columns(&self) -> &[ViewColumn] {
        &self.columns
    }

    fn fields(&self) -> &FieldRegistry {
        &self.fields
    }

    fn selection(&self) -> &[SelectedRecord] {
        &self.selection
    }

    fn total_count(&self) -> u64 {
        self.total_count
    }

    fn page_size(&self) -> Option<u64> {
        self.page_size
    }

    fn domain(&self) -> &Value {
        &self.domain
    }

    fn context(&self) -> &Value {
        &self.context
    }

    fn full_set_signal(&self) -> Option<bool> {
        self.is_domain_selected
    }
}
