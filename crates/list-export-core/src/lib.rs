//! # list-export-core
//!
//! Core types for exporting the rows of a list view.
//!
//! This crate provides:
//! - [`FieldRegistry`] / [`FieldMetadata`] - what the host knows about each field
//! - [`ViewColumn`] and [`resolve_visible_columns`] - which columns get exported
//! - [`RawValue`] - host values, normalized once at the boundary
//! - [`CellFormatter`] - total, type-directed value formatting
//! - [`ExportTable`] / [`ExportSheet`] - the formatted output
//!
//! ## Example
//!
//! ```rust
//! use list_export_core::{
//!     resolve_visible_columns, CellFormatter, ExportTable, FieldMetadata, FieldRegistry,
//!     FieldType, RecordRow, ViewColumn,
//! };
//! use serde_json::json;
//!
//! let fields = FieldRegistry::new()
//!     .with("name", FieldMetadata::new(FieldType::String).with_label("Name"))
//!     .with("partner_id", FieldMetadata::new(FieldType::Many2one).with_label("Customer"));
//! let columns = resolve_visible_columns(
//!     &[ViewColumn::field("name"), ViewColumn::field("partner_id")],
//!     &fields,
//! );
//!
//! let record = RecordRow::new()
//!     .with("name", json!("SO042"))
//!     .with("partner_id", json!([7, "Acme Corp"]));
//! let table = ExportTable::from_records(&columns, [&record], &fields, &CellFormatter::default());
//!
//! assert_eq!(table.headers(), &["Name", "Customer"]);
//! assert_eq!(table.rows()[0], vec!["SO042", "Acme Corp"]);
//! ```

pub mod column;
pub mod error;
pub mod field;
pub mod format;
pub mod html;
pub mod i18n;
pub mod sheet;
pub mod table;
pub mod value;

pub use column::{resolve_visible_columns, ColumnDescriptor, ColumnKind, Invisible, ViewColumn};
pub use error::{Error, Result};
pub use field::{FieldMetadata, FieldRegistry, FieldType, SelectionOption};
pub use format::CellFormatter;
pub use i18n::{Catalog, IdentityTranslator, Translator};
pub use sheet::{ExportSheet, SheetCell};
pub use table::ExportTable;
pub use value::{RawValue, RecordRef, RecordRow};
