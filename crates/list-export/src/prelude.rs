//! Prelude module for convenient imports
//!
//! ```rust
//! use list_export::prelude::*;
//! ```

pub use crate::{
    ClockTokens, DeliveryChannel, DeliveryForm, ExportError, ExportHandler, ExportOptions,
    ExportOrchestrator, ExportOutcome, ExportPayload, ExportResponse, ExportState, ListSnapshot,
    Notification, NotificationKind, Notifier, OutputFormat, RecordSource, RecordStore, Result,
    SelectedRecord, SelectionMode, TokenSource,
};

pub use list_export_core::{
    resolve_visible_columns, CellFormatter, ColumnDescriptor, ExportSheet, ExportTable,
    FieldMetadata, FieldRegistry, FieldType, Invisible, RawValue, RecordRow, SheetCell,
    Translator, ViewColumn,
};

pub use list_export_csv::{CsvWriteOptions, CsvWriter};
pub use list_export_xlsx::{XlsxExportOptions, XlsxWriter};
