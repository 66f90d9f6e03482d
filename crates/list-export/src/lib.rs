//! # list-export
//!
//! Export the selected rows of a list view to a spreadsheet.
//!
//! The client half ([`ExportOrchestrator`]) validates the selection, resolves
//! the exportable columns, decides whether the user meant "these rows" or
//! "every matching row", and posts an [`ExportPayload`] through a
//! [`DeliveryChannel`]. The server half ([`ExportHandler`]) turns that payload
//! back into records through a [`RecordStore`] and renders XLSX or CSV.
//!
//! ## Quick start
//!
//! ```rust
//! use list_export::prelude::*;
//! use serde_json::json;
//!
//! let mut view = ListSnapshot::new("res.partner");
//! view.columns = vec![ViewColumn::field("name")];
//! view.fields = FieldRegistry::new()
//!     .with("name", FieldMetadata::new(FieldType::String).with_label("Name"));
//! view.selection = vec![SelectedRecord::new(7, RecordRow::new().with("name", json!("Acme")))];
//! view.total_count = 1;
//!
//! let mut forms: Vec<DeliveryForm> = Vec::new();
//! let mut notes: Vec<Notification> = Vec::new();
//! let outcome = ExportOrchestrator::default()
//!     .export(&view, &mut forms, &mut notes, "csrf")
//!     .unwrap();
//!
//! assert_eq!(outcome.payload.selected_ids, vec![7]);
//! assert_eq!(notes[0].message, "Exporting 1 record(s) to Excel...");
//! ```

mod delivery;
mod error;
mod notify;
mod orchestrator;
mod payload;
mod selection;
mod source;

pub mod prelude;
pub mod server;

pub use delivery::{ClockTokens, DeliveryChannel, DeliveryForm, TokenSource, EXPORT_ENDPOINT};
pub use error::{ExportError, Result};
pub use notify::{Notification, NotificationKind, Notifier};
pub use orchestrator::{ExportOptions, ExportOrchestrator, ExportOutcome, ExportState};
pub use payload::ExportPayload;
pub use selection::SelectionMode;
pub use server::{ExportHandler, ExportResponse, OutputFormat, RecordStore};
pub use source::{ListSnapshot, RecordSource, SelectedRecord, DEFAULT_PAGE_SIZE};
