//! Error types for list-export

use thiserror::Error;

/// Result type alias using [`ExportError`]
pub type Result<T> = std::result::Result<T, ExportError>;

/// Errors that can occur while exporting
#[derive(Debug, Error)]
pub enum ExportError {
    /// Nothing is selected
    #[error("Please select at least one record to export.")]
    EmptySelection,

    /// Every column is hidden or unresolvable
    #[error("No columns available to export.")]
    NoExportableColumns,

    /// Payload could not be (de)serialized
    #[error("Payload error: {0}")]
    Payload(#[from] serde_json::Error),

    /// Record store failure
    #[error("Record store error: {0}")]
    Store(String),

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] list_export_core::Error),

    /// XLSX rendering error
    #[error("XLSX error: {0}")]
    Xlsx(#[from] list_export_xlsx::XlsxError),

    /// CSV rendering error
    #[error("CSV error: {0}")]
    Csv(#[from] list_export_csv::CsvError),
}

impl ExportError {
    /// Create a record store error with a message
    pub fn store<S: Into<String>>(msg: S) -> Self {
        ExportError::Store(msg.into())
    }

    /// Validation failures shown to the user as warnings
    pub fn is_user_warning(&self) -> bool {
        matches!(
            self,
            ExportError::EmptySelection | ExportError::NoExportableColumns
        )
    }
}
