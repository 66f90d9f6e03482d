//! XLSX error types

use thiserror::Error;

/// Result type for XLSX operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that can occur during XLSX writing
#[derive(Debug, Error)]
pub enum XlsxError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Sheet cannot be represented in a worksheet
    #[error("Sheet too large: {rows} rows x {cols} columns")]
    TooLarge { rows: usize, cols: usize },

    /// Invalid option value
    #[error("Invalid option: {0}")]
    InvalidOption(String),
}
