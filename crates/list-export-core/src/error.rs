//! Error types for list-export-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in list-export-core
#[derive(Debug, Error)]
pub enum Error {
    /// A row does not have one cell per column
    #[error("Row {row} has {actual} cells, expected {expected}")]
    TableShape {
        row: usize,
        expected: usize,
        actual: usize,
    },
}
