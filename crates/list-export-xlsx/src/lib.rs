//! # list-export-xlsx
//!
//! XLSX (Office Open XML) writer for list-export sheets.
//!
//! The output is a single-worksheet workbook with a styled, frozen header
//! row, typed cells and auto-fitted column widths.

pub mod error;
pub mod options;
pub mod writer;

mod styles;

pub use error::{XlsxError, XlsxResult};
pub use options::XlsxExportOptions;
pub use writer::{XlsxWriter, XLSX_CONTENT_TYPE};
