//! The flat, all-text table handed to spreadsheet delivery

use serde::{Deserialize, Serialize};

use crate::column::ColumnDescriptor;
use crate::error::{Error, Result};
use crate::field::FieldRegistry;
use crate::format::CellFormatter;
use crate::value::RecordRow;

/// Headers plus rows of display strings.
///
/// Every row has exactly one cell per header, in header order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExportTable {
    pub(crate) headers: Vec<String>,
    pub(crate) rows: Vec<Vec<String>>,
}

impl ExportTable {
    /// An empty table with the given headers
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Build a table from headers and rows, checking the shape
    pub fn from_parts(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let mut table = Self::new(headers);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Format `records` over `columns`.
    pub fn from_records<'r, I>(
        columns: &[ColumnDescriptor],
        records: I,
        fields: &FieldRegistry,
        formatter: &CellFormatter<'_>,
    ) -> Self
    where
        I: IntoIterator<Item = &'r RecordRow>,
    {
        let headers = columns.iter().map(|c| c.label.clone()).collect();
        let rows = records
            .into_iter()
            .map(|record| {
                formatter.format_row(columns, |column| {
                    (
                        record.value(&column.name, column.field_type),
                        fields.get(&column.name),
                    )
                })
            })
            .collect();
        Self { headers, rows }
    }

    /// Append a row
    pub fn push_row(&mut self, row: Vec<String>) -> Result<()> {
        if row.len() != self.headers.len() {
            return Err(Error::TableShape {
                row: self.rows.len(),
                expected: self.headers.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
