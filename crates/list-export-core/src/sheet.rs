//! Typed cells for spreadsheet rendering

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{Error, Result};
use crate::field::{FieldMetadata, FieldType};
use crate::format::{coerce_number, format_date, format_datetime, format_number, stringify};
use crate::html::strip_html;
use crate::table::ExportTable;
use crate::value::{RawValue, RecordRef};

/// A cell value that keeps its spreadsheet type
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SheetCell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl SheetCell {
    pub fn text<S: Into<String>>(s: S) -> Self {
        SheetCell::Text(s.into())
    }

    /// Type a raw value for a field of the given type.
    ///
    /// Numbers, booleans and dates keep their type so the spreadsheet can
    /// apply its own number formats; relational and selection values become
    /// their labels.
    pub fn from_raw(value: &RawValue, field_type: FieldType, field: Option<&FieldMetadata>) -> Self {
        if value.is_absent() {
            return SheetCell::Empty;
        }

        match field_type {
            FieldType::Boolean if value.is_truthy() => SheetCell::Boolean(true),
            // false is written blank, like any other falsy value
            FieldType::Boolean => SheetCell::Empty,
            FieldType::Many2one => match value {
                RawValue::Reference(r) => text_or_empty(r.name().to_string()),
                other => text_or_empty(stringify(other)),
            },
            FieldType::Many2many | FieldType::One2many => match value {
                RawValue::Records(records) | RawValue::Collection(records) => text_or_empty(
                    records
                        .iter()
                        .map(RecordRef::name)
                        .collect::<Vec<_>>()
                        .join(", "),
                ),
                RawValue::Ids(ids) if ids.is_empty() => SheetCell::Empty,
                RawValue::Ids(ids) => SheetCell::Text(format!("{} record(s)", ids.len())),
                _ => SheetCell::Empty,
            },
            FieldType::Selection => {
                let key = stringify(value);
                let label = field
                    .and_then(|f| f.selection_label(&key))
                    .map(str::to_string)
                    .unwrap_or(key);
                text_or_empty(label)
            }
            FieldType::Integer | FieldType::Float | FieldType::Monetary => {
                SheetCell::Number(coerce_number(value))
            }
            FieldType::Date => match value {
                RawValue::Date(d) => SheetCell::Date(*d),
                RawValue::DateTime(dt) => SheetCell::Date(dt.date()),
                other => text_or_empty(stringify(other)),
            },
            FieldType::Datetime => match value {
                RawValue::DateTime(dt) => SheetCell::DateTime(*dt),
                RawValue::Date(d) => d
                    .and_hms_opt(0, 0, 0)
                    .map_or(SheetCell::Empty, SheetCell::DateTime),
                other => text_or_empty(stringify(other)),
            },
            FieldType::Html => match value {
                RawValue::Text(s) => text_or_empty(strip_html(s)),
                other => text_or_empty(stringify(other)),
            },
            FieldType::String => text_or_empty(stringify(value)),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SheetCell::Empty)
    }

    /// The cell as plain text
    pub fn display_text(&self) -> String {
        match self {
            SheetCell::Empty => String::new(),
            SheetCell::Text(s) => s.clone(),
            SheetCell::Number(n) => format_number(*n),
            SheetCell::Boolean(true) => "True".to_string(),
            SheetCell::Boolean(false) => "False".to_string(),
            SheetCell::Date(d) => format_date(d),
            SheetCell::DateTime(dt) => format_datetime(dt),
        }
    }
}

fn text_or_empty(s: String) -> SheetCell {
    if s.is_empty() {
        SheetCell::Empty
    } else {
        SheetCell::Text(s)
    }
}

impl From<&str> for SheetCell {
    fn from(s: &str) -> Self {
        SheetCell::text(s)
    }
}

impl From<f64> for SheetCell {
    fn from(n: f64) -> Self {
        SheetCell::Number(n)
    }
}

impl From<bool> for SheetCell {
    fn from(b: bool) -> Self {
        SheetCell::Boolean(b)
    }
}

impl From<NaiveDate> for SheetCell {
    fn from(d: NaiveDate) -> Self {
        SheetCell::Date(d)
    }
}

/// Headers plus typed rows, ready to be written as a worksheet
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExportSheet {
    headers: Vec<String>,
    rows: Vec<Vec<SheetCell>>,
}

impl ExportSheet {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Append a row
    pub fn push_row(&mut self, row: Vec<SheetCell>) -> Result<()> {
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

    pub fn rows(&self) -> &[Vec<SheetCell>] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Widest display text per column, header included, in characters
    pub fn column_text_widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(col, header)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(col))
                    .map(|cell| cell.display_text().chars().count())
                    .fold(header.chars().count(), usize::max)
            })
            .collect()
    }

    /// Flatten into an all-text table
    pub fn to_table(&self) -> ExportTable {
        let rows = self
            .rows
            .iter()
            .map(|row| row.iter().map(SheetCell::display_text).collect())
            .collect();
        ExportTable {
            headers: self.headers.clone(),
            rows,
        }
    }
}
