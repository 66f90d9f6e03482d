//! Server side of the export: payload in, spreadsheet file out

use list_export_core::{ExportSheet, FieldRegistry, FieldType, RecordRow, SheetCell};
use list_export_csv::{CsvWriteOptions, CsvWriter};
use list_export_xlsx::{XlsxExportOptions, XlsxWriter, XLSX_CONTENT_TYPE};
use serde_json::Value;

use crate::error::Result;
use crate::payload::ExportPayload;

/// Name of the cookie carrying the request token back to the browser
pub const FILE_TOKEN_COOKIE: &str = "fileToken";

/// Content type of CSV responses
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Server-side access to model records.
pub trait RecordStore {
    /// Field metadata of `model`
    fn fields(&self, model: &str) -> Result<FieldRegistry>;

    /// Every record of `model` matching `domain`
    fn search(&self, model: &str, domain: &Value, context: &Value) -> Result<Vec<RecordRow>>;

    /// The records with the given ids, in the given order
    fn browse(&self, model: &str, ids: &[i64], context: &Value) -> Result<Vec<RecordRow>>;
}

/// File format of the rendered export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Xlsx => XLSX_CONTENT_TYPE,
            OutputFormat::Csv => CSV_CONTENT_TYPE,
        }
    }
}

/// A rendered download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResponse {
    pub filename: String,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    /// `(name, value)` cookies to set
    pub cookies: Vec<(String, String)>,
}

impl ExportResponse {
    /// `Content-Disposition` header value
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

/// Download filename for a model: dots become underscores
pub fn export_filename(model: &str, format: OutputFormat) -> String {
    format!("{}_export.{}", model.replace('.', "_"), format.extension())
}

/// Renders export payloads against a record store
pub struct ExportHandler<'s, S: RecordStore + ?Sized> {
    store: &'s S,
    xlsx_options: XlsxExportOptions,
    csv_options: CsvWriteOptions,
}

impl<'s, S: RecordStore + ?Sized> ExportHandler<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            xlsx_options: XlsxExportOptions::default(),
            csv_options: CsvWriteOptions::default(),
        }
    }

    pub fn with_xlsx_options(mut self, options: XlsxExportOptions) -> Self {
        self.xlsx_options = options;
        self
    }

    pub fn with_csv_options(mut self, options: CsvWriteOptions) -> Self {
        self.csv_options = options;
        self
    }

    /// Handle a posted export form
    pub fn handle(&self, data: &str, token: &str, format: OutputFormat) -> Result<ExportResponse> {
        let payload = ExportPayload::from_json(data)?;
        let sheet = self.build_sheet(&payload)?;

        let body = match format {
            OutputFormat::Xlsx => XlsxWriter::write_to_vec(&sheet, &self.xlsx_options)?,
            OutputFormat::Csv => CsvWriter::write_to_vec(&sheet.to_table(), &self.csv_options)?,
        };

        let filename = export_filename(&payload.model, format);
        log::info!(
            "rendered {} ({} rows, {} bytes)",
            filename,
            sheet.row_count(),
            body.len()
        );

        Ok(ExportResponse {
            filename,
            content_type: format.content_type(),
            body,
            cookies: vec![(FILE_TOKEN_COOKIE.to_string(), token.to_string())],
        })
    }

    /// Resolve the payload's records and type their cells
    pub fn build_sheet(&self, payload: &ExportPayload) -> Result<ExportSheet> {
        let records = self.resolve_records(payload)?;
        let fields = self.store.fields(&payload.model)?;

        let columns: Vec<(&str, FieldType)> = payload
            .field_names
            .iter()
            .map(|name| {
                let ty = fields
                    .get(name)
                    .map_or(FieldType::String, |meta| meta.field_type);
                (name.as_str(), ty)
            })
            .collect();

        let mut sheet = ExportSheet::new(payload.column_headers());
        for record in &records {
            let row = columns
                .iter()
                .map(|&(name, ty)| SheetCell::from_raw(&record.value(name, ty), ty, fields.get(name)))
                .collect();
            sheet.push_row(row)?;
        }
        Ok(sheet)
    }

    fn resolve_records(&self, payload: &ExportPayload) -> Result<Vec<RecordRow>> {
        let model = payload.model.as_str();
        if payload.is_domain_selected {
            log::debug!("exporting every {model} record matching the filter");
            self.store.search(model, &payload.domain, &payload.context)
        } else if !payload.selected_ids.is_empty() {
            log::debug!("exporting {} selected {model} records", payload.selected_ids.len());
            self.store
                .browse(model, &payload.selected_ids, &payload.context)
        } else {
            self.store.search(model, &payload.domain, &payload.context)
        }
    }
}
