//! CSV writer

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::options::{CsvWriteOptions, LineTerminator};
use list_export_core::ExportTable;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// CSV file writer
pub struct CsvWriter;

impl CsvWriter {
    /// Write a table to a CSV file
    pub fn write_file<P: AsRef<Path>>(
        table: &ExportTable,
        path: P,
        options: &CsvWriteOptions,
    ) -> CsvResult<()> {
        let file = File::create(path)?;
        Self::write(table, file, options)
    }

    /// Write a table to an in-memory buffer
    pub fn write_to_vec(table: &ExportTable, options: &CsvWriteOptions) -> CsvResult<Vec<u8>> {
        let mut buf = Vec::new();
        Self::write(table, &mut buf, options)?;
        Ok(buf)
    }

    /// Write a table to a writer
    pub fn write<W: Write>(
        table: &ExportTable,
        mut writer: W,
        options: &CsvWriteOptions,
    ) -> CsvResult<()> {
        if options.utf8_bom {
            writer.write_all(UTF8_BOM)?;
        }

        let terminator = match options.line_terminator {
            LineTerminator::LF => csv::Terminator::Any(b'\n'),
            LineTerminator::CRLF => csv::Terminator::CRLF,
        };

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .terminator(terminator)
            .from_writer(writer);

        if options.write_header {
            csv_writer.write_record(table.headers())?;
        }
        for row in table.rows() {
            csv_writer.write_record(row)?;
        }

        csv_writer
            .into_inner()
            .map_err(|e| CsvError::Buffer(e.error().to_string()))?
            .flush()?;
        Ok(())
    }
}
