//! XLSX writer

use std::borrow::Cow;
use std::fs::File;
use std::io::{Cursor, Seek, Write};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use list_export_core::{ExportSheet, SheetCell};
use quick_xml::escape::escape;

use crate::error::{XlsxError, XlsxResult};
use crate::options::{XlsxExportOptions, MAX_COLS, MAX_ROWS};
use crate::styles::{styles_xml, CellStyle};

/// MIME type of the files produced by [`XlsxWriter`]
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// XLSX file writer
pub struct XlsxWriter;

impl XlsxWriter {
    /// Write a sheet to a file path
    pub fn write_file<P: AsRef<Path>>(
        sheet: &ExportSheet,
        path: P,
        options: &XlsxExportOptions,
    ) -> XlsxResult<()> {
        let file = File::create(path)?;
        Self::write(sheet, file, options)
    }

    /// Write a sheet to an in-memory buffer
    pub fn write_to_vec(sheet: &ExportSheet, options: &XlsxExportOptions) -> XlsxResult<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        Self::write(sheet, &mut buf, options)?;
        Ok(buf.into_inner())
    }

    /// Write a sheet to a writer as a single-worksheet workbook
    pub fn write<W: Write + Seek>(
        sheet: &ExportSheet,
        writer: W,
        options: &XlsxExportOptions,
    ) -> XlsxResult<()> {
        options.validate().map_err(XlsxError::InvalidOption)?;
        // One header row plus the data rows
        if sheet.row_count() + 1 > MAX_ROWS || sheet.column_count() > MAX_COLS {
            return Err(XlsxError::TooLarge {
                rows: sheet.row_count() + 1,
                cols: sheet.column_count(),
            });
        }

        let mut zip = zip::ZipWriter::new(writer);

        Self::write_part(&mut zip, "[Content_Types].xml", CONTENT_TYPES_XML)?;
        Self::write_part(&mut zip, "_rels/.rels", ROOT_RELS_XML)?;
        Self::write_part(&mut zip, "xl/workbook.xml", &Self::workbook_xml(options))?;
        Self::write_part(&mut zip, "xl/_rels/workbook.xml.rels", WORKBOOK_RELS_XML)?;
        Self::write_part(&mut zip, "xl/styles.xml", &styles_xml(options))?;
        Self::write_part(
            &mut zip,
            "xl/worksheets/sheet1.xml",
            &Self::worksheet_xml(sheet, options),
        )?;

        zip.finish()?;
        log::debug!(
            "wrote xlsx sheet '{}' with {} rows and {} columns",
            options.sheet_name,
            sheet.row_count(),
            sheet.column_count()
        );
        Ok(())
    }

    fn write_part<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        name: &str,
        content: &str,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file(name, options)?;
        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn workbook_xml(options: &XlsxExportOptions) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <sheets>
        <sheet name="{}" sheetId="1" r:id="rId1"/>
    </sheets>
</workbook>"#,
            escape(options.safe_sheet_name().as_str())
        )
    }

    fn worksheet_xml(sheet: &ExportSheet, options: &XlsxExportOptions) -> String {
        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

        if options.freeze_header {
            content.push_str(
                r#"
    <sheetViews>
        <sheetView workbookViewId="0">
            <pane ySplit="1" topLeftCell="A2" activePane="bottomLeft" state="frozen"/>
        </sheetView>
    </sheetViews>"#,
            );
        }

        let widths = sheet.column_text_widths();
        if !widths.is_empty() {
            content.push_str("\n    <cols>");
            for (col, text_width) in widths.iter().enumerate() {
                content.push_str(&format!(
                    "\n        <col min=\"{0}\" max=\"{0}\" width=\"{1}\" customWidth=\"1\"/>",
                    col + 1,
                    options.column_width(*text_width)
                ));
            }
            content.push_str("\n    </cols>");
        }

        content.push_str("\n    <sheetData>");

        if !sheet.headers().is_empty() {
            content.push_str("\n        <row r=\"1\">");
            for (col, header) in sheet.headers().iter().enumerate() {
                Self::push_cell(
                    &mut content,
                    &cell_ref(0, col),
                    &SheetCell::text(header.as_str()),
                    CellStyle::Header,
                );
            }
            content.push_str("\n        </row>");
        }

        for (i, row) in sheet.rows().iter().enumerate() {
            let row_idx = i + 1;
            content.push_str(&format!("\n        <row r=\"{}\">", row_idx + 1));
            for (col, cell) in row.iter().enumerate() {
                let style = match cell {
                    SheetCell::Number(_) => CellStyle::Number,
                    SheetCell::Date(_) => CellStyle::Date,
                    SheetCell::DateTime(_) => CellStyle::DateTime,
                    _ => CellStyle::Text,
                };
                Self::push_cell(&mut content, &cell_ref(row_idx, col), cell, style);
            }
            content.push_str("\n        </row>");
        }

        content.push_str("\n    </sheetData>\n</worksheet>");
        content
    }

    fn push_cell(content: &mut String, cell_ref: &str, cell: &SheetCell, style: CellStyle) {
        let s = style.xf_id();
        match cell {
            SheetCell::Empty => {
                // Keep the border on blank cells
                content.push_str(&format!("\n            <c r=\"{cell_ref}\" s=\"{s}\"/>"));
            }
            SheetCell::Text(text) => {
                content.push_str(&format!(
                    "\n            <c r=\"{}\" s=\"{}\" t=\"inlineStr\"><is><t xml:space=\"preserve\">{}</t></is></c>",
                    cell_ref,
                    s,
                    escape_text(text)
                ));
            }
            SheetCell::Number(n) => {
                content.push_str(&format!(
                    "\n            <c r=\"{cell_ref}\" s=\"{s}\"><v>{n}</v></c>"
                ));
            }
            SheetCell::Boolean(b) => {
                content.push_str(&format!(
                    "\n            <c r=\"{}\" s=\"{}\" t=\"b\"><v>{}</v></c>",
                    cell_ref,
                    s,
                    u8::from(*b)
                ));
            }
            SheetCell::Date(d) => {
                content.push_str(&format!(
                    "\n            <c r=\"{}\" s=\"{}\"><v>{}</v></c>",
                    cell_ref,
                    s,
                    date_serial(d)
                ));
            }
            SheetCell::DateTime(dt) => {
                content.push_str(&format!(
                    "\n            <c r=\"{}\" s=\"{}\"><v>{}</v></c>",
                    cell_ref,
                    s,
                    datetime_serial(dt)
                ));
            }
        }
    }
}

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
    <Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

const WORKBOOK_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
    <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

/// A1-style reference for 0-based row and column
pub fn cell_ref(row: usize, col: usize) -> String {
    format!("{}{}", column_letters(col), row + 1)
}

/// Column letters for a 0-based column index (`0` is `A`, `26` is `AA`)
pub fn column_letters(col: usize) -> String {
    let mut letters = Vec::new();
    let mut n = col + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Excel serial day number (1900 date system)
pub fn date_serial(d: &NaiveDate) -> i64 {
    d.signed_duration_since(excel_epoch()).num_days()
}

/// Excel serial number with the time of day as fraction
pub fn datetime_serial(dt: &NaiveDateTime) -> f64 {
    let seconds = dt.signed_duration_since(excel_epoch_midnight()).num_seconds();
    seconds as f64 / 86_400.0
}

fn excel_epoch() -> NaiveDate {
    // 1899-12-30 absorbs the 1900 leap-year bug for dates after March 1900
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or_default()
}

fn excel_epoch_midnight() -> NaiveDateTime {
    excel_epoch().and_hms_opt(0, 0, 0).unwrap_or_default()
}

/// Escape text for XML, dropping characters XML 1.0 cannot carry
fn escape_text(text: &str) -> Cow<'_, str> {
    let legal = |c: char| matches!(c, '\t' | '\n' | '\r') || c >= ' ';
    if text.chars().all(legal) {
        escape(text)
    } else {
        let cleaned: String = text.chars().filter(|&c| legal(c)).collect();
        Cow::Owned(escape(cleaned.as_str()).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letters(0), "A");
        assert_eq!(column_letters(25), "Z");
        assert_eq!(column_letters(26), "AA");
        assert_eq!(column_letters(701), "ZZ");
        assert_eq!(column_letters(702), "AAA");
        assert_eq!(cell_ref(0, 2), "C1");
    }

    #[test]
    fn test_serial_dates() {
        assert_eq!(date_serial(&NaiveDate::from_ymd_opt(1900, 3, 1).unwrap()), 61);
        assert_eq!(date_serial(&NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()), 45292);
        let noon = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(datetime_serial(&noon), 45292.5);
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(escape_text("bell\u{7}ring"), "bellring");
        assert_eq!(escape_text("tab\there"), "tab\there");
    }
}
