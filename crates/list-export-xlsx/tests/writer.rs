//! End-to-end tests for the XLSX writer (write -> unzip -> inspect parts)

use std::io::{Cursor, Read};

use chrono::NaiveDate;
use list_export_core::{ExportSheet, SheetCell};
use list_export_xlsx::{XlsxError, XlsxExportOptions, XlsxWriter};
use pretty_assertions::assert_eq;
use quick_xml::events::Event;
use quick_xml::reader::Reader;

fn sample_sheet() -> ExportSheet {
    let mut sheet = ExportSheet::new(vec![
        "Reference".into(),
        "Customer".into(),
        "Amount".into(),
        "Paid".into(),
        "Date".into(),
    ]);
    sheet
        .push_row(vec![
            SheetCell::text("SO001"),
            SheetCell::text("Acme & Sons <Intl>"),
            SheetCell::Number(1250.5),
            SheetCell::Boolean(true),
            SheetCell::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
        ])
        .unwrap();
    sheet
        .push_row(vec![
            SheetCell::text("SO002"),
            SheetCell::Empty,
            SheetCell::Number(0.0),
            SheetCell::Boolean(false),
            SheetCell::Empty,
        ])
        .unwrap();
    sheet
}

fn read_part(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut part = archive.by_name(name).unwrap();
    let mut text = String::new();
    part.read_to_string(&mut text).unwrap();
    text
}

fn assert_well_formed(xml: &str) {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => panic!("malformed XML at {}: {e}", reader.buffer_position()),
        }
    }
}

#[test]
fn test_package_contains_required_parts() {
    let bytes = XlsxWriter::write_to_vec(&sample_sheet(), &XlsxExportOptions::default()).unwrap();
    let archive = zip::ZipArchive::new(Cursor::new(&bytes)).unwrap();
    let mut names: Vec<&str> = archive.file_names().collect();
    names.sort_unstable();
    assert_eq!(
        names,
        vec![
            "[Content_Types].xml",
            "_rels/.rels",
            "xl/_rels/workbook.xml.rels",
            "xl/styles.xml",
            "xl/workbook.xml",
            "xl/worksheets/sheet1.xml",
        ]
    );
    for name in names {
        assert_well_formed(&read_part(&bytes, name));
    }
}

#[test]
fn test_header_row_and_typed_cells() {
    let bytes = XlsxWriter::write_to_vec(&sample_sheet(), &XlsxExportOptions::default()).unwrap();
    let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");

    assert!(sheet.contains(
        r#"<c r="A1" s="1" t="inlineStr"><is><t xml:space="preserve">Reference</t></is></c>"#
    ));
    assert!(sheet.contains("Acme &amp; Sons &lt;Intl&gt;"));
    assert!(sheet.contains(r#"<c r="C2" s="3"><v>1250.5</v></c>"#));
    assert!(sheet.contains(r#"<c r="D2" s="2" t="b"><v>1</v></c>"#));
    assert!(sheet.contains(r#"<c r="D3" s="2" t="b"><v>0</v></c>"#));
    assert!(sheet.contains(r#"<c r="E2" s="4"><v>45292</v></c>"#));
    assert!(sheet.contains(r#"<c r="B3" s="2"/>"#));
    assert!(sheet.contains(r#"<pane ySplit="1" topLeftCell="A2" activePane="bottomLeft" state="frozen"/>"#));

    let workbook = read_part(&bytes, "xl/workbook.xml");
    assert!(workbook.contains(r#"<sheet name="Data" sheetId="1" r:id="rId1"/>"#));
}

#[test]
fn test_column_widths_follow_content() {
    let bytes = XlsxWriter::write_to_vec(&sample_sheet(), &XlsxExportOptions::default()).unwrap();
    let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");

    // "Reference" (9) + 2
    assert!(sheet.contains(r#"<col min="1" max="1" width="11" customWidth="1"/>"#));
    // "Acme & Sons <Intl>" (18) + 2
    assert!(sheet.contains(r#"<col min="2" max="2" width="20" customWidth="1"/>"#));
    // "Date" header vs "2024-01-01" (10) + 2
    assert!(sheet.contains(r#"<col min="5" max="5" width="12" customWidth="1"/>"#));

    let mut wide = ExportSheet::new(vec!["Notes".into()]);
    wide.push_row(vec![SheetCell::text("x".repeat(200))]).unwrap();
    let bytes = XlsxWriter::write_to_vec(&wide, &XlsxExportOptions::default()).unwrap();
    let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains(r#"<col min="1" max="1" width="50" customWidth="1"/>"#));
}

#[test]
fn test_options_are_applied() {
    let options = XlsxExportOptions {
        sheet_name: "Orders".into(),
        freeze_header: false,
        header_fill: "00FF00".into(),
        ..Default::default()
    };
    let bytes = XlsxWriter::write_to_vec(&sample_sheet(), &options).unwrap();
    assert!(!read_part(&bytes, "xl/worksheets/sheet1.xml").contains("<pane"));
    assert!(read_part(&bytes, "xl/workbook.xml").contains(r#"name="Orders""#));
    assert!(read_part(&bytes, "xl/styles.xml").contains(r#"<fgColor rgb="FF00FF00"/>"#));
}

#[test]
fn test_invalid_options_are_rejected() {
    let options = XlsxExportOptions {
        header_fill: "blue".into(),
        ..Default::default()
    };
    let err = XlsxWriter::write_to_vec(&sample_sheet(), &options).unwrap_err();
    assert!(matches!(err, XlsxError::InvalidOption(_)));
}

#[test]
fn test_write_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.xlsx");
    XlsxWriter::write_file(&sample_sheet(), &path, &XlsxExportOptions::default()).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..2], b"PK");
}
