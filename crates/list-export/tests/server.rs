//! Server-side export handler against an in-memory record store

use std::cell::RefCell;
use std::io::{Cursor, Read};

use list_export::prelude::*;
use list_export::server::{export_filename, CSV_CONTENT_TYPE, FILE_TOKEN_COOKIE};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

#[derive(Default)]
struct MemoryStore {
    fields: FieldRegistry,
    records: Vec<RecordRow>,
    calls: RefCell<Vec<String>>,
}

impl MemoryStore {
    fn sale_orders() -> Self {
        let fields = FieldRegistry::new()
            .with("name", FieldMetadata::new(FieldType::String))
            .with("partner_id", FieldMetadata::new(FieldType::Many2one))
            .with("tag_ids", FieldMetadata::new(FieldType::Many2many))
            .with(
                "state",
                FieldMetadata::new(FieldType::Selection)
                    .with_selection([("draft", "Quotation"), ("sale", "Sales Order")]),
            )
            .with("amount_total", FieldMetadata::new(FieldType::Monetary))
            .with("paid", FieldMetadata::new(FieldType::Boolean))
            .with("date_order", FieldMetadata::new(FieldType::Date))
            .with("note", FieldMetadata::new(FieldType::Html));
        let records = vec![
            json!({
                "id": 1, "name": "SO001", "partner_id": [10, "Acme"],
                "tag_ids": [{"id": 1, "display_name": "VIP"}, {"id": 2, "display_name": "Export"}],
                "state": "sale", "amount_total": 1500.25, "paid": true,
                "date_order": "2024-01-01", "note": "<p>Rush <b>order</b></p>"
            }),
            json!({
                "id": 2, "name": "SO002", "partner_id": false, "tag_ids": [],
                "state": "draft", "amount_total": 0, "paid": false,
                "date_order": false, "note": false
            }),
            json!({
                "id": 3, "name": "SO003", "partner_id": [11, "Globex"], "tag_ids": [],
                "state": "cancel", "amount_total": 99.5, "paid": false,
                "date_order": "2024-02-15", "note": "plain"
            }),
        ]
        .into_iter()
        .map(|v| serde_json::from_value(v).unwrap())
        .collect();
        Self {
            fields,
            records,
            calls: RefCell::default(),
        }
    }
}

impl RecordStore for MemoryStore {
    fn fields(&self, _model: &str) -> Result<FieldRegistry> {
        Ok(self.fields.clone())
    }

    fn search(&self, model: &str, domain: &Value, _context: &Value) -> Result<Vec<RecordRow>> {
        self.calls
            .borrow_mut()
            .push(format!("search {model} {domain}"));
        Ok(self.records.clone())
    }

    fn browse(&self, model: &str, ids: &[i64], _context: &Value) -> Result<Vec<RecordRow>> {
        self.calls.borrow_mut().push(format!("browse {model} {ids:?}"));
        Ok(ids
            .iter()
            .filter_map(|id| self.records.iter().find(|r| r.id() == Some(*id)).cloned())
            .collect())
    }
}

fn payload(ids: Vec<i64>, domain_selected: bool) -> String {
    ExportPayload {
        model: "sale.order".into(),
        headers: vec![
            "Number".into(),
            "Customer".into(),
            "Tags".into(),
            "Status".into(),
            "Total".into(),
            "Paid".into(),
            "Date".into(),
            "Note".into(),
        ],
        field_names: vec![
            "name".into(),
            "partner_id".into(),
            "tag_ids".into(),
            "state".into(),
            "amount_total".into(),
            "paid".into(),
            "date_order".into(),
            "note".into(),
        ],
        domain: json!([["state", "!=", "cancel"]]),
        selected_ids: ids,
        is_domain_selected: domain_selected,
        total_count: 3,
        ..Default::default()
    }
    .to_json()
    .unwrap()
}

#[test]
fn test_selected_ids_are_browsed_in_order() {
    let store = MemoryStore::sale_orders();
    let handler = ExportHandler::new(&store);
    let data = ExportPayload::from_json(&payload(vec![3, 1], false)).unwrap();

    let sheet = handler.build_sheet(&data).unwrap();

    assert_eq!(store.calls.borrow().as_slice(), ["browse sale.order [3, 1]"]);
    let table = sheet.to_table();
    assert_eq!(
        table.rows(),
        &[
            vec![
                "SO003".to_string(),
                "Globex".into(),
                String::new(),
                "cancel".into(),
                "99.5".into(),
                String::new(),
                "2024-02-15".into(),
                "plain".into(),
            ],
            vec![
                "SO001".to_string(),
                "Acme".into(),
                "VIP, Export".into(),
                "Sales Order".into(),
                "1500.25".into(),
                "True".into(),
                "2024-01-01".into(),
                "Rush order".into(),
            ],
        ]
    );
}

#[test]
fn test_domain_selection_searches() {
    let store = MemoryStore::sale_orders();
    let handler = ExportHandler::new(&store);
    let data = ExportPayload::from_json(&payload(vec![1], true)).unwrap();

    let sheet = handler.build_sheet(&data).unwrap();

    assert_eq!(sheet.row_count(), 3);
    assert_eq!(
        store.calls.borrow().as_slice(),
        [r#"search sale.order [["state","!=","cancel"]]"#]
    );
}

#[test]
fn test_no_ids_falls_back_to_domain() {
    let store = MemoryStore::sale_orders();
    let handler = ExportHandler::new(&store);
    let data = ExportPayload::from_json(&payload(vec![], false)).unwrap();

    handler.build_sheet(&data).unwrap();
    assert!(store.calls.borrow()[0].starts_with("search"));
}

#[test]
fn test_typed_cells() {
    let store = MemoryStore::sale_orders();
    let handler = ExportHandler::new(&store);
    let data = ExportPayload::from_json(&payload(vec![2], false)).unwrap();

    let sheet = handler.build_sheet(&data).unwrap();
    assert_eq!(
        sheet.rows()[0],
        vec![
            SheetCell::text("SO002"),
            SheetCell::Empty,
            SheetCell::Empty,
            SheetCell::text("Quotation"),
            SheetCell::Number(0.0),
            SheetCell::Empty,
            SheetCell::Empty,
            SheetCell::Empty,
        ]
    );
}

#[test]
fn test_unknown_fields_render_as_text_and_headers_fall_back() {
    let store = MemoryStore::sale_orders();
    let handler = ExportHandler::new(&store);
    let data = ExportPayload {
        model: "sale.order".into(),
        headers: vec!["Number".into()],
        field_names: vec!["name".into(), "id".into()],
        selected_ids: vec![1],
        ..Default::default()
    };

    let sheet = handler.build_sheet(&data).unwrap();
    assert_eq!(sheet.headers(), &["Number", "id"]);
    assert_eq!(sheet.rows()[0][1], SheetCell::text("1"));
}

#[test]
fn test_xlsx_response() {
    let store = MemoryStore::sale_orders();
    let response = ExportHandler::new(&store)
        .handle(&payload(vec![1, 2], false), "1700000000000", OutputFormat::Xlsx)
        .unwrap();

    assert_eq!(response.filename, "sale_order_export.xlsx");
    assert_eq!(
        response.content_type,
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert_eq!(
        response.cookies,
        vec![(FILE_TOKEN_COOKIE.to_string(), "1700000000000".to_string())]
    );
    assert_eq!(
        response.content_disposition(),
        "attachment; filename=\"sale_order_export.xlsx\""
    );

    let mut archive = zip::ZipArchive::new(Cursor::new(&response.body)).unwrap();
    let mut sheet = String::new();
    archive
        .by_name("xl/worksheets/sheet1.xml")
        .unwrap()
        .read_to_string(&mut sheet)
        .unwrap();
    assert!(sheet.contains("Sales Order"));
    assert!(sheet.contains(r#"<c r="E2" s="3"><v>1500.25</v></c>"#));
}

#[test]
fn test_csv_response() {
    let store = MemoryStore::sale_orders();
    let response = ExportHandler::new(&store)
        .with_csv_options(CsvWriteOptions {
            line_terminator: list_export_csv::LineTerminator::LF,
            ..Default::default()
        })
        .handle(&payload(vec![1], false), "t", OutputFormat::Csv)
        .unwrap();

    assert_eq!(response.filename, "sale_order_export.csv");
    assert_eq!(response.content_type, CSV_CONTENT_TYPE);
    assert_eq!(
        String::from_utf8(response.body).unwrap(),
        "Number,Customer,Tags,Status,Total,Paid,Date,Note\n\
         SO001,Acme,\"VIP, Export\",Sales Order,1500.25,True,2024-01-01,Rush order\n"
    );
}

#[test]
fn test_malformed_payload() {
    let store = MemoryStore::sale_orders();
    let err = ExportHandler::new(&store)
        .handle("{oops", "t", OutputFormat::Xlsx)
        .unwrap_err();
    assert!(matches!(err, ExportError::Payload(_)));
}

#[test]
fn test_default_model_filename() {
    assert_eq!(export_filename("export", OutputFormat::Xlsx), "export_export.xlsx");
    assert_eq!(
        export_filename("account.move.line", OutputFormat::Csv),
        "account_move_line_export.csv"
    );
}
