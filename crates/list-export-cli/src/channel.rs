//! In-process delivery: the posted form goes straight to the export handler

use std::path::PathBuf;

use anyhow::Context;
use list_export::prelude::*;

/// Renders delivered forms against a local record store and writes the
/// resulting file.
pub struct LocalDelivery<'s, S: RecordStore + ?Sized> {
    handler: ExportHandler<'s, S>,
    format: OutputFormat,
    output: Option<PathBuf>,
    written: Option<anyhow::Result<PathBuf>>,
}

impl<'s, S: RecordStore + ?Sized> LocalDelivery<'s, S> {
    /// Without an `output` path the file is named after the model.
    pub fn new(store: &'s S, format: OutputFormat, output: Option<PathBuf>) -> Self {
        Self {
            handler: ExportHandler::new(store),
            format,
            output,
            written: None,
        }
    }

    pub fn with_csv_options(mut self, options: CsvWriteOptions) -> Self {
        self.handler = self.handler.with_csv_options(options);
        self
    }

    /// Outcome of the last delivery, if any
    pub fn take_written(&mut self) -> Option<anyhow::Result<PathBuf>> {
        self.written.take()
    }

    fn render(&self, form: &DeliveryForm) -> anyhow::Result<PathBuf> {
        let response = self
            .handler
            .handle(&form.payload, &form.token, self.format)
            .with_context(|| format!("Export request to {} failed", form.endpoint))?;

        let path = self
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(&response.filename));
        std::fs::write(&path, &response.body)
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
        Ok(path)
    }
}

impl<S: RecordStore + ?Sized> DeliveryChannel for LocalDelivery<'_, S> {
    fn deliver(&mut self, form: DeliveryForm) {
        let result = self.render(&form);
        self.written = Some(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::Fixture;
    use pretty_assertions::assert_eq;

    const PARTNERS: &str = r#"{
        "model": "res.partner",
        "columns": [{"type": "field", "name": "name"}, {"type": "field", "name": "city"}],
        "fields": {
            "name": {"type": "char", "string": "Name"},
            "city": {"type": "char", "string": "City"}
        },
        "records": [
            {"id": 1, "name": "Acme", "city": "Lyon"},
            {"id": 2, "name": "Globex, Inc.", "city": false}
        ],
        "selected": [2, 1]
    }"#;

    #[test]
    fn test_delivery_writes_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partners.csv");
        let fixture = Fixture::from_json(PARTNERS).unwrap();
        let mut channel = LocalDelivery::new(&fixture, OutputFormat::Csv, Some(path.clone()));
        let mut notes: Vec<Notification> = Vec::new();

        ExportOrchestrator::default()
            .export(&fixture.view, &mut channel, &mut notes, "csrf")
            .unwrap();

        assert_eq!(channel.take_written().unwrap().unwrap(), path);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Name,City\r\n\"Globex, Inc.\",\r\nAcme,Lyon\r\n"
        );
        assert!(channel.take_written().is_none());
    }

    #[test]
    fn test_delivery_with_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partners.csv");
        let fixture = Fixture::from_json(PARTNERS).unwrap();
        let mut channel = LocalDelivery::new(&fixture, OutputFormat::Csv, Some(path.clone()))
            .with_csv_options(CsvWriteOptions::spreadsheet());
        let mut notes: Vec<Notification> = Vec::new();

        ExportOrchestrator::default()
            .export(&fixture.view, &mut channel, &mut notes, "csrf")
            .unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"\xEF\xBB\xBFName,City\r\n"));
    }

    #[test]
    fn test_delivery_failure_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let fixture = Fixture::from_json(PARTNERS).unwrap();
        let mut channel = LocalDelivery::new(
            &fixture,
            OutputFormat::Xlsx,
            Some(dir.path().join("no-such-dir").join("out.xlsx")),
        );

        channel.deliver(DeliveryForm {
            endpoint: "/web/export/current_list_xls".to_string(),
            payload: r#"{"model": "res.partner", "field_names": ["name"], "selected_ids": [1]}"#
                .to_string(),
            token: "1".to_string(),
            csrf_token: String::new(),
        });

        let err = channel.take_written().unwrap().unwrap_err();
        assert!(err.to_string().starts_with("Failed to write"));
    }
}
