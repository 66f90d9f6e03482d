//! List-view fixtures: a captured view plus the records behind it

use std::path::Path;

use anyhow::{bail, Context};
use list_export::prelude::*;
use serde::Deserialize;
use serde_json::Value;

use crate::domain;

/// A list view and its model's records, loaded from JSON.
///
/// The view fields sit at the top level. The selection is either given
/// in full under `selection` or as ids under `selected`, which are looked
/// up in `records`. A missing `total_count` is the number of records
/// matching `domain`.
#[derive(Debug, Clone, Deserialize)]
pub struct Fixture {
    #[serde(flatten)]
    pub view: ListSnapshot,
    #[serde(default)]
    pub records: Vec<RecordRow>,
    #[serde(default)]
    selected: Vec<i64>,
}

impl Fixture {
    /// Read a fixture file
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read '{}'", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid fixture '{}'", path.display()))
    }

    /// Parse a fixture and fill in its derived fields
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let mut fixture: Fixture = serde_json::from_str(text)?;

        if fixture.view.selection.is_empty() {
            for &id in &fixture.selected {
                let Some(record) = fixture.find(id) else {
                    bail!("selected record {id} is not among the fixture records");
                };
                let record = record.clone();
                fixture.view.selection.push(SelectedRecord::new(id, record));
            }
        }

        if fixture.view.total_count == 0 {
            fixture.view.total_count = fixture.matching(&fixture.view.domain).count() as u64;
        }
        Ok(fixture)
    }

    fn find(&self, id: i64) -> Option<&RecordRow> {
        self.records.iter().find(|r| r.id() == Some(id))
    }

    fn matching<'a>(&'a self, filter: &'a Value) -> impl Iterator<Item = &'a RecordRow> + 'a {
        self.records
            .iter()
            .filter(move |record| domain::matches(record, filter))
    }

    fn check_model(&self, model: &str) -> Result<()> {
        if model == self.view.model {
            Ok(())
        } else {
            Err(ExportError::store(format!("unknown model '{model}'")))
        }
    }
}

impl RecordStore for Fixture {
    fn fields(&self, model: &str) -> Result<FieldRegistry> {
        self.check_model(model)?;
        Ok(self.view.fields.clone())
    }

    fn search(&self, model: &str, domain: &Value, _context: &Value) -> Result<Vec<RecordRow>> {
        self.check_model(model)?;
        Ok(self.matching(domain).cloned().collect())
    }

    fn browse(&self, model: &str, ids: &[i64], _context: &Value) -> Result<Vec<RecordRow>> {
        self.check_model(model)?;
        Ok(ids
            .iter()
            .filter_map(|&id| {
                let found = self.find(id).cloned();
                if found.is_none() {
                    log::warn!("record {model}({id}) does not exist");
                }
                found
            })
            .collect())
    }
}
