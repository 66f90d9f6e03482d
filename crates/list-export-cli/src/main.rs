//! listx - export list-view fixtures to spreadsheets

mod channel;
mod domain;
mod fixture;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use list_export::prelude::*;

use crate::channel::LocalDelivery;
use crate::fixture::Fixture;

#[derive(Parser)]
#[command(name = "listx")]
#[command(author, version, about = "Export list-view selections to spreadsheets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the fixture's selection to a file
    Export {
        /// List-view fixture (JSON)
        fixture: PathBuf,

        /// Output file (default: <model>_export.<format>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Xlsx)]
        format: Format,

        /// Anti-forgery token sent with the request
        #[arg(long, default_value = "")]
        csrf: String,

        /// Start CSV output with a UTF-8 byte order mark
        #[arg(long)]
        bom: bool,
    },

    /// Print the selected rows as they would be formatted, tab-separated
    Preview {
        /// List-view fixture (JSON)
        fixture: PathBuf,
    },

    /// List the columns that would be exported
    Columns {
        /// List-view fixture (JSON)
        fixture: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Xlsx,
    Csv,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Xlsx => OutputFormat::Xlsx,
            Format::Csv => OutputFormat::Csv,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            fixture,
            output,
            format,
            csrf,
            bom,
        } => {
            let csv_options = CsvWriteOptions {
                utf8_bom: bom,
                ..Default::default()
            };
            export(&fixture, output, format.into(), csv_options, &csrf)
        }
        Commands::Preview { fixture } => preview(&fixture),
        Commands::Columns { fixture } => list_columns(&fixture),
    }
}

fn export(
    path: &Path,
    output: Option<PathBuf>,
    format: OutputFormat,
    csv_options: CsvWriteOptions,
    csrf: &str,
) -> Result<()> {
    let fixture = Fixture::load(path)?;
    let mut channel = LocalDelivery::new(&fixture, format, output).with_csv_options(csv_options);
    let mut notes: Vec<Notification> = Vec::new();

    let result = ExportOrchestrator::default().export(&fixture.view, &mut channel, &mut notes, csrf);
    for note in &notes {
        match note.kind {
            NotificationKind::Success => eprintln!("{}", note.message),
            NotificationKind::Warning => eprintln!("Warning: {}", note.message),
        }
    }
    let outcome = result.context("Export failed")?;

    let written = channel
        .take_written()
        .context("The export request was not delivered")??;
    eprintln!(
        "Wrote {} record(s) x {} column(s) to '{}'",
        outcome.mode.record_count(),
        outcome.payload.field_names.len(),
        written.display()
    );
    Ok(())
}

fn preview(path: &Path) -> Result<()> {
    let fixture = Fixture::load(path)?;
    let view = &fixture.view;

    let columns = resolve_visible_columns(&view.columns, &view.fields);
    if columns.is_empty() {
        bail!("No columns available to export.");
    }

    let formatter = CellFormatter::default();
    let table = ExportTable::from_records(
        &columns,
        view.selection.iter().map(|record| &record.data),
        &view.fields,
        &formatter,
    );

    let mut out = io::stdout().lock();
    writeln!(out, "{}", table.headers().join("\t")).context("Failed to write to stdout")?;
    for row in table.rows() {
        writeln!(out, "{}", row.join("\t")).context("Failed to write to stdout")?;
    }
    Ok(())
}

fn list_columns(path: &Path) -> Result<()> {
    let fixture = Fixture::load(path)?;
    let view = &fixture.view;

    let columns = resolve_visible_columns(&view.columns, &view.fields);
    println!("Model: {}", view.model);
    println!("Columns: {} of {}", columns.len(), view.columns.len());
    for column in &columns {
        match &column.widget {
            Some(widget) => println!(
                "  {}\t{}\t{} ({})",
                column.name,
                column.label,
                column.field_type.as_str(),
                widget
            ),
            None => println!(
                "  {}\t{}\t{}",
                column.name,
                column.label,
                column.field_type.as_str()
            ),
        }
    }
    Ok(())
}
