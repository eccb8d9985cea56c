use crate::config::cli::OutputFormat;
use crate::domain::model::{Kind, Note, Occurrence};
use crate::utils::error::Result;
use serde::Serialize;
use std::io::Write;

const OCCURRENCE_HEADER: [&str; 6] = [
    "name",
    "resource_url",
    "note_name",
    "kind",
    "vulnerability_type",
    "create_time",
];
const NOTE_HEADER: [&str; 4] = ["name", "kind", "short_description", "create_time"];

pub fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn kind_label(kind: Option<Kind>) -> String {
    kind.and_then(|k| serde_json::to_value(k).ok())
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

fn occurrence_row(occurrence: &Occurrence) -> [String; 6] {
    [
        occurrence.name.clone(),
        occurrence.resource_url.clone(),
        occurrence.note_name.clone(),
        kind_label(occurrence.kind),
        occurrence
            .vulnerability_details
            .as_ref()
            .map(|d| d.r#type.clone())
            .unwrap_or_default(),
        occurrence
            .create_time
            .map(|t| t.to_rfc3339())
            .unwrap_or_default(),
    ]
}

pub fn write_occurrences<W: Write>(
    out: &mut W,
    occurrences: &[Occurrence],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(out, occurrences),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(&mut *out);
            writer.write_record(OCCURRENCE_HEADER)?;
            for occurrence in occurrences {
                writer.write_record(occurrence_row(occurrence))?;
            }
            writer.flush()?;
            Ok(())
        }
    }
}

pub fn write_note<W: Write>(out: &mut W, note: &Note, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(out, note),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(&mut *out);
            writer.write_record(NOTE_HEADER)?;
            writer.write_record([
                note.name.clone(),
                kind_label(note.kind),
                note.short_description.clone(),
                note.create_time.map(|t| t.to_rfc3339()).unwrap_or_default(),
            ])?;
            writer.flush()?;
            Ok(())
        }
    }
}

pub fn write_count<W: Write>(
    out: &mut W,
    label: &str,
    count: usize,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(out, &serde_json::json!({ label: count })),
        OutputFormat::Csv => {
            writeln!(out, "{}", label)?;
            writeln!(out, "{}", count)?;
            Ok(())
        }
    }
}
