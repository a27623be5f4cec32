//! CSV export of the recording log

use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::CsvLayout;
use crate::errors::{LoggerError, Result};
use crate::session::recording::EvaluationRow;

/// Autosave target: `<path><pid>_Backup.csv`
pub fn backup_path(output_path: &str, participant_id: i64) -> PathBuf {
    PathBuf::from(format!("{}{}_Backup.csv", output_path, participant_id))
}

/// Final export target: `<path><pid>_<HHmmss>.csv`
pub fn final_path(output_path: &str, participant_id: i64, now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!(
        "{}{}_{}.csv",
        output_path,
        participant_id,
        now.format("%H%M%S")
    ))
}

/// Time-change event log: `<path><pid>_Events.log`
pub fn events_path(output_path: &str, participant_id: i64) -> PathBuf {
    PathBuf::from(format!("{}{}_Events.log", output_path, participant_id))
}

/// Render one row without a trailing comma
pub fn format_row(row: &EvaluationRow, layout: CsvLayout) -> String {
    let mut fields: Vec<String> = row
        .design_vector
        .iter()
        .chain(row.objective_vector.iter())
        .map(|v| v.to_string())
        .collect();

    fields.push(row.timestamp_string());
    match layout {
        CsvLayout::Full => {
            fields.push(row.elapsed_seconds.to_string());
            fields.push(u8::from(row.favorite).to_string());
            fields.push(row.section.to_string());
        }
        CsvLayout::Compact => {
            fields.push(u8::from(row.favorite).to_string());
        }
    }

    fields.join(",")
}

/// Render the whole log, one newline-terminated line per row
pub fn render(rows: &[EvaluationRow], layout: CsvLayout) -> String {
    rows.iter()
        .map(|row| format_row(row, layout) + "\n")
        .collect()
}

/// Overwrite `target` with the rendered rows
pub fn export(rows: &[EvaluationRow], target: &Path, layout: CsvLayout) -> Result<PathBuf> {
    fs::write(target, render(rows, layout)).map_err(|source| LoggerError::ExportIo {
        path: target.to_path_buf(),
        source,
    })?;

    info!(path = %target.display(), rows = rows.len(), "Exported recording log");
    Ok(target.to_path_buf())
}

/// Split an exported line back into numbers
pub fn parse_line(line: &str) -> Result<Vec<f64>> {
    line.trim_end()
        .split(',')
        .map(|field| {
            field.trim().parse::<f64>().map_err(|e| {
                LoggerError::Generic(format!("Bad CSV field {:?}: {}", field, e))
            })
        })
        .collect()
}
