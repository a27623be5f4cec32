//! Time-change event log for sessions driven by a manual time of day

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::errors::{LoggerError, Result};

/// Month/day/hour set by the host when time is changed by hand
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub month: i64,
    pub day: i64,
    pub hour: f64,
}

/// Remembers the last time of day seen and appends a line when it changes
#[derive(Debug, Default)]
pub struct TimeChangeLog {
    last: Option<TimeOfDay>,
}

impl TimeChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Message for `current` if it differs from the last value seen
    pub fn observe(&mut self, current: TimeOfDay) -> Option<String> {
        let message = match self.last {
            Some(previous) if previous == current => return None,
            Some(_) => format!(
                "Time changed to month {}, day {}, hour {}",
                current.month, current.day, current.hour
            ),
            None => format!(
                "Time set to month {}, day {}, hour {}",
                current.month, current.day, current.hour
            ),
        };
        self.last = Some(current);
        Some(message)
    }
}

/// Append `"<local datetime>: <message>"` to `path`
pub fn append_entry(path: &Path, at: DateTime<Local>, message: &str) -> Result<PathBuf> {
    let to_export_err = |source: std::io::Error| LoggerError::ExportIo {
        path: path.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(to_export_err)?;
    writeln!(file, "{}: {}", at.format("%Y-%m-%d %H:%M:%S"), message).map_err(to_export_err)?;

    Ok(path.to_path_buf())
}
