//! Recording log: append-only evaluation rows plus favorites

use chrono::{DateTime, Local};
use tracing::debug;

use crate::config::FavoriteCapture;

/// Timestamp format used in logs and for dedupe
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Two stamps closer than this (as yyyyMMddHHmmss numbers) are the same instant
pub const DEDUPE_EPSILON: f64 = 0.0001;

/// One recorded design evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationRow {
    pub design_vector: Vec<f64>,
    pub objective_vector: Vec<f64>,
    pub timestamp: DateTime<Local>,
    /// Seconds since the previous row (or the session start for the first)
    pub elapsed_seconds: f64,
    pub section: i64,
    pub favorite: bool,
}

impl EvaluationRow {
    /// `yyyyMMddHHmmss`
    pub fn timestamp_string(&self) -> String {
        format_timestamp(self.timestamp)
    }
}

pub fn format_timestamp(at: DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Stamp read back as a number, the value dedupe compares
fn stamp_value(at: DateTime<Local>) -> f64 {
    format_timestamp(at).parse().unwrap_or(0.0)
}

/// What a call to [`RecordingLog::record`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordOutcome {
    /// A new row was appended
    pub appended: bool,
    /// The newest row was marked favorite
    pub favorited: bool,
}

/// Append-only table of evaluation rows
#[derive(Debug, Clone, Default)]
pub struct RecordingLog {
    rows: Vec<EvaluationRow>,
    favorites: Vec<Vec<f64>>,
    capture: FavoriteCapture,
}

impl RecordingLog {
    pub fn new(capture: FavoriteCapture) -> Self {
        Self {
            rows: Vec::new(),
            favorites: Vec::new(),
            capture,
        }
    }

    /// Record one host invocation.
    ///
    /// A row is appended only when `now` is materially later than the last
    /// row's stamp. The favorite flag always applies to the newest row,
    /// whether or not this call appended it.
    pub fn record(
        &mut self,
        design_vector: &[f64],
        objective_vector: &[f64],
        section: i64,
        favorite: bool,
        now: DateTime<Local>,
        session_start: DateTime<Local>,
    ) -> RecordOutcome {
        let (last_value, last_time) = match self.rows.last() {
            Some(row) => (stamp_value(row.timestamp), row.timestamp),
            None => (0.0, session_start),
        };

        let appended = stamp_value(now) - last_value > DEDUPE_EPSILON;
        if appended {
            let elapsed_seconds = (now - last_time).num_milliseconds() as f64 / 1000.0;
            self.rows.push(EvaluationRow {
                design_vector: design_vector.to_vec(),
                objective_vector: objective_vector.to_vec(),
                timestamp: now,
                elapsed_seconds,
                section,
                favorite: false,
            });
        } else {
            debug!(stamp = %format_timestamp(now), "Same instant as last row, not appending");
        }

        let favorited = favorite && self.mark_favorite(design_vector);

        RecordOutcome {
            appended,
            favorited,
        }
    }

    fn mark_favorite(&mut self, design_vector: &[f64]) -> bool {
        let Some(row) = self.rows.last_mut() else {
            return false;
        };
        row.favorite = true;

        let captured = match self.capture {
            FavoriteCapture::DesignVector => design_vector.to_vec(),
            FavoriteCapture::LegacyEmpty => Vec::new(),
        };
        self.favorites.push(captured);
        true
    }

    pub fn rows(&self) -> &[EvaluationRow] {
        &self.rows
    }

    pub fn favorites(&self) -> &[Vec<f64>] {
        &self.favorites
    }

    /// Immutable copy for exporting outside the lock
    pub fn snapshot(&self) -> Vec<EvaluationRow> {
        self.rows.clone()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
