pub mod recorder;

pub use recorder::{
    format_timestamp, EvaluationRow, RecordOutcome, RecordingLog, DEDUPE_EPSILON,
    TIMESTAMP_FORMAT,
};
