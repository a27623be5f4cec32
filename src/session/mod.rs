//! Session recording: lifecycle, evaluation log and file output
//!
//! Components:
//! - State / Controller: Idle → Recording → Ended gating
//! - Recording: append-only rows and favorites
//! - Persistence: CSV export (autosave and final)
//! - Events: manual time-of-day change log

pub mod controller;
pub mod events;
pub mod persistence;
pub mod recording;
pub mod state;

// Re-export key types
pub use controller::{Session, SessionController};
pub use events::{TimeChangeLog, TimeOfDay};
pub use recording::{EvaluationRow, RecordOutcome, RecordingLog};
pub use state::{SessionEvent, SessionState};
