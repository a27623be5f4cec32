//! designlogger - design exploration session logger
//!
//! Records the design and objective vectors a host reports during a timed
//! session and writes them to CSV, periodically and on completion.
//!
//! # Architecture
//!
//! - **session**: state machine, recording log, CSV export
//! - **component**: host-facing entry point and timer wiring
//! - **prompt** / **clock**: injected side effects

pub mod errors;
pub use errors::{LoggerError, Result};

pub mod clock;
pub mod config;
pub mod prompt;
pub mod session;
pub mod timers;

pub mod component;
pub use component::{ComponentInputs, DesignLogger, FavoritesTree};

pub mod cli;
