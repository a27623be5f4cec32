//! CLI module for designlogger
//!
//! Argument parsing plus the replay and inspect drivers used by the binary.

pub mod args;
pub mod replay;

pub use args::{Args, Commands, Verbosity};
pub use replay::{inspect_csv, parse_invocations, CsvSummary};
