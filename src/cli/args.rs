//! Command-line argument parsing for designlogger
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// designlogger - record timed design exploration sessions to CSV
#[derive(Parser, Debug)]
#[command(name = "designlogger")]
#[command(version)]
#[command(about = "Record timed design exploration sessions to CSV", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (warnings), -v (info), -vv (debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Feed a JSON-lines file of host invocations to the logger
    Replay {
        /// One `ComponentInputs` JSON object per line
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Confirm the session start without asking
        #[arg(short, long)]
        yes: bool,

        /// Delay between invocations, in milliseconds
        #[arg(long, default_value_t = 0)]
        interval_ms: u64,
    },

    /// Summarize an exported CSV log
    Inspect {
        #[arg(value_name = "CSV")]
        file: PathBuf,
    },

    /// Display current configuration
    Config,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }
}

impl Verbosity {
    /// Default tracing filter directive for this level
    pub fn filter_directive(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "info",
            Verbosity::VeryVerbose => "debug",
        }
    }

    /// Print favorites after every replayed invocation
    pub fn show_favorites(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }
}
