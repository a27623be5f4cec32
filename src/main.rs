//! designlogger - CLI entry point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use designlogger::{
    cli::{inspect_csv, parse_invocations, Args, Commands, Verbosity},
    config::LoggerConfig,
    prompt::{AutoPrompt, ConsolePrompt, UserPrompt},
    session::SessionState,
    DesignLogger,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbosity());

    let config = match &args.config {
        Some(path) => LoggerConfig::load_from(path)?,
        None => LoggerConfig::load()?,
    };

    match &args.command {
        Commands::Replay {
            file,
            yes,
            interval_ms,
        } => replay(config, file, *yes, *interval_ms, args.verbosity()).await,
        Commands::Inspect { file } => inspect(&config, file),
        Commands::Config => show_config(&config, args.config.clone()),
    }
}

fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.filter_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn replay(
    config: LoggerConfig,
    file: &Path,
    yes: bool,
    interval_ms: u64,
    verbosity: Verbosity,
) -> Result<()> {
    let script = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let invocations = parse_invocations(&script)?;

    let prompt: Arc<dyn UserPrompt> = if yes {
        Arc::new(AutoPrompt)
    } else {
        Arc::new(ConsolePrompt)
    };
    let logger = DesignLogger::with_system_clock(config, prompt, Handle::current());

    for (idx, inputs) in invocations.iter().enumerate() {
        let favorites = logger.solve(inputs)?;
        if verbosity.show_favorites() {
            println!(
                "{} {} favorites: {}",
                format!("[{}]", idx + 1).dimmed(),
                format!("{:?}", logger.state()).cyan(),
                serde_json::to_string(&favorites)?
            );
        }
        if interval_ms > 0 {
            tokio::time::sleep(Duration::from_millis(interval_ms)).await;
        }
    }

    if logger.state() == SessionState::Recording {
        if let Some(path) = logger.end()? {
            println!("{} {}", "Final log:".green().bold(), path.display());
        }
    }

    Ok(())
}

fn inspect(config: &LoggerConfig, file: &Path) -> Result<()> {
    let summary = inspect_csv(file, config.export.layout)?;

    println!("{} {}", "Log:".bold(), file.display());
    println!("  Rows:      {}", summary.rows);
    println!("  Favorites: {}", summary.favorites);

    let min = summary.fields_per_row.iter().min();
    let max = summary.fields_per_row.iter().max();
    if let (Some(min), Some(max)) = (min, max) {
        if min == max {
            println!("  Fields:    {}", min);
        } else {
            println!("  Fields:    {}..{} {}", min, max, "(varies)".yellow());
        }
    }

    Ok(())
}

fn show_config(config: &LoggerConfig, path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => LoggerConfig::config_path()?,
    };
    println!("{} {}", "Config:".bold(), path.display());
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
