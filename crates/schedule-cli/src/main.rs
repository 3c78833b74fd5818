//! `schedule` CLI — place flexible tasks into a working-hour calendar.
//!
//! ## Usage
//!
//! ```sh
//! # Schedule a request (stdin → stdout)
//! cat request.json | schedule run
//!
//! # Fixed reference time and custom working hours
//! schedule run -i request.json --now 2026-03-16T08:00:00Z --config hours.toml
//!
//! # Check a previously produced outcome against its request
//! schedule verify -i request.json --outcome outcome.json
//!
//! # Show the effective configuration
//! SCHEDULE_BUFFER_MINUTES=10 schedule config
//! ```
//!
//! A request is a JSON object `{ "items": [...], "existing": [...], "now": "..." }`
//! where `existing` and `now` are optional.

mod config;

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use schedule_engine::{
    verify_outcome, ExistingInterval, SchedulableItem, Scheduler, SchedulingOutcome,
};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "schedule",
    version,
    about = "Place flexible tasks into free working-hour slots"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file (working hours, buffer, timezone)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Schedule the items of a request and print the outcome as JSON
    Run {
        /// Request file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Reference time (RFC 3339); overrides the request's `now`
        #[arg(long)]
        now: Option<String>,
    },
    /// Check an outcome against the request it was produced from
    Verify {
        /// Request file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Outcome file produced by `schedule run`
        #[arg(long)]
        outcome: String,
    },
    /// Print the effective configuration as JSON
    Config,
}

/// Input document for `run` and `verify`.
#[derive(Deserialize)]
struct Request {
    items: Vec<SchedulableItem>,
    #[serde(default)]
    existing: Vec<ExistingInterval>,
    #[serde(default)]
    now: Option<DateTime<Utc>>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let config = load_config(cli.config.as_deref())?;
    tracing::debug!(?config, "loaded configuration");

    match cli.command {
        Commands::Run { input, output, now } => {
            let request = read_request(input.as_deref())?;
            let now = match now {
                Some(raw) => parse_now(&raw)?,
                None => request.now.unwrap_or_else(Utc::now),
            };

            let scheduler = Scheduler::new(config).context("Invalid scheduler configuration")?;
            let outcome = scheduler
                .schedule_all(&request.items, &request.existing, now)
                .context("Failed to schedule request")?;

            let json = serde_json::to_string_pretty(&outcome)?;
            write_output(output.as_deref(), &json)?;
        }
        Commands::Verify { input, outcome } => {
            let request = read_request(input.as_deref())?;
            let raw = std::fs::read_to_string(&outcome)
                .with_context(|| format!("Failed to read file: {}", outcome))?;
            let outcome: SchedulingOutcome =
                serde_json::from_str(&raw).context("Failed to parse outcome JSON")?;

            let violations = verify_outcome(&outcome, &request.items, &request.existing, &config)
                .context("Invalid scheduler configuration")?;

            if violations.is_empty() {
                println!("OK: {} placement(s) verified", outcome.placements.len());
            } else {
                for violation in &violations {
                    println!("{}", violation);
                }
                eprintln!("{} violation(s) found", violations.len());
                process::exit(1);
            }
        }
        Commands::Config => {
            config.validate().context("Invalid scheduler configuration")?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<schedule_engine::SchedulerConfig> {
    if let Some(path) = path {
        anyhow::ensure!(path.is_file(), "Config file not found: {}", path.display());
    }
    config::load(path).context("Failed to load configuration")
}

fn parse_now(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Invalid --now timestamp '{}', expected RFC 3339", raw))
}

fn read_request(path: Option<&str>) -> Result<Request> {
    let raw = read_input(path)?;
    serde_json::from_str(&raw).context("Failed to parse request JSON")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
