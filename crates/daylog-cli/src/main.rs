//! daylog CLI
//!
//! Thin wrapper around daylog-core for appending records from scripts.
//!
//! ## Usage
//!
//! ```bash
//! # Append a line to <path><yyyy_MM_dd>_app.txt
//! daylog --path ./logs/ --file app.txt log string "deploy finished"
//!
//! # Append key/value pairs
//! daylog --path ./logs/ log string-map user=ada action=login
//!
//! # Append a JSON document (null fields are dropped)
//! daylog --path ./logs/ log json '{"service":"api","version":7}'
//!
//! # Print a record to stdout without writing it
//! daylog echo string "just looking"
//!
//! # Show today's log file
//! daylog --path ./logs/ --file app.txt path
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use daylog_core::config::{ACTIVE, CONSOLE, PATH};
use daylog_core::{Channel, ChannelKind, Convert, Kind, LogConfig, Registry};

/// daylog - typed records in day-stamped files
#[derive(Debug, Parser)]
#[command(name = "daylog")]
#[command(version = "0.1.0")]
#[command(about = "Append typed records to day-stamped log files")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Properties file with `path`, `active` and `console` keys
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Base path prefix for log files (default: next to the executable)
    #[arg(short, long, global = true)]
    path: Option<String>,

    /// File name written after the date stamp
    #[arg(short, long, global = true)]
    file: Option<String>,

    /// Echo records to stdout
    #[arg(long, global = true)]
    console: bool,

    /// Turn every channel into a no-op
    #[arg(long, global = true)]
    inactive: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Append a record to today's file
    Log {
        /// Channel to write through (string, string-map, json)
        channel: ChannelKind,

        /// Record payload (words are joined with spaces; string-map takes key=value)
        #[arg(required = true, num_args = 1..)]
        payload: Vec<String>,
    },

    /// Print a record to stdout without writing it
    Echo {
        /// Channel to format with (string, string-map, json)
        channel: ChannelKind,

        /// Record payload
        #[arg(required = true, num_args = 1..)]
        payload: Vec<String>,
    },

    /// Print today's log file path
    Path,
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Merge the optional properties file with command-line overrides.
fn build_config(cli: &Cli) -> Result<LogConfig> {
    let config = match &cli.config {
        Some(path) => LogConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => LogConfig::new(),
    };

    if let Some(path) = &cli.path {
        config.set(PATH, path.as_str());
    }
    if cli.inactive {
        config.set(ACTIVE, "false");
    } else if !config.contains(ACTIVE) {
        config.set(ACTIVE, "true");
    }
    if cli.console {
        config.set(CONSOLE, "true");
    }

    Ok(config)
}

/// Parse `key=value` words, keeping their order
fn parse_pairs(words: &[String]) -> Result<Vec<(String, String)>> {
    words
        .iter()
        .map(|word| {
            let (key, value) = word
                .split_once('=')
                .ok_or_else(|| anyhow::anyhow!("Invalid pair '{}'. Expected key=value", word))?;
            Ok((key.to_string(), value.to_string()))
        })
        .collect()
}

/// Parse the payload words as one JSON document
fn parse_json(words: &[String]) -> Result<serde_json::Value> {
    let text = words.join(" ");
    serde_json::from_str(&text).with_context(|| format!("Invalid JSON payload '{}'", text))
}

fn emit<K, T>(channel: Channel<K>, item: &T, echo_only: bool)
where
    K: Kind + Convert<T>,
    T: ?Sized,
{
    if echo_only {
        channel.console_with(item);
    } else {
        channel.log(item).console();
    }
}

fn write_record(
    registry: &Registry,
    channel: ChannelKind,
    payload: &[String],
    echo_only: bool,
) -> Result<()> {
    match channel {
        ChannelKind::String => emit(registry.string(), &payload.join(" "), echo_only),
        ChannelKind::StringMap => emit(registry.string_map(), &parse_pairs(payload)?, echo_only),
        ChannelKind::Json => emit(registry.json(), &parse_json(payload)?, echo_only),
        ChannelKind::Stacktrace | ChannelKind::Empty => {
            anyhow::bail!("Channel '{}' cannot be written from the command line", channel)
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let config = build_config(&cli)?;
    let registry = match &cli.file {
        Some(file) => Registry::with_file_name(config, file.as_str()),
        None => Registry::new(config),
    };
    tracing::info!(
        active = registry.is_active(),
        file = ?registry.file_name(),
        "Logger ready"
    );

    match &cli.command {
        Commands::Log { channel, payload } => {
            write_record(&registry, *channel, payload, false)?;
        }

        Commands::Echo { channel, payload } => {
            registry.config().set(CONSOLE, "true");
            write_record(&registry, *channel, payload, true)?;
        }

        Commands::Path => {
            println!("{}", registry.empty().resolved_path().display());
        }
    }

    Ok(())
}
