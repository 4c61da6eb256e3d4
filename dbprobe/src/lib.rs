//! Library module for dbprobe
//!
//! Exposes the CLI definition and the probe steps for testing purposes.
//! The binary entry point is in main.rs.

pub mod prompt;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use dbprobe_core::config::DEFAULT_CONFIG_FILE;
use dbprobe_core::pool::{open_pool, server_version};
use dbprobe_core::{ConnectionDescriptor, CredentialSource, ValidatedConfig, load_config};
use std::path::{Path, PathBuf};
use tracing::info;

/// CLI argument structure
#[derive(Debug, Parser)]
#[command(name = "dbprobe")]
#[command(about = "Validate database configuration and credentials, then probe the server")]
#[command(version)]
#[command(long_about = "
dbprobe - validated PostgreSQL connectivity check

Reads a JSON configuration file with the fields host, port, database and
maxConnections, prompts for a username and password, validates everything,
then connects and prints the server version.

SECURITY FEATURES:
- Configuration is validated before any prompt is shown
- Usernames are restricted to letters, digits and underscores
- Injection characters are rejected in usernames and passwords
- Passwords are read without echo and never logged

EXAMPLES:
  dbprobe
  dbprobe --config /etc/app/dbconf.json connect
  dbprobe check --json
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Configuration file path
    #[arg(
        short,
        long,
        env = "DBPROBE_CONFIG",
        default_value = DEFAULT_CONFIG_FILE,
        help = "Path to the JSON configuration file"
    )]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available CLI commands
#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Prompt for credentials, connect and print the server version (default)
    Connect,
    /// Validate the configuration file only
    Check(CheckArgs),
}

/// Arguments for the `check` subcommand
#[derive(Debug, Args, PartialEq, Eq)]
pub struct CheckArgs {
    /// Print the validated configuration as JSON
    #[arg(long, help = "Print the validated configuration as JSON")]
    pub json: bool,
}

/// Verbosity flags shared by all commands
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, help = "Suppress all log output except errors")]
    pub quiet: bool,
}

impl Cli {
    /// The command to run; `connect` when none was given.
    pub fn selected_command(&self) -> Command {
        match &self.command {
            Some(Command::Check(args)) => Command::Check(CheckArgs { json: args.json }),
            Some(Command::Connect) | None => Command::Connect,
        }
    }
}

/// Result of a successful probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    /// Safe description of the target (`user@host:port/database`)
    pub target: String,
    /// Server version reported by the diagnostic query
    pub server_version: String,
}

/// Validates the configuration file without prompting or connecting.
///
/// # Errors
/// Returns the configuration error with the file path as context.
pub fn check_config(config_path: &Path) -> anyhow::Result<ValidatedConfig> {
    let config = load_config(config_path)
        .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;
    info!("✓ Configuration is valid");
    Ok(config)
}

/// Formats the summary printed by `check`.
///
/// # Errors
/// Fails only if JSON serialization fails.
pub fn render_config(config: &ValidatedConfig, json: bool) -> anyhow::Result<String> {
    if json {
        return serde_json::to_string_pretty(config).context("Failed to serialize configuration");
    }
    Ok(format!(
        "Host: {}\nPort: {}\nDatabase: {}\nMax connections: {}",
        config.host(),
        config.port(),
        config.database(),
        config.max_connections()
    ))
}

/// Loads and validates the configuration, then reads and sanitizes credentials.
///
/// # Errors
/// Returns the first configuration, prompt or credential error.
pub fn prepare(
    config_path: &Path,
    source: &mut dyn CredentialSource,
) -> anyhow::Result<ConnectionDescriptor> {
    dbprobe_core::prepare_connection(config_path, source)
        .context("Failed to prepare database connection")
}

/// Opens the pool, runs the diagnostic query and closes the pool.
///
/// # Errors
/// Returns connection or query errors.
pub async fn probe(descriptor: ConnectionDescriptor) -> anyhow::Result<ProbeReport> {
    let target = descriptor.to_string();
    info!("Attempting connection to {}", target);

    let pool = open_pool(descriptor)
        .await
        .context("Failed to connect to the database")?;

    let version = server_version(&pool).await;
    pool.close().await;

    Ok(ProbeReport {
        target,
        server_version: version.context("Diagnostic query failed")?,
    })
}
