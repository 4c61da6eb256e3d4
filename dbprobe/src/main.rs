//! PostgreSQL connectivity probe.
//!
//! This binary validates a JSON configuration file and operator-supplied
//! credentials, then connects and runs one diagnostic query.
//!
//! # Security Guarantees
//! - Nothing is prompted for until the configuration is valid
//! - No connection is attempted until the credentials are sanitized
//! - Passwords are never echoed, logged or printed

use clap::Parser;
use dbprobe::prompt::PromptCredentialSource;
use dbprobe::{Cli, Command, check_config, prepare, probe, render_config};
use dbprobe_core::init_logging;
use std::process::ExitCode;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.global.verbose, cli.global.quiet) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    match cli.selected_command() {
        Command::Check(args) => {
            let config = check_config(&cli.config)?;
            println!("{}", render_config(&config, args.json)?);
            Ok(())
        }
        Command::Connect => {
            let mut source = PromptCredentialSource::terminal();
            let descriptor = prepare(&cli.config, &mut source)?;

            let report = probe(descriptor).await?;
            println!("Connected to {}", report.target);
            println!("Server version: {}", report.server_version);
            Ok(())
        }
    }
}
