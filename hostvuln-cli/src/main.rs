//! hostvuln CLI entry point.
//!
//! Parses arguments, loads the configuration, installs the tracing
//! subscriber and dispatches to a command handler. Errors are printed
//! to stderr and mapped to the process exit code.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;
use colored::Colorize;

use hostvuln_core::config::HostvulnConfig;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            e.exit_code()
        }
    };

    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<(), CliError> {
    hostvuln_core::metrics::describe_all();

    // Logging comes up on defaults even for a broken config file; the load
    // error surfaces at dispatch.
    let loaded = HostvulnConfig::load_or_default(&cli.config).await;
    let general = loaded
        .as_ref()
        .map(|c| c.general.clone())
        .unwrap_or_default();
    logging::init_tracing(&general, cli.log_level.as_deref())
        .map_err(|e| CliError::Logging(e.to_string()))?;

    let writer = OutputWriter::new(cli.output);

    match cli.command {
        Commands::Manifest(args) => commands::manifest::execute(args, loaded?, &writer).await,
        Commands::Config(args) => commands::config::execute(args, &cli.config, &writer).await,
    }
}
