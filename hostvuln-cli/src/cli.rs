//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// hostvuln -- host package manifests for vulnerability assessment.
///
/// Use `hostvuln <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "hostvuln", version, about, long_about = None)]
pub struct Cli {
    /// Path to the hostvuln.toml configuration file (optional; defaults apply if missing).
    #[arg(short, long, global = true, default_value = "hostvuln.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error). Takes precedence over RUST_LOG.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate or inspect the host package manifest.
    Manifest(ManifestArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- manifest ----

/// Host package manifest operations.
#[derive(Args, Debug)]
pub struct ManifestArgs {
    #[command(subcommand)]
    pub action: ManifestAction,
}

#[derive(Subcommand, Debug)]
pub enum ManifestAction {
    /// Enumerate installed packages and print the manifest.
    Generate {
        /// Override the os-release file location.
        #[arg(long)]
        os_release: Option<PathBuf>,

        /// Keep installed-but-inactive kernel packages in the manifest.
        #[arg(long)]
        no_kernel_filter: bool,
    },
    /// Show the detected OS, package manager and active kernel.
    Detect {
        /// Override the os-release file location.
        #[arg(long)]
        os_release: Option<PathBuf>,
    },
}

// ---- config ----

/// Manage hostvuln configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, telemetry, manifest).
        #[arg(long)]
        section: Option<String>,
    },
}
