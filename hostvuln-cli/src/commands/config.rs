//! `hostvuln config` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use hostvuln_core::config::HostvulnConfig;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

const SECTIONS: &[&str] = &["general", "telemetry", "manifest"];

/// Execute the `config` command.
pub async fn execute(
    args: ConfigArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(config_path, writer).await,
        ConfigAction::Show { section } => execute_show(config_path, section, writer).await,
    }
}

/// Load and validate the configuration file, reporting any errors.
///
/// Unlike the other commands, a missing file counts as invalid here.
///
/// # Errors
///
/// Returns `CliError::Config` if the file is missing, malformed, or fails validation.
async fn execute_validate(config_path: &Path, writer: &OutputWriter) -> Result<(), CliError> {
    info!(path = %config_path.display(), "validating configuration");

    let report = validation_report(config_path, HostvulnConfig::load(config_path).await);
    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }

    Ok(())
}

fn validation_report<T, E: std::fmt::Display>(
    config_path: &Path,
    result: Result<T, E>,
) -> ConfigValidationReport {
    let source = config_path.display().to_string();
    match result {
        Ok(_) => ConfigValidationReport {
            source,
            valid: true,
            errors: Vec::new(),
        },
        Err(e) => ConfigValidationReport {
            source,
            valid: false,
            errors: vec![e.to_string()],
        },
    }
}

/// Display the effective configuration (file + env overrides + defaults).
///
/// # Errors
///
/// Returns `CliError::Core` if loading fails or `CliError::Command` if the section name is unknown.
async fn execute_show(
    config_path: &Path,
    section: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(path = %config_path.display(), "loading configuration");

    let config = HostvulnConfig::load_or_default(config_path).await?;
    let report = build_config_report(&config, config_path, section)?;
    writer.render(&report)?;

    Ok(())
}

fn build_config_report(
    config: &HostvulnConfig,
    config_path: &Path,
    section: Option<String>,
) -> Result<ConfigReport, CliError> {
    let config_toml = match section.as_deref() {
        None => toml::to_string_pretty(config),
        Some("general") => toml::to_string_pretty(&config.general),
        Some("telemetry") => toml::to_string_pretty(&config.telemetry),
        Some("manifest") => toml::to_string_pretty(&config.manifest),
        Some(other) => {
            return Err(CliError::Command(format!(
                "unknown section: {} (expected: {})",
                other,
                SECTIONS.join(", ")
            )));
        }
    }
    .unwrap_or_else(|e| format!("(serialization error: {})", e));

    Ok(ConfigReport {
        source: config_path.display().to_string(),
        section,
        config_toml,
    })
}

/// Configuration display report.
///
/// The `config_toml` field is only used for text rendering.
#[derive(Serialize)]
pub struct ConfigReport {
    /// Configuration file path
    pub source: String,
    /// Optional section name (None = full config)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip)]
    pub config_toml: String,
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        match &self.section {
            Some(section) => {
                let section_label = format!("[{}]", section);
                writeln!(
                    w,
                    "Configuration {} (source: {})",
                    section_label.bold(),
                    self.source
                )?;
            }
            None => writeln!(w, "Configuration (source: {})", self.source.bold())?,
        }

        writeln!(w)?;
        write!(w, "{}", self.config_toml)?;

        Ok(())
    }
}

/// Configuration validation report.
#[derive(Serialize)]
pub struct ConfigValidationReport {
    pub source: String,
    pub valid: bool,
    /// Validation error messages (empty if valid)
    pub errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Config Validation: {}", self.source.bold())?;

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }

        Ok(())
    }
}
