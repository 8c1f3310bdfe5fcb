//! `hostvuln manifest` command handler

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use hostvuln_core::config::HostvulnConfig;
use hostvuln_core::telemetry::{NoopSink, TelemetrySink, TracingSink};
use hostvuln_core::types::PackageManifest;
use hostvuln_pkg_manifest::{HostReport, ManifestGenerator, ManifestGeneratorConfig};

use crate::cli::{ManifestAction, ManifestArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `manifest` command.
pub async fn execute(
    args: ManifestArgs,
    config: HostvulnConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ManifestAction::Generate {
            os_release,
            no_kernel_filter,
        } => {
            let generator_config = generator_config(&config, os_release, no_kernel_filter);
            execute_generate(generator_config, telemetry_sink(&config), writer).await
        }
        ManifestAction::Detect { os_release } => {
            let generator_config = generator_config(&config, os_release, false);
            execute_detect(generator_config, writer).await
        }
    }
}

/// Merge the `[manifest]` section with command-line overrides.
fn generator_config(
    config: &HostvulnConfig,
    os_release: Option<PathBuf>,
    no_kernel_filter: bool,
) -> ManifestGeneratorConfig {
    let mut generator_config = ManifestGeneratorConfig::from_core(&config.manifest);
    if let Some(path) = os_release {
        generator_config.os_release_path = path;
    }
    if no_kernel_filter {
        generator_config.filter_inactive_kernels = false;
    }
    generator_config
}

fn telemetry_sink(config: &HostvulnConfig) -> Arc<dyn TelemetrySink> {
    if config.telemetry.enabled {
        Arc::new(TracingSink)
    } else {
        Arc::new(NoopSink)
    }
}

/// Run the manifest pipeline and render the resulting manifest.
///
/// The pipeline shells out to the package manager, so it runs on the blocking pool.
///
/// # Errors
///
/// Returns `CliError::Config` for an invalid generator configuration and
/// `CliError::Manifest` for any pipeline failure.
async fn execute_generate(
    generator_config: ManifestGeneratorConfig,
    sink: Arc<dyn TelemetrySink>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(
        os_release = %generator_config.os_release_path.display(),
        filter_inactive_kernels = generator_config.filter_inactive_kernels,
        "generating package manifest"
    );

    let generator = ManifestGenerator::system(generator_config)?.with_telemetry(sink);
    let manifest = tokio::task::spawn_blocking(move || generator.generate()).await??;

    writer.render(&ManifestReport(manifest))?;
    Ok(())
}

async fn execute_detect(
    generator_config: ManifestGeneratorConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let generator = ManifestGenerator::system(generator_config)?;
    let host = tokio::task::spawn_blocking(move || generator.detect()).await??;

    writer.render(&DetectReport(host))?;
    Ok(())
}

/// Package manifest output.
///
/// JSON output is the API payload itself (`{"osPkgInfoList": [...]}`).
#[derive(Serialize)]
#[serde(transparent)]
pub struct ManifestReport(pub PackageManifest);

impl Render for ManifestReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let manifest = &self.0;
        if let Some(first) = manifest.os_pkg_info_list.first() {
            writeln!(
                w,
                "Package Manifest: {} {}",
                first.os.bold(),
                first.os_ver.bold()
            )?;
        } else {
            writeln!(w, "Package Manifest")?;
        }
        writeln!(w, "  Packages: {}", manifest.len())?;
        writeln!(w)?;

        if manifest.is_empty() {
            writeln!(w, "  (no packages)")?;
            return Ok(());
        }

        let width = manifest
            .os_pkg_info_list
            .iter()
            .map(|p| p.pkg.len())
            .max()
            .unwrap_or(0)
            .max("PACKAGE".len());

        writeln!(w, "  {:<width$}  {}", "PACKAGE".bold(), "VERSION".bold())?;
        for pkg in &manifest.os_pkg_info_list {
            writeln!(w, "  {:<width$}  {}", pkg.pkg, pkg.pkg_ver)?;
        }

        Ok(())
    }
}

/// Host detection output.
#[derive(Serialize)]
#[serde(transparent)]
pub struct DetectReport(pub HostReport);

impl Render for DetectReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let host = &self.0;
        writeln!(w, "Host Detection")?;
        writeln!(w, "  OS:              {}", host.os.to_string().bold())?;
        writeln!(
            w,
            "  Package manager: {}",
            host.package_manager.to_string().bold()
        )?;
        match &host.active_kernel {
            Some(kernel) => writeln!(w, "  Active kernel:   {}", kernel)?,
            None => writeln!(w, "  Active kernel:   {}", "unknown".yellow())?,
        }

        Ok(())
    }
}
