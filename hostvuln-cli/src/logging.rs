//! Logging initialization for the hostvuln CLI.
//!
//! Configures `tracing-subscriber` based on the `[general]` section
//! of `HostvulnConfig`. Logs are written to stderr so that stdout
//! only carries rendered command output.
//!
//! Level precedence: `--log-level` > `RUST_LOG` > `general.log_level`.

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use hostvuln_core::config::GeneralConfig;

/// Build the level filter from the CLI override, `RUST_LOG`, or the config file.
pub fn build_filter(config: &GeneralConfig, level_override: Option<&str>) -> Result<EnvFilter> {
    match level_override {
        Some(level) => EnvFilter::try_new(level)
            .map_err(|e| anyhow::anyhow!("invalid --log-level '{}': {}", level, e)),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.log_level))),
    }
}

/// Initialize the global tracing subscriber.
///
/// Must be called exactly once, before any tracing macros are used.
///
/// # Formats
///
/// * `"json"` - Machine-parseable JSON lines
/// * `"pretty"` - Human-readable output
pub fn init_tracing(config: &GeneralConfig, level_override: Option<&str>) -> Result<()> {
    let env_filter = build_filter(config, level_override)?;

    match config.log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .map_err(|e| {
                    anyhow::anyhow!("failed to initialize JSON tracing subscriber: {}", e)
                })?;
        }
        "pretty" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .map_err(|e| {
                    anyhow::anyhow!("failed to initialize pretty tracing subscriber: {}", e)
                })?;
        }
        _ => {
            return Err(anyhow::anyhow!(
                "unknown log format '{}', expected 'json' or 'pretty'",
                config.log_format
            ));
        }
    }

    Ok(())
}
