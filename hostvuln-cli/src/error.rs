//! CLI-specific error types and exit code mapping

use hostvuln_core::error::HostvulnError;
use hostvuln_pkg_manifest::PkgManifestError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// Package manifest generation failed.
    #[error("{0}")]
    Manifest(String),

    /// Logging subscriber could not be installed.
    #[error("logging error: {0}")]
    Logging(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from hostvuln-core.
    #[error("{0}")]
    Core(#[from] HostvulnError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                         |
    /// |------|---------------------------------|
    /// | 0    | Success                         |
    /// | 1    | General / command error         |
    /// | 2    | Configuration error             |
    /// | 4    | Manifest generation failed      |
    /// | 10   | IO error                        |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Manifest(_) => 4,
            Self::Io(_) => 10,
            Self::Core(HostvulnError::Config(_)) => 2,
            Self::Core(HostvulnError::Manifest(_)) => 4,
            Self::Core(HostvulnError::Io(_)) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Logging(_) => 1,
        }
    }
}

impl From<PkgManifestError> for CliError {
    fn from(e: PkgManifestError) -> Self {
        match e {
            PkgManifestError::Config { .. } => Self::Config(e.to_string()),
            other => Self::Manifest(other.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for CliError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Command(format!("background task failed: {e}"))
    }
}
