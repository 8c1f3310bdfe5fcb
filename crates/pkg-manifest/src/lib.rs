#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: Domain error types (`PkgManifestError`)
//! - [`config`]: Generator configuration (`ManifestGeneratorConfig`, builder)
//! - [`types`]: Domain types (`OsInfo`, `PackageManager`)
//! - [`command`]: External command seam (`CommandRunner`, `SystemCommandRunner`)
//! - [`os_release`]: os-release parsing (`read_os_info`)
//! - [`detector`]: Package manager detection (`PackageManagerDetector`)
//! - [`manager`]: Per-manager enumeration backends (`ManagerBackend`, rpm/dpkg/apk)
//! - [`kernel`]: Active kernel filter (`KernelFilter`)
//! - [`generator`]: Pipeline orchestrator (`ManifestGenerator`)
//!
//! # Architecture
//!
//! ```text
//! os-release --> OsInfo
//!                  |
//! which / command -v --> PackageManager --> ManagerBackend --> Vec<OsPkgInfo>
//!                                                                   |
//!                                         uname -r --> KernelFilter
//!                                                                   |
//!                                                          PackageManifest
//! ```

pub mod command;
pub mod config;
pub mod detector;
pub mod error;
pub mod generator;
pub mod kernel;
pub mod manager;
pub mod os_release;
pub mod types;

// --- Public API Re-exports ---

// Generator (main orchestrator)
pub use generator::{HostReport, ManifestGenerator};

// Configuration
pub use config::{ManifestGeneratorConfig, ManifestGeneratorConfigBuilder};

// Error
pub use error::PkgManifestError;

// Types
pub use types::{OsInfo, PackageManager};

// Command seam
pub use command::{CommandError, CommandOutput, CommandRunner, SystemCommandRunner};

// Pipeline stages
pub use detector::PackageManagerDetector;
pub use kernel::{FilterOutcome, KernelFilter, SuppressedPackage, detect_active_kernel};
pub use manager::{ManagerBackend, backend_for, enumerate, parse_query_output};
pub use os_release::{parse_os_release, read_os_info};
