#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod metrics;
pub mod telemetry;
pub mod types;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ConfigError, HostvulnError, ManifestError};

// 설정
pub use config::HostvulnConfig;

// 텔레메트리
pub use telemetry::{NoopSink, TelemetryEvent, TelemetrySink, TracingSink};

// 도메인 타입
pub use types::{OsPkgInfo, PackageManifest};
