//! 설정 관리 -- hostvuln.toml 파싱 및 런타임 설정
//!
//! [`HostvulnConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`HOSTVULN_MANIFEST_PACKAGE_MANAGERS=rpm,dpkg-query` 형식)
//! 3. 설정 파일 (`hostvuln.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), hostvuln_core::error::HostvulnError> {
//! use hostvuln_core::config::HostvulnConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = HostvulnConfig::load("hostvuln.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = HostvulnConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ConfigError, HostvulnError};

/// 경로 길이 상한
const MAX_PATH_LEN: usize = 4096;

/// hostvuln 통합 설정
///
/// `hostvuln.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostvulnConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 텔레메트리 설정
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    /// 패키지 매니페스트 설정
    #[serde(default)]
    pub manifest: ManifestConfig,
}

impl HostvulnConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, HostvulnError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 설정 파일이 없으면 기본값을 사용하여 로드합니다.
    ///
    /// 파일이 존재하지만 파싱/검증에 실패하면 에러를 반환합니다.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, HostvulnError> {
        let path = path.as_ref();
        let mut config = match Self::from_file(path).await {
            Ok(config) => config,
            Err(HostvulnError::Config(ConfigError::FileNotFound { .. })) => {
                debug!(path = %path.display(), "config file not found, using defaults");
                Self::default()
            }
            Err(e) => return Err(e),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, HostvulnError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                HostvulnError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                HostvulnError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, HostvulnError> {
        toml::from_str(toml_str).map_err(|e| {
            HostvulnError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `HOSTVULN_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "HOSTVULN_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "HOSTVULN_GENERAL_LOG_FORMAT");

        // Telemetry
        override_bool(&mut self.telemetry.enabled, "HOSTVULN_TELEMETRY_ENABLED");

        // Manifest
        override_string(
            &mut self.manifest.os_release_path,
            "HOSTVULN_MANIFEST_OS_RELEASE_PATH",
        );
        override_csv(
            &mut self.manifest.package_managers,
            "HOSTVULN_MANIFEST_PACKAGE_MANAGERS",
        );
        override_bool(
            &mut self.manifest.filter_inactive_kernels,
            "HOSTVULN_MANIFEST_FILTER_INACTIVE_KERNELS",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), HostvulnError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.manifest.package_managers.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "manifest.package_managers".to_owned(),
                reason: "at least one package manager is required".to_owned(),
            }
            .into());
        }

        if self
            .manifest
            .package_managers
            .iter()
            .any(|m| m.trim().is_empty())
        {
            return Err(ConfigError::InvalidValue {
                field: "manifest.package_managers".to_owned(),
                reason: "package manager name must not be empty".to_owned(),
            }
            .into());
        }

        let release_path = &self.manifest.os_release_path;
        if release_path.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "manifest.os_release_path".to_owned(),
                reason: "os_release_path must not be empty".to_owned(),
            }
            .into());
        }

        if Path::new(release_path)
            .components()
            .any(|c| c == std::path::Component::ParentDir)
        {
            return Err(ConfigError::InvalidValue {
                field: "manifest.os_release_path".to_owned(),
                reason: "os_release_path contains path traversal pattern '..'".to_owned(),
            }
            .into());
        }

        if release_path.len() > MAX_PATH_LEN {
            return Err(ConfigError::InvalidValue {
                field: "manifest.os_release_path".to_owned(),
                reason: format!("os_release_path exceeds maximum length {MAX_PATH_LEN}"),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 텔레메트리 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// 기능 사용 이벤트 전송 여부
    pub enabled: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// 패키지 매니페스트 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// OS release 파일 경로
    pub os_release_path: String,
    /// 탐지 순서대로 나열한 패키지 매니저 목록
    pub package_managers: Vec<String>,
    /// 비활성 커널 패키지 제거 여부
    pub filter_inactive_kernels: bool,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            os_release_path: "/etc/os-release".to_owned(),
            package_managers: vec!["dpkg-query".to_owned(), "rpm".to_owned()],
            filter_inactive_kernels: true,
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
    }
}
