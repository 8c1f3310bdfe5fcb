//! 매니페스트 생성기 설정
//!
//! [`ManifestGeneratorConfig`]는 core의 [`ManifestConfig`](hostvuln_core::config::ManifestConfig)를
//! 타입이 있는 값(`PathBuf`, [`PackageManager`])으로 변환한 설정입니다.
//!
//! # 사용 예시
//!
//! ```
//! use hostvuln_pkg_manifest::{ManifestGeneratorConfigBuilder, PackageManager};
//!
//! let config = ManifestGeneratorConfigBuilder::new()
//!     .os_release_path("/etc/os-release")
//!     .package_managers(vec![PackageManager::Rpm])
//!     .filter_inactive_kernels(false)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.package_managers, vec![PackageManager::Rpm]);
//! ```

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PkgManifestError;
use crate::types::PackageManager;

/// 경로 최대 길이
const MAX_PATH_LEN: usize = 4096;

/// 매니페스트 생성기 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestGeneratorConfig {
    /// OS release 파일 경로
    pub os_release_path: PathBuf,
    /// 탐지 순서 (앞쪽이 우선)
    pub package_managers: Vec<PackageManager>,
    /// 비활성 커널 패키지 제거 여부
    pub filter_inactive_kernels: bool,
}

impl Default for ManifestGeneratorConfig {
    fn default() -> Self {
        Self {
            os_release_path: PathBuf::from("/etc/os-release"),
            package_managers: PackageManager::DEFAULT_ORDER.to_vec(),
            filter_inactive_kernels: true,
        }
    }
}

impl ManifestGeneratorConfig {
    /// core의 `ManifestConfig`에서 생성기 설정을 만듭니다.
    pub fn from_core(core: &hostvuln_core::config::ManifestConfig) -> Self {
        Self {
            os_release_path: PathBuf::from(&core.os_release_path),
            package_managers: core
                .package_managers
                .iter()
                .map(|name| PackageManager::from_str_loose(name))
                .collect(),
            filter_inactive_kernels: core.filter_inactive_kernels,
        }
    }

    /// 설정 값의 유효성을 검증합니다.
    ///
    /// # 검증 규칙
    ///
    /// - `package_managers`: 하나 이상, 빈 이름 불가
    /// - `os_release_path`: 비어있지 않고 `..` 컴포넌트 없음, 4096자 이하
    pub fn validate(&self) -> Result<(), PkgManifestError> {
        if self.package_managers.is_empty() {
            return Err(PkgManifestError::Config {
                field: "package_managers".to_owned(),
                reason: "at least one package manager is required".to_owned(),
            });
        }

        if self
            .package_managers
            .iter()
            .any(|pm| pm.command_name().trim().is_empty())
        {
            return Err(PkgManifestError::Config {
                field: "package_managers".to_owned(),
                reason: "package manager name must not be empty".to_owned(),
            });
        }

        validate_path(&self.os_release_path)
    }
}

fn validate_path(path: &Path) -> Result<(), PkgManifestError> {
    if path.as_os_str().is_empty() {
        return Err(PkgManifestError::Config {
            field: "os_release_path".to_owned(),
            reason: "must not be empty".to_owned(),
        });
    }

    if path.components().any(|c| c == Component::ParentDir) {
        return Err(PkgManifestError::Config {
            field: "os_release_path".to_owned(),
            reason: format!("'{}' contains path traversal pattern '..'", path.display()),
        });
    }

    if path.as_os_str().len() > MAX_PATH_LEN {
        return Err(PkgManifestError::Config {
            field: "os_release_path".to_owned(),
            reason: format!("exceeds maximum length {MAX_PATH_LEN}"),
        });
    }

    Ok(())
}

/// [`ManifestGeneratorConfig`] 빌더
#[derive(Default)]
pub struct ManifestGeneratorConfigBuilder {
    config: ManifestGeneratorConfig,
}

impl ManifestGeneratorConfigBuilder {
    /// 기본값을 가진 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// OS release 파일 경로를 설정합니다.
    pub fn os_release_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.os_release_path = path.into();
        self
    }

    /// 탐지할 패키지 매니저 목록을 설정합니다.
    pub fn package_managers(mut self, managers: Vec<PackageManager>) -> Self {
        self.config.package_managers = managers;
        self
    }

    /// 비활성 커널 필터 여부를 설정합니다.
    pub fn filter_inactive_kernels(mut self, enabled: bool) -> Self {
        self.config.filter_inactive_kernels = enabled;
        self
    }

    /// 설정을 검증하고 빌드합니다.
    ///
    /// # Errors
    ///
    /// 유효성 검증 실패 시 `PkgManifestError::Config` 반환
    pub fn build(self) -> Result<ManifestGeneratorConfig, PkgManifestError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
