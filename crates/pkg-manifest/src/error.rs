//! 패키지 매니페스트 에러 타입
//!
//! [`PkgManifestError`]는 매니페스트 생성 파이프라인에서 발생하는 치명적 에러를 나타냅니다.
//! `From<PkgManifestError> for HostvulnError` 구현을 통해 `?` 연산자로
//! 상위 에러 타입으로 전파됩니다.
//!
//! 잘못된 형식의 패키지 라인과 활성 커널 탐지 실패는 에러가 아니며,
//! 경고 로그만 남기고 계속 진행합니다.

use hostvuln_core::error::{HostvulnError, ManifestError};

use crate::command::CommandError;

/// OS release 파일을 열 수 없을 때 사용자에게 보여줄 안내 메시지
pub const UNSUPPORTED_PLATFORM_HELP: &str = "unsupported platform

Host package manifests can only be generated on Linux hosts that provide an
os-release file (see os-release(5)). Point `manifest.os_release_path` at the
file if it lives in a non-standard location.";

/// 패키지 매니페스트 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum PkgManifestError {
    /// OS release 파일을 열 수 없음
    #[error("{message}")]
    UnsupportedPlatform {
        /// 사용자 안내 메시지
        message: String,
        /// 시도한 파일 경로
        path: String,
        /// 원본 I/O 에러
        #[source]
        source: std::io::Error,
    },

    /// 지원되는 패키지 매니저를 찾지 못함
    #[error(
        "unable to find supported package managers. Supported package managers are {}.",
        .attempted.join(", ")
    )]
    NoPackageManagerFound {
        /// 탐지 시도한 패키지 매니저 목록 (순서 유지)
        attempted: Vec<String>,
    },

    /// 인식되지만 의도적으로 구현하지 않은 패키지 매니저
    #[error("{manager} not yet supported")]
    NotYetSupported {
        /// 패키지 매니저 이름
        manager: String,
    },

    /// 패키지 목록 조회 명령 실패
    #[error("unable to query packages from package manager {manager}: {source}")]
    PackageQueryFailed {
        /// 패키지 매니저 이름
        manager: String,
        /// 명령 실행 에러
        #[source]
        source: CommandError,
    },

    /// 탐지 결과를 조회 단계가 처리하지 못함 (코드 결함)
    #[error("internal error: package manager '{manager}' has no enumeration backend")]
    Internal {
        /// 처리하지 못한 패키지 매니저 이름
        manager: String,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },
}

impl From<PkgManifestError> for HostvulnError {
    fn from(err: PkgManifestError) -> Self {
        let manifest_err = match err {
            PkgManifestError::UnsupportedPlatform { path, .. } => {
                ManifestError::UnsupportedPlatform(format!("cannot open {path}"))
            }
            e @ PkgManifestError::NoPackageManagerFound { .. } => {
                ManifestError::Detection(e.to_string())
            }
            e @ PkgManifestError::NotYetSupported { .. } => ManifestError::Detection(e.to_string()),
            e @ PkgManifestError::PackageQueryFailed { .. } => {
                ManifestError::QueryFailed(e.to_string())
            }
            e @ PkgManifestError::Internal { .. } => ManifestError::Internal(e.to_string()),
            PkgManifestError::Config { field, reason } => {
                return HostvulnError::Config(hostvuln_core::error::ConfigError::InvalidValue {
                    field,
                    reason,
                });
            }
        };
        HostvulnError::Manifest(manifest_err)
    }
}
