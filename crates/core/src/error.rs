//! 에러 타입 -- 도메인별 에러 정의

/// hostvuln 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum HostvulnError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 패키지 매니페스트 생성 에러
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 패키지 매니페스트 생성 에러
///
/// `hostvuln-pkg-manifest`의 세부 에러가 이 타입으로 변환되어 전파됩니다.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// 지원하지 않는 플랫폼 (OS release 파일 없음)
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// 패키지 매니저 탐지 실패
    #[error("package manager detection failed: {0}")]
    Detection(String),

    /// 패키지 조회 실패
    #[error("package query failed: {0}")]
    QueryFailed(String),

    /// 내부 에러 (탐지/조회 불일치 등)
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_to_top_level() {
        let err: HostvulnError = ConfigError::FileNotFound {
            path: "hostvuln.toml".to_owned(),
        }
        .into();
        assert!(matches!(err, HostvulnError::Config(_)));
        assert!(err.to_string().contains("hostvuln.toml"));
    }

    #[test]
    fn manifest_error_display() {
        let err: HostvulnError = ManifestError::Detection("no dpkg-query".to_owned()).into();
        let msg = err.to_string();
        assert!(msg.contains("manifest error"));
        assert!(msg.contains("no dpkg-query"));
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: HostvulnError = io_err.into();
        assert!(matches!(err, HostvulnError::Io(_)));
    }
}
