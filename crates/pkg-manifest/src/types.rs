//! 도메인 타입 -- 매니페스트 생성 파이프라인 전용
//!
//! OS release 정보와 패키지 매니저 식별자를 정의합니다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// OS release 파일에서 읽은 OS 정보
///
/// 키가 없으면 빈 문자열로 남습니다 (에러 아님).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsInfo {
    /// OS 식별자 (`ID`, 예: "ubuntu")
    pub name: String,
    /// OS 버전 (`VERSION_ID`, 예: "22.04")
    pub version: String,
}

impl fmt::Display for OsInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name.is_empty(), self.version.is_empty()) {
            (true, _) => write!(f, "unknown"),
            (false, true) => write!(f, "{}", self.name),
            (false, false) => write!(f, "{} {}", self.name, self.version),
        }
    }
}

/// 패키지 매니저 식별자
///
/// `dpkg-query`와 `rpm`만 완전히 지원됩니다. `apk`는 조회만 지원하고
/// (커널 필터 없음), `yum`은 인식하지만 거부합니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PackageManager {
    /// Debian 계열 (`dpkg-query`)
    DpkgQuery,
    /// Red Hat 계열 (`rpm`)
    Rpm,
    /// Alpine (`apk`)
    Apk,
    /// 인식되지만 미지원
    Yum,
    /// 알 수 없는 이름
    Unknown(String),
}

impl PackageManager {
    /// 기본 탐지 순서
    pub const DEFAULT_ORDER: [PackageManager; 2] = [PackageManager::DpkgQuery, PackageManager::Rpm];

    /// 문자열에서 패키지 매니저를 파싱합니다 (대소문자 구분 없음).
    ///
    /// 알 수 없는 이름은 [`PackageManager::Unknown`]이 됩니다.
    pub fn from_str_loose(s: &str) -> Self {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "dpkg-query" | "dpkg" => Self::DpkgQuery,
            "rpm" => Self::Rpm,
            "apk" => Self::Apk,
            "yum" => Self::Yum,
            _ => Self::Unknown(trimmed.to_owned()),
        }
    }

    /// 탐지에 사용하는 실행 파일 이름을 반환합니다.
    pub fn command_name(&self) -> &str {
        match self {
            Self::DpkgQuery => "dpkg-query",
            Self::Rpm => "rpm",
            Self::Apk => "apk",
            Self::Yum => "yum",
            Self::Unknown(name) => name,
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command_name())
    }
}

impl From<String> for PackageManager {
    fn from(s: String) -> Self {
        Self::from_str_loose(&s)
    }
}

impl From<PackageManager> for String {
    fn from(pm: PackageManager) -> Self {
        pm.command_name().to_owned()
    }
}
