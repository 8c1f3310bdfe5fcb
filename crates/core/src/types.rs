//! 도메인 타입 -- 패키지 매니페스트
//!
//! 호스트 취약점 평가 API에 전달되는 매니페스트 구조를 정의합니다.
//! JSON 필드명은 API 페이로드 형식(`osPkgInfoList`, `osVer`, `pkgVer`)을 따릅니다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 설치된 단일 OS 패키지 정보
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OsPkgInfo {
    /// OS 이름 (예: "ubuntu")
    pub os: String,
    /// OS 버전 (예: "22.04")
    pub os_ver: String,
    /// 패키지 이름
    pub pkg: String,
    /// 패키지 버전
    pub pkg_ver: String,
}

impl OsPkgInfo {
    /// OS 정보 없이 패키지 이름/버전만으로 생성합니다.
    pub fn new(pkg: impl Into<String>, pkg_ver: impl Into<String>) -> Self {
        Self {
            os: String::new(),
            os_ver: String::new(),
            pkg: pkg.into(),
            pkg_ver: pkg_ver.into(),
        }
    }
}

impl fmt::Display for OsPkgInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.pkg, self.pkg_ver)
    }
}

/// 패키지 매니페스트
///
/// 레코드 순서는 패키지 매니저 조회 순서와 같습니다.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PackageManifest {
    /// 패키지 목록
    #[serde(rename = "osPkgInfoList")]
    pub os_pkg_info_list: Vec<OsPkgInfo>,
}

impl PackageManifest {
    /// 레코드 목록으로 매니페스트를 생성합니다.
    pub fn new(os_pkg_info_list: Vec<OsPkgInfo>) -> Self {
        Self { os_pkg_info_list }
    }

    /// 패키지 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.os_pkg_info_list.len()
    }

    /// 비어있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.os_pkg_info_list.is_empty()
    }

    /// 이름으로 패키지를 검색합니다.
    pub fn find_package(&self, name: &str) -> Option<&OsPkgInfo> {
        self.os_pkg_info_list.iter().find(|p| p.pkg == name)
    }
}

impl fmt::Display for PackageManifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PackageManifest({} packages)", self.len())
    }
}
