//! 패키지 매니저별 조회 백엔드
//!
//! [`ManagerBackend`] trait은 패키지 매니저마다 다른 두 가지 동작을 캡슐화합니다.
//!
//! - 설치된 패키지 목록 조회 ([`ManagerBackend::list_packages`])
//! - 커널 패키지 판별 및 비교용 버전 추출 ([`ManagerBackend::kernel_version`])
//!
//! # 지원 현황
//!
//! | 매니저 | 조회 | 커널 필터 |
//! |---|---|---|
//! | `dpkg-query` | [`DpkgBackend`] | `linux-image-*` |
//! | `rpm` | [`RpmBackend`] | `kernel` |
//! | `apk` | [`ApkBackend`] | 없음 |
//! | `yum` | `NotYetSupported` | - |
//!
//! 모든 조회 명령은 `name,version` 라인 형식으로 정규화되어
//! [`parse_query_output`]으로 파싱됩니다.

pub mod apk;
pub mod dpkg;
pub mod rpm;

pub use apk::ApkBackend;
pub use dpkg::DpkgBackend;
pub use rpm::RpmBackend;

use hostvuln_core::metrics as m;
use hostvuln_core::types::OsPkgInfo;
use tracing::{debug, warn};

use crate::command::CommandRunner;
use crate::error::PkgManifestError;
use crate::types::PackageManager;

/// 패키지 매니저 백엔드 trait
pub trait ManagerBackend: Send + Sync {
    /// 이 백엔드가 담당하는 패키지 매니저를 반환합니다.
    fn manager(&self) -> PackageManager;

    /// 설치된 패키지를 조회 순서대로 반환합니다. OS 필드는 비어 있습니다.
    ///
    /// # Errors
    ///
    /// 조회 명령 실패 시 `PkgManifestError::PackageQueryFailed`
    fn list_packages(&self, runner: &dyn CommandRunner)
    -> Result<Vec<OsPkgInfo>, PkgManifestError>;

    /// 커널 패키지이면 활성 커널 문자열과 비교할 버전을 반환합니다.
    fn kernel_version<'p>(&self, _pkg: &'p OsPkgInfo) -> Option<&'p str> {
        None
    }

    /// 커널 패키지인지 확인합니다.
    fn is_kernel_package(&self, pkg: &OsPkgInfo) -> bool {
        self.kernel_version(pkg).is_some()
    }
}

/// 탐지된 패키지 매니저에 대응하는 백엔드를 반환합니다.
///
/// # Errors
///
/// - `yum`: `PkgManifestError::NotYetSupported`
/// - 알 수 없는 이름: `PkgManifestError::Internal` (탐지/조회 불일치)
pub fn backend_for(
    manager: &PackageManager,
) -> Result<&'static dyn ManagerBackend, PkgManifestError> {
    match manager {
        PackageManager::Rpm => Ok(&RpmBackend),
        PackageManager::DpkgQuery => Ok(&DpkgBackend),
        PackageManager::Apk => Ok(&ApkBackend),
        PackageManager::Yum => Err(PkgManifestError::NotYetSupported {
            manager: manager.to_string(),
        }),
        PackageManager::Unknown(name) => Err(PkgManifestError::Internal {
            manager: name.clone(),
        }),
    }
}

/// 패키지 매니저로 설치된 패키지를 조회합니다.
pub fn enumerate(
    runner: &dyn CommandRunner,
    manager: &PackageManager,
) -> Result<Vec<OsPkgInfo>, PkgManifestError> {
    let backend = backend_for(manager)?;
    let packages = backend.list_packages(runner)?;
    let label = backend.manager().to_string();
    debug!(package_manager = %label, count = packages.len(), "enumerated packages");
    metrics::counter!(m::PKG_MANIFEST_PACKAGES_TOTAL, m::LABEL_PACKAGE_MANAGER => label)
        .increment(packages.len() as u64);
    Ok(packages)
}

/// 조회 명령을 실행하고 표준 출력을 반환합니다.
///
/// 실행 실패와 비-0 종료 모두 `PackageQueryFailed`가 됩니다.
pub(crate) fn run_query(
    runner: &dyn CommandRunner,
    manager: &PackageManager,
    program: &str,
    args: &[&str],
) -> Result<String, PkgManifestError> {
    runner
        .run(program, args)
        .and_then(|output| output.into_result(program))
        .map(|output| output.stdout_lossy())
        .map_err(|source| PkgManifestError::PackageQueryFailed {
            manager: manager.to_string(),
            source,
        })
}

/// `name,version` 라인 형식의 조회 결과를 파싱합니다.
///
/// 끝의 개행 하나만 제거한 뒤 라인별로 `,`로 분리하며, 정확히 두 필드가 아닌 라인은
/// 경고 후 건너뜁니다. 빈 출력은 빈 목록입니다.
pub fn parse_query_output(output: &str) -> Vec<OsPkgInfo> {
    let body = output.strip_suffix('\n').unwrap_or(output);
    if body.is_empty() {
        return Vec::new();
    }

    let mut packages = Vec::new();
    for (line_no, line) in body.split('\n').enumerate() {
        let fields: Vec<&str> = line.split(',').collect();
        match fields.as_slice() {
            [name, version] => packages.push(OsPkgInfo::new(*name, *version)),
            _ => {
                warn!(
                    line = line_no + 1,
                    content = line,
                    fields = fields.len(),
                    "skipping malformed package line"
                );
                metrics::counter!(m::PKG_MANIFEST_MALFORMED_LINES_TOTAL).increment(1);
            }
        }
    }
    packages
}
