//! rpm 백엔드 (Red Hat 계열)

use hostvuln_core::types::OsPkgInfo;

use super::{ManagerBackend, parse_query_output, run_query};
use crate::command::CommandRunner;
use crate::error::PkgManifestError;
use crate::types::PackageManager;

/// 패키지당 `name,epoch:version-release` 한 줄. epoch이 없으면 `0`
pub const RPM_QUERY_FORMAT: &str = "%{NAME},%|EPOCH?{%{EPOCH}}:{0}|:%{VERSION}-%{RELEASE}\n";

/// 커널 패키지 이름
pub const RPM_KERNEL_PACKAGE: &str = "kernel";

/// `rpm -qa` 조회 백엔드
#[derive(Debug, Default, Clone, Copy)]
pub struct RpmBackend;

impl ManagerBackend for RpmBackend {
    fn manager(&self) -> PackageManager {
        PackageManager::Rpm
    }

    fn list_packages(
        &self,
        runner: &dyn CommandRunner,
    ) -> Result<Vec<OsPkgInfo>, PkgManifestError> {
        let manager = self.manager();
        let output = run_query(
            runner,
            &manager,
            manager.command_name(),
            &["-qa", "--queryformat", RPM_QUERY_FORMAT],
        )?;
        Ok(parse_query_output(&output))
    }

    /// 이름이 정확히 `kernel`인 패키지만 커널로 취급하며, epoch을 제거한 버전을 반환합니다.
    fn kernel_version<'p>(&self, pkg: &'p OsPkgInfo) -> Option<&'p str> {
        (pkg.pkg == RPM_KERNEL_PACKAGE).then(|| strip_epoch(&pkg.pkg_ver))
    }
}

/// 첫 번째 `:`까지(포함)를 제거합니다. `:`가 없으면 그대로 반환합니다.
pub fn strip_epoch(version: &str) -> &str {
    version.split_once(':').map_or(version, |(_, rest)| rest)
}
