//! dpkg-query 백엔드 (Debian 계열)

use hostvuln_core::types::OsPkgInfo;

use super::{ManagerBackend, parse_query_output, run_query};
use crate::command::CommandRunner;
use crate::error::PkgManifestError;
use crate::types::PackageManager;

/// 패키지당 `name,version` 한 줄
pub const DPKG_SHOW_FORMAT: &str = "${Package},${Version}\n";

/// 커널 이미지 패키지 접두어. 접두어 뒤가 커널 버전입니다.
pub const DPKG_KERNEL_PREFIX: &str = "linux-image-";

/// `dpkg-query --show` 조회 백엔드
#[derive(Debug, Default, Clone, Copy)]
pub struct DpkgBackend;

impl ManagerBackend for DpkgBackend {
    fn manager(&self) -> PackageManager {
        PackageManager::DpkgQuery
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
            &["--show", "--showformat", DPKG_SHOW_FORMAT],
        )?;
        Ok(parse_query_output(&output))
    }

    fn kernel_version<'p>(&self, pkg: &'p OsPkgInfo) -> Option<&'p str> {
        pkg.pkg.strip_prefix(DPKG_KERNEL_PREFIX)
    }
}
