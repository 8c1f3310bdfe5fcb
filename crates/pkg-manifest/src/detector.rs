//! 패키지 매니저 탐지
//!
//! 설정된 후보 목록을 순서대로 검사하여 호스트에 존재하는 첫 번째 패키지 매니저를
//! 반환합니다. 두 매니저가 모두 있으면 목록 앞쪽이 선택됩니다.
//!
//! # 존재 확인 전략
//!
//! 1. `which <name>`: 종료 코드 0이면 존재, 그 외 코드는 부재
//! 2. `which`를 실행할 수 없거나 종료 코드 없이 끝나면
//!    `sh -c 'command -v "$1"' sh <name>`으로 재확인

use tracing::{debug, warn};

use crate::command::CommandRunner;
use crate::error::PkgManifestError;
use crate::types::PackageManager;

/// `command -v` 폴백 스크립트. 이름은 위치 인자로 전달되어 셸 해석을 거치지 않습니다.
const COMMAND_V_SCRIPT: &str = r#"command -v "$1""#;

/// 패키지 매니저 탐지기
pub struct PackageManagerDetector<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
    candidates: &'a [PackageManager],
}

impl<'a, R: CommandRunner + ?Sized> PackageManagerDetector<'a, R> {
    /// 후보 목록과 명령 실행기로 탐지기를 생성합니다.
    pub fn new(runner: &'a R, candidates: &'a [PackageManager]) -> Self {
        Self { runner, candidates }
    }

    /// 존재하는 첫 번째 패키지 매니저를 반환합니다.
    ///
    /// # Errors
    ///
    /// 어떤 후보도 없으면 `PkgManifestError::NoPackageManagerFound`
    pub fn detect(&self) -> Result<PackageManager, PkgManifestError> {
        for candidate in self.candidates {
            if self.is_present(candidate.command_name()) {
                debug!(package_manager = %candidate, "detected package manager");
                return Ok(candidate.clone());
            }
            debug!(package_manager = %candidate, "package manager not found");
        }

        Err(PkgManifestError::NoPackageManagerFound {
            attempted: self
                .candidates
                .iter()
                .map(|pm| pm.command_name().to_owned())
                .collect(),
        })
    }

    /// 실행 파일이 PATH에 있는지 확인합니다.
    pub fn is_present(&self, name: &str) -> bool {
        match self.runner.run("which", &[name]) {
            Ok(output) => match output.code {
                Some(code) => code == 0,
                None => {
                    warn!(
                        name,
                        "'which' terminated without exit status, falling back to 'command -v'"
                    );
                    self.command_v(name)
                }
            },
            Err(e) => {
                warn!(name, error = %e, "'which' unavailable, falling back to 'command -v'");
                self.command_v(name)
            }
        }
    }

    fn command_v(&self, name: &str) -> bool {
        match self.runner.run("sh", &["-c", COMMAND_V_SCRIPT, "sh", name]) {
            Ok(output) => output.is_success(),
            Err(e) => {
                debug!(name, error = %e, "'command -v' lookup failed");
                false
            }
        }
    }
}
