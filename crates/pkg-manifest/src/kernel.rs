//! 활성 커널 필터
//!
//! 대부분의 배포판은 부팅 실패에 대비해 이전 커널 패키지 몇 개를 설치된 채로 둡니다.
//! 설치되었지만 부팅되지 않은 커널은 취약점 평가에서 오탐을 만들므로,
//! `uname -r`로 활성 커널을 확인하고 나머지 커널 패키지를 매니페스트에서 제거합니다.
//!
//! 커널 버전 비교는 부분 문자열 포함 여부로 판단합니다. 패키지 버전과 `uname -r`
//! 출력은 아키텍처/빌드 접미어 유무가 다를 수 있기 때문입니다.

use hostvuln_core::metrics as m;
use hostvuln_core::types::{OsPkgInfo, PackageManifest};
use tracing::{debug, warn};

use crate::command::CommandRunner;
use crate::manager::backend_for;
use crate::types::PackageManager;

/// 제거된 커널 패키지
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuppressedPackage {
    /// 필터 전 매니페스트에서의 위치
    pub index: usize,
    /// 제거된 레코드
    pub package: OsPkgInfo,
}

impl SuppressedPackage {
    /// 텔레메트리 필드 키 (`kernel_suppressed_<index>`)
    pub fn telemetry_key(&self) -> String {
        format!("kernel_suppressed_{}", self.index)
    }
}

/// 필터 결과
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    /// 필터링된 새 매니페스트
    pub manifest: PackageManifest,
    /// 제거된 레코드 (원래 순서)
    pub suppressed: Vec<SuppressedPackage>,
}

/// `uname -r`로 활성 커널 버전을 확인합니다.
///
/// 실패하거나 출력이 비어 있으면 경고 후 `None`을 반환합니다.
///
/// 명령이 성공했더라도 빈 출력은 탐지 실패로 취급합니다. 빈 문자열은 모든
/// 버전 문자열에 포함되므로, 그대로 필터에 넘기면 커널 패키지가 하나도 남지
/// 않습니다. 이 경우 필터링을 건너뜁니다.
pub fn detect_active_kernel<R: CommandRunner + ?Sized>(runner: &R) -> Option<String> {
    let output = match runner
        .run("uname", &["-r"])
        .and_then(|output| output.into_result("uname"))
    {
        Ok(output) => output.stdout_lossy(),
        Err(e) => {
            warn!(cmd = "uname -r", error = %e, "unable to detect active kernel");
            return None;
        }
    };

    let kernel = output.strip_suffix('\n').unwrap_or(&output);
    if kernel.is_empty() {
        warn!(cmd = "uname -r", "active kernel query returned empty output");
        return None;
    }
    debug!(active_kernel = kernel, "detected active kernel");
    Some(kernel.to_owned())
}

/// 활성 커널 기준 필터
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelFilter {
    active_kernel: String,
}

impl KernelFilter {
    /// 활성 커널 문자열로 필터를 생성합니다.
    pub fn new(active_kernel: impl Into<String>) -> Self {
        Self {
            active_kernel: active_kernel.into(),
        }
    }

    /// 활성 커널을 탐지하여 필터를 생성합니다. 탐지 실패 시 `None`
    pub fn detect<R: CommandRunner + ?Sized>(runner: &R) -> Option<Self> {
        detect_active_kernel(runner).map(Self::new)
    }

    /// 활성 커널 문자열
    pub fn active_kernel(&self) -> &str {
        &self.active_kernel
    }

    /// 활성 커널이 아닌 커널 패키지를 제거한 새 매니페스트를 만듭니다.
    ///
    /// 입력 매니페스트는 변경되지 않으며, 남은 레코드의 순서는 유지됩니다.
    /// 커널 필터가 없는 패키지 매니저는 입력을 그대로 복사합니다.
    pub fn filter(&self, manifest: &PackageManifest, manager: &PackageManager) -> FilterOutcome {
        let Ok(backend) = backend_for(manager) else {
            return FilterOutcome {
                manifest: manifest.clone(),
                suppressed: Vec::new(),
            };
        };

        let mut kept = Vec::with_capacity(manifest.len());
        let mut suppressed = Vec::new();

        for (index, pkg) in manifest.os_pkg_info_list.iter().enumerate() {
            match backend.kernel_version(pkg) {
                Some(version) if !self.active_kernel.contains(version) => {
                    warn!(
                        pkg_name = %pkg.pkg,
                        pkg_version = %pkg.pkg_ver,
                        active_kernel = %self.active_kernel,
                        "inactive kernel package detected, removing from generated pkg manifest"
                    );
                    metrics::counter!(m::PKG_MANIFEST_KERNEL_SUPPRESSED_TOTAL).increment(1);
                    suppressed.push(SuppressedPackage {
                        index,
                        package: pkg.clone(),
                    });
                }
                _ => kept.push(pkg.clone()),
            }
        }

        if !suppressed.is_empty() {
            debug!(
                before = manifest.len(),
                after = kept.len(),
                "package manifest modified by kernel filter"
            );
        }

        FilterOutcome {
            manifest: PackageManifest::new(kept),
            suppressed,
        }
    }
}
