//! 매니페스트 생성기 -- 파이프라인 오케스트레이터
//!
//! [`ManifestGenerator`]는 다음 단계를 순서대로 실행합니다.
//!
//! 1. OS release 파일 읽기
//! 2. 패키지 매니저 탐지
//! 3. 패키지 조회
//! 4. 모든 레코드에 OS 이름/버전 부착
//! 5. 비활성 커널 패키지 제거
//!
//! 소요 시간은 성공/실패와 관계없이 항상 측정하고, 텔레메트리 이벤트는
//! 전체 파이프라인이 성공했을 때만 전송합니다. 실패 보고는 호출자의 몫입니다.
//!
//! # 사용 예시
//!
//! ```no_run
//! use hostvuln_pkg_manifest::{ManifestGenerator, ManifestGeneratorConfig};
//!
//! let generator = ManifestGenerator::system(ManifestGeneratorConfig::default()).unwrap();
//! let manifest = generator.generate().unwrap();
//! println!("{manifest}");
//! ```

use std::sync::Arc;
use std::time::Instant;

use hostvuln_core::metrics as m;
use hostvuln_core::telemetry::{
    FEATURE_GEN_PKG_MANIFEST, NoopSink, TelemetryEvent, TelemetrySink,
};
use hostvuln_core::types::PackageManifest;
use serde::Serialize;
use tracing::{debug, info};

use crate::command::{CommandRunner, SystemCommandRunner};
use crate::config::ManifestGeneratorConfig;
use crate::detector::PackageManagerDetector;
use crate::error::PkgManifestError;
use crate::kernel::{KernelFilter, detect_active_kernel};
use crate::manager;
use crate::os_release::read_os_info;
use crate::types::{OsInfo, PackageManager};

/// 호스트 탐지 결과 (`manifest detect`용)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostReport {
    /// OS 정보
    pub os: OsInfo,
    /// 탐지된 패키지 매니저
    pub package_manager: PackageManager,
    /// 활성 커널 (탐지 실패 시 `None`)
    pub active_kernel: Option<String>,
}

/// 패키지 매니페스트 생성기
///
/// 호출마다 독립적인 상태로 실행되며 호출 간 공유하는 가변 상태가 없습니다.
pub struct ManifestGenerator<R: CommandRunner = SystemCommandRunner> {
    config: ManifestGeneratorConfig,
    runner: R,
    telemetry: Arc<dyn TelemetrySink>,
}

impl ManifestGenerator<SystemCommandRunner> {
    /// 실제 시스템 명령을 사용하는 생성기를 만듭니다.
    pub fn system(config: ManifestGeneratorConfig) -> Result<Self, PkgManifestError> {
        Self::new(config, SystemCommandRunner)
    }
}

impl<R: CommandRunner> ManifestGenerator<R> {
    /// 설정과 명령 실행기로 생성기를 만듭니다. 텔레메트리는 기본적으로 비활성입니다.
    ///
    /// # Errors
    ///
    /// 설정 검증 실패 시 `PkgManifestError::Config`
    pub fn new(config: ManifestGeneratorConfig, runner: R) -> Result<Self, PkgManifestError> {
        config.validate()?;
        Ok(Self {
            config,
            runner,
            telemetry: Arc::new(NoopSink),
        })
    }

    /// 텔레메트리 싱크를 설정합니다.
    pub fn with_telemetry(mut self, sink: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = sink;
        self
    }

    /// 생성기 설정
    pub fn config(&self) -> &ManifestGeneratorConfig {
        &self.config
    }

    /// 패키지 매니페스트를 생성합니다.
    ///
    /// # Errors
    ///
    /// OS release 파일 열기 실패, 패키지 매니저 미발견, 미지원 매니저,
    /// 조회 명령 실패 시 해당 `PkgManifestError`. 이 시점에는 매니페스트가
    /// 아직 만들어지지 않았으므로 부분 결과는 없습니다.
    pub fn generate(&self) -> Result<PackageManifest, PkgManifestError> {
        let start = Instant::now();
        let mut event = TelemetryEvent::new(FEATURE_GEN_PKG_MANIFEST);

        let result = self.run_pipeline(&mut event);

        let elapsed = start.elapsed();
        event.duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        metrics::histogram!(m::PKG_MANIFEST_GENERATION_DURATION_SECONDS)
            .record(elapsed.as_secs_f64());

        match &result {
            Ok(manifest) => {
                metrics::counter!(m::PKG_MANIFEST_GENERATIONS_TOTAL, m::LABEL_RESULT => "success")
                    .increment(1);
                info!(
                    packages = manifest.len(),
                    duration_ms = event.duration_ms,
                    "generated package manifest"
                );
                self.telemetry.send(&event);
            }
            Err(e) => {
                metrics::counter!(m::PKG_MANIFEST_GENERATIONS_TOTAL, m::LABEL_RESULT => "failure")
                    .increment(1);
                debug!(
                    error = %e,
                    duration_ms = event.duration_ms,
                    "package manifest generation failed"
                );
            }
        }

        result
    }

    /// OS, 패키지 매니저, 활성 커널을 탐지합니다. 패키지는 조회하지 않습니다.
    pub fn detect(&self) -> Result<HostReport, PkgManifestError> {
        let os = read_os_info(&self.config.os_release_path)?;
        let package_manager =
            PackageManagerDetector::new(&self.runner, &self.config.package_managers).detect()?;
        Ok(HostReport {
            os,
            package_manager,
            active_kernel: detect_active_kernel(&self.runner),
        })
    }

    fn run_pipeline(
        &self,
        event: &mut TelemetryEvent,
    ) -> Result<PackageManifest, PkgManifestError> {
        let os_info = read_os_info(&self.config.os_release_path)?;
        event.add_feature_field("os", os_info.name.clone());
        event.add_feature_field("os_ver", os_info.version.clone());

        let package_manager =
            PackageManagerDetector::new(&self.runner, &self.config.package_managers).detect()?;
        event.add_feature_field("pkg_manager", package_manager.to_string());

        let mut packages = manager::enumerate(&self.runner, &package_manager)?;
        for pkg in &mut packages {
            pkg.os.clone_from(&os_info.name);
            pkg.os_ver.clone_from(&os_info.version);
        }
        let manifest = PackageManifest::new(packages);
        event.add_feature_field("total_manifest_pkgs", manifest.len());
        debug!(packages = manifest.len(), os = %os_info, "package manifest assembled");

        if !self.config.filter_inactive_kernels {
            debug!("inactive kernel filter disabled");
            return Ok(manifest);
        }

        let Some(filter) = KernelFilter::detect(&self.runner) else {
            event.add_feature_field("active_kernel", "");
            return Ok(manifest);
        };
        event.add_feature_field("active_kernel", filter.active_kernel());

        let outcome = filter.filter(&manifest, &package_manager);
        for suppressed in &outcome.suppressed {
            event.add_feature_field(suppressed.telemetry_key(), suppressed.package.to_string());
        }
        Ok(outcome.manifest)
    }
}
