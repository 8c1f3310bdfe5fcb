//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()`, `metrics::histogram!()`
//! 매크로를 호출합니다. 전역 레코더가 설치되지 않으면 기록은 무시됩니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `hostvuln_`
//! - 모듈명: `pkg_manifest_`
//! - 접미어: `_total` (counter), `_seconds` (histogram)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(hostvuln_core::metrics::PKG_MANIFEST_PACKAGES_TOTAL).increment(42);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

/// 패키지 매니저 레이블 키 (dpkg-query, rpm, apk)
pub const LABEL_PACKAGE_MANAGER: &str = "package_manager";

// ─── Package Manifest 메트릭 ────────────────────────────────────────

/// Package Manifest: 매니페스트 생성 시도 수 (counter, label: result)
pub const PKG_MANIFEST_GENERATIONS_TOTAL: &str = "hostvuln_pkg_manifest_generations_total";

/// Package Manifest: 조회된 패키지 수 (counter, label: package_manager)
pub const PKG_MANIFEST_PACKAGES_TOTAL: &str = "hostvuln_pkg_manifest_packages_total";

/// Package Manifest: 파싱 실패로 건너뛴 출력 라인 수 (counter)
pub const PKG_MANIFEST_MALFORMED_LINES_TOTAL: &str =
    "hostvuln_pkg_manifest_malformed_lines_total";

/// Package Manifest: 제거된 비활성 커널 패키지 수 (counter)
pub const PKG_MANIFEST_KERNEL_SUPPRESSED_TOTAL: &str =
    "hostvuln_pkg_manifest_kernel_suppressed_total";

/// Package Manifest: 생성 소요 시간 (histogram, 초)
pub const PKG_MANIFEST_GENERATION_DURATION_SECONDS: &str =
    "hostvuln_pkg_manifest_generation_duration_seconds";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!(
        PKG_MANIFEST_GENERATIONS_TOTAL,
        "Total number of package manifest generations by result"
    );
    describe_counter!(
        PKG_MANIFEST_PACKAGES_TOTAL,
        "Total number of packages enumerated from the package manager"
    );
    describe_counter!(
        PKG_MANIFEST_MALFORMED_LINES_TOTAL,
        "Total number of package manager output lines skipped as malformed"
    );
    describe_counter!(
        PKG_MANIFEST_KERNEL_SUPPRESSED_TOTAL,
        "Total number of inactive kernel packages removed from manifests"
    );
    describe_histogram!(
        PKG_MANIFEST_GENERATION_DURATION_SECONDS,
        "Time to generate a package manifest in seconds"
    );
}
