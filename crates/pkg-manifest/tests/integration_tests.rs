//! Package manifest generation integration tests
//!
//! Runs the full pipeline against fixture os-release files and a scripted
//! command runner standing in for `which`, the package managers and `uname`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use hostvuln_core::config::HostvulnConfig;
use hostvuln_core::error::{HostvulnError, ManifestError};
use hostvuln_core::telemetry::{TelemetryEvent, TelemetrySink};
use hostvuln_pkg_manifest::manager::dpkg::DPKG_SHOW_FORMAT;
use hostvuln_pkg_manifest::manager::rpm::RPM_QUERY_FORMAT;
use hostvuln_pkg_manifest::{
    CommandError, CommandOutput, CommandRunner, ManifestGenerator, ManifestGeneratorConfig,
    PackageManager, PkgManifestError,
};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// argv 문자열을 키로 응답을 돌려주는 실행기
#[derive(Default)]
struct ScriptedRunner {
    outputs: HashMap<String, CommandOutput>,
}

impl ScriptedRunner {
    fn stdout(mut self, command_line: &str, stdout: &str) -> Self {
        self.outputs
            .insert(command_line.to_owned(), CommandOutput::success(stdout));
        self
    }

    fn exit(mut self, command_line: &str, code: i32) -> Self {
        self.outputs
            .insert(command_line.to_owned(), CommandOutput::exit(code));
        self
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError> {
        let key = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.outputs
            .get(&key)
            .cloned()
            .ok_or_else(|| CommandError::Spawn {
                program: program.to_owned(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, key),
            })
    }
}

#[derive(Default)]
struct CollectingSink {
    events: Mutex<Vec<TelemetryEvent>>,
}

impl TelemetrySink for CollectingSink {
    fn send(&self, event: &TelemetryEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

fn config(os_release: &str, managers: Vec<PackageManager>) -> ManifestGeneratorConfig {
    ManifestGeneratorConfig {
        os_release_path: fixture_path(os_release),
        package_managers: managers,
        filter_inactive_kernels: true,
    }
}

fn rpm_query() -> String {
    format!("rpm -qa --queryformat {RPM_QUERY_FORMAT}")
}

fn dpkg_query() -> String {
    format!("dpkg-query --show --showformat {DPKG_SHOW_FORMAT}")
}

#[test]
fn test_ubuntu_host_keeps_only_running_kernel_image() {
    let runner = ScriptedRunner::default()
        .stdout("which dpkg-query", "/usr/bin/dpkg-query\n")
        .stdout(
            &dpkg_query(),
            "adduser,3.118ubuntu5\n\
             linux-image-5.15.0-86-generic,5.15.0-86.96\n\
             linux-image-5.15.0-88-generic,5.15.0-88.98\n\
             openssl,3.0.2-0ubuntu1.10\n",
        )
        .stdout("uname -r", "5.15.0-88-generic\n");
    let sink = Arc::new(CollectingSink::default());

    let config = config("os-release-ubuntu", PackageManager::DEFAULT_ORDER.to_vec());
    let generator = ManifestGenerator::new(config, runner)
        .unwrap()
        .with_telemetry(sink.clone());
    let manifest = generator.generate().unwrap();

    let names: Vec<&str> = manifest.os_pkg_info_list.iter().map(|p| p.pkg.as_str()).collect();
    assert_eq!(names, vec!["adduser", "linux-image-5.15.0-88-generic", "openssl"]);
    for pkg in &manifest.os_pkg_info_list {
        assert_eq!(pkg.os, "ubuntu");
        assert_eq!(pkg.os_ver, "22.04");
    }

    let events = sink.events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].field("pkg_manager").unwrap(), "dpkg-query");
    assert_eq!(events[0].field("total_manifest_pkgs").unwrap(), 4);
    assert_eq!(
        events[0].field("kernel_suppressed_1").unwrap(),
        "linux-image-5.15.0-86-generic-5.15.0-86.96"
    );
}

#[test]
fn test_rocky_host_with_epochs() {
    let runner = ScriptedRunner::default()
        .exit("which dpkg-query", 1)
        .stdout("which rpm", "/usr/bin/rpm\n")
        .stdout(
            &rpm_query(),
            "kernel,0:5.14.0-284.30.1.el9_2\n\
             kernel,0:5.14.0-284.11.1.el9_2\n\
             openssl-libs,1:3.0.7-17.el9_2\n",
        )
        .stdout("uname -r", "5.14.0-284.30.1.el9_2.x86_64\n");

    let config = config("os-release-rocky", PackageManager::DEFAULT_ORDER.to_vec());
    let generator = ManifestGenerator::new(config, runner).unwrap();
    let manifest = generator.generate().unwrap();

    assert_eq!(manifest.len(), 2);
    assert_eq!(manifest.os_pkg_info_list[0].pkg_ver, "0:5.14.0-284.30.1.el9_2");
    assert_eq!(manifest.os_pkg_info_list[0].os, "rocky");
    assert_eq!(manifest.os_pkg_info_list[0].os_ver, "9.2");
    assert_eq!(manifest.find_package("openssl-libs").unwrap().pkg_ver, "1:3.0.7-17.el9_2");
}

#[test]
fn test_alpine_host_pairs_apk_outputs() {
    let runner = ScriptedRunner::default()
        .stdout("which apk", "/sbin/apk\n")
        .stdout("apk info", "musl\nbusybox\nalpine-baselayout\n")
        .stdout(
            "apk info -v",
            "musl-1.2.4-r2\nbusybox-1.36.1-r5\nalpine-baselayout-3.4.3-r1\n",
        )
        .stdout("uname -r", "6.1.55-0-lts\n");

    let config = config("os-release-alpine", vec![PackageManager::Apk]);
    let generator = ManifestGenerator::new(config, runner).unwrap();
    let manifest = generator.generate().unwrap();

    assert_eq!(manifest.len(), 3);
    assert_eq!(manifest.find_package("alpine-baselayout").unwrap().pkg_ver, "3.4.3-r1");
    assert!(manifest.os_pkg_info_list.iter().all(|p| p.os == "alpine" && p.os_ver == "3.18.4"));
}

#[test]
fn test_manifest_json_matches_api_payload() {
    let runner = ScriptedRunner::default()
        .exit("which dpkg-query", 1)
        .stdout("which rpm", "/usr/bin/rpm\n")
        .stdout(&rpm_query(), "bash,0:5.1.8-6.el9\n");

    let config = config("os-release-rocky", PackageManager::DEFAULT_ORDER.to_vec());
    let generator = ManifestGenerator::new(config, runner).unwrap();
    let manifest = generator.generate().unwrap();

    let json = serde_json::to_value(&manifest).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "osPkgInfoList": [
                { "os": "rocky", "osVer": "9.2", "pkg": "bash", "pkgVer": "0:5.1.8-6.el9" }
            ]
        })
    );
}

#[test]
fn test_unsupported_platform_converts_to_hostvuln_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = ManifestGeneratorConfig {
        os_release_path: dir.path().join("os-release"),
        ..Default::default()
    };
    let generator = ManifestGenerator::new(config, ScriptedRunner::default()).unwrap();

    let err = generator.generate().unwrap_err();
    assert!(matches!(err, PkgManifestError::UnsupportedPlatform { .. }));

    let err: HostvulnError = err.into();
    assert!(matches!(
        err,
        HostvulnError::Manifest(ManifestError::UnsupportedPlatform(_))
    ));
}

#[test]
fn test_package_manager_order_comes_from_core_config() {
    let core = HostvulnConfig::parse(
        r#"
[manifest]
package_managers = ["rpm", "dpkg-query"]
"#,
    )
    .unwrap();
    let mut config = ManifestGeneratorConfig::from_core(&core.manifest);
    config.os_release_path = fixture_path("os-release-ubuntu");

    // 두 매니저 모두 존재: 목록 앞쪽(rpm)이 선택됨
    let runner = ScriptedRunner::default()
        .stdout("which dpkg-query", "/usr/bin/dpkg-query\n")
        .stdout("which rpm", "/usr/bin/rpm\n");
    let report = ManifestGenerator::new(config, runner).unwrap().detect().unwrap();

    assert_eq!(report.package_manager, PackageManager::Rpm);
    assert_eq!(report.active_kernel, None);
}
