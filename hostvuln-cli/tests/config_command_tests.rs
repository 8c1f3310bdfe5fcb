//! Integration tests for the `hostvuln` binary.
//!
//! Config loading is exercised through `hostvuln-core` directly; end-to-end
//! behaviour (exit codes, JSON output) runs the compiled binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn hostvuln(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_hostvuln"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("HOSTVULN_GENERAL_LOG_LEVEL")
        .env_remove("HOSTVULN_GENERAL_LOG_FORMAT")
        .env_remove("HOSTVULN_MANIFEST_PACKAGE_MANAGERS")
        .env_remove("HOSTVULN_MANIFEST_OS_RELEASE_PATH")
        .output()
        .expect("should run hostvuln binary")
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp path should be UTF-8")
}

#[tokio::test]
async fn test_config_load_valid_toml() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("hostvuln.toml");

    let valid_config = r#"
[general]
log_level = "info"
log_format = "json"

[manifest]
package_managers = ["rpm"]
"#;
    fs::write(&config_path, valid_config).expect("should write config");

    let config = hostvuln_core::config::HostvulnConfig::load(&config_path)
        .await
        .expect("valid config should load successfully");
    assert_eq!(config.manifest.package_managers, vec!["rpm"]);
}

#[tokio::test]
async fn test_config_load_malformed_toml() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("bad.toml");
    fs::write(&config_path, "[general\nlog_level = \"info\"\n").expect("should write bad config");

    let result = hostvuln_core::config::HostvulnConfig::load(&config_path).await;
    assert!(result.is_err(), "malformed TOML should fail to load");
}

#[tokio::test]
async fn test_config_load_or_default_missing_file() {
    let config_path = std::path::PathBuf::from("/nonexistent/hostvuln.toml");

    let config = hostvuln_core::config::HostvulnConfig::load_or_default(&config_path)
        .await
        .expect("missing file should fall back to defaults");
    assert!(config.telemetry.enabled);
}

#[test]
fn test_binary_config_validate_valid_file() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("hostvuln.toml");
    fs::write(&config_path, "[general]\nlog_level = \"debug\"\n").expect("should write config");

    let output = hostvuln(&[
        "-c",
        path_str(&config_path),
        "--output",
        "json",
        "config",
        "validate",
    ]);

    assert_eq!(output.status.code(), Some(0));
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(report["valid"].as_bool(), Some(true));
}

#[test]
fn test_binary_config_validate_invalid_value_exits_2() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("hostvuln.toml");
    fs::write(&config_path, "[manifest]\npackage_managers = []\n").expect("should write config");

    let output = hostvuln(&[
        "-c",
        path_str(&config_path),
        "--output",
        "json",
        "config",
        "validate",
    ]);

    assert_eq!(output.status.code(), Some(2));
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(report["valid"].as_bool(), Some(false));
    let errors = report["errors"].as_array().expect("errors array");
    assert!(errors[0].as_str().unwrap_or_default().contains("package_managers"));
}

#[test]
fn test_binary_config_validate_missing_file_exits_2() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("absent.toml");

    let output = hostvuln(&["-c", path_str(&config_path), "config", "validate"]);

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_binary_config_show_defaults_when_missing() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("absent.toml");

    let output = hostvuln(&[
        "-c",
        path_str(&config_path),
        "config",
        "show",
        "--section",
        "manifest",
    ]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("os_release_path"));
    assert!(stdout.contains("/etc/os-release"));
}

#[test]
fn test_binary_config_show_unknown_section_exits_1() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("absent.toml");

    let output = hostvuln(&["-c", path_str(&config_path), "config", "show", "--section", "api"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown section"));
}

#[test]
fn test_binary_manifest_generate_missing_os_release_exits_4() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("absent.toml");
    let os_release = temp_dir.path().join("os-release");

    let output = hostvuln(&[
        "-c",
        path_str(&config_path),
        "manifest",
        "generate",
        "--os-release",
        path_str(&os_release),
    ]);

    assert_eq!(output.status.code(), Some(4));
    assert!(output.stdout.is_empty(), "nothing should be rendered on failure");
    assert!(String::from_utf8_lossy(&output.stderr).contains("unsupported platform"));
}

#[test]
fn test_binary_manifest_detect_no_package_manager_exits_4() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("hostvuln.toml");
    let os_release = temp_dir.path().join("os-release");
    fs::write(
        &config_path,
        "[manifest]\npackage_managers = [\"hostvuln-test-no-such-manager\"]\n",
    )
    .expect("should write config");
    fs::write(&os_release, "ID=ubuntu\nVERSION_ID=\"22.04\"\n").expect("should write os-release");

    let output = hostvuln(&[
        "-c",
        path_str(&config_path),
        "manifest",
        "detect",
        "--os-release",
        path_str(&os_release),
    ]);

    assert_eq!(output.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&output.stderr).contains("hostvuln-test-no-such-manager"));
}

#[test]
fn test_binary_manifest_generate_broken_config_exits_2() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("hostvuln.toml");
    fs::write(&config_path, "[manifest\n").expect("should write config");

    let output = hostvuln(&["-c", path_str(&config_path), "manifest", "generate"]);

    assert_eq!(output.status.code(), Some(2));
}
