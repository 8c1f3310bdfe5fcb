//! apk 백엔드 (Alpine)
//!
//! `apk info`(이름)와 `apk info -v`(`name-version`) 두 명령의 출력을 위치 기준으로
//! 짝지어 `name,version` 라인을 재구성합니다. 두 출력의 순서와 개수가 같다고
//! 가정하며, 순서가 다르면 잘못 짝지어진 결과가 그대로 나옵니다.
//! 개수가 다르면 경고 후 짧은 쪽에 맞춥니다. 빈 라인은 무시합니다.

use hostvuln_core::types::OsPkgInfo;
use tracing::warn;

use super::{ManagerBackend, parse_query_output, run_query};
use crate::command::CommandRunner;
use crate::error::PkgManifestError;
use crate::types::PackageManager;

/// `apk info` 조회 백엔드
///
/// 커널 필터는 적용되지 않습니다.
#[derive(Debug, Default, Clone, Copy)]
pub struct ApkBackend;

impl ManagerBackend for ApkBackend {
    fn manager(&self) -> PackageManager {
        PackageManager::Apk
    }

    fn list_packages(
        &self,
        runner: &dyn CommandRunner,
    ) -> Result<Vec<OsPkgInfo>, PkgManifestError> {
        let manager = self.manager();
        let names = run_query(runner, &manager, manager.command_name(), &["info"])?;
        let versioned = run_query(runner, &manager, manager.command_name(), &["info", "-v"])?;
        Ok(parse_query_output(&pair_name_versions(&names, &versioned)))
    }
}

/// 두 출력을 위치 기준으로 짝지어 `name,version` 라인으로 만듭니다.
///
/// 버전은 versioned 항목에서 이름의 첫 번째 등장을 지우고 양끝 `-`를 제거한 값입니다.
pub fn pair_name_versions(names: &str, versioned: &str) -> String {
    let names: Vec<&str> = split_lines(names).collect();
    let versioned: Vec<&str> = split_lines(versioned).collect();

    if names.len() != versioned.len() {
        warn!(
            names = names.len(),
            versioned = versioned.len(),
            "apk info outputs differ in length, pairing by position"
        );
    }

    names
        .iter()
        .zip(&versioned)
        .map(|(name, entry)| {
            let version = entry.replacen(name, "", 1);
            format!("{name},{}", version.trim_matches('-'))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn split_lines(output: &str) -> impl Iterator<Item = &str> {
    output
        .strip_suffix('\n')
        .unwrap_or(output)
        .split('\n')
        .filter(|line| !line.is_empty())
}
