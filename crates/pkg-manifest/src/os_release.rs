//! OS release 파일 파서
//!
//! `KEY=VALUE` 형식의 os-release(5) 파일에서 `ID`와 `VERSION_ID`를 읽습니다.
//! 값을 감싼 큰따옴표는 제거되며, 키가 없으면 빈 문자열로 남습니다.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::{PkgManifestError, UNSUPPORTED_PLATFORM_HELP};
use crate::types::OsInfo;

#[allow(clippy::expect_used)]
static ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ID=(.*)$").expect("valid ID regex"));

#[allow(clippy::expect_used)]
static VERSION_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^VERSION_ID=(.*)$").expect("valid VERSION_ID regex"));

/// OS release 파일을 읽어 [`OsInfo`]를 반환합니다.
///
/// # Errors
///
/// 파일을 열 수 없으면 `PkgManifestError::UnsupportedPlatform`을 반환합니다.
/// 읽는 도중의 I/O 에러는 경고 후 그때까지 읽은 값으로 반환합니다.
pub fn read_os_info(path: &Path) -> Result<OsInfo, PkgManifestError> {
    let file = File::open(path).map_err(|source| PkgManifestError::UnsupportedPlatform {
        message: UNSUPPORTED_PLATFORM_HELP.to_owned(),
        path: path.display().to_string(),
        source,
    })?;

    let mut info = OsInfo::default();
    for line in BufReader::new(file).split(b'\n') {
        let line = match line {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to read os-release, using partial result"
                );
                break;
            }
        };
        apply_line(&mut info, &String::from_utf8_lossy(&line));
    }

    debug!(os = %info.name, os_ver = %info.version, "read os-release");
    Ok(info)
}

/// os-release 내용 문자열을 파싱합니다.
pub fn parse_os_release(content: &str) -> OsInfo {
    let mut info = OsInfo::default();
    for line in content.split('\n') {
        apply_line(&mut info, line);
    }
    info
}

fn apply_line(info: &mut OsInfo, line: &str) {
    // CRLF 파일: 줄 끝의 '\r' 하나를 제거
    let line = line.strip_suffix('\r').unwrap_or(line);
    if let Some(caps) = ID_RE.captures(line) {
        info.name = unquote(&caps[1]);
    } else if let Some(caps) = VERSION_ID_RE.captures(line) {
        info.version = unquote(&caps[1]);
    }
}

fn unquote(value: &str) -> String {
    value.trim_matches('"').to_owned()
}
