//! 외부 명령 실행 추상화
//!
//! [`CommandRunner`] trait은 패키지 매니저, `which`, `uname` 등 모든 외부 명령 실행을
//! 추상화합니다. 프로덕션 코드는 [`SystemCommandRunner`]를, 테스트는
//! `MockCommandRunner`를 사용합니다.
//!
//! ```text
//! ┌───────────────────┐
//! │ ManifestGenerator │
//! └─────────┬─────────┘
//!           │
//!           ▼
//!   ┌───────────────┐
//!   │ CommandRunner │ (trait)
//!   └───────────────┘
//!        │      │
//!        ▼      ▼
//!   ┌────────┐ ┌──────┐
//!   │ System │ │ Mock │
//!   └───┬────┘ └──────┘
//!       │
//!       ▼
//!   std::process::Command
//! ```

use std::process::{Command, Stdio};

/// 명령 실행 결과
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// 종료 코드. 시그널로 종료되는 등 코드가 없으면 `None`
    pub code: Option<i32>,
    /// 표준 출력
    pub stdout: Vec<u8>,
    /// 표준 에러
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    /// 종료 코드 0으로 끝난 결과를 생성합니다.
    pub fn success(stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: Vec::new(),
        }
    }

    /// 지정한 종료 코드로 끝난 결과를 생성합니다.
    pub fn exit(code: i32) -> Self {
        Self {
            code: Some(code),
            ..Self::default()
        }
    }

    /// 종료 코드 없이 끝난 결과 (시그널 종료 등)를 생성합니다.
    pub fn terminated() -> Self {
        Self::default()
    }

    /// 종료 코드가 0인지 확인합니다.
    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }

    /// 표준 출력을 UTF-8 문자열로 변환합니다 (잘못된 바이트는 대체 문자로).
    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// 성공이 아니면 [`CommandError::Failed`]로 변환합니다.
    pub fn into_result(self, program: &str) -> Result<Self, CommandError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(CommandError::Failed {
                program: program.to_owned(),
                code: self.code,
                stderr: String::from_utf8_lossy(&self.stderr).trim().to_owned(),
            })
        }
    }
}

/// 명령 실행 에러
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// 프로세스를 시작할 수 없음
    #[error("failed to execute '{program}': {source}")]
    Spawn {
        /// 실행 파일 이름
        program: String,
        /// 원본 I/O 에러
        #[source]
        source: std::io::Error,
    },

    /// 프로세스가 0이 아닌 코드로 종료되었거나 코드 없이 종료됨
    #[error("'{program}' exited with {}: {stderr}", exit_code_label(*.code))]
    Failed {
        /// 실행 파일 이름
        program: String,
        /// 종료 코드
        code: Option<i32>,
        /// 표준 에러 내용
        stderr: String,
    },
}

fn exit_code_label(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no exit status".to_owned(),
    }
}

/// 외부 명령 실행 trait
///
/// 구현체는 명령을 동기적으로 실행하고 출력과 종료 코드를 반환해야 합니다.
/// 종료 코드 해석은 호출자가 담당하며, `Err`는 프로세스를 시작조차 못한 경우입니다.
pub trait CommandRunner: Send + Sync {
    /// `program args...`를 실행하고 결과를 반환합니다.
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError> {
        (**self).run(program, args)
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for std::sync::Arc<R> {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError> {
        (**self).run(program, args)
    }
}

/// `std::process::Command` 기반 프로덕션 구현
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| CommandError::Spawn {
                program: program.to_owned(),
                source,
            })?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// 테스트용 Mock 명령 실행기
///
/// 명령줄(`program arg1 arg2`) 문자열을 키로 미리 설정한 응답을 반환합니다.
/// 설정되지 않은 명령은 `Spawn` 에러(NotFound)를 반환합니다.
#[cfg(test)]
#[derive(Default)]
pub struct MockCommandRunner {
    responses: std::collections::HashMap<String, MockResponse>,
    calls: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
#[derive(Clone)]
enum MockResponse {
    Output(CommandOutput),
    SpawnError,
}

#[cfg(test)]
impl MockCommandRunner {
    /// 빈 응답 테이블로 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 명령에 대한 응답을 설정합니다.
    pub fn on(mut self, command_line: &str, output: CommandOutput) -> Self {
        self.responses
            .insert(command_line.to_owned(), MockResponse::Output(output));
        self
    }

    /// 명령이 성공하며 `stdout`을 출력하도록 설정합니다.
    pub fn on_success(self, command_line: &str, stdout: &str) -> Self {
        self.on(command_line, CommandOutput::success(stdout))
    }

    /// 명령 실행 자체가 실패하도록 설정합니다.
    pub fn on_spawn_error(mut self, command_line: &str) -> Self {
        self.responses
            .insert(command_line.to_owned(), MockResponse::SpawnError);
        self
    }

    /// 지금까지 호출된 명령줄 목록을 반환합니다.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
impl CommandRunner for MockCommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError> {
        let mut command_line = program.to_owned();
        for arg in args {
            command_line.push(' ');
            command_line.push_str(arg);
        }
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(command_line.clone());
        }

        match self.responses.get(&command_line) {
            Some(MockResponse::Output(output)) => Ok(output.clone()),
            Some(MockResponse::SpawnError) | None => Err(CommandError::Spawn {
                program: program.to_owned(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "mock: not configured"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_success_helpers() {
        let out = CommandOutput::success("hello\n");
        assert!(out.is_success());
        assert_eq!(out.stdout_lossy(), "hello\n");
        assert!(out.into_result("echo").is_ok());
    }

    #[test]
    fn non_zero_exit_becomes_failed_error() {
        let out = CommandOutput {
            code: Some(2),
            stdout: Vec::new(),
            stderr: b"boom\n".to_vec(),
        };
        let err = out.into_result("rpm").unwrap_err();
        match &err {
            CommandError::Failed {
                program,
                code,
                stderr,
            } => {
                assert_eq!(program, "rpm");
                assert_eq!(*code, Some(2));
                assert_eq!(stderr, "boom");
            }
            CommandError::Spawn { .. } => panic!("expected Failed"),
        }
        assert!(err.to_string().contains("status 2"));
    }

    #[test]
    fn terminated_has_no_code() {
        let out = CommandOutput::terminated();
        assert!(!out.is_success());
        let err = out.into_result("which").unwrap_err();
        assert!(err.to_string().contains("no exit status"));
    }

    #[test]
    fn mock_returns_configured_output_and_records_calls() {
        let runner = MockCommandRunner::new().on_success("uname -r", "5.15.0\n");
        let out = runner.run("uname", &["-r"]).unwrap();
        assert_eq!(out.stdout_lossy(), "5.15.0\n");
        assert_eq!(runner.calls(), vec!["uname -r"]);
    }

    #[test]
    fn mock_unconfigured_command_is_spawn_error() {
        let runner = MockCommandRunner::new();
        let err = runner.run("apk", &["info"]).unwrap_err();
        assert!(matches!(err, CommandError::Spawn { .. }));
    }

    #[test]
    fn mock_spawn_error_is_explicit() {
        let runner = MockCommandRunner::new().on_spawn_error("which rpm");
        assert!(runner.run("which", &["rpm"]).is_err());
    }

    #[test]
    fn runner_through_reference() {
        let runner = MockCommandRunner::new().on("which rpm", CommandOutput::exit(1));
        let by_ref: &dyn CommandRunner = &runner;
        let out = by_ref.run("which", &["rpm"]).unwrap();
        assert_eq!(out.code, Some(1));
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_reports_spawn_error_for_missing_binary() {
        let err = SystemCommandRunner
            .run("hostvuln-definitely-missing-binary", &[])
            .unwrap_err();
        assert!(matches!(err, CommandError::Spawn { .. }));
    }
}
