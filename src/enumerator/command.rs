//! 외부 열거 도구 실행기
//!
//! `java -jar ./jmx_dump.jar <target>` 같은 외부 명령을 실행하고 표준 출력을 라인 단위로 돌려줍니다.

use std::future::Future;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, instrument};

use super::{EnumerateResult, Enumerator};
use crate::config::EnumeratorConfig;
use crate::error::EnumerationError;

/// 인자 안에서 대상 주소로 치환되는 자리표시자
pub const TARGET_PLACEHOLDER: &str = "{target}";

/// 외부 프로세스 기반 Enumerator
#[derive(Debug, Clone)]
pub struct CommandEnumerator {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandEnumerator {
    /// 새 실행기 생성
    ///
    /// # Arguments
    /// * `program` - 실행할 프로그램 (예: "java")
    /// * `args` - 인자 목록, `{target}`은 대상 주소로 치환됨
    /// * `timeout_ms` - 실행 타임아웃 (밀리초)
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout_ms: u64) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    /// 설정으로부터 생성
    pub fn from_config(config: &EnumeratorConfig) -> Self {
        Self::new(&config.program, config.args.clone(), config.timeout_ms)
    }

    /// 대상 주소를 치환한 최종 인자 목록
    ///
    /// 어떤 인자에도 자리표시자가 없으면 대상 주소를 마지막 인자로 덧붙입니다.
    pub fn resolve_args(&self, target: &str) -> Vec<String> {
        let mut substituted = false;
        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|a| {
                if a.contains(TARGET_PLACEHOLDER) {
                    substituted = true;
                    a.replace(TARGET_PLACEHOLDER, target)
                } else {
                    a.clone()
                }
            })
            .collect();
        if !substituted {
            args.push(target.to_string());
        }
        args
    }

    /// 프로그램 이름
    pub fn program(&self) -> &str {
        &self.program
    }

    #[instrument(skip(self), fields(program = %self.program))]
    async fn run(&self, target: String) -> EnumerateResult<Vec<String>> {
        let args = self.resolve_args(&target);
        debug!(program = %self.program, ?args, "Running enumerator");

        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| EnumerationError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| EnumerationError::Timeout(self.timeout.as_millis() as u64))?
            .map_err(|e| EnumerationError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(EnumerationError::ExitStatus {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8(output.stdout).map_err(EnumerationError::InvalidOutput)?;
        let lines: Vec<String> = stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(str::to_string)
            .collect();

        debug!(count = lines.len(), "Enumerator finished");
        Ok(lines)
    }
}

impl Enumerator for CommandEnumerator {
    fn enumerate(&self, target: &str) -> impl Future<Output = EnumerateResult<Vec<String>>> + Send {
        let this = self.clone();
        let target = target.to_string();
        async move { this.run(target).await }
    }
}
