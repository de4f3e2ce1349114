//! Error types for rjmx-confgen
//!
//! This module defines the error types used throughout the application.

use std::path::PathBuf;

use thiserror::Error;

/// Rule 생성 관련 에러
#[derive(Error, Debug)]
pub enum RuleError {
    /// 정규식 패턴 컴파일 실패
    #[error("Invalid regex pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// 열거 출력 한 줄의 파싱 실패
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed bean line '{line}': {reason}")]
pub struct ParseError {
    /// 원본 라인
    pub line: String,
    /// 실패 사유
    pub reason: String,
}

impl ParseError {
    /// 새 ParseError 생성
    pub fn new(line: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            reason: reason.into(),
        }
    }
}

/// Enumerator 모듈 에러 타입
#[derive(Error, Debug)]
pub enum EnumerationError {
    /// 프로세스 실행 실패
    #[error("Failed to spawn enumerator '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// 0이 아닌 종료 코드
    #[error("Enumerator exited with {status}: {stderr}")]
    ExitStatus { status: String, stderr: String },

    /// 출력이 UTF-8이 아님
    #[error("Enumerator produced non UTF-8 output: {0}")]
    InvalidOutput(#[source] std::string::FromUtf8Error),

    /// 타임아웃
    #[error("Enumerator timed out after {0}ms")]
    Timeout(u64),

    /// strict 정책에서 잘못된 라인 발견
    #[error("Enumerator output rejected: {0}")]
    Rejected(#[from] ParseError),
}

impl EnumerationError {
    /// 다음 주기에 다시 시도할 만한 에러인지 확인
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            EnumerationError::ExitStatus { .. } | EnumerationError::Timeout(_)
        )
    }
}

/// Errors raised while serializing the generated exporter configuration
#[derive(Error, Debug)]
pub enum DocumentError {
    /// YAML serialization failed
    #[error("Failed to serialize config document: {0}")]
    Serialize(#[from] serde_yaml::Error),

    /// JSON serialization failed
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the save path
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Clipboard could not be opened or written
    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),

    /// Both the clipboard and the fallback file failed
    #[error("Failed to write {}: {source} (clipboard: {clipboard})", path.display())]
    FileWrite {
        path: PathBuf,
        clipboard: String,
        #[source]
        source: std::io::Error,
    },
}

/// Terminal front-end errors
#[derive(Error, Debug)]
pub enum TuiError {
    /// Terminal setup or drawing failed
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// Event queue closed unexpectedly
    #[error("Event channel closed")]
    ChannelClosed,
}

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Enumerator error
    #[error("Enumeration error: {0}")]
    Enumeration(#[from] EnumerationError),

    /// Enumerator output parse error
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Document rendering error
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Save error
    #[error("Save error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Terminal error
    #[error("UI error: {0}")]
    Tui(#[from] TuiError),

    /// UI thread panicked or was cancelled
    #[error("UI task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;
