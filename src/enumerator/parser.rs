//! 열거 도구 출력 파서
//!
//! `domain<labels><attribute>valueName: value` 형식의 한 줄을 [`Bean`]으로 변환합니다.

use clap::ValueEnum;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::catalog::{Bean, Label};
use crate::error::ParseError;

/// 파싱 결과 타입
pub type ParseResult<T> = Result<T, ParseError>;

static BEAN_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([^<>]+)<([^<>]+)><([^<>]*)>([^:]+):(.*)$").expect("bean line regex is valid")
});

/// 잘못된 라인 처리 정책
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ParsePolicy {
    /// 잘못된 라인을 건너뛰고 로그만 남김
    #[default]
    Skip,
    /// 잘못된 라인이 하나라도 있으면 전체 결과를 거부
    Abort,
}

impl std::fmt::Display for ParsePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParsePolicy::Skip => write!(f, "skip"),
            ParsePolicy::Abort => write!(f, "abort"),
        }
    }
}

/// 단일 라인 파싱
///
/// 두 번째 괄호는 `,`로 나누고 각 항목은 첫 `=`에서 이름과 값으로 나눕니다.
/// 라벨의 `index`는 목록 내 1부터 시작하는 위치입니다.
pub fn parse_line(line: &str) -> ParseResult<Bean> {
    let caps = BEAN_LINE
        .captures(line)
        .ok_or_else(|| ParseError::new(line, diagnose(line)))?;

    let domain = &caps[1];
    let name = &caps[2];
    let labels = parse_labels(line, name)?;

    Ok(Bean {
        domain: domain.to_string(),
        name: name.to_string(),
        labels,
        attribute: caps[3].to_string(),
        value_name: caps[4].trim().to_string(),
        value: caps[5].trim().to_string(),
    })
}

fn parse_labels(line: &str, name: &str) -> ParseResult<Vec<Label>> {
    name.split(',')
        .enumerate()
        .map(|(i, entry)| {
            let (key, value) = entry.split_once('=').ok_or_else(|| {
                ParseError::new(line, format!("label entry '{}' has no '='", entry))
            })?;
            if key.is_empty() {
                return Err(ParseError::new(
                    line,
                    format!("label entry '{}' has an empty name", entry),
                ));
            }
            Ok(Label {
                name: key.to_string(),
                value: value.to_string(),
                index: i + 1,
            })
        })
        .collect()
}

fn diagnose(line: &str) -> &'static str {
    let Some(open) = line.find('<') else {
        return "missing '<' after domain";
    };
    if open == 0 {
        return "empty domain";
    }
    let rest = &line[open..];
    if rest.matches('<').count() < 2 {
        return "expected two bracketed sections";
    }
    match rest.rfind('>') {
        Some(close) if rest[close..].contains(':') => {
            "expected domain<labels><attribute>valueName: value"
        }
        _ => "missing ':' between value name and value",
    }
}
