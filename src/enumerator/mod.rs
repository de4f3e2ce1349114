//! JMX 빈 열거 모듈
//!
//! 외부 열거 도구를 실행하고 그 출력을 [`Catalog`]로 변환합니다.
//!
//! # Example
//!
//! ```ignore
//! use rjmx_confgen::enumerator::{fetch_catalog, CommandEnumerator, ParsePolicy};
//!
//! let enumerator = CommandEnumerator::new("java", vec!["-jar".into(), "./jmx_dump.jar".into()], 30_000);
//! let build = fetch_catalog(&enumerator, "localhost:9999", ParsePolicy::Skip).await?;
//! ```

mod command;
mod parser;

use std::future::Future;
use std::sync::Arc;

use tracing::warn;

pub use command::{CommandEnumerator, TARGET_PLACEHOLDER};
pub use parser::{parse_line, ParsePolicy, ParseResult};

use crate::catalog::{Catalog, CatalogBuild};
use crate::error::EnumerationError;

/// Enumerator 작업 결과 타입
pub type EnumerateResult<T> = Result<T, EnumerationError>;

/// 대상 JVM의 빈 목록을 원시 라인으로 돌려주는 협력자
pub trait Enumerator: Send + Sync + 'static {
    /// 대상 주소의 모든 빈을 열거
    fn enumerate(&self, target: &str) -> impl Future<Output = EnumerateResult<Vec<String>>> + Send;
}

impl<E: Enumerator> Enumerator for Arc<E> {
    fn enumerate(&self, target: &str) -> impl Future<Output = EnumerateResult<Vec<String>>> + Send {
        (**self).enumerate(target)
    }
}

/// 고정된 라인을 돌려주는 Enumerator (오프라인 재생 및 테스트용)
#[derive(Debug, Clone, Default)]
pub struct StaticEnumerator {
    lines: Vec<String>,
}

impl StaticEnumerator {
    /// 새 StaticEnumerator 생성
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl Enumerator for StaticEnumerator {
    fn enumerate(&self, _target: &str) -> impl Future<Output = EnumerateResult<Vec<String>>> + Send {
        let lines = self.lines.clone();
        async move { Ok(lines) }
    }
}

/// 열거 후 카탈로그 생성
///
/// `Skip` 정책에서 건너뛴 라인은 경고 로그로 남깁니다.
/// `Abort` 정책에서 잘못된 라인은 [`EnumerationError::Rejected`]가 됩니다.
pub async fn fetch_catalog<E: Enumerator>(
    enumerator: &E,
    target: &str,
    policy: ParsePolicy,
) -> EnumerateResult<CatalogBuild> {
    let lines = enumerator.enumerate(target).await?;
    let build = Catalog::build(&lines, policy)?;

    for skipped in &build.skipped {
        warn!(line = %skipped.line, reason = %skipped.reason, "Skipping malformed bean line");
    }

    Ok(build)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_catalog_from_static_lines() {
        let e = StaticEnumerator::new(["java.lang<type=Memory><>Verbose: false"]);
        let build = fetch_catalog(&e, "ignored", ParsePolicy::Abort).await.unwrap();
        assert_eq!(build.catalog.bean_count(), 1);
    }

    #[tokio::test]
    async fn test_fetch_catalog_abort_is_rejected() {
        let e = StaticEnumerator::new(["broken"]);
        let err = fetch_catalog(&e, "ignored", ParsePolicy::Abort)
            .await
            .unwrap_err();
        assert!(matches!(err, EnumerationError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_fetch_catalog_skip_keeps_good_lines() {
        let e = StaticEnumerator::new(["broken", "java.lang<type=Memory><>Verbose: false"]);
        let build = fetch_catalog(&e, "ignored", ParsePolicy::Skip).await.unwrap();
        assert_eq!(build.catalog.bean_count(), 1);
        assert_eq!(build.skipped.len(), 1);
    }
}
