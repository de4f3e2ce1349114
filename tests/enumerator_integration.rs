//! Enumerator integration tests
//!
//! Runs real child processes through `CommandEnumerator`.

#![cfg(unix)]

use std::io::Write;

use rjmx_confgen::enumerator::{fetch_catalog, CommandEnumerator, Enumerator, ParsePolicy};
use rjmx_confgen::error::EnumerationError;
use tempfile::NamedTempFile;

fn sh(script: &str, timeout_ms: u64) -> CommandEnumerator {
    CommandEnumerator::new(
        "sh",
        vec!["-c".to_string(), script.to_string(), "sh".to_string(), "{target}".to_string()],
        timeout_ms,
    )
}

#[tokio::test]
async fn test_enumerate_reads_lines() {
    let mut dump = NamedTempFile::new().unwrap();
    writeln!(dump, "java.lang<type=Memory><HeapMemoryUsage>used: 1").unwrap();
    writeln!(dump).unwrap();
    writeln!(dump, "java.lang<type=Threading><>ThreadCount: 12").unwrap();
    dump.flush().unwrap();

    let enumerator = CommandEnumerator::new("cat", Vec::new(), 5_000);
    let target = dump.path().to_str().unwrap();
    let lines = enumerator.enumerate(target).await.unwrap();
    assert_eq!(lines.len(), 2);

    let build = fetch_catalog(&enumerator, target, ParsePolicy::Abort)
        .await
        .unwrap();
    assert_eq!(build.catalog.len(), 1);
    assert_eq!(build.catalog.bean_count(), 2);
}

#[tokio::test]
async fn test_target_is_substituted() {
    let enumerator = sh(r#"echo "d<target=$1><>v: 1""#, 5_000);
    let build = fetch_catalog(&enumerator, "host:9999", ParsePolicy::Abort)
        .await
        .unwrap();
    let bean = &build.catalog.domains()[0].beans[0];
    assert_eq!(bean.labels[0].value, "host:9999");
}

#[tokio::test]
async fn test_non_zero_exit() {
    let enumerator = sh("echo boom >&2; exit 3", 5_000);
    let err = enumerator.enumerate("h:1").await.unwrap_err();
    match err {
        EnumerationError::ExitStatus { stderr, .. } => assert!(stderr.contains("boom")),
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn test_timeout() {
    let enumerator = sh("sleep 5", 100);
    let err = enumerator.enumerate("h:1").await.unwrap_err();
    assert!(matches!(err, EnumerationError::Timeout(100)));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_non_utf8_output() {
    let enumerator = sh(r"printf '\377\376'", 5_000);
    let err = enumerator.enumerate("h:1").await.unwrap_err();
    assert!(matches!(err, EnumerationError::InvalidOutput(_)));
}
