//! Background catalog refresh
//!
//! Re-runs the enumerator on a timer, or right away when the operator asks
//! for it, and posts the result into the UI event queue. The task never
//! touches selection state.

use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::RefreshConfig;
use crate::enumerator::{fetch_catalog, Enumerator, ParsePolicy};
use crate::ui::AppEvent;

/// Handle used to request an out-of-band refresh
#[derive(Debug, Clone, Default)]
pub struct RefreshTrigger {
    notify: Arc<Notify>,
}

impl RefreshTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the refresh task to run now
    ///
    /// Requests made while a refresh is running collapse into one.
    pub fn request(&self) {
        self.notify.notify_one();
    }
}

/// Settings for [`spawn`]
#[derive(Debug, Clone)]
pub struct RefreshSettings {
    pub target: String,
    pub policy: ParsePolicy,
    pub initial_delay: Duration,
    pub interval: Duration,
}

impl RefreshSettings {
    pub fn new(target: impl Into<String>, policy: ParsePolicy, config: &RefreshConfig) -> Self {
        Self {
            target: target.into(),
            policy,
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            interval: Duration::from_millis(config.interval_ms),
        }
    }
}

/// Spawn the refresh loop on the current tokio runtime
///
/// The loop ends when the event receiver is dropped.
pub fn spawn<E: Enumerator>(
    enumerator: E,
    settings: RefreshSettings,
    trigger: RefreshTrigger,
    events: Sender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let start = Instant::now() + settings.initial_delay;
        let mut ticker = time::interval_at(start, settings.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            target_addr = %settings.target,
            initial_delay_ms = settings.initial_delay.as_millis() as u64,
            interval_ms = settings.interval.as_millis() as u64,
            "Refresh task started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = trigger.notify.notified() => {
                    debug!("Refresh requested");
                    ticker.reset();
                }
            }

            let event = match fetch_catalog(&enumerator, &settings.target, settings.policy).await {
                Ok(build) => {
                    debug!(
                        domains = build.catalog.len(),
                        beans = build.catalog.bean_count(),
                        "Enumeration finished"
                    );
                    AppEvent::CatalogRefreshed {
                        catalog: Arc::new(build.catalog),
                        skipped: build.skipped.len(),
                    }
                }
                Err(e) => {
                    warn!(error = %e, transient = e.is_transient(), "Refresh failed");
                    AppEvent::EnumerationFailed(e.to_string())
                }
            };

            if events.send(event).is_err() {
                debug!("Event queue closed, stopping refresh task");
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enumerator::StaticEnumerator;
    use std::sync::mpsc;

    fn settings(initial_ms: u64, interval_ms: u64) -> RefreshSettings {
        RefreshSettings::new(
            "localhost:9999",
            ParsePolicy::Skip,
            &RefreshConfig {
                initial_delay_ms: initial_ms,
                interval_ms,
            },
        )
    }

    async fn next_event(rx: mpsc::Receiver<AppEvent>) -> (AppEvent, mpsc::Receiver<AppEvent>) {
        tokio::task::spawn_blocking(move || {
            let event = rx.recv_timeout(Duration::from_secs(5)).unwrap();
            (event, rx)
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_refresh_posts_catalog() {
        let (tx, rx) = mpsc::channel();
        let enumerator = StaticEnumerator::new([
            "java.lang<type=Memory><HeapMemoryUsage>used: 1",
            "not a bean line",
        ]);
        let handle = spawn(enumerator, settings(10, 60_000), RefreshTrigger::new(), tx);

        let (event, rx) = next_event(rx).await;
        match event {
            AppEvent::CatalogRefreshed { catalog, skipped } => {
                assert_eq!(catalog.bean_count(), 1);
                assert_eq!(skipped, 1);
            }
            other => panic!("unexpected event {other:?}"),
        }

        drop(rx);
        handle.abort();
    }

    #[tokio::test]
    async fn test_trigger_runs_before_initial_delay() {
        let (tx, rx) = mpsc::channel();
        let trigger = RefreshTrigger::new();
        let handle = spawn(
            StaticEnumerator::new(["a<k=v><>x: 1"]),
            settings(60_000, 60_000),
            trigger.clone(),
            tx,
        );

        trigger.request();
        let (event, _rx) = next_event(rx).await;
        assert!(matches!(event, AppEvent::CatalogRefreshed { .. }));

        handle.abort();
    }

    #[tokio::test]
    async fn test_rejected_batch_reports_failure() {
        let (tx, rx) = mpsc::channel();
        let mut s = settings(10, 60_000);
        s.policy = ParsePolicy::Abort;
        let handle = spawn(StaticEnumerator::new(["garbage"]), s, RefreshTrigger::new(), tx);

        let (event, _rx) = next_event(rx).await;
        match event {
            AppEvent::EnumerationFailed(msg) => assert!(msg.contains("garbage")),
            other => panic!("unexpected event {other:?}"),
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_task_stops_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let handle = spawn(
            StaticEnumerator::new(["a<k=v><>x: 1"]),
            settings(1, 1),
            RefreshTrigger::new(),
            tx,
        );
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("refresh task should stop")
            .unwrap();
    }
}
