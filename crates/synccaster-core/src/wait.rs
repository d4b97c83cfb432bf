//! Bounded polling for asynchronous page readiness.
//!
//! Target pages are uninstrumented, so readiness is sampled rather than
//! observed: the probe runs, then the task sleeps one interval, until the
//! probe yields a value or the budget is spent.

use std::time::Duration;

use crate::error::AutomationError;
use crate::page::Clock;

/// Default sampling interval for element lookups.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    pub timeout: Duration,
    pub interval: Duration,
}

impl WaitOptions {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// Sample `probe` until it yields a value.
///
/// Fails with [`AutomationError::Timeout`] naming `what` once `timeout` has
/// elapsed without a value. The last sample happens no earlier than the
/// deadline, so the failure lands before `timeout + interval` on a clock
/// whose sleeps are accurate.
pub async fn wait_for<C, T, F>(
    clock: &C,
    what: &str,
    options: WaitOptions,
    mut probe: F,
) -> Result<T, AutomationError>
where
    C: Clock,
    F: FnMut() -> Option<T>,
{
    let started = clock.now();
    loop {
        if let Some(found) = probe() {
            return Ok(found);
        }
        let elapsed = clock.now().saturating_sub(started);
        if elapsed >= options.timeout {
            tracing::debug!(what, elapsed_ms = elapsed.as_millis() as u64, "wait expired");
            return Err(AutomationError::timeout(what, options.timeout));
        }
        clock.sleep(options.interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::VirtualClock;

    #[tokio::test]
    async fn immediate_probe_resolves_without_sleeping() {
        let clock = VirtualClock::default();
        let found = wait_for(&clock, "ready", WaitOptions::new(Duration::from_secs(15)), || {
            Some(7)
        })
        .await
        .unwrap();
        assert_eq!(found, 7);
        assert!(clock.now() < DEFAULT_POLL_INTERVAL);
    }

    #[tokio::test]
    async fn never_ready_fails_inside_the_window() {
        let clock = VirtualClock::default();
        let timeout = Duration::from_millis(1_000);
        let err = wait_for(&clock, "title field", WaitOptions::new(timeout), || None::<()>)
            .await
            .unwrap_err();

        let elapsed = clock.now();
        assert!(elapsed >= timeout);
        assert!(elapsed < timeout + 2 * DEFAULT_POLL_INTERVAL);
        assert!(matches!(err, AutomationError::Timeout { ref what, .. } if what == "title field"));
    }

    #[tokio::test]
    async fn uneven_timeout_still_within_window() {
        let clock = VirtualClock::default();
        let timeout = Duration::from_millis(1_050);
        let options = WaitOptions::new(timeout).with_interval(Duration::from_millis(500));
        wait_for(&clock, "upload", options, || None::<()>)
            .await
            .unwrap_err();
        let elapsed = clock.now();
        assert!(elapsed >= timeout);
        assert!(elapsed < timeout + Duration::from_millis(1_000));
    }

    #[tokio::test]
    async fn probe_turning_true_later_is_seen() {
        let clock = VirtualClock::default();
        let mut calls = 0;
        let found = wait_for(&clock, "editor", WaitOptions::new(Duration::from_secs(5)), || {
            calls += 1;
            (calls == 4).then_some("editor")
        })
        .await
        .unwrap();
        assert_eq!(found, "editor");
        assert_eq!(clock.now(), 3 * DEFAULT_POLL_INTERVAL);
    }
}
