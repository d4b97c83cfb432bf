use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::images::UploadTiming;
use crate::wait::{DEFAULT_POLL_INTERVAL, WaitOptions};

/// Longest delay a browser timer accepts, in milliseconds.
pub const MAX_TIMER_MS: u64 = u32::MAX as u64;

fn millis(ms: u64) -> Duration {
    Duration::from_millis(ms.min(MAX_TIMER_MS))
}

/// Timing knobs for automation runs, supplied by the driver.
///
/// Every field has a default, so `{}` is a valid configuration. Values are
/// capped at [`MAX_TIMER_MS`] when turned into durations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutomationConfig {
    /// Sampling interval for element lookups.
    pub poll_interval_ms: u64,
    /// Sampling interval while waiting for a pasted image's hosted URL.
    pub upload_poll_interval_ms: u64,
    /// Budget for a single image upload.
    pub upload_timeout_ms: u64,
    /// Fixed delay after a UI mutation before the next step reads state.
    pub settle_delay_ms: u64,
    /// Overrides every adapter's own element-wait budget when set.
    pub wait_timeout_ms: Option<u64>,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            upload_poll_interval_ms: 500,
            upload_timeout_ms: 15_000,
            settle_delay_ms: 300,
            wait_timeout_ms: None,
        }
    }
}

impl AutomationConfig {
    pub fn settle_delay(&self) -> Duration {
        millis(self.settle_delay_ms)
    }

    /// Element-wait options, given the adapter's own tuned budget.
    pub fn element_wait(&self, adapter_budget: Duration) -> WaitOptions {
        let timeout = self
            .wait_timeout_ms
            .map(millis)
            .unwrap_or(adapter_budget);
        WaitOptions::new(timeout).with_interval(millis(self.poll_interval_ms.max(1)))
    }

    pub fn upload_timing(&self) -> UploadTiming {
        UploadTiming {
            wait: WaitOptions::new(millis(self.upload_timeout_ms))
                .with_interval(millis(self.upload_poll_interval_ms.max(1))),
            settle: self.settle_delay(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config: AutomationConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AutomationConfig::default());
        assert_eq!(config.upload_timing().wait.interval, Duration::from_millis(500));
    }

    #[test]
    fn override_replaces_adapter_budget() {
        let config: AutomationConfig =
            serde_json::from_str(r#"{"waitTimeoutMs": 2000, "pollIntervalMs": 50}"#).unwrap();
        let wait = config.element_wait(Duration::from_secs(30));
        assert_eq!(wait.timeout, Duration::from_secs(2));
        assert_eq!(wait.interval, Duration::from_millis(50));

        let wait = AutomationConfig::default().element_wait(Duration::from_secs(30));
        assert_eq!(wait.timeout, Duration::from_secs(30));
    }

    #[test]
    fn oversized_values_are_capped_to_timer_range() {
        let config: AutomationConfig = serde_json::from_str(
            r#"{"settleDelayMs": 5000000000, "pollIntervalMs": 5000000000,
                "uploadPollIntervalMs": 18446744073709551615, "waitTimeoutMs": 5000000000}"#,
        )
        .unwrap();
        let cap = Duration::from_millis(MAX_TIMER_MS);
        assert_eq!(config.settle_delay(), cap);
        let wait = config.element_wait(Duration::from_secs(30));
        assert_eq!(wait.interval, cap);
        assert_eq!(wait.timeout, cap);
        assert_eq!(config.upload_timing().wait.interval, cap);
    }
}
