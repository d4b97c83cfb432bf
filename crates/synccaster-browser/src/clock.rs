//! Page clock: `Performance.now()` for time, `setTimeout` for delays.

use std::future::Future;
use std::time::Duration;

use synccaster_core::Clock;
use synccaster_core::config::MAX_TIMER_MS;

#[derive(Debug, Clone)]
pub struct BrowserClock {
    performance: Option<web_sys::Performance>,
}

impl BrowserClock {
    pub fn new() -> Self {
        Self {
            performance: web_sys::window().and_then(|w| w.performance()),
        }
    }
}

impl Default for BrowserClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for BrowserClock {
    fn now(&self) -> Duration {
        // Date.now() is coarser but always present, e.g. in sandboxed frames.
        let ms = self
            .performance
            .as_ref()
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now);
        Duration::from_secs_f64(ms.max(0.0) / 1000.0)
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        // gloo throws on delays past u32 milliseconds.
        gloo_timers::future::sleep(duration.min(Duration::from_millis(MAX_TIMER_MS)))
    }
}
