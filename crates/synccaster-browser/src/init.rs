//! One-time setup of panic reporting and logging.

use std::cell::Cell;

/// Setup state owned by whoever drives automation in this page.
#[derive(Debug, Default)]
pub struct InitState {
    ready: Cell<bool>,
}

impl InitState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the panic hook and tracing subscriber if not yet done.
    ///
    /// Safe to call any number of times. A subscriber installed earlier by
    /// someone else is left in place.
    pub fn ensure(&self) {
        if self.ready.replace(true) {
            return;
        }

        console_error_panic_hook::set_once();

        use tracing::Level;
        use tracing::subscriber::set_global_default;
        use tracing_subscriber::Registry;
        use tracing_subscriber::layer::SubscriberExt;

        let console_level = if cfg!(debug_assertions) {
            Level::DEBUG
        } else {
            Level::INFO
        };

        let wasm_layer = tracing_wasm::WASMLayer::new(
            tracing_wasm::WASMLayerConfigBuilder::new()
                .set_max_level(console_level)
                .build(),
        );

        let reg = Registry::default().with(wasm_layer);
        if set_global_default(reg).is_err() {
            tracing::debug!("tracing subscriber already installed");
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready.get()
    }
}
