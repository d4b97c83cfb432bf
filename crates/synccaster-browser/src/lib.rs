//! Browser DOM layer for synccaster page automation.
//!
//! Implements the `synccaster-core` platform traits over `web-sys`. It
//! assumes a `wasm32-unknown-unknown` target running inside the target
//! platform's page.
//!
//! # Architecture
//!
//! - `inject`: prototype-setter field injection with `input`/`change`/`blur`
//! - `commands`: focus, select-all, native insert and overwrite fallback
//! - `component`: calls into framework and code-editor instances
//! - `paste`: synthetic `paste` events carrying a file
//! - `fetch`: credentialed page requests and image fetching
//! - `storage`: the handoff record in `localStorage`
//! - `init`: one-time panic hook and tracing setup
//!
//! # Re-exports
//!
//! This crate re-exports `synccaster-core` for convenience, so consumers
//! only need to depend on `synccaster-browser`.

pub use synccaster_core;
pub use synccaster_core::*;

pub mod clock;
pub mod commands;
pub mod component;
pub mod fetch;
pub mod init;
pub mod inject;
pub mod page;
pub mod paste;
pub mod storage;

pub use clock::BrowserClock;
pub use fetch::{FetchImageSource, PrefetchedImages};
pub use init::InitState;
pub use page::DomPage;
pub use storage::LocalStorageHandoff;

use wasm_bindgen::{JsCast, JsValue};

/// Best-effort message for a thrown JS value.
pub fn describe_js(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

pub(crate) fn js_error(value: JsValue) -> AutomationError {
    AutomationError::Script(describe_js(&value))
}
