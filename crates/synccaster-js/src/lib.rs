//! WASM bindings for synccaster.
//!
//! Exposes a `SyncCaster` object to the extension. The automation entry
//! points (`fillAndPublish`, `createDraft`) return promises that always
//! resolve with a result record, whatever happens in the page.
//!
//! Panic hook and logging are installed by the first `SyncCaster` created
//! (or by an explicit `ensure()`), not at module start.

mod caster;
mod messages;
mod transport;

pub use caster::*;

use serde::Serialize;
use wasm_bindgen::JsValue;

/// Serialize to plain JS objects (not `Map`s), matching the driver's JSON.
pub(crate) fn to_js<T: Serialize + ?Sized>(
    value: &T,
) -> Result<JsValue, serde_wasm_bindgen::Error> {
    value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
}
