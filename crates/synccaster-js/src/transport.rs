//! API publishing through a driver-supplied JS function.

use js_sys::{Function, Promise};
use synccaster_browser::describe_js;
use synccaster_core::{AdapterError, ApiTransport, PlatformPayload, PublishOutcome};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

use crate::to_js;

/// Calls `send(adapterId, payload)`; the return value may be a promise.
pub(crate) struct JsTransport {
    send: Option<Function>,
}

impl JsTransport {
    pub(crate) fn new(send: Option<Function>) -> Self {
        Self { send }
    }
}

impl ApiTransport for JsTransport {
    async fn publish(
        &self,
        adapter_id: &str,
        payload: &PlatformPayload,
    ) -> Result<PublishOutcome, AdapterError> {
        let Some(send) = &self.send else {
            return Err(AdapterError::Transport("no API transport configured".into()));
        };
        let payload = to_js(payload).map_err(|e| AdapterError::Transport(e.to_string()))?;
        let returned = send
            .call2(&JsValue::NULL, &JsValue::from_str(adapter_id), &payload)
            .map_err(|e| AdapterError::Transport(describe_js(&e)))?;
        let outcome = JsFuture::from(Promise::resolve(&returned))
            .await
            .map_err(|e| AdapterError::Transport(describe_js(&e)))?;
        serde_wasm_bindgen::from_value(outcome).map_err(|e| AdapterError::Transport(e.to_string()))
    }
}
