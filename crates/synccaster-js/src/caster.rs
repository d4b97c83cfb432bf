//! SyncCaster - the automation entry object for JavaScript.

use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;

use js_sys::{Function, Object, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use synccaster_browser::{DomPage, InitState, LocalStorageHandoff, PrefetchedImages};
use synccaster_core::handoff::write_back;
use synccaster_core::{
    AdapterRegistry, AuthContext, AutomationConfig, AutomationError, CanonicalPost,
    DownloadedImage, DraftResult, FillResult, HandoffStore, MessageRequest, Page,
    PlatformPayload,
};

use crate::to_js;
use crate::transport::JsTransport;

/// State shared by every call on one `SyncCaster`, including calls still
/// running after the JS side dropped its handle.
pub(crate) struct Inner {
    pub(crate) registry: AdapterRegistry,
    pub(crate) config: AutomationConfig,
    pub(crate) init: InitState,
    transport: RefCell<Option<Function>>,
}

/// Adapters and page automation, as seen from the extension.
#[wasm_bindgen]
pub struct SyncCaster {
    inner: Rc<Inner>,
}

#[wasm_bindgen]
impl SyncCaster {
    /// Create an instance with an optional `AutomationConfig` object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<SyncCaster, JsError> {
        let config = if config.is_undefined() || config.is_null() {
            AutomationConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))?
        };
        let registry = AdapterRegistry::builtin().map_err(|e| JsError::new(&e.to_string()))?;

        let inner = Inner {
            registry,
            config,
            init: InitState::new(),
            transport: RefCell::new(None),
        };
        inner.init.ensure();
        Ok(Self {
            inner: Rc::new(inner),
        })
    }

    /// Install panic reporting and logging if not already done.
    pub fn ensure(&self) {
        self.inner.init.ensure();
    }

    /// Registration descriptors for every adapter.
    pub fn adapters(&self) -> Result<JsValue, JsError> {
        to_js(&self.inner.registry.descriptors()).map_err(js_err)
    }

    /// Id of the adapter that automates `url`, if any.
    #[wasm_bindgen(js_name = adapterForUrl)]
    pub fn adapter_for_url(&self, url: &str) -> Option<String> {
        self.inner.registry.for_url(url).map(|a| a.id.to_string())
    }

    /// Page to open before automating `id`.
    #[wasm_bindgen(js_name = editorUrl)]
    pub fn editor_url(&self, id: &str) -> Result<Option<String>, JsError> {
        let adapter = self.inner.registry.require(id).map_err(js_err)?;
        Ok(adapter.editor_url().map(str::to_string))
    }

    #[wasm_bindgen(js_name = ensureAuth)]
    pub fn ensure_auth(&self, id: &str, ctx: JsValue) -> Result<JsValue, JsError> {
        let adapter = self.inner.registry.require(id).map_err(js_err)?;
        let ctx: AuthContext = if ctx.is_undefined() || ctx.is_null() {
            AuthContext::default()
        } else {
            serde_wasm_bindgen::from_value(ctx)
                .map_err(|e| JsError::new(&format!("Invalid auth context: {}", e)))?
        };
        to_js(&adapter.ensure_auth(&ctx)).map_err(js_err)
    }

    /// Shape a canonical post for `id`. Pure; callable from any context.
    pub fn transform(&self, id: &str, post: JsValue) -> Result<JsValue, JsError> {
        let adapter = self.inner.registry.require(id).map_err(js_err)?;
        let post: CanonicalPost = serde_wasm_bindgen::from_value(post)
            .map_err(|e| JsError::new(&format!("Invalid post: {}", e)))?;
        to_js(&adapter.transform(&post)).map_err(js_err)
    }

    /// Function used by `publish` for API adapters:
    /// `(adapterId, payload) => PublishOutcome | Promise<PublishOutcome>`.
    #[wasm_bindgen(js_name = setApiTransport)]
    pub fn set_api_transport(&self, send: Option<Function>) {
        *self.inner.transport.borrow_mut() = send;
    }

    /// Server-side publish. Rejects for platforms that need page automation.
    pub fn publish(&self, id: String, payload: JsValue) -> Promise {
        let inner = self.inner.clone();
        future_to_promise(async move {
            let adapter = inner.registry.require(&id).map_err(reject)?;
            let payload: PlatformPayload = serde_wasm_bindgen::from_value(payload)
                .map_err(|e| reject(format!("Invalid payload: {}", e)))?;
            let transport = JsTransport::new(inner.transport.borrow().clone());
            let outcome = adapter.publish(&payload, &transport).await.map_err(reject)?;
            to_js(&outcome).map_err(JsValue::from)
        })
    }

    /// Allocate a server-side draft. Always resolves with a `DraftResult`.
    #[wasm_bindgen(js_name = createDraft)]
    pub fn create_draft(&self, id: String) -> Promise {
        let inner = self.inner.clone();
        future_to_promise(async move {
            let result = inner.create_draft(&id).await;
            Ok(to_js(&result).unwrap_or_else(|e| draft_error_object(&e)))
        })
    }

    /// Fill the current page for `id`. Always resolves with a `FillResult`.
    ///
    /// `images` is an optional array of `DownloadedImage`; images not in it
    /// are fetched from the page.
    #[wasm_bindgen(js_name = fillAndPublish)]
    pub fn fill_and_publish(&self, id: String, payload: JsValue, images: JsValue) -> Promise {
        let inner = self.inner.clone();
        future_to_promise(async move {
            let payload = serde_wasm_bindgen::from_value::<PlatformPayload>(payload)
                .map_err(|e| e.to_string());
            let images = if images.is_undefined() || images.is_null() {
                Vec::new()
            } else {
                serde_wasm_bindgen::from_value(images).unwrap_or_else(|e| {
                    tracing::warn!("ignoring malformed prefetched images: {}", e);
                    Vec::new()
                })
            };
            let result = inner.fill(&id, payload, images).await;
            Ok(to_js(&result).unwrap_or_else(|e| fill_error_object(&e)))
        })
    }

    /// The stored handoff record, or `null`.
    #[wasm_bindgen(js_name = readHandoff)]
    pub fn read_handoff(&self) -> Result<JsValue, JsError> {
        let record = LocalStorageHandoff.load().map_err(js_err)?;
        to_js(&record).map_err(js_err)
    }

    /// Write title and content back to the handoff record.
    #[wasm_bindgen(js_name = writeHandoff)]
    pub fn write_handoff(&self, title: &str, content: &str) -> Result<JsValue, JsError> {
        let now_ms = js_sys::Date::now() as u64;
        let record = write_back(&LocalStorageHandoff, title, content, now_ms).map_err(js_err)?;
        to_js(&record).map_err(js_err)
    }

    /// Answer an inter-context message `{type, data}`. Always resolves.
    #[wasm_bindgen(js_name = handleMessage)]
    pub fn handle_message(&self, request: JsValue) -> Promise {
        let inner = self.inner.clone();
        future_to_promise(async move {
            let response = match serde_wasm_bindgen::from_value::<MessageRequest>(request) {
                Ok(request) => inner.handle(request).await,
                Err(e) => synccaster_core::MessageResponse::failed(format!(
                    "Invalid message: {}",
                    e
                )),
            };
            to_js(&response).map_err(JsValue::from)
        })
    }
}

impl Inner {
    pub(crate) async fn fill(
        &self,
        id: &str,
        payload: Result<PlatformPayload, String>,
        images: Vec<DownloadedImage>,
    ) -> FillResult {
        let page = match DomPage::current() {
            Ok(page) => page,
            Err(e) => return FillResult::failed(String::new(), &e),
        };
        let adapter = match self.registry.require(id) {
            Ok(adapter) => adapter,
            Err(e) => {
                let err = AutomationError::InvalidPayload(e.to_string());
                return FillResult::failed(page.location(), &err);
            }
        };
        let payload = match payload {
            Ok(payload) => payload,
            Err(e) => {
                let err = AutomationError::InvalidPayload(e);
                return FillResult::failed(page.location(), &err);
            }
        };

        let images = PrefetchedImages::new(images);
        tracing::info!(adapter = id, prefetched = images.len(), "fill requested");
        adapter
            .fill_and_publish(&page, &images, &payload, &self.config)
            .await
    }

    pub(crate) async fn create_draft(&self, id: &str) -> DraftResult {
        let adapter = match self.registry.require(id) {
            Ok(adapter) => adapter,
            Err(e) => return DraftResult::failed(e.to_string()),
        };
        match DomPage::current() {
            Ok(page) => adapter.create_draft(&page).await,
            Err(e) => DraftResult::failed(e.to_string()),
        }
    }
}

fn js_err(e: impl Display) -> JsError {
    JsError::new(&e.to_string())
}

fn reject(e: impl Display) -> JsValue {
    js_err(e).into()
}

/// Hand-built result records for the case where serialization itself fails.
fn fill_error_object(e: &serde_wasm_bindgen::Error) -> JsValue {
    let error = Object::new();
    let _ = Reflect::set(&error, &"message".into(), &e.to_string().into());
    let result = Object::new();
    let _ = Reflect::set(&result, &"url".into(), &"".into());
    let _ = Reflect::set(&result, &"__synccasterError".into(), &error);
    result.into()
}

fn draft_error_object(e: &serde_wasm_bindgen::Error) -> JsValue {
    let result = Object::new();
    let _ = Reflect::set(&result, &"success".into(), &false.into());
    let _ = Reflect::set(&result, &"error".into(), &e.to_string().into());
    result.into()
}
