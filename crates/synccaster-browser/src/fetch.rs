//! Network access from inside the target page.
//!
//! Requests carry the page's cookies, so they act as the logged-in user.

use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use js_sys::Uint8Array;
use synccaster_core::{AutomationError, DownloadedImage, HttpReply, ImageSource};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, RequestCredentials, RequestInit, RequestMode, Response};

use crate::js_error;

async fn send(url: &str, init: &RequestInit) -> Result<Response, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let response = JsFuture::from(window.fetch_with_str_and_init(url, init)).await?;
    response.dyn_into::<Response>()
}

/// POST `body` as JSON with the page's credentials.
///
/// Non-2xx replies are returned, not raised; the body is parsed as JSON
/// when possible and kept as a string otherwise.
pub async fn post_json(url: &str, body: &serde_json::Value) -> Result<HttpReply, AutomationError> {
    let headers = Headers::new().map_err(js_error)?;
    headers
        .set("Content-Type", "application/json")
        .map_err(js_error)?;

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_credentials(RequestCredentials::Include);
    init.set_headers(&headers);
    init.set_body(&JsValue::from_str(&body.to_string()));

    let response = send(url, &init).await.map_err(js_error)?;
    let status = response.status();
    let text = JsFuture::from(response.text().map_err(js_error)?)
        .await
        .map_err(js_error)?
        .as_string()
        .unwrap_or_default();

    let body = if text.trim().is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
    };
    tracing::debug!(url, status, "page request finished");
    Ok(HttpReply { status, body })
}

/// Fetches original images from the page.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchImageSource;

impl ImageSource for FetchImageSource {
    async fn fetch(&self, url: &str) -> Result<DownloadedImage, AutomationError> {
        let init = RequestInit::new();
        init.set_method("GET");
        init.set_mode(RequestMode::Cors);

        let response = send(url, &init)
            .await
            .map_err(|e| AutomationError::image(url, crate::describe_js(&e)))?;
        if !response.ok() {
            return Err(AutomationError::image(
                url,
                format!("status {}", response.status()),
            ));
        }

        let mime_type = response
            .headers()
            .get("Content-Type")
            .ok()
            .flatten()
            .and_then(|ct| ct.split(';').next().map(|m| m.trim().to_string()))
            .unwrap_or_default();

        let buffer = response
            .array_buffer()
            .map_err(|e| AutomationError::image(url, crate::describe_js(&e)))?;
        let buffer = JsFuture::from(buffer)
            .await
            .map_err(|e| AutomationError::image(url, crate::describe_js(&e)))?;
        let bytes = Uint8Array::new(&buffer).to_vec();

        Ok(DownloadedImage {
            url: url.to_string(),
            base64: BASE64.encode(bytes),
            mime_type,
        })
    }
}

/// Images the driver already downloaded, with page fetch as the fallback.
#[derive(Debug, Clone, Default)]
pub struct PrefetchedImages {
    images: HashMap<String, DownloadedImage>,
    fallback: FetchImageSource,
}

impl PrefetchedImages {
    pub fn new(images: impl IntoIterator<Item = DownloadedImage>) -> Self {
        Self {
            images: images.into_iter().map(|i| (i.url.clone(), i)).collect(),
            fallback: FetchImageSource,
        }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl ImageSource for PrefetchedImages {
    async fn fetch(&self, url: &str) -> Result<DownloadedImage, AutomationError> {
        match self.images.get(url) {
            Some(image) => Ok(image.clone()),
            None => {
                tracing::debug!(url, "image not prefetched, fetching from page");
                self.fallback.fetch(url).await
            }
        }
    }
}
