//! Inter-context message dispatch.
//!
//! Requests are `{type, data}`; every request is answered with a
//! `MessageResponse`, failures included.

use serde::Deserialize;
use synccaster_browser::LocalStorageHandoff;
use synccaster_core::{
    DownloadedImage, HandoffStore, MessageRequest, MessageResponse, PlatformPayload,
};

use crate::caster::Inner;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FillRequest {
    adapter_id: String,
    payload: PlatformPayload,
    #[serde(default)]
    images: Vec<DownloadedImage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DraftRequest {
    adapter_id: String,
}

fn meta<T: serde::Serialize>(value: &T) -> Option<serde_json::Value> {
    serde_json::to_value(value).ok()
}

impl Inner {
    pub(crate) async fn handle(&self, request: MessageRequest) -> MessageResponse {
        tracing::debug!(kind = %request.kind, "message received");
        match request.kind.as_str() {
            "fillAndPublish" => match serde_json::from_value::<FillRequest>(request.data) {
                Ok(req) => {
                    let result = self.fill(&req.adapter_id, Ok(req.payload), req.images).await;
                    let meta = meta(&result);
                    let response = MessageResponse::from(result);
                    match meta {
                        Some(meta) => response.with_meta(meta),
                        None => response,
                    }
                }
                Err(e) => MessageResponse::failed(format!("Invalid fill request: {}", e)),
            },
            "createDraft" => match serde_json::from_value::<DraftRequest>(request.data) {
                Ok(req) => MessageResponse::from(self.create_draft(&req.adapter_id).await),
                Err(e) => MessageResponse::failed(format!("Invalid draft request: {}", e)),
            },
            "adapters" => match meta(&self.registry.descriptors()) {
                Some(descriptors) => MessageResponse::ok().with_meta(descriptors),
                None => MessageResponse::failed("adapter descriptors did not serialize"),
            },
            "readHandoff" => match LocalStorageHandoff.load() {
                Ok(record) => {
                    let response = MessageResponse::ok();
                    match record.as_ref().and_then(meta) {
                        Some(meta) => response.with_meta(meta),
                        None => response.with_message("no handoff record"),
                    }
                }
                Err(e) => MessageResponse::failed(e.to_string()),
            },
            other => MessageResponse::failed(format!("unknown message type {other:?}")),
        }
    }
}
