//! Request/response shapes exchanged between extension contexts.

use serde::{Deserialize, Serialize};

use crate::types::{DraftResult, FillResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRequest {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MessageResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = Some(meta);
        self
    }
}

impl From<FillResult> for MessageResponse {
    fn from(result: FillResult) -> Self {
        match result.error {
            Some(error) => MessageResponse::failed(error.message).with_url(result.url),
            None => {
                let response = MessageResponse::ok().with_url(result.edit_url.unwrap_or(result.url));
                match result.note {
                    Some(note) => response.with_message(note),
                    None => response,
                }
            }
        }
    }
}

impl From<DraftResult> for MessageResponse {
    fn from(result: DraftResult) -> Self {
        match (result.success, result.draft_url) {
            (true, Some(url)) => MessageResponse::ok().with_url(url),
            _ => MessageResponse::failed(
                result
                    .error
                    .unwrap_or_else(|| "draft creation failed".to_string()),
            ),
        }
    }
}
