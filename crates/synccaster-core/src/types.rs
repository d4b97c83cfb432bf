//! Records exchanged with the driver.
//!
//! Field names follow the driver's JSON shapes (camelCase, plus the
//! `__synccaster*` markers on fill results).

use serde::{Deserialize, Serialize};

use crate::error::AutomationError;

/// The authored source document. Owned by the caller; adapters only read it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalPost {
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "body_md")]
    pub body_md: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<Asset>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    #[default]
    Image,
    Other,
}

/// A file referenced by the post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub url: String,
    #[serde(default, rename = "type")]
    pub kind: AssetKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl Asset {
    pub fn image(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: AssetKind::Image,
            alt: None,
        }
    }
}

/// Platform-shaped projection of a post, produced by `transform` and
/// consumed once by `fill_and_publish`.
///
/// Every field is defaulted so a malformed payload still deserialises and
/// gets reported through the fill result instead of failing at the boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_markdown: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_html: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default)]
    pub meta: PayloadMeta,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadMeta {
    #[serde(default)]
    pub assets: Vec<Asset>,
}

impl PlatformPayload {
    /// Original URLs of the image assets, in document order, without repeats.
    pub fn image_urls(&self) -> Vec<String> {
        let mut urls: Vec<String> = Vec::new();
        for asset in &self.meta.assets {
            if asset.kind == AssetKind::Image && !urls.contains(&asset.url) {
                urls.push(asset.url.clone());
            }
        }
        urls
    }
}

/// Outcome of a login capability check. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResult {
    #[serde(rename = "type")]
    pub kind: String,
    pub valid: bool,
}

/// What the driver knows about the browser session when checking auth.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthContext {
    /// Names of cookies present for the platform's domain, if the driver
    /// looked them up.
    #[serde(default)]
    pub cookie_names: Option<Vec<String>>,
}

/// Result of a server-side publish for API adapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishOutcome {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<String>,
}

/// Image bytes fetched for upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadedImage {
    /// The URL the image was fetched from, as it appears in the markdown.
    pub url: String,
    /// Base64 data, optionally as a `data:` URL.
    pub base64: String,
    pub mime_type: String,
}

/// Error details embedded in a failed fill result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl From<&AutomationError> for ErrorInfo {
    fn from(err: &AutomationError) -> Self {
        Self {
            message: err.to_string(),
            stack: err.source_chain(),
        }
    }
}

/// What `fill_and_publish` resolves with, success or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillResult {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_url: Option<String>,
    /// Set when content is filled but the driver must not submit.
    #[serde(
        default,
        rename = "__synccasterNote",
        skip_serializing_if = "Option::is_none"
    )]
    pub note: Option<String>,
    #[serde(
        default,
        rename = "__synccasterError",
        skip_serializing_if = "Option::is_none"
    )]
    pub error: Option<ErrorInfo>,
}

impl FillResult {
    pub fn filled(url: String, edit_url: Option<String>, note: Option<String>) -> Self {
        Self {
            url,
            edit_url,
            note,
            error: None,
        }
    }

    pub fn failed(url: String, err: &AutomationError) -> Self {
        Self {
            url,
            edit_url: None,
            note: None,
            error: Some(ErrorInfo::from(err)),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Result of asking a platform to allocate a draft.
///
/// Serialises as `{success: true, draftUrl}` or `{success: false, error}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DraftResult {
    pub fn created(draft_url: String) -> Self {
        Self {
            success: true,
            draft_url: Some(draft_url),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            draft_url: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_result_uses_marker_fields() {
        let err = AutomationError::missing("editor");
        let failed = FillResult::failed("https://example.com/write".into(), &err);
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(
            json["__synccasterError"]["message"],
            "page structure mismatch: editor"
        );
        assert!(json.get("__synccasterNote").is_none());
        assert!(json.get("editUrl").is_none());

        let ok = FillResult::filled(
            "https://example.com/write".into(),
            Some("https://example.com/p/1/edit".into()),
            Some("submit manually".into()),
        );
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["editUrl"], "https://example.com/p/1/edit");
        assert_eq!(json["__synccasterNote"], "submit manually");
        assert!(json.get("__synccasterError").is_none());
    }

    #[test]
    fn payload_without_title_still_parses() {
        let payload: PlatformPayload =
            serde_json::from_str(r#"{"contentMarkdown": ""}"#).unwrap();
        assert!(payload.title.is_empty());
        assert_eq!(payload.content_markdown.as_deref(), Some(""));
        assert!(payload.meta.assets.is_empty());
    }

    #[test]
    fn draft_result_shapes() {
        let ok = serde_json::to_value(DraftResult::created("https://x/p/1/edit".into())).unwrap();
        assert_eq!(ok, serde_json::json!({"success": true, "draftUrl": "https://x/p/1/edit"}));
        let err = serde_json::to_value(DraftResult::failed("HTTP 500")).unwrap();
        assert_eq!(err, serde_json::json!({"success": false, "error": "HTTP 500"}));
    }

    #[test]
    fn image_urls_skip_other_assets_and_repeats() {
        let mut payload = PlatformPayload::default();
        payload.meta.assets = vec![
            Asset::image("https://a.example/1.png"),
            Asset {
                url: "https://a.example/file.zip".into(),
                kind: AssetKind::Other,
                alt: None,
            },
            Asset::image("https://a.example/1.png"),
            Asset::image("https://a.example/2.png"),
        ];
        assert_eq!(
            payload.image_urls(),
            vec!["https://a.example/1.png", "https://a.example/2.png"]
        );
    }
}
