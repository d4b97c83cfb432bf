//! The adapter contract every platform integration satisfies.
//!
//! An [`Adapter`] is a declarative description of one platform: how to
//! check login, how to shape a post for it, and, for platforms without a
//! server API, how to automate its authoring page. Adapters are built once
//! by the [`AdapterRegistry`] and never change afterwards.

mod draft;
mod platforms;
mod registry;
mod transform;

use std::future::Future;
use std::time::Duration;

use serde::Serialize;

pub use draft::DraftEndpoint;
pub use registry::{AdapterDescriptor, AdapterRegistry};
pub use transform::collect_markdown_images;

use crate::editor::EditorStrategy;
use crate::error::AdapterError;
use crate::images::ImagePolicy;
use crate::matcher::UrlMatchers;
use crate::types::{AuthContext, AuthResult, PlatformPayload, PublishOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdapterKind {
    /// Publishes through a server API.
    Api,
    /// Has no server API; publishes through page automation.
    Dom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageUpload {
    /// Images are uploaded by pasting into the page's editor.
    Dom,
    /// Images are uploaded through the platform API.
    Api,
    /// Images are left as external links.
    None,
}

/// Throughput the driver should respect. Declarative only; adapters never
/// enforce it themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimit {
    pub rpm: u32,
    pub concurrent: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub dom_automation: bool,
    pub supports_markdown: bool,
    pub supports_html: bool,
    pub supports_tags: bool,
    pub supports_categories: bool,
    pub supports_cover: bool,
    pub supports_schedule: bool,
    pub image_upload: ImageUpload,
    pub rate_limit: RateLimit,
}

/// Whether the driver may submit once content is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "reason", rename_all = "camelCase")]
pub enum SubmitPolicy {
    /// Submission needs choices automation cannot safely make; the fill
    /// result carries this note and the driver must not auto-submit.
    Withhold(&'static str),
    /// Nothing on the page needs a human decision before submitting.
    DriverMay,
}

impl SubmitPolicy {
    pub fn note(&self) -> Option<String> {
        match self {
            SubmitPolicy::Withhold(reason) => Some((*reason).to_string()),
            SubmitPolicy::DriverMay => None,
        }
    }
}

/// Page-automation half of an adapter.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomAutomation {
    /// Pages this adapter operates on, in priority order.
    pub matchers: UrlMatchers,
    /// Page to open before automation begins.
    pub editor_url: Option<&'static str>,
    /// Present for platforms that need a server-side draft before any
    /// editable page exists.
    pub draft: Option<DraftEndpoint>,
    pub title_selector: &'static str,
    pub editor: Vec<EditorStrategy>,
    pub images: Option<ImagePolicy>,
    /// How long to wait for the page's fields to appear.
    #[serde(serialize_with = "serialize_millis")]
    pub wait_timeout: Duration,
    pub submit: SubmitPolicy,
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

impl DomAutomation {
    pub fn editor_url(&self) -> Option<&'static str> {
        self.editor_url
    }
}

/// Sends a payload to a platform API on behalf of an API adapter.
pub trait ApiTransport {
    fn publish(
        &self,
        adapter_id: &str,
        payload: &PlatformPayload,
    ) -> impl Future<Output = Result<PublishOutcome, AdapterError>>;
}

/// One publishing platform.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Adapter {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: AdapterKind,
    pub icon: &'static str,
    pub capabilities: Capabilities,
    /// Cookie whose presence proves a logged-in session.
    #[serde(skip)]
    pub session_cookie: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dom: Option<DomAutomation>,
}

impl Adapter {
    /// Capability check for a usable session.
    ///
    /// Without cookie information from the driver the session is assumed
    /// valid; an unauthenticated editor page then surfaces as a structural
    /// mismatch during automation.
    pub fn ensure_auth(&self, ctx: &AuthContext) -> AuthResult {
        let valid = match (self.session_cookie, ctx.cookie_names.as_deref()) {
            (Some(cookie), Some(names)) => names.iter().any(|n| n == cookie),
            _ => true,
        };
        AuthResult {
            kind: "cookie".to_string(),
            valid,
        }
    }

    /// Publish through the platform API.
    ///
    /// Always fails for DOM adapters: those platforms have no server path
    /// and must go through [`Adapter::fill_and_publish`].
    pub async fn publish<T: ApiTransport>(
        &self,
        payload: &PlatformPayload,
        transport: &T,
    ) -> Result<PublishOutcome, AdapterError> {
        match self.kind {
            AdapterKind::Dom => Err(AdapterError::AutomationOnly { platform: self.name }),
            AdapterKind::Api => transport.publish(self.id, payload).await,
        }
    }

    pub fn editor_url(&self) -> Option<&'static str> {
        self.dom.as_ref().and_then(DomAutomation::editor_url)
    }

    /// Whether this adapter automates the page at `url`.
    pub fn matches_url(&self, url: &str) -> bool {
        self.dom.as_ref().is_some_and(|dom| dom.matchers.matches(url))
    }
}
