//! Error types for adapters and page automation.
//!
//! Internal helpers raise these freely. The automation entry points
//! (`fill_and_publish`, `create_draft`) fold them into their result records
//! before anything crosses the page boundary.

use std::time::Duration;

use miette::Diagnostic;

/// Failures raised while automating a target page.
#[derive(thiserror::Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum AutomationError {
    /// A probe never became truthy within its budget.
    #[error("timed out after {}ms waiting for {what}", .after.as_millis())]
    #[diagnostic(code(synccaster::timeout))]
    Timeout { what: String, after: Duration },

    /// An expected element or editor is not on the page.
    #[error("page structure mismatch: {0}")]
    #[diagnostic(
        code(synccaster::structure),
        help("the platform may have changed its editor; re-check the adapter's selectors")
    )]
    StructuralMismatch(String),

    /// A request made from the page returned a non-success status.
    #[error("upstream request to {url} failed with status {status}")]
    #[diagnostic(code(synccaster::upstream))]
    Upstream {
        url: String,
        status: u16,
        #[source]
        body: Option<UpstreamBody>,
    },

    /// The payload cannot be filled at all.
    #[error("invalid payload: {0}")]
    #[diagnostic(code(synccaster::payload))]
    InvalidPayload(String),

    /// An image could not be decoded or fetched.
    #[error("image {url}: {reason}")]
    #[diagnostic(code(synccaster::image))]
    Image { url: String, reason: String },

    /// A call into page script threw.
    #[error("script error: {0}")]
    #[diagnostic(code(synccaster::script))]
    Script(String),
}

/// Response body carried as the source of an upstream failure.
#[derive(thiserror::Error, Debug)]
#[error("{0}")]
pub struct UpstreamBody(pub String);

impl AutomationError {
    pub fn timeout(what: impl Into<String>, after: Duration) -> Self {
        Self::Timeout {
            what: what.into(),
            after,
        }
    }

    pub fn missing(what: impl Into<String>) -> Self {
        Self::StructuralMismatch(what.into())
    }

    pub fn image(url: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Image {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Render the error's source chain, outermost cause first.
    ///
    /// Returns `None` when the error has no underlying cause.
    pub fn source_chain(&self) -> Option<String> {
        let mut lines = Vec::new();
        let mut current = std::error::Error::source(self);
        while let Some(cause) = current {
            lines.push(format!("caused by: {cause}"));
            current = cause.source();
        }
        if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        }
    }
}

/// Failures from the adapter contract outside of page automation.
#[derive(thiserror::Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum AdapterError {
    /// The platform has no server API; the driver must use page automation.
    #[error("{platform} has no publish API; open {platform} in a tab and use page automation instead")]
    #[diagnostic(code(synccaster::automation_only))]
    AutomationOnly { platform: &'static str },

    #[error("no adapter registered with id {0:?}")]
    #[diagnostic(code(synccaster::unknown_adapter))]
    UnknownAdapter(String),

    #[error("invalid matcher pattern {pattern:?}")]
    #[diagnostic(code(synccaster::matcher))]
    Matcher {
        pattern: String,
        #[source]
        source: regex_lite::Error,
    },

    /// The driver's API transport failed.
    #[error("publish transport failed: {0}")]
    #[diagnostic(code(synccaster::transport))]
    Transport(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_chain_includes_upstream_body() {
        let err = AutomationError::Upstream {
            url: "https://example.com/drafts".into(),
            status: 403,
            body: Some(UpstreamBody("forbidden".into())),
        };
        assert_eq!(err.source_chain().as_deref(), Some("caused by: forbidden"));
    }

    #[test]
    fn timeout_message_names_probe() {
        let err = AutomationError::timeout("title field", Duration::from_millis(1500));
        assert_eq!(
            err.to_string(),
            "timed out after 1500ms waiting for title field"
        );
        assert!(err.source_chain().is_none());
    }
}
