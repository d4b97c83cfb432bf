//! Record used to hand a document between extension contexts.
//!
//! The record lives in the browser's persistent key-value store under
//! [`HANDOFF_STORAGE_KEY`]. Automation only reads title and content from it;
//! writes replace title, content and timestamp, and keep the prior `id` and
//! `sourceUrl`.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};

pub const HANDOFF_STORAGE_KEY: &str = "synccaster:handoff";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandoffRecord {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub updated_at: u64,
}

impl HandoffRecord {
    /// Fresh record for content that has no prior handoff.
    pub fn new(title: impl Into<String>, content: impl Into<String>, now_ms: u64) -> Self {
        Self {
            id: format!("handoff-{now_ms}"),
            title: title.into(),
            content: content.into(),
            source_url: None,
            updated_at: now_ms,
        }
    }

    /// Successor record with new title and content.
    pub fn with_content(
        &self,
        title: impl Into<String>,
        content: impl Into<String>,
        now_ms: u64,
    ) -> Self {
        Self {
            id: self.id.clone(),
            title: title.into(),
            content: content.into(),
            source_url: self.source_url.clone(),
            updated_at: now_ms.max(self.updated_at),
        }
    }
}

#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum HandoffError {
    #[error("handoff storage failed: {0}")]
    #[diagnostic(code(synccaster::handoff::storage))]
    Storage(String),

    #[error("stored handoff record is malformed")]
    #[diagnostic(code(synccaster::handoff::malformed))]
    Malformed(#[source] serde_json::Error),
}

/// Persistent home of the single handoff record.
pub trait HandoffStore {
    fn load(&self) -> Result<Option<HandoffRecord>, HandoffError>;
    fn save(&self, record: &HandoffRecord) -> Result<(), HandoffError>;
}

/// Write `title` and `content` back, keeping identity from any prior record.
pub fn write_back<S: HandoffStore>(
    store: &S,
    title: &str,
    content: &str,
    now_ms: u64,
) -> Result<HandoffRecord, HandoffError> {
    let record = match store.load()? {
        Some(prior) => prior.with_content(title, content, now_ms),
        None => HandoffRecord::new(title, content, now_ms),
    };
    store.save(&record)?;
    tracing::debug!(id = %record.id, "handoff record saved");
    Ok(record)
}
