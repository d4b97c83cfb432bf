use serde::Serialize;

use super::{Adapter, AdapterKind, Capabilities, platforms};
use crate::error::AdapterError;

/// Immutable set of adapters, looked up by id or by page URL.
#[derive(Debug, Clone)]
pub struct AdapterRegistry {
    adapters: Vec<Adapter>,
}

impl AdapterRegistry {
    pub fn new(adapters: Vec<Adapter>) -> Self {
        Self { adapters }
    }

    /// Registry of every bundled platform.
    pub fn builtin() -> Result<Self, AdapterError> {
        Ok(Self::new(platforms::all()?))
    }

    pub fn get(&self, id: &str) -> Option<&Adapter> {
        self.adapters.iter().find(|a| a.id == id)
    }

    pub fn require(&self, id: &str) -> Result<&Adapter, AdapterError> {
        self.get(id)
            .ok_or_else(|| AdapterError::UnknownAdapter(id.to_string()))
    }

    /// First adapter whose matchers accept `url`.
    pub fn for_url(&self, url: &str) -> Option<&Adapter> {
        self.adapters.iter().find(|a| a.matches_url(url))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Adapter> {
        self.adapters.iter()
    }

    pub fn descriptors(&self) -> Vec<AdapterDescriptor> {
        self.adapters.iter().map(AdapterDescriptor::from).collect()
    }
}

/// What the driver sees of an adapter.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdapterDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: AdapterKind,
    pub icon: &'static str,
    pub capabilities: Capabilities,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dom: Option<DomDescriptor>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomDescriptor {
    pub matchers: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor_url: Option<&'static str>,
    pub has_create_draft: bool,
    pub withholds_submit: bool,
}

impl From<&Adapter> for AdapterDescriptor {
    fn from(adapter: &Adapter) -> Self {
        Self {
            id: adapter.id,
            name: adapter.name,
            kind: adapter.kind,
            icon: adapter.icon,
            capabilities: adapter.capabilities,
            dom: adapter.dom.as_ref().map(|dom| DomDescriptor {
                matchers: dom.matchers.patterns().collect(),
                editor_url: dom.editor_url,
                has_create_draft: dom.draft.is_some(),
                withholds_submit: dom.submit.note().is_some(),
            }),
        }
    }
}
