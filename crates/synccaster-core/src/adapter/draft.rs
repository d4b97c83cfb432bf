use serde::Serialize;

use crate::error::{AutomationError, UpstreamBody};
use crate::page::Page;

/// Server call that allocates an editable draft.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftEndpoint {
    pub url: &'static str,
    #[serde(skip)]
    pub body: fn() -> serde_json::Value,
    /// Field of the JSON reply holding the draft id.
    pub id_field: &'static str,
    /// Editable page for a draft; `{id}` is replaced with the draft id.
    pub edit_url: &'static str,
}

impl DraftEndpoint {
    /// Allocate a draft and return its edit URL.
    pub async fn request<P: Page>(&self, page: &P) -> Result<String, AutomationError> {
        let reply = page.post_json(self.url, &(self.body)()).await?;
        if !reply.is_success() {
            let body = match &reply.body {
                serde_json::Value::Null => None,
                other => Some(UpstreamBody(truncate(&other.to_string(), 200))),
            };
            return Err(AutomationError::Upstream {
                url: self.url.to_string(),
                status: reply.status,
                body,
            });
        }

        let id = match reply.body.get(self.id_field) {
            Some(serde_json::Value::String(s)) if !s.is_empty() => s.clone(),
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => {
                return Err(AutomationError::missing(format!(
                    "draft reply has no {:?} field",
                    self.id_field
                )));
            }
        };
        Ok(self.edit_url.replace("{id}", &id))
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &s[..idx]),
        None => s.to_string(),
    }
}
