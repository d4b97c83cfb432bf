//! Editor bridge: detect which editor a page embeds and fill it.
//!
//! Each platform declares an ordered chain of strategies. The chain is
//! tried front to back and stops at the first strategy that both detects
//! its editor and fills it. A strategy that raises only disables itself.

use serde::Serialize;

use crate::error::AutomationError;
use crate::page::{EditorContent, Page};

/// One way of writing content into an embedded editor.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EditorStrategy {
    /// A framework component instance hung off `selector`'s element under
    /// `instance_key`, exposing a markdown-ingestion method.
    #[serde(rename_all = "camelCase")]
    ComponentMethod {
        selector: &'static str,
        instance_key: &'static str,
        method: &'static str,
    },
    /// A legacy code-editor widget whose container exposes its instance.
    CodeEditor { selector: &'static str },
    /// A plain form field, set through the field-injection primitive.
    Field { selector: &'static str },
    /// A raw rich-text region. Inserts HTML when `html` is set and HTML
    /// content is available, plain markdown text otherwise.
    Editable { selector: &'static str, html: bool },
}

impl EditorStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            EditorStrategy::ComponentMethod { .. } => "component-method",
            EditorStrategy::CodeEditor { .. } => "code-editor",
            EditorStrategy::Field { .. } => "field",
            EditorStrategy::Editable { .. } => "editable",
        }
    }

    pub fn selector(&self) -> &'static str {
        match self {
            EditorStrategy::ComponentMethod { selector, .. }
            | EditorStrategy::CodeEditor { selector }
            | EditorStrategy::Field { selector }
            | EditorStrategy::Editable { selector, .. } => selector,
        }
    }

    /// Locate this strategy's editor element, if present.
    pub fn detect<P: Page>(&self, page: &P) -> Option<P::Element> {
        page.find(self.selector())
    }

    /// Write `markdown` (or `html`, where preferred) into `element`.
    ///
    /// `Ok(false)` means the editor turned out not to be the kind this
    /// strategy drives, e.g. no component instance was reachable.
    pub fn fill<P: Page>(
        &self,
        page: &P,
        element: &P::Element,
        markdown: &str,
        html: Option<&str>,
    ) -> Result<bool, AutomationError> {
        match self {
            EditorStrategy::ComponentMethod {
                instance_key,
                method,
                ..
            } => page.invoke_component_method(element, instance_key, method, markdown),
            EditorStrategy::CodeEditor { .. } => page.set_code_editor_value(element, markdown),
            EditorStrategy::Field { .. } => page.set_field_value(element, markdown).map(|_| true),
            EditorStrategy::Editable { html: prefer_html, .. } => {
                let content = match html {
                    Some(html) if *prefer_html => EditorContent::Html(html),
                    _ => EditorContent::Text(markdown),
                };
                page.focus(element);
                if page.select_all_and_insert(element, content)? {
                    return Ok(true);
                }
                tracing::debug!("native editing commands unavailable, overwriting content");
                page.overwrite_content(element, content)?;
                Ok(true)
            }
        }
    }
}

/// Find the first element any strategy in `chain` would drive.
pub fn locate_editor<P: Page>(page: &P, chain: &[EditorStrategy]) -> Option<P::Element> {
    chain.iter().find_map(|strategy| strategy.detect(page))
}

/// Fill the editor through the first strategy in `chain` that succeeds.
///
/// Returns the name of the strategy that filled the editor.
pub fn fill_editor<P: Page>(
    page: &P,
    chain: &[EditorStrategy],
    markdown: &str,
    html: Option<&str>,
) -> Result<&'static str, AutomationError> {
    let mut tried = Vec::with_capacity(chain.len());
    for strategy in chain {
        let Some(element) = strategy.detect(page) else {
            continue;
        };
        tried.push(strategy.name());
        match strategy.fill(page, &element, markdown, html) {
            Ok(true) => {
                tracing::info!(strategy = strategy.name(), "editor filled");
                return Ok(strategy.name());
            }
            Ok(false) => {
                tracing::debug!(strategy = strategy.name(), "editor handle not reachable");
            }
            Err(e) => {
                tracing::warn!(strategy = strategy.name(), error = %e, "fill strategy failed");
            }
        }
    }

    if tried.is_empty() {
        Err(AutomationError::missing("no supported editor found on page"))
    } else {
        Err(AutomationError::missing(format!(
            "every editor strategy failed (tried {})",
            tried.join(", ")
        )))
    }
}
