//! Platform abstraction over the page being automated.
//!
//! The automation flow is written against these traits; the browser crate
//! implements them over `web-sys`. Every primitive is a single, ordered
//! interaction with a component we do not control:
//!
//! - field value: prototype setter, then `input`, `change`, `blur`
//! - editable region: select all, then native insert; else overwrite + `input`
//! - image: focus, then `paste` carrying the file, then poll for the diff

use std::future::Future;
use std::time::Duration;

use crate::error::AutomationError;

/// Time source and cooperative delay.
pub trait Clock {
    /// Monotonic time since an arbitrary origin.
    fn now(&self) -> Duration;

    /// Yield to the page for at least `duration`.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}

/// Content handed to an editable region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorContent<'a> {
    Html(&'a str),
    Text(&'a str),
}

impl<'a> EditorContent<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            EditorContent::Html(s) | EditorContent::Text(s) => s,
        }
    }
}

/// An image ready to be pasted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Reply from a request made in page context.
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub body: serde_json::Value,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The page an automation run executes in.
pub trait Page {
    type Element: Clone;
    type Clock: Clock;

    fn clock(&self) -> &Self::Clock;

    /// Current page URL.
    fn location(&self) -> String;

    /// First element matching a CSS selector (comma lists allowed).
    fn find(&self, selector: &str) -> Option<Self::Element>;

    /// Visible text of an element; the value for text fields.
    fn text_of(&self, element: &Self::Element) -> String;

    fn focus(&self, element: &Self::Element);

    /// Set a form value so the owning framework observes it.
    ///
    /// Invokes the prototype-level `value` setter, bypassing any
    /// instance-level interception, then dispatches `input`, `change` and
    /// `blur` in that order.
    fn set_field_value(&self, element: &Self::Element, value: &str)
    -> Result<(), AutomationError>;

    /// Call a markdown-ingestion method on a framework component instance
    /// reachable from `element` under `instance_key`.
    ///
    /// `method_path` may be dotted (`$refs.editor.setValue`). Returns
    /// `Ok(false)` when the instance or method is not there.
    fn invoke_component_method(
        &self,
        element: &Self::Element,
        instance_key: &str,
        method_path: &str,
        argument: &str,
    ) -> Result<bool, AutomationError>;

    /// Set the value of a legacy code-editor widget whose container exposes
    /// its instance handle. Returns `Ok(false)` when no handle is exposed.
    fn set_code_editor_value(
        &self,
        element: &Self::Element,
        value: &str,
    ) -> Result<bool, AutomationError>;

    /// Select everything in `element` and insert `content` through the
    /// page's native editing commands. Returns `Ok(false)` when those
    /// commands are unavailable or refused.
    fn select_all_and_insert(
        &self,
        element: &Self::Element,
        content: EditorContent<'_>,
    ) -> Result<bool, AutomationError>;

    /// Replace the element's content directly and dispatch `input`.
    fn overwrite_content(
        &self,
        element: &Self::Element,
        content: EditorContent<'_>,
    ) -> Result<(), AutomationError>;

    /// Dispatch a `paste` event carrying `file` as clipboard data.
    fn paste_file(&self, target: &Self::Element, file: &ImageFile) -> Result<(), AutomationError>;

    /// Credentialed JSON POST from page context.
    fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> impl Future<Output = Result<HttpReply, AutomationError>>;
}
