//! In-memory page and virtual clock for exercising the automation flow.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use crate::error::AutomationError;
use crate::images::ImageSource;
use crate::page::{Clock, EditorContent, HttpReply, ImageFile, Page};
use crate::types::DownloadedImage;

/// Clock whose sleeps advance time instantly.
#[derive(Debug, Default)]
pub struct VirtualClock {
    now: Cell<Duration>,
}

impl Clock for VirtualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        self.now.set(self.now.get() + duration);
        std::future::ready(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    text: String,
    component: Option<(&'static str, &'static str)>,
    code_editor: bool,
    editable: bool,
    native_commands: bool,
    throws: bool,
    /// Becomes findable once the clock reaches this time.
    appears_at: Duration,
    events: Vec<String>,
}

impl FakeElement {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn component(instance_key: &'static str, method: &'static str) -> Self {
        Self {
            component: Some((instance_key, method)),
            ..Self::default()
        }
    }

    pub fn code_editor() -> Self {
        Self {
            code_editor: true,
            ..Self::default()
        }
    }

    pub fn editable() -> Self {
        Self {
            editable: true,
            native_commands: true,
            ..Self::default()
        }
    }

    pub fn without_native_commands(mut self) -> Self {
        self.native_commands = false;
        self
    }

    pub fn throwing(mut self) -> Self {
        self.throws = true;
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn appearing_at(mut self, at: Duration) -> Self {
        self.appears_at = at;
        self
    }
}

struct PendingUpload {
    ready_at: Duration,
    element: String,
    url: String,
}

pub struct FakePage {
    clock: VirtualClock,
    location: String,
    elements: RefCell<HashMap<String, FakeElement>>,
    uploads: RefCell<Vec<PendingUpload>>,
    /// Host that pasted images are "uploaded" to.
    upload_host: RefCell<String>,
    upload_delay: Cell<Duration>,
    draft_reply: RefCell<Option<Result<HttpReply, String>>>,
    pub posted: RefCell<Vec<(String, serde_json::Value)>>,
}

impl FakePage {
    pub fn new(location: &str) -> Self {
        Self {
            clock: VirtualClock::default(),
            location: location.to_string(),
            elements: RefCell::new(HashMap::new()),
            uploads: RefCell::new(Vec::new()),
            upload_host: RefCell::new("cdn.example.com".to_string()),
            upload_delay: Cell::new(Duration::from_millis(1_200)),
            draft_reply: RefCell::new(None),
            posted: RefCell::new(Vec::new()),
        }
    }

    pub fn insert(&self, selector: &str, element: FakeElement) {
        self.elements
            .borrow_mut()
            .insert(selector.to_string(), element);
    }

    pub fn set_upload_host(&self, host: &str) {
        *self.upload_host.borrow_mut() = host.to_string();
    }

    pub fn reply_to_posts(&self, reply: Result<HttpReply, String>) {
        *self.draft_reply.borrow_mut() = Some(reply);
    }

    pub fn text(&self, selector: &str) -> String {
        self.settle_uploads();
        self.elements
            .borrow()
            .get(selector)
            .map(|e| e.text.clone())
            .unwrap_or_default()
    }

    pub fn events(&self, selector: &str) -> Vec<String> {
        self.elements
            .borrow()
            .get(selector)
            .map(|e| e.events.clone())
            .unwrap_or_default()
    }

    fn settle_uploads(&self) {
        let now = self.clock.now();
        let mut uploads = self.uploads.borrow_mut();
        let mut elements = self.elements.borrow_mut();
        uploads.retain(|upload| {
            if upload.ready_at > now {
                return true;
            }
            if let Some(el) = elements.get_mut(&upload.element) {
                el.text.push_str(&format!("\n![image]({})\n", upload.url));
            }
            false
        });
    }

    fn with_element<T>(
        &self,
        key: &str,
        f: impl FnOnce(&mut FakeElement) -> Result<T, AutomationError>,
    ) -> Result<T, AutomationError> {
        let mut elements = self.elements.borrow_mut();
        let el = elements
            .get_mut(key)
            .ok_or_else(|| AutomationError::missing(format!("detached element {key}")))?;
        if el.throws {
            return Err(AutomationError::Script(format!("{key} threw")));
        }
        f(el)
    }
}

impl Page for FakePage {
    type Element = String;
    type Clock = VirtualClock;

    fn clock(&self) -> &VirtualClock {
        &self.clock
    }

    fn location(&self) -> String {
        self.location.clone()
    }

    fn find(&self, selector: &str) -> Option<String> {
        let now = self.clock.now();
        let elements = self.elements.borrow();
        selector
            .split(',')
            .map(str::trim)
            .find(|s| elements.get(*s).is_some_and(|e| e.appears_at <= now))
            .map(str::to_string)
    }

    fn text_of(&self, element: &String) -> String {
        self.text(element)
    }

    fn focus(&self, element: &String) {
        if let Some(el) = self.elements.borrow_mut().get_mut(element) {
            el.events.push("focus".into());
        }
    }

    fn set_field_value(&self, element: &String, value: &str) -> Result<(), AutomationError> {
        self.with_element(element, |el| {
            el.text = value.to_string();
            el.events
                .extend(["input", "change", "blur"].map(String::from));
            Ok(())
        })
    }

    fn invoke_component_method(
        &self,
        element: &String,
        instance_key: &str,
        method_path: &str,
        argument: &str,
    ) -> Result<bool, AutomationError> {
        self.with_element(element, |el| match el.component {
            Some((key, method)) if key == instance_key && method == method_path => {
                el.text = argument.to_string();
                Ok(true)
            }
            _ => Ok(false),
        })
    }

    fn set_code_editor_value(&self, element: &String, value: &str) -> Result<bool, AutomationError> {
        self.with_element(element, |el| {
            if el.code_editor {
                el.text = value.to_string();
                Ok(true)
            } else {
                Ok(false)
            }
        })
    }

    fn select_all_and_insert(
        &self,
        element: &String,
        content: EditorContent<'_>,
    ) -> Result<bool, AutomationError> {
        self.with_element(element, |el| {
            if el.editable && el.native_commands {
                el.text = content.as_str().to_string();
                Ok(true)
            } else {
                Ok(false)
            }
        })
    }

    fn overwrite_content(
        &self,
        element: &String,
        content: EditorContent<'_>,
    ) -> Result<(), AutomationError> {
        self.with_element(element, |el| {
            el.text = content.as_str().to_string();
            el.events.push("input".into());
            Ok(())
        })
    }

    fn paste_file(&self, target: &String, file: &ImageFile) -> Result<(), AutomationError> {
        if file.name.contains("broken") {
            return Ok(());
        }
        let url = format!("https://{}/{}", self.upload_host.borrow(), file.name);
        self.uploads.borrow_mut().push(PendingUpload {
            ready_at: self.clock.now() + self.upload_delay.get(),
            element: target.clone(),
            url,
        });
        Ok(())
    }

    fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> impl Future<Output = Result<HttpReply, AutomationError>> {
        self.posted
            .borrow_mut()
            .push((url.to_string(), body.clone()));
        let reply = match self.draft_reply.borrow().clone() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(e)) => Err(AutomationError::Script(e)),
            None => Err(AutomationError::Script("network unavailable".into())),
        };
        std::future::ready(reply)
    }
}

/// Serves images from memory; anything else fails to fetch.
#[derive(Default)]
pub struct StaticImages {
    images: HashMap<String, DownloadedImage>,
}

impl StaticImages {
    pub fn with(mut self, url: &str) -> Self {
        self.images.insert(
            url.to_string(),
            DownloadedImage {
                url: url.to_string(),
                // 1x1 transparent PNG header is enough for the fake page.
                base64: "iVBORw0KGgo=".to_string(),
                mime_type: "image/png".to_string(),
            },
        );
        self
    }
}

impl ImageSource for StaticImages {
    async fn fetch(&self, url: &str) -> Result<DownloadedImage, AutomationError> {
        self.images
            .get(url)
            .cloned()
            .ok_or_else(|| AutomationError::image(url, "fetch failed"))
    }
}
