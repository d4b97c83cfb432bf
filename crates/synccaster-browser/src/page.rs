//! The live document as an automation `Page`.

use std::future::Future;

use synccaster_core::{AutomationError, EditorContent, HttpReply, ImageFile, Page};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlInputElement, HtmlTextAreaElement, Window};

use crate::{BrowserClock, commands, component, fetch, inject, js_error, paste};

pub struct DomPage {
    window: Window,
    document: Document,
    clock: BrowserClock,
}

impl DomPage {
    /// The page this module was loaded into.
    pub fn current() -> Result<Self, AutomationError> {
        let window = web_sys::window()
            .ok_or_else(|| AutomationError::Script("no window in this context".into()))?;
        let document = window
            .document()
            .ok_or_else(|| AutomationError::Script("window has no document".into()))?;
        Ok(Self {
            window,
            document,
            clock: BrowserClock::new(),
        })
    }
}

impl Page for DomPage {
    type Element = Element;
    type Clock = BrowserClock;

    fn clock(&self) -> &BrowserClock {
        &self.clock
    }

    fn location(&self) -> String {
        self.window.location().href().unwrap_or_default()
    }

    fn find(&self, selector: &str) -> Option<Element> {
        match self.document.query_selector(selector) {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(selector, "invalid selector: {:?}", e);
                None
            }
        }
    }

    fn text_of(&self, element: &Element) -> String {
        if let Some(input) = element.dyn_ref::<HtmlTextAreaElement>() {
            return input.value();
        }
        if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
            return input.value();
        }
        element.text_content().unwrap_or_default()
    }

    fn focus(&self, element: &Element) {
        commands::focus(element);
    }

    fn set_field_value(&self, element: &Element, value: &str) -> Result<(), AutomationError> {
        inject::set_native_value(element, value).map_err(js_error)
    }

    fn invoke_component_method(
        &self,
        element: &Element,
        instance_key: &str,
        method_path: &str,
        argument: &str,
    ) -> Result<bool, AutomationError> {
        component::invoke_method(element, instance_key, method_path, argument).map_err(js_error)
    }

    fn set_code_editor_value(&self, element: &Element, value: &str) -> Result<bool, AutomationError> {
        component::set_code_editor_value(element, value).map_err(js_error)
    }

    fn select_all_and_insert(
        &self,
        element: &Element,
        content: EditorContent<'_>,
    ) -> Result<bool, AutomationError> {
        commands::select_all_and_insert(element, content).map_err(js_error)
    }

    fn overwrite_content(
        &self,
        element: &Element,
        content: EditorContent<'_>,
    ) -> Result<(), AutomationError> {
        commands::overwrite_content(element, content).map_err(js_error)
    }

    fn paste_file(&self, target: &Element, file: &ImageFile) -> Result<(), AutomationError> {
        paste::paste_file(target, file).map_err(js_error)
    }

    fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> impl Future<Output = Result<HttpReply, AutomationError>> {
        fetch::post_json(url, body)
    }
}
