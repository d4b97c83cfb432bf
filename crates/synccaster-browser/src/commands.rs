//! Editable-region writes.
//!
//! The preferred path goes through the document's native editing commands
//! so the editor's own input handling sees an ordinary user edit. When the
//! commands are unavailable the content is overwritten directly and a
//! synthetic `input` event is dispatched.

use synccaster_core::EditorContent;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, HtmlDocument, HtmlElement, InputEvent, InputEventInit};

pub fn focus(element: &Element) {
    if let Some(el) = element.dyn_ref::<HtmlElement>() {
        if let Err(e) = el.focus() {
            tracing::debug!("focus failed: {:?}", e);
        }
    }
}

/// Select the element's whole content and replace it with `content`.
///
/// `Ok(false)` when the page has no selection or refuses the command.
pub fn select_all_and_insert(element: &Element, content: EditorContent<'_>) -> Result<bool, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let Some(document) = window
        .document()
        .and_then(|d| d.dyn_into::<HtmlDocument>().ok())
    else {
        return Ok(false);
    };
    let Some(selection) = window.get_selection()? else {
        return Ok(false);
    };

    focus(element);
    selection.select_all_children(element)?;

    let inserted = match content {
        EditorContent::Html("") | EditorContent::Text("") => document.exec_command("delete")?,
        EditorContent::Html(html) => {
            document.exec_command_with_show_ui_and_value("insertHTML", false, html)?
        }
        EditorContent::Text(text) => {
            document.exec_command_with_show_ui_and_value("insertText", false, text)?
        }
    };
    Ok(inserted)
}

/// Replace the element's content directly, then announce it with `input`.
pub fn overwrite_content(element: &Element, content: EditorContent<'_>) -> Result<(), JsValue> {
    match content {
        EditorContent::Html(html) => element.set_inner_html(html),
        EditorContent::Text(text) => element.set_text_content(Some(text)),
    }
    let init = InputEventInit::new();
    init.set_bubbles(true);
    let event = InputEvent::new_with_event_init_dict("input", &init)?;
    element.dispatch_event(&event)?;
    Ok(())
}
