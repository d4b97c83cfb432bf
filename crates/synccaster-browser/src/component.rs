//! Calls into editor instances that pages hang off their DOM nodes.

use js_sys::{Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Element;

/// Property under which legacy code-editor widgets expose their instance.
const CODE_EDITOR_HANDLE: &str = "CodeMirror";

/// Invoke `instance_key` `.` `method_path` on `element` with `argument`.
///
/// `method_path` may be dotted (`$refs.editor.setValue`); the method is
/// called with its owning object as `this`. `Ok(false)` when any link in the
/// path is missing or the last one is not callable.
pub fn invoke_method(
    element: &Element,
    instance_key: &str,
    method_path: &str,
    argument: &str,
) -> Result<bool, JsValue> {
    let Some((owner_path, method)) = split_method(method_path) else {
        return Ok(false);
    };

    let mut receiver = Reflect::get(element, &JsValue::from_str(instance_key))?;
    for segment in owner_path {
        if receiver.is_null() || receiver.is_undefined() {
            return Ok(false);
        }
        receiver = Reflect::get(&receiver, &JsValue::from_str(segment))?;
    }
    if receiver.is_null() || receiver.is_undefined() {
        return Ok(false);
    }

    let Ok(function) = Reflect::get(&receiver, &JsValue::from_str(method))?.dyn_into::<Function>()
    else {
        return Ok(false);
    };
    function.call1(&receiver, &JsValue::from_str(argument))?;
    Ok(true)
}

/// Replace a code-editor widget's whole document.
pub fn set_code_editor_value(element: &Element, value: &str) -> Result<bool, JsValue> {
    invoke_method(element, CODE_EDITOR_HANDLE, "setValue", value)
}

fn split_method(path: &str) -> Option<(impl Iterator<Item = &str>, &str)> {
    let (owner, method) = match path.rsplit_once('.') {
        Some((owner, method)) => (Some(owner), method),
        None => (None, path),
    };
    if method.is_empty() {
        return None;
    }
    let segments = owner.into_iter().flat_map(|o| o.split('.'));
    Some((segments, method))
}
