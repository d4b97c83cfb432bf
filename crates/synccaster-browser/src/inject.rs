//! Field-injection primitive.
//!
//! Reactive frameworks frequently install an instance-level `value` setter
//! on their inputs, so a plain assignment never reaches their model. The
//! value is instead written through the setter found on the element's
//! prototype chain, then `input`, `change` and `blur` are dispatched in
//! that order, each exactly once.

use js_sys::{Function, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, Event, EventInit};

/// Write `value` into `element` so the owning framework observes it.
///
/// Elements with no `value` property anywhere on their prototype chain get
/// their text content replaced instead.
pub fn set_native_value(element: &Element, value: &str) -> Result<(), JsValue> {
    match prototype_value_setter(element) {
        Some(setter) => {
            setter.call1(element, &JsValue::from_str(value))?;
        }
        None => element.set_text_content(Some(value)),
    }

    dispatch(element, "input", true)?;
    dispatch(element, "change", true)?;
    dispatch(element, "blur", false)?;
    Ok(())
}

/// The `value` setter from the nearest prototype that defines one.
///
/// Starts above the instance, so own-property overrides are skipped.
fn prototype_value_setter(element: &Element) -> Option<Function> {
    let key = JsValue::from_str("value");
    let mut proto = Object::get_prototype_of(element);
    while !proto.is_null() && !proto.is_undefined() {
        let descriptor = Object::get_own_property_descriptor(&proto, &key);
        if !descriptor.is_undefined() {
            return Reflect::get(&descriptor, &JsValue::from_str("set"))
                .ok()?
                .dyn_into::<Function>()
                .ok();
        }
        proto = Object::get_prototype_of(&proto);
    }
    None
}

pub(crate) fn dispatch(target: &Element, name: &str, bubbles: bool) -> Result<(), JsValue> {
    let init = EventInit::new();
    init.set_bubbles(bubbles);
    let event = Event::new_with_event_init_dict(name, &init)?;
    target.dispatch_event(&event)?;
    Ok(())
}
