//! Synthetic paste of an image file.
//!
//! Editors that upload pasted images read the file out of the event's
//! `clipboardData`. The event is built with a fresh `DataTransfer` holding
//! the file and dispatched on the editor's content root.

use js_sys::{Array, Object, Reflect, Uint8Array};
use synccaster_core::ImageFile;
use wasm_bindgen::JsValue;
use web_sys::{ClipboardEvent, ClipboardEventInit, DataTransfer, Element, File, FilePropertyBag};

pub fn image_to_file(image: &ImageFile) -> Result<File, JsValue> {
    let bytes = Uint8Array::from(image.bytes.as_slice());
    let parts = Array::of1(&bytes);
    let options = FilePropertyBag::new();
    options.set_type(&image.mime_type);
    File::new_with_u8_array_sequence_and_options(&parts, &image.name, &options)
}

/// Dispatch a `paste` event carrying `image` on `target`.
pub fn paste_file(target: &Element, image: &ImageFile) -> Result<(), JsValue> {
    let file = image_to_file(image)?;
    let transfer = DataTransfer::new()?;
    transfer.items().add_with_file(&file)?;

    let init = ClipboardEventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    init.set_clipboard_data(Some(&transfer));
    let event = ClipboardEvent::new_with_event_init_dict("paste", &init)?;

    // Some engines drop clipboardData from the init dict.
    if event.clipboard_data().is_none() {
        let descriptor = Object::new();
        Reflect::set(&descriptor, &JsValue::from_str("value"), &transfer)?;
        Object::define_property(&event, &JsValue::from_str("clipboardData"), &descriptor);
    }

    target.dispatch_event(&event)?;
    tracing::debug!(name = %image.name, bytes = image.bytes.len(), "paste dispatched");
    Ok(())
}
