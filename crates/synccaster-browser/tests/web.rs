//! WASM browser tests for synccaster-browser.
//!
//! Run with: `wasm-pack test --headless --firefox` or `--chrome`

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_test::*;
use web_sys::{ClipboardEvent, Element, Event, HtmlInputElement};

wasm_bindgen_test_configure!(run_in_browser);

use synccaster_browser::{
    EditorContent, HandoffStore, ImageFile, InitState, LocalStorageHandoff, commands, component,
    inject, paste,
};

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

fn attach(tag: &str) -> Element {
    let doc = document();
    let el = doc.create_element(tag).unwrap();
    doc.body().unwrap().append_child(&el).unwrap();
    el
}

/// Record every `name` event seen on `el`, with the value read at the time.
fn record(el: &Element, name: &str, read: fn(&Event) -> String) -> Rc<RefCell<Vec<String>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let listener = Closure::<dyn FnMut(Event)>::new(move |evt: Event| {
        sink.borrow_mut().push(read(&evt));
    });
    el.add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())
        .unwrap();
    listener.forget();
    seen
}

fn input_value(evt: &Event) -> String {
    evt.target()
        .unwrap()
        .dyn_into::<HtmlInputElement>()
        .unwrap()
        .value()
}

// === Field injection ===

#[wasm_bindgen_test]
fn field_listener_sees_new_value_once_per_call() {
    let el = attach("input");
    let seen = record(&el, "input", input_value);

    inject::set_native_value(&el, "first").unwrap();
    assert_eq!(*seen.borrow(), vec!["first"]);

    inject::set_native_value(&el, "second").unwrap();
    assert_eq!(*seen.borrow(), vec!["first", "second"]);
}

#[wasm_bindgen_test]
fn field_injection_bypasses_instance_setter() {
    let el = attach("input");
    // Framework-style interception: an own `value` setter that swallows
    // writes, with the getter still reading the real value.
    Function::new_with_args(
        "el",
        "const d = Object.getOwnPropertyDescriptor(HTMLInputElement.prototype, 'value');
         Object.defineProperty(el, 'value', {
           configurable: true,
           get() { return d.get.call(this); },
           set(v) { this.__swallowed = (this.__swallowed || 0) + 1; },
         });",
    )
    .call1(&JsValue::NULL, &el)
    .unwrap();

    let seen = record(&el, "input", input_value);
    inject::set_native_value(&el, "typed").unwrap();

    assert_eq!(*seen.borrow(), vec!["typed"]);
    let swallowed = Reflect::get(&el, &JsValue::from_str("__swallowed")).unwrap();
    assert!(swallowed.is_undefined());
}

#[wasm_bindgen_test]
fn field_events_fire_in_order() {
    let el = attach("input");
    let order = Rc::new(RefCell::new(Vec::new()));
    for name in ["input", "change", "blur"] {
        let sink = order.clone();
        let listener = Closure::<dyn FnMut(Event)>::new(move |evt: Event| {
            sink.borrow_mut().push(evt.type_());
        });
        el.add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())
            .unwrap();
        listener.forget();
    }

    inject::set_native_value(&el, "x").unwrap();
    assert_eq!(*order.borrow(), vec!["input", "change", "blur"]);
}

#[wasm_bindgen_test]
fn elements_without_value_get_text() {
    let el = attach("div");
    inject::set_native_value(&el, "plain text").unwrap();
    assert_eq!(el.text_content().as_deref(), Some("plain text"));
}

// === Editable regions ===

#[wasm_bindgen_test]
fn overwrite_sets_content_and_announces_it() {
    let el = attach("div");
    el.set_attribute("contenteditable", "true").unwrap();
    el.set_inner_html("<p>old</p>");
    let seen = record(&el, "input", |evt| evt.type_());

    commands::overwrite_content(&el, EditorContent::Html("<p><b>new</b></p>")).unwrap();
    assert_eq!(el.inner_html(), "<p><b>new</b></p>");
    assert_eq!(seen.borrow().len(), 1);

    commands::overwrite_content(&el, EditorContent::Text("<b>literal</b>")).unwrap();
    assert_eq!(el.text_content().as_deref(), Some("<b>literal</b>"));
    assert_eq!(seen.borrow().len(), 2);
}

// === Component methods ===

#[wasm_bindgen_test]
fn dotted_component_method_is_called_on_its_owner() {
    let el = attach("div");
    let editor = Object::new();
    let set_value = Function::new_with_args("v", "this.last = v;");
    Reflect::set(&editor, &JsValue::from_str("setValue"), &set_value).unwrap();
    let refs = Object::new();
    Reflect::set(&refs, &JsValue::from_str("editor"), &editor).unwrap();
    let instance = Object::new();
    Reflect::set(&instance, &JsValue::from_str("$refs"), &refs).unwrap();
    Reflect::set(&el, &JsValue::from_str("__vue__"), &instance).unwrap();

    let called =
        component::invoke_method(&el, "__vue__", "$refs.editor.setValue", "# Title").unwrap();
    assert!(called);
    let last = Reflect::get(&editor, &JsValue::from_str("last")).unwrap();
    assert_eq!(last.as_string().as_deref(), Some("# Title"));
}

#[wasm_bindgen_test]
fn missing_instances_are_not_errors() {
    let el = attach("div");
    assert!(!component::invoke_method(&el, "__bytemd__", "setValue", "x").unwrap());
    assert!(!component::set_code_editor_value(&el, "x").unwrap());
}

// === Paste ===

#[wasm_bindgen_test]
fn paste_event_carries_the_file() {
    let el = attach("div");
    let names = record(&el, "paste", |evt| {
        let evt = evt.dyn_ref::<ClipboardEvent>().unwrap();
        let data = evt.clipboard_data().unwrap();
        let items = data.items();
        let item = items.get(0).unwrap();
        format!("{}:{}:{}", items.length(), item.kind(), item.type_())
    });

    let image = ImageFile {
        name: "diagram.png".into(),
        mime_type: "image/png".into(),
        bytes: vec![0x89, b'P', b'N', b'G'],
    };
    paste::paste_file(&el, &image).unwrap();
    assert_eq!(*names.borrow(), vec!["1:file:image/png"]);
}

// === Handoff storage ===

#[wasm_bindgen_test]
fn handoff_round_trips_through_local_storage() {
    let store = LocalStorageHandoff;
    let saved = synccaster_browser::handoff::write_back(&store, "Title", "Body", 42).unwrap();
    let loaded = store.load().unwrap().unwrap();
    assert_eq!(loaded, saved);

    let updated = synccaster_browser::handoff::write_back(&store, "Title 2", "Body 2", 43).unwrap();
    assert_eq!(updated.id, saved.id);
}

#[wasm_bindgen_test]
fn init_is_idempotent_per_state() {
    let first = InitState::new();
    assert!(!first.is_ready());
    first.ensure();
    first.ensure();
    assert!(first.is_ready());

    // A second owner finds the global subscriber taken and still becomes ready.
    let second = InitState::new();
    second.ensure();
    assert!(second.is_ready());
}
