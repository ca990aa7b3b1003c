//! Network Information facility adapter.
//!
//! Reads `navigator.connection` (vendor-prefixed fallbacks included)
//! through `js_sys::Reflect` rather than typed bindings: the facility is
//! a living draft, engines disagree on which fields exist, and a missing
//! or malformed field must degrade per-field to the core defaults.
//!
//! Exactly one `change` listener is attached to the platform, for the
//! lifetime of the process. Everything downstream subscribes to the
//! core [`ConnectionMonitor`] fan-out instead.

use std::cell::RefCell;

use js_sys::Reflect;
use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use lumen_media_core::{ConnectionClassification, ConnectionKind, ConnectionMonitor, EffectiveType};

thread_local! {
    static MONITOR: ConnectionMonitor = ConnectionMonitor::new();
    // Holds the platform closure for the process lifetime; the facility
    // is global and inherently singleton, so there is no teardown.
    static CHANGE_LISTENER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> =
        const { RefCell::new(None) };
}

/// The process-wide connection monitor. Clones share state.
pub fn monitor() -> ConnectionMonitor {
    MONITOR.with(|m| m.clone())
}

/// Attach the single platform `change` listener and seed the monitor
/// with a first reading. No facility → silent degradation; the monitor
/// keeps reporting the default classification. Idempotent.
pub fn init_connection_monitor() {
    let already_attached = CHANGE_LISTENER.with(|slot| slot.borrow().is_some());
    if already_attached {
        return;
    }

    let Some(facility) = connection_object() else {
        debug!("network-information facility absent; using defaults");
        return;
    };

    monitor().publish(read_classification());

    let fan_out = monitor();
    let listener = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event| {
        // Deliver the freshly recomputed classification, not a diff.
        fan_out.publish(read_classification());
    });
    if let Some(target) = facility.dyn_ref::<web_sys::EventTarget>() {
        let _ =
            target.add_event_listener_with_callback("change", listener.as_ref().unchecked_ref());
    }
    CHANGE_LISTENER.with(|slot| *slot.borrow_mut() = Some(listener));
}

/// Read the current classification from the facility, or the default
/// when it is absent.
pub fn read_classification() -> ConnectionClassification {
    match connection_object() {
        Some(facility) => classify(&facility),
        None => ConnectionClassification::default(),
    }
}

fn connection_object() -> Option<JsValue> {
    let navigator = web_sys::window()?.navigator();
    for key in ["connection", "mozConnection", "webkitConnection"] {
        if let Ok(value) = Reflect::get(navigator.as_ref(), &JsValue::from_str(key)) {
            if !value.is_undefined() && !value.is_null() {
                return Some(value);
            }
        }
    }
    None
}

fn classify(facility: &JsValue) -> ConnectionClassification {
    let mut classification = ConnectionClassification::default();
    if let Some(raw) = string_field(facility, "effectiveType") {
        if let Some(effective_type) = EffectiveType::parse(&raw) {
            classification.effective_type = effective_type;
        }
    }
    if let Some(raw) = string_field(facility, "type") {
        classification.kind = ConnectionKind::parse(&raw);
    }
    if let Some(downlink) = number_field(facility, "downlink") {
        classification.downlink_mbps = Some(downlink);
    }
    if let Some(save_data) = bool_field(facility, "saveData") {
        classification.save_data = save_data;
    }
    classification
}

fn string_field(object: &JsValue, key: &str) -> Option<String> {
    Reflect::get(object, &JsValue::from_str(key))
        .ok()
        .and_then(|v| v.as_string())
}

fn number_field(object: &JsValue, key: &str) -> Option<f64> {
    Reflect::get(object, &JsValue::from_str(key))
        .ok()
        .and_then(|v| v.as_f64())
}

fn bool_field(object: &JsValue, key: &str) -> Option<bool> {
    Reflect::get(object, &JsValue::from_str(key))
        .ok()
        .and_then(|v| v.as_bool())
}
