//! One-shot IntersectionObserver wrapper.
//!
//! `observe` fires its callback at most once — on the first intersection
//! at or above the subsystem threshold — then disconnects itself. The
//! returned handle disconnects synchronously on drop, which is how an
//! unmount during `AwaitingVisibility` guarantees that an
//! already-queued intersection callback produces no state change.

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use lumen_media_core::constants::INTERSECTION_THRESHOLD;

/// Live visibility observation; dropping it disconnects the observer.
pub struct VisibilityHandle {
    observer: IntersectionObserver,
    /// Set once the callback has fired; late platform callbacks that
    /// were already queued check it and bail.
    fired: Rc<Cell<bool>>,
    _callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
}

impl Drop for VisibilityHandle {
    fn drop(&mut self) {
        self.fired.set(true);
        self.observer.disconnect();
    }
}

/// Observe `element` and invoke `on_visible` once when at least
/// [`INTERSECTION_THRESHOLD`] of it enters the viewport expanded by
/// `root_margin_px`.
pub fn observe(
    element: &Element,
    root_margin_px: u32,
    mut on_visible: impl FnMut() + 'static,
) -> Result<VisibilityHandle, JsValue> {
    let fired = Rc::new(Cell::new(false));
    let fired_in_callback = Rc::clone(&fired);

    let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
        move |entries: js_sys::Array, observer: IntersectionObserver| {
            let intersecting = entries.iter().any(|entry| {
                entry
                    .dyn_ref::<IntersectionObserverEntry>()
                    .is_some_and(|e| e.is_intersecting())
            });
            if intersecting && !fired_in_callback.replace(true) {
                observer.disconnect();
                on_visible();
            }
        },
    );

    let options = IntersectionObserverInit::new();
    options.set_root_margin(&format!("{root_margin_px}px"));
    options.set_threshold(&JsValue::from_f64(INTERSECTION_THRESHOLD));

    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
    observer.observe(element);

    Ok(VisibilityHandle {
        observer,
        fired,
        _callback: callback,
    })
}
