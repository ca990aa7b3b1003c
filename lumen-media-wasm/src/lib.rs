//! Lumen Media WASM — browser adapters for the media loading core.
//!
//! Thin bindings between `lumen-media-core` and the platform facilities
//! the core deliberately knows nothing about:
//!
//! | Module | Facility |
//! |--------|----------|
//! | [`connection`] | `navigator.connection` (Network Information) |
//! | [`capability`] | attempted-decode format probe |
//! | [`visibility`] | `IntersectionObserver` |
//! | [`image`] | `HtmlImageElement` load/error events |
//!
//! Every facility is optional-presence: when a browser lacks one, the
//! adapter degrades to the core's documented defaults instead of
//! failing. All state is single-threaded (`thread_local`) — the
//! subsystem lives on the UI event loop.

/// Network Information facility adapter and the process-wide monitor.
pub mod connection;

/// Decodable-format probe, memoized per process.
pub mod capability;

/// One-shot IntersectionObserver wrapper.
pub mod visibility;

/// `AdaptiveImage` — the JS-facing per-image binding.
pub mod image;

use wasm_bindgen::prelude::*;

pub use image::{AdaptiveImage, AdaptiveImageOptions};

/// Initialize the media runtime: panic hook, the single platform
/// connection listener, and the async capability probe.
///
/// Call once at application startup, before constructing images.
/// Calling it again is a no-op.
#[wasm_bindgen]
pub fn init_media_runtime() {
    console_error_panic_hook::set_once();
    connection::init_connection_monitor();
    wasm_bindgen_futures::spawn_local(async {
        let _ = capability::detect_preferred_format().await;
    });
}

/// The probed preferred image format (`"avif"` / `"webp"` / `"jpeg"`).
/// Reports `"jpeg"` until the startup probe resolves.
#[wasm_bindgen]
pub fn preferred_image_format() -> String {
    capability::preferred_format().as_str().to_string()
}

/// Whether the current connection classifies as slow. For diagnostics
/// surfaces such as the network-status badge.
#[wasm_bindgen]
pub fn connection_is_slow() -> bool {
    connection::monitor().current().is_slow()
}

/// Subscription handle for JS-side connection-change consumers (e.g. a
/// diagnostics panel). Call `dispose()` to stop receiving callbacks.
#[wasm_bindgen]
pub struct ConnectionWatch {
    subscription: Option<lumen_media_core::ConnectionSubscription>,
}

#[wasm_bindgen]
impl ConnectionWatch {
    pub fn dispose(&mut self) {
        self.subscription = None;
    }
}

/// Subscribe a JS callback to connection changes. The callback receives
/// the effective type string (`"slow-2g"` … `"4g"`) and a slowness flag.
#[wasm_bindgen]
pub fn watch_connection(callback: js_sys::Function) -> ConnectionWatch {
    let subscription = connection::monitor().subscribe(move |classification| {
        let _ = callback.call2(
            &JsValue::NULL,
            &JsValue::from_str(classification.effective_type.as_str()),
            &JsValue::from_bool(classification.is_slow()),
        );
    });
    ConnectionWatch {
        subscription: Some(subscription),
    }
}
