//! `AdaptiveImage` — binds one `HtmlImageElement` to one load controller.
//!
//! The controller decides; this module executes. Each [`Directive`]
//! coming out of the state machine maps onto exactly one platform
//! action: register with the visibility scheduler, set `src` and await
//! load/error, or detach everything.
//!
//! One load/error closure pair is attached for the whole instance
//! lifetime and stamps events with the generation recorded when the
//! request was issued. The browser aborts a pending image request when
//! `src` changes, and the controller's phase/generation guard discards
//! anything that slips through after a reload or dispose.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlImageElement;

use lumen_media_core::{
    ConnectionSubscription, Directive, ImageFormat, MediaLoadController, MediaRequest,
    PlaceholderKind, Quality, StrategyOverrides,
};

use crate::{capability, connection, visibility};

/// Caller options for one adaptive image. Unrecognized enum strings are
/// ignored rather than guessed at; the policy default then applies.
#[wasm_bindgen]
#[derive(Default, Clone)]
pub struct AdaptiveImageOptions {
    fallback_url: Option<String>,
    overrides: StrategyOverrides,
}

#[wasm_bindgen]
impl AdaptiveImageOptions {
    #[wasm_bindgen(constructor)]
    pub fn new() -> AdaptiveImageOptions {
        AdaptiveImageOptions::default()
    }

    /// Last-resort fallback URL, tried after the optimized and raw
    /// candidates.
    pub fn set_fallback_url(&mut self, url: String) {
        self.fallback_url = Some(url);
    }

    /// Force a quality tier: `"low"` / `"medium"` / `"high"`.
    pub fn set_quality(&mut self, quality: String) {
        self.overrides.quality = Quality::parse(&quality);
    }

    /// Force lazy (or eager) activation.
    pub fn set_lazy(&mut self, lazy: bool) {
        self.overrides.lazy = Some(lazy);
    }

    /// Force a placeholder: `"blur"` / `"skeleton"` / `"none"`.
    pub fn set_placeholder(&mut self, kind: String) {
        self.overrides.placeholder = PlaceholderKind::parse(&kind);
    }

    /// Force progressive encoding on or off.
    pub fn set_progressive(&mut self, progressive: bool) {
        self.overrides.progressive = Some(progressive);
    }

    /// Force a format: `"avif"` / `"webp"` / `"jpeg"`.
    pub fn set_format(&mut self, format: String) {
        self.overrides.preferred_format = ImageFormat::parse(&format);
    }
}

struct Inner {
    controller: MediaLoadController,
    element: HtmlImageElement,
    visibility: Option<visibility::VisibilityHandle>,
    connection_subscription: Option<ConnectionSubscription>,
    /// Generation stamped on the request currently bound to `src`.
    issued_generation: Rc<Cell<u64>>,
    onload: Option<Closure<dyn FnMut()>>,
    onerror: Option<Closure<dyn FnMut()>>,
}

/// JS-facing per-image binding. Construct, call `start()` on mount,
/// `dispose()` on unmount (freeing the object disposes too).
#[wasm_bindgen]
pub struct AdaptiveImage {
    inner: Rc<RefCell<Inner>>,
}

#[wasm_bindgen]
impl AdaptiveImage {
    /// Bind `element` to `source_url` with default options.
    #[wasm_bindgen(constructor)]
    pub fn new(element: HtmlImageElement, source_url: String) -> Result<AdaptiveImage, JsValue> {
        Self::build(element, source_url, AdaptiveImageOptions::default())
    }

    /// Bind with explicit options (fallback URL, strategy overrides).
    pub fn new_with_options(
        element: HtmlImageElement,
        source_url: String,
        options: &AdaptiveImageOptions,
    ) -> Result<AdaptiveImage, JsValue> {
        Self::build(element, source_url, options.clone())
    }

    /// Mount entry point: begins loading, or waits for visibility when
    /// the strategy says lazy.
    pub fn start(&self) {
        let directive = self.inner.borrow_mut().controller.start();
        run(&self.inner, directive);
    }

    /// Unmount entry point: synchronously detaches the observer, the
    /// monitor subscription, and the element listeners. Idempotent.
    pub fn dispose(&self) {
        let directive = self.inner.borrow_mut().controller.dispose();
        run(&self.inner, directive);
    }

    /// Current lifecycle phase: `"idle"`, `"awaiting-visibility"`,
    /// `"loading"`, `"loaded"`, `"failed"`, or `"disposed"`.
    pub fn phase(&self) -> String {
        self.inner.borrow().controller.phase().as_str().to_string()
    }

    /// Placeholder the view should render until the load settles:
    /// `"blur"`, `"skeleton"`, or `"none"`.
    pub fn placeholder(&self) -> String {
        self.inner
            .borrow()
            .controller
            .placeholder()
            .as_str()
            .to_string()
    }

    /// The final source URL once the phase is `"loaded"`.
    pub fn current_source(&self) -> Option<String> {
        self.inner
            .borrow()
            .controller
            .current_source()
            .map(str::to_string)
    }

    /// Whether the strategy currently in force gates on visibility.
    pub fn is_lazy(&self) -> bool {
        self.inner.borrow().controller.strategy().lazy
    }
}

impl AdaptiveImage {
    fn build(
        element: HtmlImageElement,
        source_url: String,
        options: AdaptiveImageOptions,
    ) -> Result<AdaptiveImage, JsValue> {
        let mut request = MediaRequest::new(source_url).with_overrides(options.overrides);
        request.fallback_url = options.fallback_url;

        let controller = MediaLoadController::new(
            request,
            capability::preferred_format(),
            connection::monitor().current(),
        )
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let inner = Rc::new(RefCell::new(Inner {
            controller,
            element,
            visibility: None,
            connection_subscription: None,
            issued_generation: Rc::new(Cell::new(0)),
            onload: None,
            onerror: None,
        }));

        attach_load_listeners(&inner);

        let weak = Rc::downgrade(&inner);
        let subscription = connection::monitor().subscribe(move |classification| {
            if let Some(inner) = weak.upgrade() {
                let directive = inner
                    .borrow_mut()
                    .controller
                    .on_connection_change(classification);
                run(&inner, directive);
            }
        });
        inner.borrow_mut().connection_subscription = Some(subscription);

        Ok(AdaptiveImage { inner })
    }
}

impl Drop for AdaptiveImage {
    fn drop(&mut self) {
        let directive = self.inner.borrow_mut().controller.dispose();
        run(&self.inner, directive);
    }
}

/// Attach the instance-lifetime load/error closures. Attached once so a
/// fallback advance never drops a closure that is mid-execution.
fn attach_load_listeners(inner: &Rc<RefCell<Inner>>) {
    let issued = Rc::clone(&inner.borrow().issued_generation);

    let weak = Rc::downgrade(inner);
    let issued_load = Rc::clone(&issued);
    let onload = Closure::<dyn FnMut()>::new(move || {
        if let Some(inner) = weak.upgrade() {
            let directive = inner
                .borrow_mut()
                .controller
                .on_load_success(issued_load.get());
            run(&inner, directive);
        }
    });

    let weak = Rc::downgrade(inner);
    let onerror = Closure::<dyn FnMut()>::new(move || {
        if let Some(inner) = weak.upgrade() {
            let directive = inner
                .borrow_mut()
                .controller
                .on_load_failure(issued.get());
            run(&inner, directive);
        }
    });

    let mut inner = inner.borrow_mut();
    inner
        .element
        .set_onload(Some(onload.as_ref().unchecked_ref()));
    inner
        .element
        .set_onerror(Some(onerror.as_ref().unchecked_ref()));
    inner.onload = Some(onload);
    inner.onerror = Some(onerror);
}

/// Execute one controller directive against the platform.
fn run(inner: &Rc<RefCell<Inner>>, directive: Directive) {
    match directive {
        Directive::None => {}

        Directive::ObserveVisibility { root_margin_px } => {
            let weak = Rc::downgrade(inner);
            let observed = {
                let inner_ref = inner.borrow();
                let element: &web_sys::Element = inner_ref.element.as_ref();
                visibility::observe(element, root_margin_px, move || {
                    if let Some(inner) = weak.upgrade() {
                        let directive = inner.borrow_mut().controller.on_visible();
                        run(&inner, directive);
                    }
                })
            };
            match observed {
                Ok(handle) => inner.borrow_mut().visibility = Some(handle),
                // No IntersectionObserver: degrade to immediate
                // activation rather than never loading.
                Err(_) => {
                    let directive = inner.borrow_mut().controller.on_visible();
                    run(inner, directive);
                }
            }
        }

        Directive::StartRequest { url, generation } => {
            let inner_ref = inner.borrow();
            inner_ref.issued_generation.set(generation);
            // Setting src aborts any pending request for this element.
            inner_ref.element.set_src(&url);
        }

        Directive::DetachObservers => {
            let mut inner = inner.borrow_mut();
            inner.visibility = None;
            inner.connection_subscription = None;
            inner.element.set_onload(None);
            inner.element.set_onerror(None);
            inner.onload = None;
            inner.onerror = None;
        }
    }
}
