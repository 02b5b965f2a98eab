//! Auto-fit resizer for single-line text overlays
//!
//! Each `.auto-resize span` is sized with `switcher_core::fit_text` against its
//! parent's client box. The pass is synchronous and stateless apart from the
//! instance's throttle, debounce and observed-container record, so overlapping
//! triggers only cost a redundant pass.

use crate::dom::{self, js_err, to_js};
use crate::host::HostHooks;
use std::cell::RefCell;
use std::rc::Rc;
use switcher_core::{
    fit_text, BoxSize, Debounce, FitOutcome, FrameThrottle, HostEvent, ObservedSet, Rerun,
    SwitcherConfig, SwitcherError, TextSurface,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, HtmlElement, ResizeObserver, Window};

/// Neutral baseline so a previous fit's clamping does not skew measurement
const RESET_STYLES: &[(&str, &str)] = &[
    ("white-space", "nowrap"),
    ("overflow", "visible"),
    ("display", "inline-block"),
    ("padding", "0"),
    ("margin", "0"),
    ("max-width", "none"),
    ("max-height", "none"),
    ("transition", "opacity 0.3s ease"),
];

const COMMIT_STYLES: &[(&str, &str)] = &[
    ("overflow", "hidden"),
    ("max-width", "100%"),
    ("max-height", "100%"),
    ("visibility", "visible"),
    ("opacity", "1"),
];

/// A text span measured through its scroll box
struct SpanSurface<'a> {
    span: &'a HtmlElement,
}

impl TextSurface for SpanSurface<'_> {
    fn set_font_size(&mut self, px: f64) {
        if let Err(e) = self
            .span
            .style()
            .set_property("font-size", &format!("{}px", px))
        {
            tracing::trace!("font-size write failed: {}", js_err(e));
        }
    }

    fn scroll_size(&self) -> BoxSize {
        BoxSize::new(
            f64::from(self.span.scroll_width()),
            f64::from(self.span.scroll_height()),
        )
    }
}

#[derive(Default)]
struct ResizerState {
    frame: FrameThrottle,
    observed: ObservedSet<Element>,
    typography: Debounce,
    /// Kept so observers are not collected while their containers live
    observers: Vec<ResizeObserver>,
}

struct Inner {
    config: SwitcherConfig,
    window: Window,
    document: Document,
    root: Element,
    state: RefCell<ResizerState>,
}

impl Inner {
    /// Fit every target span under the root
    ///
    /// A span that cannot be fitted or observed is logged and skipped; the
    /// rest of the pass still runs.
    fn run_all(self: &Rc<Self>) -> Result<Vec<FitOutcome>, SwitcherError> {
        let spans = dom::query_all(&self.root, &self.config.selectors.fit_target)?;
        let mut outcomes = Vec::with_capacity(spans.len());

        for span in &spans {
            match self.fit_span(span) {
                Ok(Some(outcome)) => outcomes.push(outcome),
                Ok(None) => {}
                Err(e) => tracing::warn!("Failed to fit text: {}", e),
            }
            if let Err(e) = self.observe_container(span) {
                tracing::warn!("Failed to observe container: {}", e);
            }
        }
        Ok(outcomes)
    }

    fn fit_span(&self, span: &HtmlElement) -> Result<Option<FitOutcome>, SwitcherError> {
        let Some(container) = span.parent_element() else {
            return Ok(None);
        };
        let container = BoxSize::new(
            f64::from(container.client_width()),
            f64::from(container.client_height()),
        );

        dom::set_styles(span, RESET_STYLES)?;
        let outcome = fit_text(&mut SpanSurface { span }, container, &self.config.fit);
        dom::set_styles(span, COMMIT_STYLES)?;
        Ok(Some(outcome))
    }

    /// Watch the span's structural container for size changes, once per container
    ///
    /// Column resizes in the editor do not fire a window resize. The nearest
    /// structural ancestor of the widget wrapper is observed; without one, the
    /// wrapper itself.
    fn observe_container(self: &Rc<Self>, span: &HtmlElement) -> Result<(), SwitcherError> {
        let selectors = &self.config.selectors;
        let Some(wrapper) = span.closest(&selectors.widget_wrapper).map_err(js_err)? else {
            return Ok(());
        };
        let target = wrapper
            .closest(&selectors.structural_container)
            .map_err(js_err)?
            .unwrap_or(wrapper);

        if !self.state.borrow_mut().observed.insert(target.clone()) {
            return Ok(());
        }

        let inner = Rc::clone(self);
        let on_resize = Closure::<dyn FnMut(js_sys::Array)>::new(move |_entries: js_sys::Array| {
            tracing::debug!("container resize observed");
            inner.rerun();
        });
        let observer = ResizeObserver::new(on_resize.as_ref().unchecked_ref()).map_err(js_err)?;
        observer.observe(&target);
        on_resize.forget();

        self.state.borrow_mut().observers.push(observer);
        Ok(())
    }

    fn rerun(self: &Rc<Self>) {
        if let Err(e) = self.run_all() {
            tracing::warn!("Resize pass failed: {}", e);
        }
    }

    fn rerun_after(self: &Rc<Self>, ms: u32) {
        let inner = Rc::clone(self);
        if let Err(e) = dom::set_timeout(&self.window, ms, move || inner.rerun()) {
            tracing::warn!("Failed to schedule resize pass: {}", e);
        }
    }

    /// Window resize: at most one pass per animation frame
    ///
    /// Returns whether this call requested the frame.
    fn on_window_resize(self: &Rc<Self>) -> bool {
        if !self.state.borrow_mut().frame.try_schedule() {
            return false;
        }

        let inner = Rc::clone(self);
        let frame = Closure::once_into_js(move || {
            inner.rerun();
            inner.state.borrow_mut().frame.complete();
        });
        if let Err(e) = self.window.request_animation_frame(frame.unchecked_ref()) {
            tracing::warn!("requestAnimationFrame failed: {}", js_err(e));
            self.state.borrow_mut().frame.complete();
            return false;
        }
        true
    }

    fn on_host_event(self: &Rc<Self>, event: HostEvent) {
        let Some(Rerun {
            delay_ms,
            debounced,
        }) = event.rerun(&self.config.host)
        else {
            return;
        };
        tracing::debug!(?event, delay_ms, "host layout change");

        if !debounced {
            self.rerun_after(delay_ms);
            return;
        }

        let ticket = self.state.borrow_mut().typography.ticket();
        let inner = Rc::clone(self);
        let scheduled = dom::set_timeout(&self.window, delay_ms, move || {
            if inner.state.borrow().typography.is_current(ticket) {
                inner.rerun();
            }
        });
        if let Err(e) = scheduled {
            tracing::warn!("Failed to schedule resize pass: {}", e);
        }
    }

    /// First pass once web fonts are applied, so fallback metrics are not used
    async fn run_after_fonts(self: Rc<Self>) {
        let has_fonts =
            js_sys::Reflect::has(&self.document, &JsValue::from_str("fonts")).unwrap_or(false);
        if has_fonts {
            match self.document.fonts().ready() {
                Ok(ready) => {
                    if let Err(e) = JsFuture::from(ready).await {
                        tracing::warn!("Font loading failed: {}", js_err(e));
                    }
                }
                Err(e) => tracing::warn!("document.fonts.ready unavailable: {}", js_err(e)),
            }
        }
        self.rerun_after(self.config.host.font_ready_delay_ms);
    }

    /// Wait for the host editor and subscribe to its layout events
    async fn attach_host(self: Rc<Self>) {
        let Some(hooks) = HostHooks::wait_for(&self.window, &self.config.host).await else {
            tracing::debug!("host editor hooks not found, skipping integration");
            return;
        };

        let inner = Rc::clone(&self);
        if let Err(e) = hooks.subscribe(&self.config.host, move |event| inner.on_host_event(event))
        {
            tracing::warn!("Failed to register host editor handlers: {}", e);
        }
    }
}

/// Fits `.auto-resize` text and keeps it fitted as layout changes
#[wasm_bindgen]
pub struct AutoFitResizer {
    inner: Rc<Inner>,
}

impl AutoFitResizer {
    /// Create a resizer for the spans under `root`
    pub fn with_root(root: Element, config: SwitcherConfig) -> Result<Self, SwitcherError> {
        let window = dom::window()?;
        let document = dom::document(&window)?;
        Ok(Self {
            inner: Rc::new(Inner {
                config,
                window,
                document,
                root,
                state: RefCell::new(ResizerState::default()),
            }),
        })
    }

    /// Fit every target span now
    pub fn run_all_resizers(&self) -> Result<Vec<FitOutcome>, SwitcherError> {
        self.inner.run_all()
    }

    /// Wire every trigger source: window resize, fonts, host editor
    pub fn start_triggers(&self) -> Result<(), SwitcherError> {
        let inner = Rc::clone(&self.inner);
        let on_resize = Closure::<dyn FnMut()>::new(move || {
            inner.on_window_resize();
        });
        self.inner
            .window
            .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
            .map_err(js_err)?;
        on_resize.forget();

        wasm_bindgen_futures::spawn_local(Rc::clone(&self.inner).run_after_fonts());
        wasm_bindgen_futures::spawn_local(Rc::clone(&self.inner).attach_host());
        Ok(())
    }

    /// Number of distinct containers currently observed
    pub fn observed_count(&self) -> usize {
        self.inner.state.borrow().observed.len()
    }
}

#[wasm_bindgen]
impl AutoFitResizer {
    /// Create a resizer for the whole page
    ///
    /// `config` is an optional object in the `SwitcherConfig` shape.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<AutoFitResizer, JsValue> {
        let config = crate::config_from_js(config)?;
        let window = dom::window().map_err(to_js)?;
        let document = dom::document(&window).map_err(to_js)?;
        let root = dom::page_root(&document).map_err(to_js)?;
        Self::with_root(root, config).map_err(to_js)
    }

    /// Run one fitting pass; returns the number of spans fitted
    #[wasm_bindgen(js_name = runAll)]
    pub fn run_all(&self) -> Result<u32, JsValue> {
        let outcomes = self.run_all_resizers().map_err(to_js)?;
        Ok(outcomes.len() as u32)
    }

    /// Start listening for layout changes
    #[wasm_bindgen]
    pub fn start(&self) -> Result<(), JsValue> {
        self.start_triggers().map_err(to_js)
    }
}

// WASM-specific tests that run in a browser environment
#[cfg(test)]
#[cfg(target_arch = "wasm32")]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn fixture(width: u32, height: u32) -> Element {
        let document = web_sys::window().unwrap().document().unwrap();
        let root = document.create_element("div").unwrap();
        root.set_inner_html(&format!(
            r#"<div class="elementor-column"><div class="elementor-widget-switcher-widget">
                 <div class="auto-resize" style="width:{}px;height:{}px;padding:0">
                   <span style="visibility:hidden">Tab Label</span>
                 </div>
               </div></div>"#,
            width, height
        ));
        document.body().unwrap().append_child(&root).unwrap();
        root
    }

    fn span(root: &Element) -> HtmlElement {
        root.query_selector(".auto-resize span")
            .unwrap()
            .unwrap()
            .dyn_into::<HtmlElement>()
            .unwrap()
    }

    #[wasm_bindgen_test]
    fn test_fit_commits_styles_and_reveals_span() {
        let root = fixture(200, 40);
        let resizer = AutoFitResizer::with_root(root.clone(), SwitcherConfig::default()).unwrap();
        let outcomes = resizer.run_all_resizers().unwrap();

        assert_eq!(outcomes.len(), 1);
        let outcome = outcomes[0];
        assert!(outcome.font_size >= 4.0 && outcome.font_size <= 32.0);
        assert!(outcome.iterations <= 20);

        let style = span(&root).style();
        assert_eq!(style.get_property_value("visibility").unwrap(), "visible");
        assert_eq!(style.get_property_value("overflow").unwrap(), "hidden");
        assert_eq!(style.get_property_value("max-width").unwrap(), "100%");
    }

    #[wasm_bindgen_test]
    fn test_second_pass_is_stable_and_observes_once() {
        let root = fixture(300, 60);
        let resizer = AutoFitResizer::with_root(root.clone(), SwitcherConfig::default()).unwrap();
        let first = resizer.run_all_resizers().unwrap()[0];
        let second = resizer.run_all_resizers().unwrap()[0];

        assert!((first.font_size - second.font_size).abs() <= 0.5);
        assert_eq!(resizer.observed_count(), 1);
    }

    #[wasm_bindgen_test]
    fn test_zero_size_container_uses_min_font() {
        let root = fixture(0, 0);
        let resizer = AutoFitResizer::with_root(root.clone(), SwitcherConfig::default()).unwrap();
        let outcome = resizer.run_all_resizers().unwrap()[0];

        assert_eq!(outcome.font_size, 4.0);
        assert_eq!(outcome.iterations, 0);
        assert_eq!(
            span(&root).style().get_property_value("font-size").unwrap(),
            "4px"
        );
    }

    fn font_size(span: &HtmlElement) -> f64 {
        span.style()
            .get_property_value("font-size")
            .unwrap()
            .trim_end_matches("px")
            .parse()
            .unwrap()
    }

    #[wasm_bindgen_test]
    fn test_font_size_write_reaches_span() {
        let root = fixture(200, 40);
        let span = span(&root);
        SpanSurface { span: &span }.set_font_size(12.5);
        assert_eq!(span.style().get_property_value("font-size").unwrap(), "12.5px");
    }

    #[wasm_bindgen_test]
    fn test_observer_failure_does_not_stop_pass() {
        let root = fixture(200, 40);
        root.insert_adjacent_html(
            "beforeend",
            r#"<div class="elementor-widget-switcher-widget">
                 <div class="auto-resize" style="width:120px;height:30px;padding:0">
                   <span style="visibility:hidden">Second</span>
                 </div>
               </div>"#,
        )
        .unwrap();
        let mut config = SwitcherConfig::default();
        // An empty selector makes closest() throw for every span
        config.selectors.structural_container = String::new();

        let resizer = AutoFitResizer::with_root(root.clone(), config).unwrap();
        let outcomes = resizer.run_all_resizers().unwrap();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(resizer.observed_count(), 0);
        let spans = dom::query_all(&root, ".auto-resize span").unwrap();
        assert_eq!(spans.len(), 2);
        for span in spans {
            assert_eq!(span.style().get_property_value("visibility").unwrap(), "visible");
        }
    }

    #[wasm_bindgen_test]
    async fn test_container_resize_refits() {
        let root = fixture(200, 40);
        let resizer = AutoFitResizer::with_root(root.clone(), SwitcherConfig::default()).unwrap();
        resizer.run_all_resizers().unwrap();
        assert_eq!(resizer.observed_count(), 1);
        let before = font_size(&span(&root));

        let window = web_sys::window().unwrap();
        // Let the initial observation callback settle first
        dom::sleep(&window, 100).await.unwrap();

        let box_el = root
            .query_selector(".auto-resize")
            .unwrap()
            .unwrap()
            .dyn_into::<HtmlElement>()
            .unwrap();
        dom::set_styles(&box_el, &[("width", "400px"), ("height", "80px")]).unwrap();
        dom::sleep(&window, 200).await.unwrap();

        let after = font_size(&span(&root));
        assert!(after > before, "expected refit to grow text: {} -> {}", before, after);
    }

    #[wasm_bindgen_test]
    async fn test_window_resize_requests_one_frame() {
        let root = fixture(200, 40);
        let resizer = AutoFitResizer::with_root(root, SwitcherConfig::default()).unwrap();
        let inner = &resizer.inner;

        assert!(inner.on_window_resize());
        assert!(!inner.on_window_resize());
        assert!(inner.state.borrow().frame.is_pending());

        let window = web_sys::window().unwrap();
        dom::sleep(&window, 100).await.unwrap();

        assert!(!inner.state.borrow().frame.is_pending());
        assert_eq!(resizer.observed_count(), 1);
        assert!(inner.on_window_resize());
    }

    #[wasm_bindgen_test]
    fn test_no_targets_is_noop() {
        let document = web_sys::window().unwrap().document().unwrap();
        let root = document.create_element("div").unwrap();
        let resizer = AutoFitResizer::with_root(root, SwitcherConfig::default()).unwrap();
        assert!(resizer.run_all_resizers().unwrap().is_empty());
        assert_eq!(resizer.observed_count(), 0);
    }
}
