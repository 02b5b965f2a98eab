//! Thin helpers over web-sys used by both components

use js_sys::{Function, Promise};
use switcher_core::SwitcherError;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, HtmlElement, Window};

/// Convert a JS exception into a core error
pub fn js_err(value: JsValue) -> SwitcherError {
    let message = value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{:?}", value));
    SwitcherError::Dom(message)
}

/// Convert a core error for the JS boundary
pub fn to_js(err: SwitcherError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

pub fn window() -> Result<Window, SwitcherError> {
    web_sys::window().ok_or_else(|| SwitcherError::Dom("No window object available".to_string()))
}

pub fn document(window: &Window) -> Result<Document, SwitcherError> {
    window
        .document()
        .ok_or_else(|| SwitcherError::Dom("No document object available".to_string()))
}

/// The `<html>` element, used as the default query root
pub fn page_root(document: &Document) -> Result<Element, SwitcherError> {
    document
        .document_element()
        .ok_or_else(|| SwitcherError::Dom("Document has no root element".to_string()))
}

/// All HTML elements under `root` matching `selector`
pub fn query_all(root: &Element, selector: &str) -> Result<Vec<HtmlElement>, SwitcherError> {
    let nodes = root.query_selector_all(selector).map_err(js_err)?;
    let mut elements = Vec::with_capacity(nodes.length() as usize);
    for i in 0..nodes.length() {
        if let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) {
            elements.push(el);
        }
    }
    Ok(elements)
}

/// Set several inline style properties
pub fn set_styles(el: &HtmlElement, props: &[(&str, &str)]) -> Result<(), SwitcherError> {
    let style = el.style();
    for (name, value) in props {
        style.set_property(name, value).map_err(js_err)?;
    }
    Ok(())
}

/// Run `f` once after `ms` milliseconds
pub fn set_timeout<F>(window: &Window, ms: u32, f: F) -> Result<i32, SwitcherError>
where
    F: FnOnce() + 'static,
{
    let callback = Closure::once_into_js(f);
    window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref::<Function>(),
            ms.min(i32::MAX as u32) as i32,
        )
        .map_err(js_err)
}

/// Resolve after `ms` milliseconds
pub async fn sleep(window: &Window, ms: u32) -> Result<(), SwitcherError> {
    let promise = timer_promise(|resolve| {
        window.set_timeout_with_callback_and_timeout_and_arguments_0(
            resolve,
            ms.min(i32::MAX as u32) as i32,
        )
    });
    JsFuture::from(promise).await.map_err(js_err)?;
    Ok(())
}

/// Promise settled by a timer; rejected when `schedule` cannot arm it
fn timer_promise<S>(schedule: S) -> Promise
where
    S: FnOnce(&Function) -> Result<i32, JsValue>,
{
    let mut schedule = Some(schedule);
    Promise::new(&mut |resolve, reject| {
        let Some(schedule) = schedule.take() else {
            return;
        };
        if let Err(e) = schedule(&resolve) {
            if let Err(e) = reject.call1(&JsValue::UNDEFINED, &e) {
                tracing::warn!("Failed to reject timer promise: {}", js_err(e));
            }
        }
    })
}

/// Run `f` once the DOM is parsed; immediately if that already happened
pub fn on_dom_ready<F>(document: &Document, f: F) -> Result<(), SwitcherError>
where
    F: FnOnce() + 'static,
{
    let ready_state = js_sys::Reflect::get(document, &JsValue::from_str("readyState"))
        .ok()
        .and_then(|v| v.as_string());
    if ready_state.as_deref() != Some("loading") {
        f();
        return Ok(());
    }

    let callback = Closure::once_into_js(f);
    document
        .add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())
        .map_err(js_err)
}

/// Read `root.a.b.c`, treating `undefined` and `null` as absent
pub fn lookup(root: &JsValue, path: &[&str]) -> Option<JsValue> {
    let mut current = root.clone();
    for key in path {
        if current.is_undefined() || current.is_null() {
            return None;
        }
        current = js_sys::Reflect::get(&current, &JsValue::from_str(key)).ok()?;
    }
    if current.is_undefined() || current.is_null() {
        None
    } else {
        Some(current)
    }
}

// WASM-specific tests that run in a browser environment
#[cfg(test)]
#[cfg(target_arch = "wasm32")]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    async fn test_sleep_resolves() {
        let window = window().unwrap();
        assert!(sleep(&window, 10).await.is_ok());
    }

    #[wasm_bindgen_test]
    async fn test_timer_failure_rejects() {
        let promise = timer_promise(|_resolve| Err(JsValue::from_str("timer unavailable")));
        let err = JsFuture::from(promise).await.unwrap_err();
        assert_eq!(err.as_string().as_deref(), Some("timer unavailable"));
    }

    #[wasm_bindgen_test]
    fn test_lookup_skips_missing_links() {
        let inner = js_sys::Object::new();
        js_sys::Reflect::set(&inner, &JsValue::from_str("b"), &JsValue::from_f64(1.0)).unwrap();
        let root = js_sys::Object::new();
        js_sys::Reflect::set(&root, &JsValue::from_str("a"), &inner).unwrap();

        assert_eq!(lookup(&root, &["a", "b"]).and_then(|v| v.as_f64()), Some(1.0));
        assert!(lookup(&root, &["a", "c"]).is_none());
        assert!(lookup(&root, &["x", "b"]).is_none());
    }
}
