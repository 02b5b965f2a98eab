//! WASM front end for the PDF tab switcher widget
//!
//! Two independent components run against the markup the page builder renders:
//! - `TabController` switches between the two embedded PDF overlays
//! - `AutoFitResizer` sizes `.auto-resize` text to fill its box
//!
//! The state and search logic live in `switcher-core`; this crate only reads
//! and writes the DOM and wires browser events.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { mount, mountWithConfig } from './pkg/switcher_wasm.js';
//!
//! await init();
//! mount();
//!
//! // or with overrides
//! mountWithConfig(JSON.stringify({ tabs: { reload_delay_ms: 80 } }));
//! ```

pub mod dom;
pub mod host;
pub mod logging;
pub mod resizer;
pub mod tabs;

use std::cell::Cell;
use switcher_core::{SwitcherConfig, SwitcherError};
use wasm_bindgen::prelude::*;

// Re-export main types for JavaScript
pub use resizer::AutoFitResizer;
pub use tabs::TabController;

thread_local! {
    static MOUNTED: Cell<bool> = const { Cell::new(false) };
}

/// Initialize the WASM module
/// Called automatically by wasm-bindgen
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logging::init(tracing::Level::INFO);
}

/// Get the library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Wire both components with the default configuration
#[wasm_bindgen]
pub fn mount() -> Result<(), JsValue> {
    mount_with(SwitcherConfig::default()).map_err(dom::to_js)
}

/// Wire both components with a JSON configuration
#[wasm_bindgen(js_name = mountWithConfig)]
pub fn mount_with_config(config_json: &str) -> Result<(), JsValue> {
    let config = SwitcherConfig::from_json(config_json).map_err(dom::to_js)?;
    mount_with(config).map_err(dom::to_js)
}

/// Attach both components once the DOM is ready
///
/// Only the first call on a page does anything; listeners are bound once.
pub fn mount_with(config: SwitcherConfig) -> Result<(), SwitcherError> {
    mount_once(|| {
        let window = dom::window()?;
        let document = dom::document(&window)?;
        let root = dom::page_root(&document)?;
        dom::on_dom_ready(&document, move || attach(root, config))
    })
}

/// Run `setup` unless an earlier call succeeded; a failed setup can be retried
fn mount_once<F>(setup: F) -> Result<(), SwitcherError>
where
    F: FnOnce() -> Result<(), SwitcherError>,
{
    if MOUNTED.with(Cell::get) {
        tracing::debug!("already mounted");
        return Ok(());
    }
    setup()?;
    MOUNTED.with(|mounted| mounted.set(true));
    Ok(())
}

/// Wire both components under `root`
fn attach(root: web_sys::Element, config: SwitcherConfig) {
    // The two components are independent; one failing does not stop the other
    match TabController::discover(&root, config.clone()) {
        Ok(controller) => {
            if let Err(e) = controller.initialize_view().and_then(|_| controller.bind()) {
                tracing::error!("Tab controller setup failed: {}", e);
            }
        }
        Err(e) => tracing::error!("Tab controller setup failed: {}", e),
    }

    match AutoFitResizer::with_root(root, config) {
        Ok(resizer) => {
            if let Err(e) = resizer.start_triggers() {
                tracing::error!("Auto-fit setup failed: {}", e);
            }
        }
        Err(e) => tracing::error!("Auto-fit setup failed: {}", e),
    }
}

/// Parse an optional config object passed to a JS constructor
pub(crate) fn config_from_js(value: JsValue) -> Result<SwitcherConfig, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(SwitcherConfig::default());
    }
    let config: SwitcherConfig = serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid configuration: {}", e)))?;
    config.validate().map_err(dom::to_js)?;
    Ok(config)
}
