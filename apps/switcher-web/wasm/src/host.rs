//! Page builder editor integration
//!
//! The editor exposes a hook registry on `window.elementorFrontend.hooks` and
//! Backbone-style channels on `window.elementor.channels`. None of these exist
//! on the public site, so everything here is feature-detected.

use crate::dom::{self, js_err};
use js_sys::Function;
use std::rc::Rc;
use switcher_core::{HostConfig, HostEvent, ProbeSchedule, SwitcherError};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

/// Handles to the host's event sources
pub struct HostHooks {
    hooks: JsValue,
    editor: Option<JsValue>,
    device_mode: Option<JsValue>,
}

impl HostHooks {
    /// Look the hook registry up on `window`
    pub fn detect(window: &Window) -> Option<Self> {
        let hooks = dom::lookup(window, &["elementorFrontend", "hooks"])?;
        Some(Self {
            hooks,
            editor: dom::lookup(window, &["elementor", "channels", "editor"]),
            device_mode: dom::lookup(window, &["elementor", "channels", "deviceMode"]),
        })
    }

    /// Probe until the registry appears or the attempt budget runs out
    ///
    /// Resolves once; nothing keeps polling after it returns.
    pub async fn wait_for(window: &Window, config: &HostConfig) -> Option<Self> {
        let mut probe = ProbeSchedule::new(config);
        loop {
            if let Some(hooks) = Self::detect(window) {
                tracing::debug!(attempts = probe.attempts(), "host editor detected");
                return Some(hooks);
            }
            let delay = probe.next_delay()?;
            if let Err(e) = dom::sleep(window, delay).await {
                tracing::warn!("Host probe timer failed: {}", e);
                return None;
            }
        }
    }

    /// Register `handler` for element-ready, editor change and device mode events
    ///
    /// The channel subscriptions are optional; only the hook registry is required.
    pub fn subscribe<F>(&self, config: &HostConfig, handler: F) -> Result<(), SwitcherError>
    where
        F: Fn(HostEvent) + 'static,
    {
        let handler = Rc::new(handler);

        let on_ready = {
            let handler = Rc::clone(&handler);
            Closure::<dyn FnMut()>::new(move || handler(HostEvent::ElementReady))
        };
        call_method(
            &self.hooks,
            "addAction",
            &JsValue::from_str(&config.element_ready_hook),
            on_ready.as_ref(),
        )?;
        on_ready.forget();

        if let Some(editor) = &self.editor {
            let handler = Rc::clone(&handler);
            let on_change = Closure::<dyn FnMut(JsValue)>::new(move |model: JsValue| {
                handler(HostEvent::SettingChanged {
                    name: setting_name(&model),
                })
            });
            call_method(editor, "on", &JsValue::from_str("change"), on_change.as_ref())?;
            on_change.forget();
        }

        if let Some(device_mode) = &self.device_mode {
            let handler = Rc::clone(&handler);
            let on_change =
                Closure::<dyn FnMut()>::new(move || handler(HostEvent::DeviceModeChanged));
            call_method(
                device_mode,
                "on",
                &JsValue::from_str("change"),
                on_change.as_ref(),
            )?;
            on_change.forget();
        }

        Ok(())
    }
}

/// Control name carried by an editor change event (`model.model.attributes.name`)
pub fn setting_name(model: &JsValue) -> Option<String> {
    dom::lookup(model, &["model", "attributes", "name"]).and_then(|v| v.as_string())
}

/// Call `target[method](arg, callback)` with `target` as `this`
fn call_method(
    target: &JsValue,
    method: &str,
    arg: &JsValue,
    callback: &JsValue,
) -> Result<(), SwitcherError> {
    let function = js_sys::Reflect::get(target, &JsValue::from_str(method))
        .map_err(js_err)?
        .dyn_into::<Function>()
        .map_err(|_| SwitcherError::Dom(format!("{} is not a function", method)))?;
    function.call2(target, arg, callback).map_err(js_err)?;
    Ok(())
}
