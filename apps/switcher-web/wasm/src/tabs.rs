//! Tab controller: applies `ViewState` transitions to the rendered widget
//!
//! Buttons and document overlays of a group are discovered once at mount time.
//! Every click runs the pure transition in `switcher_core::view` and then
//! applies the resulting `ViewPlan` to the DOM.

use crate::dom::{self, js_err, to_js};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use switcher_core::{
    ButtonState, GroupCounts, OverlayVisibility, SwitcherConfig, SwitcherError, TabGroup,
    ViewPlan, ViewState,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, MouseEvent, Window};

const SHOWN_STYLES: &[(&str, &str)] =
    &[("visibility", "visible"), ("opacity", "1"), ("z-index", "2")];

const HIDDEN_STYLES: &[(&str, &str)] = &[
    ("visibility", "hidden"),
    ("opacity", "0"),
    ("z-index", "1"),
    ("display", "none"),
];

/// Elements belonging to one tab group
#[derive(Debug, Default)]
struct GroupElements {
    buttons: Vec<HtmlElement>,
    overlays: Vec<HtmlElement>,
}

impl GroupElements {
    fn discover(
        root: &Element,
        config: &SwitcherConfig,
        group: TabGroup,
    ) -> Result<Self, SwitcherError> {
        Ok(Self {
            buttons: dom::query_all(root, config.selectors.button(group))?,
            overlays: dom::query_all(root, config.selectors.overlay(group))?,
        })
    }
}

struct Inner {
    config: SwitcherConfig,
    window: Window,
    state: RefCell<ViewState>,
    tab1: GroupElements,
    tab2: GroupElements,
    bound: Cell<bool>,
}

impl Inner {
    fn group(&self, group: TabGroup) -> &GroupElements {
        match group {
            TabGroup::Tab1 => &self.tab1,
            TabGroup::Tab2 => &self.tab2,
        }
    }

    fn counts(&self) -> GroupCounts {
        GroupCounts::new(self.tab1.overlays.len(), self.tab2.overlays.len())
    }

    fn apply(&self, plan: &ViewPlan) -> Result<(), SwitcherError> {
        for group in [TabGroup::Tab1, TabGroup::Tab2] {
            let presentation = plan.group(group);
            let elements = self.group(group);

            for overlay in &elements.overlays {
                match presentation.overlays {
                    OverlayVisibility::Shown => {
                        dom::set_styles(overlay, SHOWN_STYLES)?;
                        overlay.style().remove_property("display").map_err(js_err)?;
                    }
                    OverlayVisibility::Hidden => dom::set_styles(overlay, HIDDEN_STYLES)?,
                    OverlayVisibility::Untouched => {}
                }
            }

            for button in &elements.buttons {
                match presentation.buttons {
                    ButtonState::Active => self.mark_button(button, true)?,
                    ButtonState::Inactive => self.mark_button(button, false)?,
                    ButtonState::Removed => dom::set_styles(button, &[("display", "none")])?,
                    ButtonState::Untouched => {}
                }
            }
        }

        if let Some(group) = plan.reload {
            self.reload_overlays(&self.group(group).overlays)?;
        }
        Ok(())
    }

    fn mark_button(&self, button: &HtmlElement, active: bool) -> Result<(), SwitcherError> {
        let classes = button.class_list();
        classes
            .toggle_with_force(&self.config.selectors.active_class, active)
            .map_err(js_err)?;
        classes
            .toggle_with_force(&self.config.selectors.inactive_class, !active)
            .map_err(js_err)?;
        Ok(())
    }

    /// Blank each overlay's embed source and restore it after the reload delay
    ///
    /// Hidden overlays are taken out of layout, and some viewers keep stale
    /// layout and scroll state across that; re-setting the source rebuilds it.
    fn reload_overlays(&self, overlays: &[HtmlElement]) -> Result<(), SwitcherError> {
        for overlay in overlays {
            let Some(surface) = overlay
                .query_selector(&self.config.selectors.embed_surface)
                .map_err(js_err)?
            else {
                continue;
            };

            let src = surface.get_attribute("src").unwrap_or_default();
            surface.set_attribute("src", "").map_err(js_err)?;

            dom::set_timeout(&self.window, self.config.tabs.reload_delay_ms, move || {
                if let Err(e) = surface.set_attribute("src", &src) {
                    tracing::warn!("Failed to restore document source: {}", js_err(e));
                }
            })?;
        }
        Ok(())
    }

    fn show_tab(&self, group: TabGroup) -> Result<bool, SwitcherError> {
        let plan = self.state.borrow_mut().select(group);
        match plan {
            Some(plan) => {
                tracing::debug!(tab = group.number(), "showing tab");
                self.apply(&plan)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Owns the tab visibility state of one widget root
#[wasm_bindgen]
pub struct TabController {
    inner: Rc<Inner>,
}

impl TabController {
    /// Discover the widget's buttons and overlays under `root`
    pub fn discover(root: &Element, config: SwitcherConfig) -> Result<Self, SwitcherError> {
        let window = dom::window()?;
        let tab1 = GroupElements::discover(root, &config, TabGroup::Tab1)?;
        let tab2 = GroupElements::discover(root, &config, TabGroup::Tab2)?;

        Ok(Self {
            inner: Rc::new(Inner {
                config,
                window,
                state: RefCell::new(ViewState::default()),
                tab1,
                tab2,
                bound: Cell::new(false),
            }),
        })
    }

    /// Set up the initial view from the overlays that are present
    ///
    /// With no overlays at all the error is logged and the widget stays empty.
    pub fn initialize_view(&self) -> Result<(), SwitcherError> {
        match ViewState::initial(self.inner.counts()) {
            Ok((state, plan)) => {
                *self.inner.state.borrow_mut() = state;
                self.inner.apply(&plan)
            }
            Err(SwitcherError::NoDocuments) => {
                tracing::error!("{}", SwitcherError::NoDocuments);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Attach click listeners to every tab button. Only the first call binds.
    pub fn bind(&self) -> Result<(), SwitcherError> {
        if self.inner.bound.replace(true) {
            return Ok(());
        }

        for group in [TabGroup::Tab1, TabGroup::Tab2] {
            for button in &self.inner.group(group).buttons {
                let inner = Rc::clone(&self.inner);
                let on_click = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
                    event.prevent_default();
                    if let Err(e) = inner.show_tab(group) {
                        tracing::warn!("Tab switch failed: {}", e);
                    }
                });
                button
                    .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
                    .map_err(js_err)?;
                // Listeners live as long as the page
                on_click.forget();
            }
        }
        Ok(())
    }

    /// Show `group`, hide the other one and reload `group`'s documents
    ///
    /// Returns false when the group has no documents.
    pub fn show_tab(&self, group: TabGroup) -> Result<bool, SwitcherError> {
        self.inner.show_tab(group)
    }

    pub fn view_state(&self) -> ViewState {
        *self.inner.state.borrow()
    }

    pub fn counts(&self) -> GroupCounts {
        self.inner.counts()
    }
}

#[wasm_bindgen]
impl TabController {
    /// Create a controller for the whole page and set its initial view
    ///
    /// `config` is an optional object in the `SwitcherConfig` shape.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<TabController, JsValue> {
        let config = crate::config_from_js(config)?;
        let window = dom::window().map_err(to_js)?;
        let document = dom::document(&window).map_err(to_js)?;
        let root = dom::page_root(&document).map_err(to_js)?;

        let controller = Self::discover(&root, config).map_err(to_js)?;
        controller.initialize_view().map_err(to_js)?;
        controller.bind().map_err(to_js)?;
        Ok(controller)
    }

    /// Select tab 1 or 2, as a click would
    #[wasm_bindgen]
    pub fn select(&self, tab: u8) -> Result<bool, JsValue> {
        let group = TabGroup::from_number(tab)
            .ok_or_else(|| JsValue::from_str(&format!("Invalid tab number: {}", tab)))?;
        self.show_tab(group).map_err(to_js)
    }

    /// Number of the visible tab, if any
    #[wasm_bindgen(js_name = activeTab)]
    pub fn active_tab(&self) -> Option<u8> {
        self.view_state().active().map(TabGroup::number)
    }
}
