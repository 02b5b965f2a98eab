//! Widget configuration
//!
//! Every field has a default matching the markup the page builder renders, so
//! an empty JSON object (or no config at all) is a valid configuration.

use crate::error::SwitcherError;
use crate::fit::FitParams;
use crate::view::TabGroup;
use serde::{Deserialize, Serialize};

/// Top-level configuration for both components
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitcherConfig {
    /// Class names and selectors of the DOM contract
    pub selectors: Selectors,
    /// Tab controller timing
    pub tabs: TabConfig,
    /// Text fitting search parameters
    pub fit: FitParams,
    /// Host editor integration
    pub host: HostConfig,
}

impl SwitcherConfig {
    /// Parse configuration from a JSON string
    ///
    /// # Errors
    ///
    /// Returns `SwitcherError::InvalidConfig` if the JSON is malformed or a
    /// value fails validation.
    ///
    /// # Example
    ///
    /// ```
    /// use switcher_core::SwitcherConfig;
    ///
    /// let config = SwitcherConfig::from_json(r#"{ "tabs": { "reload_delay_ms": 80 } }"#).unwrap();
    /// assert_eq!(config.tabs.reload_delay_ms, 80);
    /// assert_eq!(config.fit.max_iterations, 20);
    /// ```
    pub fn from_json(s: &str) -> Result<Self, SwitcherError> {
        let config: Self = serde_json::from_str(s)
            .map_err(|e| SwitcherError::InvalidConfig(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), SwitcherError> {
        self.fit.validate()?;
        if self.host.poll_interval_ms == 0 {
            return Err(SwitcherError::InvalidConfig(
                "host.poll_interval_ms must be greater than 0".to_string(),
            ));
        }
        for (field, value) in [
            ("selectors.tab1_button", &self.selectors.tab1_button),
            ("selectors.tab2_button", &self.selectors.tab2_button),
            ("selectors.tab1_overlay", &self.selectors.tab1_overlay),
            ("selectors.tab2_overlay", &self.selectors.tab2_overlay),
            ("selectors.fit_target", &self.selectors.fit_target),
            ("selectors.embed_surface", &self.selectors.embed_surface),
            ("selectors.widget_wrapper", &self.selectors.widget_wrapper),
            ("selectors.structural_container", &self.selectors.structural_container),
            ("selectors.active_class", &self.selectors.active_class),
            ("selectors.inactive_class", &self.selectors.inactive_class),
        ] {
            if value.trim().is_empty() {
                return Err(SwitcherError::InvalidConfig(format!(
                    "{} must not be empty",
                    field
                )));
            }
        }
        Ok(())
    }
}

/// Selectors and class names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub tab1_button: String,
    pub tab2_button: String,
    pub tab1_overlay: String,
    pub tab2_overlay: String,
    /// Element inside an overlay whose `src` is reloaded
    pub embed_surface: String,
    /// Text spans to fit
    pub fit_target: String,
    /// Wrapper the page builder puts around each widget instance
    pub widget_wrapper: String,
    /// Structural ancestor whose resizes must trigger a refit
    pub structural_container: String,
    pub active_class: String,
    pub inactive_class: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            tab1_button: ".tab-1-btn".to_string(),
            tab2_button: ".tab-2-btn".to_string(),
            tab1_overlay: ".tab-1-pdf".to_string(),
            tab2_overlay: ".tab-2-pdf".to_string(),
            embed_surface: "iframe".to_string(),
            fit_target: ".auto-resize span".to_string(),
            widget_wrapper: ".elementor-widget-switcher-widget".to_string(),
            structural_container: ".elementor-column".to_string(),
            active_class: "active-tab".to_string(),
            inactive_class: "inactive-tab".to_string(),
        }
    }
}

impl Selectors {
    /// Button selector for a group
    pub fn button(&self, group: TabGroup) -> &str {
        match group {
            TabGroup::Tab1 => &self.tab1_button,
            TabGroup::Tab2 => &self.tab2_button,
        }
    }

    /// Overlay selector for a group
    pub fn overlay(&self, group: TabGroup) -> &str {
        match group {
            TabGroup::Tab1 => &self.tab1_overlay,
            TabGroup::Tab2 => &self.tab2_overlay,
        }
    }
}

/// Tab controller settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabConfig {
    /// How long an embed surface stays blank before its source is restored
    pub reload_delay_ms: u32,
}

impl Default for TabConfig {
    fn default() -> Self {
        Self {
            reload_delay_ms: 50,
        }
    }
}

/// Host editor integration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Action fired when the widget renders in live preview
    pub element_ready_hook: String,
    /// Control-name prefix of typography settings that affect fitted text
    pub typography_prefix: String,
    pub element_ready_delay_ms: u32,
    pub typography_delay_ms: u32,
    pub device_mode_delay_ms: u32,
    /// Deferral after fonts are ready before the first pass
    pub font_ready_delay_ms: u32,
    pub poll_interval_ms: u32,
    /// Give up probing for the host after this many attempts; `None` probes forever
    pub poll_max_attempts: Option<u32>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            element_ready_hook: "frontend/element_ready/switcher-widget.default".to_string(),
            typography_prefix: "job_title_typography_".to_string(),
            element_ready_delay_ms: 150,
            typography_delay_ms: 150,
            device_mode_delay_ms: 100,
            font_ready_delay_ms: 0,
            poll_interval_ms: 200,
            // One minute of probing
            poll_max_attempts: Some(300),
        }
    }
}
