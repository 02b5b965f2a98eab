//! Host editor event routing
//!
//! The page builder emits editor events that can change the widget's layout
//! without a window resize. This module decides which of them should re-run
//! the fitting pass and after what delay.

use crate::config::HostConfig;

/// A layout-relevant event reported by the host editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The widget finished rendering in live preview
    ElementReady,
    /// An editor setting changed; `name` is the control name, if the model had one
    SettingChanged { name: Option<String> },
    /// Desktop/tablet/mobile preview switch
    DeviceModeChanged,
}

/// When and how to re-run the fitting pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rerun {
    pub delay_ms: u32,
    /// Coalesce with earlier pending reruns of the same kind
    pub debounced: bool,
}

impl HostEvent {
    /// Rerun required by this event, or `None` if it is irrelevant
    pub fn rerun(&self, config: &HostConfig) -> Option<Rerun> {
        match self {
            HostEvent::ElementReady => Some(Rerun {
                delay_ms: config.element_ready_delay_ms,
                debounced: false,
            }),
            HostEvent::SettingChanged { name: Some(name) }
                if name.starts_with(&config.typography_prefix) =>
            {
                Some(Rerun {
                    delay_ms: config.typography_delay_ms,
                    debounced: true,
                })
            }
            HostEvent::SettingChanged { .. } => None,
            HostEvent::DeviceModeChanged => Some(Rerun {
                delay_ms: config.device_mode_delay_ms,
                debounced: false,
            }),
        }
    }
}

/// Bounded schedule for probing the host's hook registry
#[derive(Debug, Clone)]
pub struct ProbeSchedule {
    interval_ms: u32,
    max_attempts: Option<u32>,
    attempts: u32,
}

impl ProbeSchedule {
    pub fn new(config: &HostConfig) -> Self {
        Self {
            interval_ms: config.poll_interval_ms,
            max_attempts: config.poll_max_attempts,
            attempts: 0,
        }
    }

    /// Delay before the next probe, or `None` once attempts are exhausted
    pub fn next_delay(&mut self) -> Option<u32> {
        if let Some(max) = self.max_attempts {
            if self.attempts >= max {
                return None;
            }
        }
        self.attempts += 1;
        Some(self.interval_ms)
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}
