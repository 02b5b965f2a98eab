//! Core logic for the PDF tab switcher widget
//!
//! Everything here is DOM-free so it can be tested natively:
//! - `view`: which document group is visible and what each transition changes
//! - `fit`: binary search for the largest font size that fits a container
//! - `schedule`: frame throttle, observed-container set and debounce guards
//! - `host`: which host editor events re-run fitting, and when
//! - `config`: selectors, delays and search parameters

pub mod config;
pub mod error;
pub mod fit;
pub mod host;
pub mod schedule;
pub mod view;

pub use config::{HostConfig, Selectors, SwitcherConfig, TabConfig};
pub use error::SwitcherError;
pub use fit::{fit_text, BoxSize, FitOutcome, FitParams, TextSurface};
pub use host::{HostEvent, ProbeSchedule, Rerun};
pub use schedule::{Debounce, FrameThrottle, ObservedSet};
pub use view::{
    ButtonState, GroupCounts, GroupPresentation, OverlayVisibility, TabGroup, ViewPlan, ViewState,
};
