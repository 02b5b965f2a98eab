//! Binary-search text fitting
//!
//! Finds the largest font size at which a single line of text still fits inside
//! its container. Font metrics are not linear across fonts and platforms, so the
//! search bisects against the rendered box reported by the surface instead of
//! estimating a size from glyph metrics.

use crate::error::SwitcherError;
use serde::{Deserialize, Serialize};

/// Content box of a container, in CSS pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxSize {
    pub width: f64,
    pub height: f64,
}

impl BoxSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when `other` fits inside this box on both axes
    pub fn contains(&self, other: BoxSize) -> bool {
        other.width <= self.width && other.height <= self.height
    }
}

/// Search parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitParams {
    /// Smallest legible size; also the result when nothing larger fits
    pub min_font: f64,
    /// Upper bound as a fraction of container height
    pub max_ratio: f64,
    /// Stop once the bracket is this narrow
    pub tolerance: f64,
    pub max_iterations: u32,
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            min_font: 4.0,
            max_ratio: 0.8,
            tolerance: 0.5,
            max_iterations: 20,
        }
    }
}

impl FitParams {
    /// Check the parameters describe a terminating search
    pub fn validate(&self) -> Result<(), SwitcherError> {
        if !(self.min_font.is_finite() && self.min_font > 0.0) {
            return Err(SwitcherError::InvalidConfig(format!(
                "min_font must be positive, got {}",
                self.min_font
            )));
        }
        if !(self.max_ratio > 0.0 && self.max_ratio <= 1.0) {
            return Err(SwitcherError::InvalidConfig(format!(
                "max_ratio must be in (0, 1], got {}",
                self.max_ratio
            )));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(SwitcherError::InvalidConfig(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(SwitcherError::InvalidConfig(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Initial search bracket for a container
    pub fn bounds(&self, container: BoxSize) -> (f64, f64) {
        (self.min_font, container.height * self.max_ratio)
    }
}

/// Something whose font size can be set and whose rendered extent can be read
///
/// In the browser this is a `span`; tests use a synthetic glyph model.
pub trait TextSurface {
    /// Apply a font size in CSS pixels
    fn set_font_size(&mut self, px: f64);

    /// Scrollable extent at the current font size
    fn scroll_size(&self) -> BoxSize;
}

/// Result of a fitting pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOutcome {
    pub font_size: f64,
    pub iterations: u32,
}

/// Run the bisection and leave `surface` at the best-fitting size
///
/// A degenerate container (upper bound at or below `min_font`) runs zero
/// iterations and commits `min_font`.
pub fn fit_text<S: TextSurface + ?Sized>(
    surface: &mut S,
    container: BoxSize,
    params: &FitParams,
) -> FitOutcome {
    let (mut lo, mut hi) = params.bounds(container);
    let mut best = params.min_font;
    let mut iterations = 0;

    while hi - lo > params.tolerance && iterations < params.max_iterations {
        iterations += 1;
        let mid = (lo + hi) / 2.0;
        surface.set_font_size(mid);

        if container.contains(surface.scroll_size()) {
            best = mid;
            lo = mid;
        } else {
            hi = mid;
        }
    }

    surface.set_font_size(best);
    tracing::trace!(font_size = best, iterations, "text fitted");

    FitOutcome {
        font_size: best,
        iterations,
    }
}

/// Iterations needed to narrow `range` below `tolerance` by halving
pub fn iterations_for_range(range: f64, tolerance: f64) -> u32 {
    if range <= tolerance {
        return 0;
    }
    (range / tolerance).log2().ceil() as u32
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Monospace glyph model: width grows with length, height with line height
    #[derive(Debug, Clone)]
    pub struct GlyphBox {
        pub chars: usize,
        pub advance: f64,
        pub line_height: f64,
        pub font_size: f64,
        pub sets: u32,
    }

    impl GlyphBox {
        pub fn new(chars: usize) -> Self {
            Self {
                chars,
                advance: 0.6,
                line_height: 1.2,
                font_size: 16.0,
                sets: 0,
            }
        }
    }

    impl TextSurface for GlyphBox {
        fn set_font_size(&mut self, px: f64) {
            self.font_size = px;
            self.sets += 1;
        }

        fn scroll_size(&self) -> BoxSize {
            BoxSize::new(
                self.chars as f64 * self.advance * self.font_size,
                self.line_height * self.font_size,
            )
        }
    }
}
