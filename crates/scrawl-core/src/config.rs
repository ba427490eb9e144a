//! Plugin-wide constants and tunable settings.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use thiserror::Error;

/// Namespace prefix for every per-layer user-data key.
pub const PLUGIN_ID: &str = "de.kutilek.scrawl";

/// Master custom parameter holding the vertical pixel ratio.
pub const PEN_RATIO_PARAMETER: &str = "ScrawlPenRatio";

/// Pen slider range, in pixel-grid units.
pub const PEN_SLIDER_RANGE: RangeInclusive<u32> = 1..=256;

/// Horizontal padding around the advance width, as a fraction of the unit size.
pub const H_PAD_FACTOR: f64 = 0.5;

/// Vertical padding above and below the glyph box, as a fraction of the unit size.
pub const V_PAD_FACTOR: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    #[error("pixel_size must be a positive number, got {0}")]
    PixelSize(f64),
    #[error("pen_pixels must be a positive number, got {0}")]
    PenPixels(f64),
    #[error("underlay_opacity must be a number, got {0}")]
    Opacity(f32),
}

/// Tunable settings shared by the paint tool and the overlay renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrawlConfig {
    /// Edge length of one bitmap pixel in outline units, for new canvases.
    pub pixel_size: f64,
    /// Default pen diameter in pixel-grid units.
    pub pen_pixels: f64,
    /// Overlay opacity once the glyph has real outlines.
    pub underlay_opacity: f32,
}

impl Default for ScrawlConfig {
    fn default() -> Self {
        Self {
            pixel_size: 10.0,
            pen_pixels: 2.0,
            underlay_opacity: 0.2,
        }
    }
}

impl ScrawlConfig {
    /// Check user-supplied values. Sizes must be finite and positive;
    /// opacity is clamped to `0..=1`.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if !(self.pixel_size.is_finite() && self.pixel_size > 0.0) {
            return Err(ConfigError::PixelSize(self.pixel_size));
        }
        if !(self.pen_pixels.is_finite() && self.pen_pixels > 0.0) {
            return Err(ConfigError::PenPixels(self.pen_pixels));
        }
        if self.underlay_opacity.is_nan() {
            return Err(ConfigError::Opacity(self.underlay_opacity));
        }
        Ok(Self {
            underlay_opacity: self.underlay_opacity.clamp(0.0, 1.0),
            ..self
        })
    }

    /// Default pen diameter in outline units.
    pub fn default_pen_size(&self) -> f64 {
        self.pen_pixels * self.pixel_size
    }
}
