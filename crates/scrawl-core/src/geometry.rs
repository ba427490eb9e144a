//! Mapping between outline units and the pixel grid.

use crate::config::{H_PAD_FACTOR, V_PAD_FACTOR};
use crate::model::{LayerMetrics, PixelPoint, Rect};

/// Upper bound on either raster side, so a corrupt rect cannot allocate
/// an enormous bitmap.
pub const MAX_DIMENSION: u32 = 8192;

/// Raster size for `rect` at `pixel_size` × `pixel_size * pixel_ratio`.
///
/// Each side is `round(extent / pixel_extent)`, clamped to `1..=MAX_DIMENSION`.
pub fn bitmap_dimensions(rect: &Rect, pixel_size: f64, pixel_ratio: f64) -> (u32, u32) {
    let w = rect.width / pixel_size;
    let h = rect.height / (pixel_size * pixel_ratio);
    (clamp_dimension(w), clamp_dimension(h))
}

fn clamp_dimension(value: f64) -> u32 {
    let rounded = value.round();
    if !rounded.is_finite() || rounded < 1.0 {
        return 1;
    }
    rounded.min(f64::from(MAX_DIMENSION)) as u32
}

/// Convert a glyph-space point to pixel-grid coordinates.
///
/// The placement origin maps to `(0, 0)`; one pixel is `pixel_size` wide
/// and `pixel_size * pixel_ratio` tall.
pub fn to_pixel(point: (f64, f64), rect: &Rect, pixel_size: f64, pixel_ratio: f64) -> PixelPoint {
    PixelPoint {
        x: (point.0 - rect.x) / pixel_size,
        y: (point.1 - rect.y) / (pixel_size * pixel_ratio),
    }
}

/// Descender used when the layer's master cannot be resolved.
pub fn fallback_descender(unit_size: f64) -> f64 {
    (-unit_size * V_PAD_FACTOR).round()
}

/// Default placement around a layer that has no stored rectangle.
///
/// Pads the advance width by half a unit on each side, and the
/// descender-to-(descender + unit size) band by a fifth of a unit.
pub fn deduce_default_rect(metrics: &LayerMetrics) -> Rect {
    let h_pad = (metrics.unit_size * H_PAD_FACTOR).round();
    let v_pad = (metrics.unit_size * V_PAD_FACTOR).round();
    let descender = metrics
        .descender
        .unwrap_or_else(|| fallback_descender(metrics.unit_size));
    Rect::new(
        -h_pad,
        descender - v_pad,
        metrics.advance_width + 2.0 * h_pad,
        metrics.unit_size + 2.0 * v_pad,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RECT: Rect = Rect::new(-500.0, -400.0, 1600.0, 1400.0);

    #[test]
    fn origin_maps_to_zero() {
        assert_eq!(to_pixel((-500.0, -400.0), &RECT, 10.0, 1.0), PixelPoint::new(0.0, 0.0));
    }

    #[test]
    fn one_pixel_step_maps_to_one() {
        let p = to_pixel((-500.0 + 10.0, -400.0 + 10.0 * 1.5), &RECT, 10.0, 1.5);
        assert_eq!(p, PixelPoint::new(1.0, 1.0));
    }

    #[test]
    fn points_outside_rect_map_outside_grid() {
        let p = to_pixel((-520.0, -400.0), &RECT, 10.0, 1.0);
        assert_eq!(p, PixelPoint::new(-2.0, 0.0));
    }

    #[test]
    fn default_rect_scenario() {
        let metrics = LayerMetrics {
            advance_width: 600.0,
            unit_size: 1000.0,
            descender: Some(-200.0),
        };
        assert_eq!(deduce_default_rect(&metrics), Rect::new(-500.0, -400.0, 1600.0, 1400.0));
    }

    #[test]
    fn default_rect_is_deterministic() {
        let metrics = LayerMetrics {
            advance_width: 512.0,
            unit_size: 2048.0,
            descender: Some(-480.0),
        };
        assert_eq!(deduce_default_rect(&metrics), deduce_default_rect(&metrics));
    }

    #[test]
    fn missing_descender_falls_back() {
        let metrics = LayerMetrics {
            advance_width: 500.0,
            unit_size: 1000.0,
            descender: None,
        };
        let rect = deduce_default_rect(&metrics);
        assert_eq!(rect.y, -200.0 - 200.0);
    }

    #[test]
    fn dimensions_round_and_clamp() {
        assert_eq!(bitmap_dimensions(&RECT, 10.0, 1.0), (160, 140));
        assert_eq!(bitmap_dimensions(&Rect::new(0.0, 0.0, 14.0, 16.0), 10.0, 1.0), (1, 2));
        assert_eq!(bitmap_dimensions(&Rect::new(0.0, 0.0, 1.0, 1.0), 10.0, 1.0), (1, 1));
        assert_eq!(bitmap_dimensions(&RECT, 1e-9, 1.0), (MAX_DIMENSION, MAX_DIMENSION));
    }
}
