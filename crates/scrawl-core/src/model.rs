//! Pixel-canvas data model.
//!
//! A scrawl is a low-resolution grayscale raster pinned to a rectangle in
//! outline space. The rectangle and the pixel size together fix the raster's
//! dimensions; see [`crate::geometry::bitmap_dimensions`].

use crate::geometry::bitmap_dimensions;
use image::{GrayImage, Luma};
use serde::{Deserialize, Serialize};

// ─── Geometry ────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in outline units (y-up).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Both extents are finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width > 0.0
            && self.height > 0.0
    }
}

/// A position on the pixel grid, measured from the placement rectangle's
/// bottom-left corner. Fractional; pixel `(i, j)` spans `[i, i + 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

// ─── Bitmap ──────────────────────────────────────────────────────────────

/// Luma value of an untouched pixel.
pub const PAPER: u8 = 255;

/// 8-bit grayscale raster. White is empty, black is fully painted.
///
/// Row 0 is the top row, matching image-file conventions. Painting goes
/// through [`crate::raster`], which flips the y-up pixel grid onto rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    image: GrayImage,
}

impl Bitmap {
    /// A white raster of the given size (each side at least 1).
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            image: GrayImage::from_pixel(width.max(1), height.max(1), Luma([PAPER])),
        }
    }

    /// A white raster sized for `rect` at the given pixel scale.
    pub fn for_placement(rect: &Rect, pixel_size: f64, pixel_ratio: f64) -> Self {
        let (w, h) = bitmap_dimensions(rect, pixel_size, pixel_ratio);
        Self::blank(w, h)
    }

    /// Wrap a decoded image. Returns `None` for a zero-sized image.
    pub fn from_image(image: GrayImage) -> Option<Self> {
        if image.width() == 0 || image.height() == 0 {
            return None;
        }
        Some(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Sample at column `x`, row `y` (row 0 on top).
    pub fn pixel(&self, x: u32, y: u32) -> Option<u8> {
        self.image.get_pixel_checked(x, y).map(|p| p.0[0])
    }

    /// No pixel has been touched by ink.
    pub fn is_blank(&self) -> bool {
        self.image.as_raw().iter().all(|&v| v == PAPER)
    }

    /// Mean ink density, 0.0 (white) to 1.0 (solid black).
    pub fn ink_coverage(&self) -> f64 {
        let raw = self.image.as_raw();
        let ink: u64 = raw.iter().map(|&v| u64::from(PAPER - v)).sum();
        ink as f64 / (raw.len() as f64 * f64::from(PAPER))
    }

    /// Row-major samples, top row first.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub(crate) fn samples_mut(&mut self) -> &mut [u8] {
        &mut self.image
    }
}

// ─── Canvas record ───────────────────────────────────────────────────────

/// Vertical metrics needed to place a default canvas around a layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerMetrics {
    /// Advance width of the layer, in outline units.
    pub advance_width: f64,
    /// Font unit size (units per em).
    pub unit_size: f64,
    /// Master descender; `None` when the master cannot be resolved.
    pub descender: Option<f64>,
}

/// Where a canvas sits and how coarse its pixels are, without the pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub rect: Rect,
    /// Horizontal edge length of one pixel, in outline units.
    pub pixel_size: f64,
    /// Brush diameter, in outline units.
    pub pen_size: f64,
}

impl Placement {
    /// Rect valid, pixel and pen sizes finite and positive.
    pub fn is_valid(&self) -> bool {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        self.rect.is_valid() && positive(self.pixel_size) && positive(self.pen_size)
    }
}

/// The complete scrawl attached to one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasRecord {
    pub bitmap: Bitmap,
    pub rect: Rect,
    pub pixel_size: f64,
    /// Vertical-to-horizontal pixel scale (from the master, not persisted).
    pub pixel_ratio: f64,
    pub pen_size: f64,
}

impl CanvasRecord {
    /// A white canvas for `placement`.
    pub fn blank(placement: Placement, pixel_ratio: f64) -> Self {
        Self {
            bitmap: Bitmap::for_placement(&placement.rect, placement.pixel_size, pixel_ratio),
            rect: placement.rect,
            pixel_size: placement.pixel_size,
            pixel_ratio,
            pen_size: placement.pen_size,
        }
    }

    pub fn placement(&self) -> Placement {
        Placement {
            rect: self.rect,
            pixel_size: self.pixel_size,
            pen_size: self.pen_size,
        }
    }

    /// Vertical edge length of one pixel, in outline units.
    pub fn pixel_height(&self) -> f64 {
        self.pixel_size * self.pixel_ratio
    }

    /// Pen diameter on the pixel grid.
    pub fn pen_pixels(&self) -> f64 {
        self.pen_size / self.pixel_size
    }
}
