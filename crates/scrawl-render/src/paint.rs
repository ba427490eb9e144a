//! Bitmap → Vello drawing commands.
//!
//! The scene is built in glyph space (y-up); the caller applies its own
//! view transform when presenting the scene via wgpu.

use kurbo::Affine;
use peniko::{Blob, Image, ImageFormat as Format, ImageQuality};
use scrawl_core::{Bitmap, Rect};
use std::sync::Arc;
use vello::Scene;

/// A 2D target that can composite a scrawl bitmap into a placement rect.
pub trait Surface {
    /// Draw `bitmap` stretched over `rect` with nearest-neighbour sampling.
    fn draw_bitmap(&mut self, bitmap: &Bitmap, rect: Rect, opacity: f32);
}

/// Surface that appends image draws to a Vello scene.
pub struct VelloSurface<'a> {
    scene: &'a mut Scene,
}

impl<'a> VelloSurface<'a> {
    pub fn new(scene: &'a mut Scene) -> Self {
        Self { scene }
    }
}

impl Surface for VelloSurface<'_> {
    fn draw_bitmap(&mut self, bitmap: &Bitmap, rect: Rect, opacity: f32) {
        let image = ink_image(bitmap)
            .with_quality(ImageQuality::Low)
            .with_alpha(opacity.clamp(0.0, 1.0));
        let transform = placement_transform(bitmap.dimensions(), rect);
        log::trace!(
            "DRAW scrawl {}x{} at ({}, {}) alpha {opacity}",
            bitmap.width(),
            bitmap.height(),
            rect.x,
            rect.y
        );
        self.scene.draw_image(&image, transform);
    }
}

/// Map image pixels (row 0 on top) onto `rect` in y-up glyph space.
pub fn placement_transform((width, height): (u32, u32), rect: Rect) -> Affine {
    let sx = rect.width / f64::from(width);
    let sy = rect.height / f64::from(height);
    Affine::new([sx, 0.0, 0.0, -sy, rect.x, rect.y + rect.height])
}

/// Black ink with alpha = darkness, so untouched paper is transparent.
fn ink_image(bitmap: &Bitmap) -> Image {
    let rgba: Vec<u8> = bitmap
        .as_raw()
        .iter()
        .flat_map(|&luma| [0, 0, 0, 255 - luma])
        .collect();
    Image::new(
        Blob::new(Arc::new(rgba)),
        Format::Rgba8,
        bitmap.width(),
        bitmap.height(),
    )
}
