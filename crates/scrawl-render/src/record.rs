//! A surface that records draw calls instead of compositing them.
//!
//! Hosts that own their own compositor forward the recorded calls;
//! tests use it to observe what would have been drawn.

use crate::paint::Surface;
use scrawl_core::{Bitmap, Rect};

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub rect: Rect,
    pub opacity: f32,
    pub size: (u32, u32),
    /// Mean ink density of the bitmap at draw time.
    pub ink: f64,
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Surface for RecordingSurface {
    fn draw_bitmap(&mut self, bitmap: &Bitmap, rect: Rect, opacity: f32) {
        self.calls.push(DrawCall {
            rect,
            opacity,
            size: bitmap.dimensions(),
            ink: bitmap.ink_coverage(),
        });
    }
}
