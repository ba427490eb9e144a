//! Passive overlay: draws the stored scrawl when the paint tool is not
//! active.
//!
//! | Paint tool active | Context | Outlines | Result |
//! |---|---|---|---|
//! | yes | any | any | suppressed |
//! | no | any | none | full opacity |
//! | no | editing | present | underlay opacity |
//! | no | preview / inactive layer | present | suppressed |

use crate::paint::Surface;
use scrawl_core::{CanvasStore, Document, LayerId, ScrawlConfig};

/// Where the layer is being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// The active layer in an edit view.
    #[default]
    Editing,
    /// Preview panes and print previews.
    Preview,
    /// Non-active layers shown alongside the active one.
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderContext {
    /// The current interactive tool is the paint tool, which draws its own
    /// live bitmap.
    pub tool_active: bool,
    pub mode: RenderMode,
    /// The glyph layer already has vector outlines.
    pub has_outlines: bool,
}

impl RenderContext {
    pub fn for_layer(doc: &Document, layer: LayerId, tool_active: bool, mode: RenderMode) -> Self {
        Self {
            tool_active,
            mode,
            has_outlines: doc.has_outlines(layer),
        }
    }
}

pub struct OverlayRenderer {
    config: ScrawlConfig,
}

impl OverlayRenderer {
    pub fn new(config: ScrawlConfig) -> Self {
        Self { config }
    }

    /// Opacity to draw with, or `None` when the overlay is suppressed.
    pub fn opacity(&self, ctx: &RenderContext) -> Option<f32> {
        if ctx.tool_active {
            return None;
        }
        match (ctx.has_outlines, ctx.mode) {
            (false, _) => Some(1.0),
            (true, RenderMode::Editing) => Some(self.config.underlay_opacity),
            (true, RenderMode::Preview | RenderMode::Inactive) => None,
        }
    }

    /// Draw the scrawl stored on `layer`. Returns whether anything was drawn.
    pub fn render<S: Surface + ?Sized>(
        &self,
        doc: &Document,
        layer: LayerId,
        ctx: &RenderContext,
        surface: &mut S,
    ) -> bool {
        let Some(opacity) = self.opacity(ctx) else {
            return false;
        };
        let Some(record) = CanvasStore::load(doc, layer, doc.pixel_ratio(layer)) else {
            return false;
        };
        surface.draw_bitmap(&record.bitmap, record.rect, opacity);
        true
    }
}

impl Default for OverlayRenderer {
    fn default() -> Self {
        Self::new(ScrawlConfig::default())
    }
}
