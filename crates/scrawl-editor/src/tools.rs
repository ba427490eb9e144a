//! The scrawl paint tool.
//!
//! Translates pointer events into dot/line paint operations on an
//! in-memory bitmap, and writes the bitmap back to the layer on pointer
//! release or before the active layer changes.
//!
//! ```text
//! Inactive ──activate──▶ Idle ──down/drag──▶ Stroking
//!    ▲                    ▲ │                   │
//!    └────deactivate──────┘ └◀──────up (save)───┘
//! ```

use crate::commands;
use crate::host::{Host, Notification, SubscriptionToken};
use crate::input::{InputEvent, Modifiers};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use scrawl_core::config::PEN_SLIDER_RANGE;
use scrawl_core::{
    CanvasRecord, CanvasStore, Ink, LayerId, PaintOp, PixelPoint, Placement, Rect, ScrawlConfig,
    to_pixel,
};
use scrawl_render::Surface;
use smallvec::SmallVec;
use std::path::PathBuf;

/// Observable result of handling one event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToolEffect {
    /// A paint operation was rasterized into the live bitmap.
    Paint(PaintOp),
    /// The live bitmap was written to this layer.
    Saved(LayerId),
    /// Not handled by the tool; the host should process the event itself.
    Forward,
}

pub type Effects = SmallVec<[ToolEffect; 2]>;

/// Trait for tools that handle input from the host.
pub trait Tool {
    /// Handle an input event, returning what happened.
    fn handle(&mut self, host: &mut dyn Host, event: &InputEvent) -> Effects;
}

// ─── Paint Tool ──────────────────────────────────────────────────────────

/// Canvas of the tracked layer.
struct Canvas {
    layer: LayerId,
    record: CanvasRecord,
}

pub struct PaintTool {
    config: ScrawlConfig,
    canvas: Option<Canvas>,
    subscription: Option<SubscriptionToken>,
    /// Strokes not yet written back to the layer.
    dirty: bool,
    erase: bool,
    stroking: bool,
    /// Last painted pixel of the current stroke.
    prev: Option<PixelPoint>,
}

impl Default for PaintTool {
    fn default() -> Self {
        Self::new(ScrawlConfig::default())
    }
}

impl PaintTool {
    pub fn new(config: ScrawlConfig) -> Self {
        Self {
            config,
            canvas: None,
            subscription: None,
            dirty: false,
            erase: false,
            stroking: false,
            prev: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_erasing(&self) -> bool {
        self.erase
    }

    pub fn is_stroking(&self) -> bool {
        self.stroking
    }

    pub fn tracked_layer(&self) -> Option<LayerId> {
        self.canvas.as_ref().map(|c| c.layer)
    }

    /// The live canvas of the tracked layer.
    pub fn record(&self) -> Option<&CanvasRecord> {
        self.canvas.as_ref().map(|c| &c.record)
    }

    /// Start tracking the host's active layer and listening for layer
    /// changes. Returns `false` when no layer is available.
    pub fn activate(&mut self, host: &mut dyn Host) -> bool {
        if self.subscription.is_none() {
            self.subscription = Some(host.subscribe());
        }
        match host.active_layer() {
            Some(layer) => self.track(host, layer),
            None => {
                log::trace!("activate: no active layer");
                self.canvas = None;
                false
            }
        }
    }

    /// Stop listening for layer changes. Does not save; callers flush via
    /// pointer-up or layer switches.
    pub fn deactivate(&mut self, host: &mut dyn Host) {
        if let Some(token) = self.subscription.take() {
            host.unsubscribe(token);
        }
        if self.dirty {
            log::warn!(
                "deactivating with unsaved strokes on {:?}",
                self.tracked_layer()
            );
        }
        self.canvas = None;
        self.dirty = false;
        self.stroking = false;
        self.prev = None;
    }

    /// Load (or allocate) the canvas of `layer` and make it the tracked one.
    fn track(&mut self, host: &mut dyn Host, layer: LayerId) -> bool {
        let doc = host.document();
        let Some(metrics) = doc.metrics(layer) else {
            log::trace!("activate: layer {layer} is not in the document");
            self.canvas = None;
            return false;
        };
        let ratio = doc.pixel_ratio(layer);
        let record = CanvasStore::load(doc, layer, ratio).unwrap_or_else(|| {
            let placement = CanvasStore::load_placement(doc, layer, &metrics, &self.config);
            CanvasRecord::blank(placement, ratio)
        });
        log::debug!(
            "tracking layer {layer}: {}x{} px",
            record.bitmap.width(),
            record.bitmap.height()
        );
        self.canvas = Some(Canvas { layer, record });
        self.dirty = false;
        self.stroking = false;
        self.prev = None;
        host.request_redraw();
        true
    }

    /// React to a host notification. A layer switch first saves unsaved
    /// strokes on the previous layer; if that fails, the tool stays on the
    /// previous layer.
    pub fn on_notification(&mut self, host: &mut dyn Host, notification: &Notification) -> Effects {
        let mut effects = Effects::new();
        let Some(token) = self.subscription else {
            return effects;
        };
        if !host.is_subscribed(token) {
            return effects;
        }
        match *notification {
            Notification::ActiveLayerChanged { layer } => {
                if layer.is_some() && layer == self.tracked_layer() {
                    return effects;
                }
                effects.extend(self.flush(host));
                if self.dirty {
                    log::warn!(
                        "keeping layer {:?}: unsaved strokes could not be written",
                        self.tracked_layer()
                    );
                    return effects;
                }
                match layer {
                    Some(layer) => {
                        self.track(host, layer);
                    }
                    None => {
                        self.canvas = None;
                        self.prev = None;
                        self.stroking = false;
                    }
                }
            }
        }
        effects
    }

    /// Save the tracked canvas if it has unsaved strokes.
    pub fn flush(&mut self, host: &mut dyn Host) -> Option<ToolEffect> {
        if !self.dirty {
            return None;
        }
        let canvas = self.canvas.as_ref()?;
        match CanvasStore::save(host.document_mut(), canvas.layer, &canvas.record) {
            Ok(()) => {
                self.dirty = false;
                Some(ToolEffect::Saved(canvas.layer))
            }
            Err(e) => {
                log::warn!("could not save scrawl on layer {}: {e}", canvas.layer);
                None
            }
        }
    }

    // ─── Pen settings ────────────────────────────────────────────────────

    /// Pen diameter in pixel-grid units, as shown in the readout.
    pub fn pen_readout(&self) -> Option<u32> {
        self.record().map(|r| r.pen_pixels().round() as u32)
    }

    /// Set the pen diameter to `pixels` grid pixels (digit shortcuts).
    pub fn set_pen_pixels(&mut self, host: &mut dyn Host, pixels: u32) {
        if let Some(canvas) = self.canvas.as_mut() {
            let record = &mut canvas.record;
            record.pen_size = f64::from(pixels) * record.pixel_size;
            host.request_redraw();
        }
    }

    /// Slider callback; the value is clamped to the slider range.
    pub fn set_slider(&mut self, host: &mut dyn Host, value: u32) {
        let pixels = value.clamp(*PEN_SLIDER_RANGE.start(), *PEN_SLIDER_RANGE.end());
        self.set_pen_pixels(host, pixels);
    }

    pub fn toggle_erase(&mut self, host: &mut dyn Host) {
        self.erase = !self.erase;
        log::debug!("erase mode {}", if self.erase { "on" } else { "off" });
        host.request_redraw();
    }

    /// Re-place the canvas. The bitmap is replaced by a blank one; old
    /// content is not resampled.
    pub fn reshape(&mut self, host: &mut dyn Host, rect: Rect, pixel_size: f64) {
        let Some(canvas) = self.canvas.as_mut() else {
            return;
        };
        if !rect.is_valid() || !pixel_size.is_finite() || pixel_size <= 0.0 {
            log::warn!("ignoring invalid canvas placement {rect:?} / {pixel_size}");
            return;
        }
        let pen_pixels = canvas.record.pen_pixels();
        let placement = Placement {
            rect,
            pixel_size,
            pen_size: pen_pixels * pixel_size,
        };
        canvas.record = CanvasRecord::blank(placement, canvas.record.pixel_ratio);
        self.prev = None;
        self.dirty = true;
        host.request_redraw();
    }

    // ─── Painting ────────────────────────────────────────────────────────

    fn ink(&self) -> Ink {
        if self.erase { Ink::White } else { Ink::Black }
    }

    /// Paint at glyph-space `(x, y)`. Continues the stroke with a line
    /// when `dragging` and a previous point exists, otherwise stamps a dot.
    fn paint_at(&mut self, host: &mut dyn Host, x: f64, y: f64, dragging: bool) -> Option<PaintOp> {
        let Some(active) = host.active_layer() else {
            log::trace!("no edit view; skipping paint");
            return None;
        };
        let ink = self.ink();
        let canvas = self.canvas.as_mut()?;
        if canvas.layer != active {
            log::trace!("active layer {active} is not the tracked layer; skipping paint");
            return None;
        }

        let record = &mut canvas.record;
        let pixel = to_pixel((x, y), &record.rect, record.pixel_size, record.pixel_ratio);
        if self.prev == Some(pixel) {
            return None;
        }

        let pen = record.pen_pixels();
        let op = match self.prev {
            Some(from) if dragging => PaintOp::Line {
                from,
                to: pixel,
                width: pen,
            },
            _ => PaintOp::Dot {
                center: pixel,
                diameter: pen,
            },
        };
        record.bitmap.apply(&op, ink);
        self.prev = Some(pixel);
        self.dirty = true;
        host.request_redraw();
        Some(op)
    }

    fn handle_key(&mut self, host: &mut dyn Host, key: &str, modifiers: &Modifiers) -> Effects {
        let mut effects = Effects::new();
        match ShortcutMap::resolve(key, modifiers) {
            Some(ShortcutAction::ToggleErase) => self.toggle_erase(host),
            Some(ShortcutAction::PenSize(d)) => self.set_pen_pixels(host, u32::from(d)),
            Some(ShortcutAction::DeleteScrawl) => {
                self.delete_scrawl(host);
            }
            Some(ShortcutAction::SelectTool) | None => effects.push(ToolEffect::Forward),
        }
        effects
    }

    // ─── Commands ────────────────────────────────────────────────────────

    /// "Delete Scrawl": clear every selected layer. If the tracked layer is
    /// among them, its live canvas restarts blank.
    pub fn delete_scrawl(&mut self, host: &mut dyn Host) -> Vec<LayerId> {
        let cleared = commands::delete_scrawl(host);
        if let Some(layer) = self.tracked_layer() {
            if cleared.contains(&layer) {
                self.track(host, layer);
            }
        }
        cleared
    }

    /// "Save Scrawl To Background Image" for the tracked layer. Unsaved
    /// strokes are flushed first. Failures are logged, never raised.
    pub fn export_to_background(&mut self, host: &mut dyn Host) -> Option<PathBuf> {
        self.flush(host);
        let canvas = self.canvas.as_ref()?;
        match commands::export_to_background(host.document_mut(), canvas.layer, &canvas.record) {
            Ok(path) => {
                host.request_redraw();
                Some(path)
            }
            Err(e) => {
                log::warn!("export to background image skipped: {e}");
                None
            }
        }
    }

    /// Draw the live canvas (the overlay renderer is suppressed while the
    /// tool is active).
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        if let Some(record) = self.record() {
            surface.draw_bitmap(&record.bitmap, record.rect, 1.0);
        }
    }
}

impl Tool for PaintTool {
    fn handle(&mut self, host: &mut dyn Host, event: &InputEvent) -> Effects {
        let mut effects = Effects::new();
        match event {
            InputEvent::PointerDown { clicks, .. } if *clicks >= 2 => {
                effects.push(ToolEffect::Forward);
            }
            InputEvent::PointerDown { x, y, .. } => {
                self.stroking = true;
                self.prev = None;
                effects.extend(self.paint_at(host, *x, *y, false).map(ToolEffect::Paint));
            }
            InputEvent::PointerDrag { x, y } => {
                self.stroking = true;
                effects.extend(self.paint_at(host, *x, *y, true).map(ToolEffect::Paint));
            }
            InputEvent::PointerUp { .. } => {
                self.stroking = false;
                self.prev = None;
                effects.extend(self.flush(host));
            }
            InputEvent::Key { key, modifiers } => return self.handle_key(host, key, modifiers),
        }
        effects
    }
}
