//! Drawing a stored scrawl: the passive overlay and the surfaces it draws on.

pub mod overlay;
pub mod paint;
pub mod record;

pub use overlay::{OverlayRenderer, RenderContext, RenderMode};
pub use paint::{Surface, VelloSurface, placement_transform};
pub use record::{DrawCall, RecordingSurface};
