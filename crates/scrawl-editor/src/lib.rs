pub mod commands;
pub mod host;
pub mod input;
pub mod shortcuts;
pub mod tools;

pub use commands::{ExportError, delete_scrawl, export_layer, export_to_background};
pub use host::{Host, Notification, Session, SubscriptionToken};
pub use input::{InputEvent, Modifiers};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use tools::{PaintTool, Tool, ToolEffect};
