//! Input abstraction layer.
//!
//! Normalizes host mouse and keyboard events into an `InputEvent` enum
//! consumed by tools. Pointer positions are already in glyph space.

/// Keyboard modifier state at the time of an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Platform command key: ⌘ on macOS, Ctrl elsewhere.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }

    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// A normalized input event from the host's edit view.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Mouse button pressed.
    PointerDown {
        x: f64,
        y: f64,
        /// 1 for a single click, 2 for a double click, and so on.
        clicks: u8,
    },

    /// Mouse moved with the button held.
    PointerDrag { x: f64, y: f64 },

    /// Mouse button released.
    PointerUp { x: f64, y: f64 },

    /// Key press.
    Key { key: String, modifiers: Modifiers },
}

impl InputEvent {
    pub fn down(x: f64, y: f64) -> Self {
        Self::PointerDown { x, y, clicks: 1 }
    }

    pub fn drag(x: f64, y: f64) -> Self {
        Self::PointerDrag { x, y }
    }

    pub fn up(x: f64, y: f64) -> Self {
        Self::PointerUp { x, y }
    }

    pub fn key(key: &str) -> Self {
        Self::Key {
            key: key.to_string(),
            modifiers: Modifiers::NONE,
        }
    }
}
