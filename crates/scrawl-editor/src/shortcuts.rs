//! Keyboard shortcut mapping for the scrawl tool.
//!
//! - `c` selects the tool
//! - `e` toggles the eraser
//! - `1`–`9` set the pen diameter in pixels
//! - ⌘Delete deletes the scrawl on the selected layers

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    SelectTool,
    ToggleErase,
    /// Pen diameter in pixel-grid units, 1–9.
    PenSize(u8),
    DeleteScrawl,
}

/// Resolves key events into shortcut actions.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the typed character or a named key (`"Delete"`).
    /// Returns `None` if the combination has no binding; the host should
    /// handle it instead.
    pub fn resolve(key: &str, modifiers: &crate::input::Modifiers) -> Option<ShortcutAction> {
        if modifiers.command() && !modifiers.shift && !modifiers.alt {
            return match key {
                "Delete" | "Backspace" => Some(ShortcutAction::DeleteScrawl),
                _ => None,
            };
        }
        if modifiers.any() {
            return None;
        }

        match key {
            "c" | "C" => Some(ShortcutAction::SelectTool),
            "e" | "E" => Some(ShortcutAction::ToggleErase),
            _ => Self::digit(key).map(ShortcutAction::PenSize),
        }
    }

    fn digit(key: &str) -> Option<u8> {
        let mut chars = key.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        match c.to_digit(10)? {
            0 => None,
            d => Some(d as u8),
        }
    }
}
