//! Keyboard input shared by views and the lightbox.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Escape,
    ArrowLeft,
    ArrowRight,
    Other(String),
}

impl Key {
    /// Parse a DOM `KeyboardEvent.key` value (`" "` and `"Space"` both map
    /// to [`Key::Space`]).
    pub fn parse(value: &str) -> Key {
        match value {
            "Enter" => Key::Enter,
            " " | "Space" | "Spacebar" => Key::Space,
            "Escape" | "Esc" => Key::Escape,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            other => Key::Other(other.to_string()),
        }
    }

    /// Keys that activate a focused card or tile.
    pub fn activates(&self) -> bool {
        matches!(self, Key::Enter | Key::Space)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Enter => f.write_str("Enter"),
            Key::Space => f.write_str("Space"),
            Key::Escape => f.write_str("Escape"),
            Key::ArrowLeft => f.write_str("ArrowLeft"),
            Key::ArrowRight => f.write_str("ArrowRight"),
            Key::Other(other) => f.write_str(other),
        }
    }
}
