use serde::{Deserialize, Serialize};
use std::fmt;

/// Transition of a key or mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Down,
    Up,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Down => write!(f, "down"),
            Action::Up => write!(f, "up"),
        }
    }
}

/// A classified notification delivered by an input listener.
///
/// Listeners translate whatever the OS hands them into one of these two
/// shapes before queueing it, so the filter only ever matches on the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawNotification {
    Key { key: String, action: Action },
    Button { button: String, action: Action },
}

impl RawNotification {
    pub fn key_down(key: impl Into<String>) -> Self {
        RawNotification::Key {
            key: key.into(),
            action: Action::Down,
        }
    }

    pub fn key_up(key: impl Into<String>) -> Self {
        RawNotification::Key {
            key: key.into(),
            action: Action::Up,
        }
    }

    pub fn button(button: impl Into<String>, action: Action) -> Self {
        RawNotification::Button {
            button: button.into(),
            action,
        }
    }
}

/// Mouse buttons that can be synthesized during playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Resolve a recorded button identifier. Anything other than
    /// `left`, `right` or `middle` has no synthesis counterpart.
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        match identifier {
            "left" => Some(MouseButton::Left),
            "right" => Some(MouseButton::Right),
            "middle" => Some(MouseButton::Middle),
            _ => None,
        }
    }

    pub fn identifier(&self) -> &'static str {
        match self {
            MouseButton::Left => "left",
            MouseButton::Right => "right",
            MouseButton::Middle => "middle",
        }
    }
}

impl fmt::Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}
