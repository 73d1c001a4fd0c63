//! Keyboard shortcuts for undo and redo.
//!
//! | Chord                     | Shortcut |
//! |---------------------------|----------|
//! | Ctrl+Z / Cmd+Z            | Undo     |
//! | Ctrl+Y / Cmd+Y            | Redo     |
//! | Ctrl+Shift+Z / Cmd+Shift+Z | Redo    |

use serde::{Deserialize, Serialize};

/// A key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyChord {
    pub key: char,
    pub ctrl: bool,
    pub shift: bool,
    /// Cmd on macOS. Treated like Ctrl.
    pub meta: bool,
}

impl KeyChord {
    pub fn new(key: char) -> Self {
        Self {
            key,
            ..Self::default()
        }
    }

    pub fn ctrl(key: char) -> Self {
        Self {
            key,
            ctrl: true,
            ..Self::default()
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// The editor shortcut this chord triggers, if any.
    pub fn shortcut(&self) -> Option<Shortcut> {
        if !(self.ctrl || self.meta) {
            return None;
        }
        match (self.key.to_ascii_lowercase(), self.shift) {
            ('z', false) => Some(Shortcut::Undo),
            ('z', true) | ('y', _) => Some(Shortcut::Redo),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shortcut {
    Undo,
    Redo,
}
