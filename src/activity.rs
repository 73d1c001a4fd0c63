//! Activity log: a capped, newest-first feed of what happened to the template.
//!
//! The log is display-only. It is fed from the same command stream as the
//! history but never consulted by undo/redo, so clearing it has no effect on
//! the history and evicting history never removes log entries.

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::command::Command;

/// Default number of entries kept in the feed.
pub const DEFAULT_ACTIVITY_CAPACITY: usize = 50;

/// Every kind of entry the activity feed can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Add,
    Delete,
    Move,
    Style,
    Duplicate,
    Config,
    Save,
    Undo,
    Redo,
}

/// How an action type is presented: verb, icon name and accent color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActionDisplay {
    pub label: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

impl ActionType {
    pub const ALL: [ActionType; 9] = [
        ActionType::Add,
        ActionType::Delete,
        ActionType::Move,
        ActionType::Style,
        ActionType::Duplicate,
        ActionType::Config,
        ActionType::Save,
        ActionType::Undo,
        ActionType::Redo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActionType::Add => "add",
            ActionType::Delete => "delete",
            ActionType::Move => "move",
            ActionType::Style => "style",
            ActionType::Duplicate => "duplicate",
            ActionType::Config => "config",
            ActionType::Save => "save",
            ActionType::Undo => "undo",
            ActionType::Redo => "redo",
        }
    }

    pub fn display(self) -> ActionDisplay {
        let (label, icon, color) = match self {
            ActionType::Add => ("Added", "plus", "#16a34a"),
            ActionType::Delete => ("Deleted", "trash", "#dc2626"),
            ActionType::Move => ("Moved", "arrows-move", "#2563eb"),
            ActionType::Style => ("Styled", "palette", "#9333ea"),
            ActionType::Duplicate => ("Duplicated", "copy", "#0891b2"),
            ActionType::Config => ("Configured", "sliders", "#ca8a04"),
            ActionType::Save => ("Saved", "floppy-disk", "#059669"),
            ActionType::Undo => ("Undone", "arrow-undo", "#6b7280"),
            ActionType::Redo => ("Redone", "arrow-redo", "#6b7280"),
        };
        ActionDisplay { label, icon, color }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the activity feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub id: u64,
    pub action: ActionType,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Ring buffer of activity entries.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    /// Oldest at the front.
    entries: VecDeque<ActivityEntry>,
    capacity: usize,
    next_id: u64,
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new(DEFAULT_ACTIVITY_CAPACITY)
    }
}

impl ActivityLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            next_id: 1,
        }
    }

    /// Log a freshly executed command.
    pub fn record(&mut self, command: &Command) {
        self.push(command.action_type(), command.message().to_string());
    }

    /// Log the reversal of a command.
    pub fn record_undo(&mut self, command: &Command) {
        self.push(ActionType::Undo, format!("Undid: {}", command.message()));
    }

    /// Log the re-application of a command.
    pub fn record_redo(&mut self, command: &Command) {
        self.push(ActionType::Redo, format!("Redid: {}", command.message()));
    }

    /// Entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.entries.iter().rev()
    }

    pub fn latest(&self) -> Option<&ActivityEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Empty the feed. Entry ids keep counting.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn push(&mut self, action: ActionType, message: String) {
        if self.capacity == 0 {
            return;
        }
        let entry = ActivityEntry {
            id: self.next_id,
            action,
            message,
            timestamp: Utc::now(),
        };
        self.next_id += 1;
        self.entries.push_back(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }
}
