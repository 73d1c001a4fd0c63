//! History stacks for undo/redo.
//!
//! # Invariants
//!
//! 1. `applied.len() <= max_depth` after any push
//! 2. `undone` is cleared whenever a new command is pushed
//! 3. Replaying `applied` over the editor's baseline reproduces the current
//!    template (see [`replay`])
//!
//! ```text
//! push(c5)
//! ┌───────────────────────────────────────────────┐
//! │ applied: [c1, c2, c3, c4, c5]                  │
//! │ undone:  []                                    │
//! └───────────────────────────────────────────────┘
//!
//! undo() x2
//! ┌───────────────────────────────────────────────┐
//! │ applied: [c1, c2, c3]                          │
//! │ undone:  [c5, c4]                              │
//! └───────────────────────────────────────────────┘
//!
//! push(c6)  <-- new branch, discards undone
//! ┌───────────────────────────────────────────────┐
//! │ applied: [c1, c2, c3, c6]                      │
//! │ undone:  []                                    │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! The stacks only hold commands; applying and reverting them is the
//! editor's job.

use std::collections::VecDeque;

use crate::command::Command;
use crate::error::BuilderError;
use crate::model::Template;

/// Default maximum number of undoable commands.
pub const DEFAULT_HISTORY_DEPTH: usize = 100;

/// Undo and redo stacks with a depth cap.
#[derive(Debug, Clone)]
pub struct History {
    /// Commands available for undo (newest at back).
    applied: VecDeque<Command>,
    /// Commands available for redo (newest at back).
    undone: Vec<Command>,
    max_depth: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            applied: VecDeque::new(),
            undone: Vec::new(),
            max_depth,
        }
    }

    /// Record a command that has just been applied.
    ///
    /// Clears the redo stack. Returns the commands evicted from the bottom of
    /// the undo stack by the depth cap, oldest first.
    pub fn push(&mut self, command: Command) -> Vec<Command> {
        self.undone.clear();
        self.applied.push_back(command);
        let mut evicted = Vec::new();
        while self.applied.len() > self.max_depth {
            if let Some(oldest) = self.applied.pop_front() {
                evicted.push(oldest);
            }
        }
        evicted
    }

    /// Take the command to undo next.
    pub(crate) fn pop_applied(&mut self) -> Option<Command> {
        self.applied.pop_back()
    }

    /// Take the command to redo next.
    pub(crate) fn pop_undone(&mut self) -> Option<Command> {
        self.undone.pop()
    }

    /// Put back a command after it was reverted.
    pub(crate) fn push_undone(&mut self, command: Command) {
        self.undone.push(command);
    }

    /// Put back a command after it was re-applied (or after a failed undo).
    /// Does not touch the redo stack.
    pub(crate) fn push_applied(&mut self, command: Command) {
        self.applied.push_back(command);
    }

    pub fn can_undo(&self) -> bool {
        !self.applied.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.applied.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.undone.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Applied commands, oldest first.
    pub fn applied(&self) -> impl Iterator<Item = &Command> {
        self.applied.iter()
    }

    /// Undone commands, next redo first.
    pub fn undone(&self) -> impl Iterator<Item = &Command> {
        self.undone.iter().rev()
    }

    pub fn next_undo_message(&self) -> Option<&str> {
        self.applied.back().map(|c| c.message())
    }

    pub fn next_redo_message(&self) -> Option<&str> {
        self.undone.last().map(|c| c.message())
    }

    /// Drop both stacks.
    pub fn clear(&mut self) {
        self.applied.clear();
        self.undone.clear();
    }
}

/// Apply `commands` in order on a copy of `base`.
pub fn replay<'a>(
    base: &Template,
    commands: impl IntoIterator<Item = &'a Command>,
) -> Result<Template, BuilderError> {
    let mut template = base.clone();
    for command in commands {
        command.action().apply(&mut template)?;
    }
    Ok(template)
}
