//! Editor configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::activity::DEFAULT_ACTIVITY_CAPACITY;
use crate::error::BuilderError;
use crate::history::DEFAULT_HISTORY_DEPTH;
use crate::placement::Viewport;

/// Limits and input mode of an editing session. Every key is optional in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuilderConfig {
    /// Maximum number of undoable commands.
    pub history_depth: usize,
    /// Maximum number of activity feed entries.
    pub activity_capacity: usize,
    /// How placements are targeted.
    pub viewport: Viewport,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            history_depth: DEFAULT_HISTORY_DEPTH,
            activity_capacity: DEFAULT_ACTIVITY_CAPACITY,
            viewport: Viewport::Pointer,
        }
    }
}

impl BuilderConfig {
    pub fn from_json(json: &str) -> Result<Self, BuilderError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BuilderError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
