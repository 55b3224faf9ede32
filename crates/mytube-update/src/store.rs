//! Persisted update-check state.
//!
//! A single JSON file in the per-app data directory holding the first-seen
//! timestamp of the pending update. Read errors degrade to the default
//! state and write errors are logged and dropped; the gate never fails
//! because the disk did.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

const STATE_FILE: &str = "update_state.json";

/// First-seen timestamp of the pending update, unix seconds. `None` means
/// no update is outstanding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateState {
    pub first_seen: Option<u64>,
}

/// File-backed store for [`UpdateState`]. Single reader/writer; at most
/// one update check is in flight per launch.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the platform data directory.
    pub fn at_default_location() -> Self {
        let dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mytube");
        fs::create_dir_all(&dir).ok();
        Self::new(dir.join(STATE_FILE))
    }

    pub fn load(&self) -> UpdateState {
        match fs::read_to_string(&self.path) {
            Ok(data) => serde_json::from_str(&data).unwrap_or_default(),
            Err(_) => UpdateState::default(),
        }
    }

    /// Write the state back, removing the file entirely when no update is
    /// outstanding.
    pub fn persist(&self, state: &UpdateState) {
        if state.first_seen.is_none() {
            fs::remove_file(&self.path).ok();
            return;
        }

        match serde_json::to_string_pretty(state) {
            Ok(json) => {
                if let Err(err) = fs::write(&self.path, json) {
                    warn!("failed to persist update state: {err}");
                }
            }
            Err(err) => warn!("failed to encode update state: {err}"),
        }
    }
}
