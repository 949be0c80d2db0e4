//! Last-used recipient selection.
//!
//! A single global JSON slot under the app data directory. Loading is
//! tolerant: a missing or corrupt slot is an empty preference, never a
//! blocking error.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrefsError {
    #[error("Preference I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Preference serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientPreference {
    #[serde(default)]
    pub selected_emails: Vec<String>,
}

/// Read the slot. Missing or unreadable slots yield the default.
pub fn load(path: &Path) -> RecipientPreference {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(_) => return RecipientPreference::default(),
    };
    match serde_json::from_slice(&bytes) {
        Ok(pref) => pref,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Ignoring corrupt preference slot");
            RecipientPreference::default()
        }
    }
}

/// Overwrite the slot, creating parent directories on first use.
pub fn save(path: &Path, pref: &RecipientPreference) -> Result<(), PrefsError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string(pref)?)?;
    Ok(())
}
