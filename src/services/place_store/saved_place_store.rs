use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum PlaceStoreError {
    #[error("Failed to write saved place: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode saved place: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Default, Serialize, Deserialize)]
struct SavedPreferences {
    #[serde(default)]
    saved_place: String,
}

/// Last place the guardian saved, kept in a small JSON file.
#[derive(Clone)]
pub struct PlaceStore {
    path: PathBuf,
}

impl PlaceStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Empty when nothing was saved or the file cannot be read.
    pub async fn get(&self) -> String {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return String::new(),
            Err(e) => {
                warn!("Failed to read {}: {}", self.path.display(), e);
                return String::new();
            }
        };

        match serde_json::from_slice::<SavedPreferences>(&raw) {
            Ok(prefs) => prefs.saved_place,
            Err(e) => {
                warn!("Ignoring unreadable {}: {}", self.path.display(), e);
                String::new()
            }
        }
    }

    pub async fn set(&self, place: &str) -> Result<(), PlaceStoreError> {
        let body = serde_json::to_vec(&SavedPreferences {
            saved_place: place.to_string(),
        })?;

        tokio::fs::write(&self.path, body).await?;
        Ok(())
    }
}
