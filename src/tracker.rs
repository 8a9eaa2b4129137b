//! Persistence of the processed-videos set.
//!
//! The tracker file is read at the start of each category run and rewritten in
//! full after every successful enrichment. There is no locking: one process is
//! expected to own the file, and concurrent writers race with the last one
//! winning.

use crate::error::{FeedError, Result};
use crate::models::ProcessedVideos;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, instrument, warn};

/// Reads and writes the `{"processedVideos": {...}}` file.
#[derive(Debug, Clone)]
pub struct ProcessedTracker {
    path: PathBuf,
}

impl ProcessedTracker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the persisted set, or an empty one if the file is absent or unreadable.
    ///
    /// Never fails: losing the history only means videos get enriched again.
    #[instrument(level = "debug", skip_all, fields(path = %self.path.display()))]
    pub async fn load(&self) -> ProcessedVideos {
        let text = match fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No processed-videos file yet, starting fresh");
                return ProcessedVideos::default();
            }
            Err(e) => {
                warn!(error = %e, "Could not read processed videos, starting fresh");
                return ProcessedVideos::default();
            }
        };

        match serde_json::from_str::<ProcessedVideos>(&text) {
            Ok(processed) => {
                debug!(count = processed.len(), "Loaded processed videos");
                processed
            }
            Err(e) => {
                warn!(error = %e, "Could not parse processed videos, starting fresh");
                ProcessedVideos::default()
            }
        }
    }

    /// Overwrite the file with `processed`.
    ///
    /// The JSON is written to a sibling temp file and renamed into place so a
    /// reader never sees a half-written file.
    #[instrument(level = "debug", skip_all, fields(path = %self.path.display(), count = processed.len()))]
    pub async fn save(&self, processed: &ProcessedVideos) -> Result<()> {
        let json = serde_json::to_string_pretty(processed)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| FeedError::persistence(parent, e))?;
        }

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        fs::write(&tmp_path, json)
            .await
            .map_err(|e| FeedError::persistence(&tmp_path, e))?;
        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| FeedError::persistence(&self.path, e))?;
        Ok(())
    }
}
