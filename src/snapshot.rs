//! JSON snapshot of the list store
//!
//! The file holds one JSON object mapping each key to its integer list.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use crate::store::ListMap;

/// Snapshot error
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Snapshot file
pub struct Snapshot {
    path: PathBuf,
}

impl Snapshot {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `<path>.tmp`, written before being renamed over the snapshot
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Load the snapshot, `None` when the file does not exist
    pub async fn load(&self) -> Result<Option<ListMap>, SnapshotError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("Snapshot {:?} not found, starting empty", self.path);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let lists: ListMap = serde_json::from_str(&content)?;
        info!("Loaded snapshot {:?}: {} lists", self.path, lists.len());
        Ok(Some(lists))
    }

    /// Save the snapshot
    pub async fn save(&self, lists: &ListMap) -> Result<(), SnapshotError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).await?;
            }
        }

        // Write to temp file first, then atomically rename
        let temp_path = self.temp_path();
        let content = serde_json::to_vec(lists)?;
        fs::write(&temp_path, &content).await?;
        fs::rename(&temp_path, &self.path).await?;

        info!("Saved snapshot {:?}: {} lists", self.path, lists.len());
        Ok(())
    }
}
