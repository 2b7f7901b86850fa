//! StorageConfig and resolve_path for the registry store.

use crate::config::xdg;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_store_path() -> PathBuf {
    PathBuf::from(".cityreg/store")
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the registry store (relative to workspace root)
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
}

impl StorageConfig {
    /// Resolve the store path to an actual filesystem location.
    ///
    /// The default path maps into the XDG data directory for the workspace;
    /// any other relative path is taken relative to the workspace root.
    pub fn resolve_path(&self, workspace_root: &Path) -> Result<PathBuf, ApiError> {
        if self.store_path == default_store_path() {
            let data_dir = xdg::workspace_data_dir(workspace_root)?;
            return Ok(data_dir.join("store"));
        }
        Ok(workspace_root.join(&self.store_path))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
        }
    }
}
