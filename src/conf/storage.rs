use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    #[serde(default = "StorageConfig::default_upload_dir")]
    pub upload_dir: PathBuf,
}

impl StorageConfig {
    fn default_upload_dir() -> PathBuf {
        std::env::current_dir()
            .unwrap_or_else(|_| std::env::temp_dir())
            .join("uploads")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: Self::default_upload_dir(),
        }
    }
}
