use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, info};
use uuid::Uuid;

use crate::core::SiftError;

pub const RAW_FILE_NAME: &str = "source.csv";
pub const STORE_FILE_NAME: &str = "data.parquet";

const ID_LEN: usize = 36;
const CREATE_ATTEMPTS: usize = 3;

/// Resolved storage scope of one upload.
#[derive(Debug, Clone, PartialEq)]
pub struct Workspace {
    pub id: String,
    pub dir: PathBuf,
    pub raw_path: PathBuf,
    pub store_path: PathBuf,
}

impl Workspace {
    fn at(root: &Path, id: &str) -> Self {
        let dir = root.join(id);
        Self {
            id: id.to_string(),
            raw_path: dir.join(RAW_FILE_NAME),
            store_path: dir.join(STORE_FILE_NAME),
            dir,
        }
    }
}

/// Maps upload ids to per-upload directories under a single root.
#[derive(Debug, Clone)]
pub struct WorkspaceManager {
    root: PathBuf,
}

impl WorkspaceManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn create(&self) -> Result<Workspace, SiftError> {
        std::fs::create_dir_all(&self.root).map_err(|e| {
            SiftError::IoError(format!("creating upload root {}: {}", self.root.display(), e))
        })?;

        for _ in 0..CREATE_ATTEMPTS {
            let id = Uuid::new_v4().to_string();
            let workspace = Workspace::at(&self.root, &id);
            match std::fs::create_dir(&workspace.dir) {
                Ok(()) => {
                    info!("Created workspace {}", id);
                    return Ok(workspace);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!("Workspace id {} already taken, retrying", id);
                }
                Err(e) => {
                    return Err(SiftError::IoError(format!(
                        "creating workspace {}: {}",
                        workspace.dir.display(),
                        e
                    )));
                }
            }
        }

        Err(SiftError::IoError(format!(
            "no free workspace id after {} attempts",
            CREATE_ATTEMPTS
        )))
    }

    pub fn resolve(&self, id: &str) -> Result<Workspace, SiftError> {
        if !is_valid_id(id) {
            return Err(SiftError::InvalidIdentifier(id.to_string()));
        }
        let workspace = Workspace::at(&self.root, id);
        if !workspace.dir.is_dir() {
            return Err(SiftError::WorkspaceNotFound(id.to_string()));
        }
        Ok(workspace)
    }
}

/// Lowercase hex and hyphens, UUID length. Checked before any path is built.
pub fn is_valid_id(id: &str) -> bool {
    id.len() == ID_LEN
        && id
            .bytes()
            .all(|b| b == b'-' || b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
