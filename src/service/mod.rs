use log::info;

use crate::conf::Config;
use crate::core::{QueryResult, SiftError, TableSummary};
use crate::ingest;
use crate::query;
use crate::workspace::{Workspace, WorkspaceManager};

/// Entry point for the transport layer: one upload root, stateless calls.
pub struct SiftService {
    workspaces: WorkspaceManager,
    config: Config,
}

impl SiftService {
    pub fn new(config: Config) -> Self {
        Self {
            workspaces: WorkspaceManager::new(&config.storage.upload_dir),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn create_workspace(&self) -> Result<Workspace, SiftError> {
        self.workspaces.create()
    }

    /// Loads the workspace's raw file, which the caller must have fully written.
    pub async fn ingest(&self, workspace: &Workspace) -> Result<TableSummary, SiftError> {
        info!("Ingesting upload {}", workspace.id);
        ingest::ingest(&workspace.raw_path, &workspace.store_path).await
    }

    pub async fn query(&self, upload_id: &str, sql: &str) -> Result<QueryResult, SiftError> {
        let workspace = self.workspaces.resolve(upload_id)?;
        query::run_query(&workspace.store_path, sql).await
    }
}
