mod manager;

pub use manager::{RAW_FILE_NAME, STORE_FILE_NAME, Workspace, WorkspaceManager, is_valid_id};
