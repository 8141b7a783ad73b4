use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SiftError {
    #[error("Cannot parse config: {0}")]
    ConfigParsingError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Invalid upload id: {0}")]
    InvalidIdentifier(String),
    #[error("Upload not found: {0}")]
    WorkspaceNotFound(String),
    #[error("SQL cannot be empty")]
    EmptyQuery,
    #[error("Only SELECT queries are allowed")]
    NotAReadQuery,
    #[error("{0}")]
    QueryExecution(String),
    #[error("Query returned no columns")]
    EmptyResultSchema,
    #[error("Failed to ingest file: {0}")]
    Ingestion(String),
}

impl From<std::io::Error> for SiftError {
    fn from(err: std::io::Error) -> Self {
        SiftError::IoError(err.to_string())
    }
}
