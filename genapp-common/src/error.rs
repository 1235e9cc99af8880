use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum GenappError {
    #[error("I/O Error: {0}")]
    Io(#[from] Arc<std::io::Error>),

    #[error("JSON Error: {0}")]
    Json(#[from] Arc<serde_json::Error>),

    #[error("Missing dependencies, aborting: {}", .0.join(", "))]
    MissingDependency(Vec<String>),

    #[error("Destination already exists: {}", .0.display())]
    DestinationAlreadyExists(PathBuf),

    #[error("IoError: {0}")]
    IoError(String),

    #[error("Invalid bundle layout: {0}")]
    InvalidLayout(String),

    #[error("Bundle verification failed: {0}")]
    Verification(String),
}

impl GenappError {
    /// True when the run was rejected before touching the filesystem.
    pub fn is_missing_dependency(&self) -> bool {
        matches!(self, GenappError::MissingDependency(_))
    }

    pub fn is_destination_conflict(&self) -> bool {
        matches!(self, GenappError::DestinationAlreadyExists(_))
    }
}

impl From<std::io::Error> for GenappError {
    fn from(err: std::io::Error) -> Self {
        GenappError::Io(Arc::new(err))
    }
}

impl From<serde_json::Error> for GenappError {
    fn from(err: serde_json::Error) -> Self {
        GenappError::Json(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, GenappError>;
