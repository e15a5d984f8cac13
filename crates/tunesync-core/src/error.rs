//! Error types for tunesync-core

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for tunesync operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Music library folder is not configured")]
    NotConfigured,

    #[error("Music library folder not found: {0}")]
    PathNotFound(PathBuf),

    #[error("No removable media location is known for this platform")]
    UnsupportedPlatform,

    #[error("Invalid drive path: {0}")]
    InvalidDrivePath(String),

    #[error("No albums provided for transfer")]
    EmptySelection,

    #[error("No destination folder selected")]
    NoDestination,

    #[error("{0}")]
    Other(String),
}

/// Result type alias for tunesync operations
pub type Result<T> = std::result::Result<T, Error>;
