//! Engine error types

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Cannot read file {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("Unrecognized image format {path}: {reason}")]
    UnsupportedFormat { path: PathBuf, reason: String },
}
