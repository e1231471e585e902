//! Core error types

use thiserror::Error;
use tubeseg_session::{ImageId, SessionError};
use tubeseg_tubes::TubeError;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Failed to load image: {0}")]
    Load(tubeseg_engine::EngineError),

    #[error("Image session not found: {0}")]
    SessionNotFound(ImageId),

    #[error("scale/scaleNorm < {min_ratio} (scale {scale}, scaleNorm {scale_norm})")]
    ScaleTooSmall {
        scale: f64,
        scale_norm: f64,
        min_ratio: f64,
    },

    #[error("Geometry error: {0}")]
    Geometry(#[from] tubeseg_transform::TransformError),

    #[error("Tube uid {0} is already recorded")]
    DuplicateUid(u64),

    #[error("Tube {uid} not found in image {image_id}")]
    TubeNotFound { image_id: ImageId, uid: u64 },

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<SessionError> for CoreError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::Load(e) => CoreError::Load(e),
            SessionError::NotFound(id) => CoreError::SessionNotFound(id),
            SessionError::Tube(TubeError::DuplicateUid(uid)) => CoreError::DuplicateUid(uid),
            other => CoreError::Internal(other.to_string()),
        }
    }
}
