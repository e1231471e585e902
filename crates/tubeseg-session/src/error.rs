//! Session error types

use thiserror::Error;

use crate::ImageId;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Failed to load image: {0}")]
    Load(#[from] tubeseg_engine::EngineError),

    #[error("Image session not found: {0}")]
    NotFound(ImageId),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Tube error: {0}")]
    Tube(#[from] tubeseg_tubes::TubeError),
}
