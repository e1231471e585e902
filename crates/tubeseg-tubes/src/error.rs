//! Tube catalog error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TubeError {
    #[error("Tube not found: {0}")]
    NotFound(u64),

    #[error("Tube uid {0} is already recorded")]
    DuplicateUid(u64),
}
