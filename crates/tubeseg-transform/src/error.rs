//! Transform error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Point {0:?} has no representable index in the image")]
    Geometry([f64; 3]),
}
