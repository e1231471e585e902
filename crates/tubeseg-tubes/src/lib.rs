//! tubeseg Tubes
//!
//! Identifier sequences and the per-image catalog of extracted tubes.
//!
//! Tubes carry two ids. The local id is what the engine stores on the tube
//! and may collide when tubes are imported or re-extracted; the uid is unique
//! within the owning image and is the only id exposed to clients.

mod catalog;
mod error;
mod sequence;
mod tube;

pub use catalog::TubeCatalog;
pub use error::TubeError;
pub use sequence::Sequence;
pub use tube::TubeRecord;

pub type Result<T> = std::result::Result<T, TubeError>;
