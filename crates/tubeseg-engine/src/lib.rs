//! tubeseg Engine Capability
//!
//! The image engine decodes volumes and traces tubes. It is an external
//! collaborator, so the orchestration layer only sees it through the
//! [`Engine`], [`ImageHandle`] and [`TubeHandle`] traits defined here.
//!
//! This crate also owns the geometry primitives the engine speaks in
//! (points, matrices, affine transforms) and a deterministic
//! [`ScriptedEngine`] used by tests and by the demo server.

mod engine;
mod error;
mod geometry;
mod scripted;

pub use engine::{Engine, ImageHandle, TubeHandle, TubePoint};
pub use error::EngineError;
pub use geometry::{AffineTransform, ContinuousIndex, ImageGeometry, Matrix3, Point3};
pub use scripted::{
    EngineLog, ExtractionCall, ScriptedEngine, ScriptedImage, ScriptedTube, ScriptedTubeHandle,
    ScriptedVolume,
};

pub type Result<T> = std::result::Result<T, EngineError>;
