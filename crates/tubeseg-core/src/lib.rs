//! tubeseg Core
//!
//! Central coordination layer: validates client requests and sequences them
//! against the session registry and the image engine.

mod config;
mod dispatcher;
mod error;
mod types;

pub use config::Config;
pub use dispatcher::Dispatcher;
pub use error::CoreError;
pub use types::{SegmentParams, SegmentResult, NO_TUBE};

// Re-export core components
pub use tubeseg_engine::{
    AffineTransform, ContinuousIndex, Engine, EngineError, ImageGeometry, ImageHandle, Point3,
    ScriptedEngine, ScriptedTube, ScriptedVolume, TubeHandle, TubePoint,
};
pub use tubeseg_session::{
    ImageId, ImageSession, SessionError, SessionRegistry, SessionState, SessionSummary,
};
pub use tubeseg_transform::TransformError;
pub use tubeseg_tubes::{TubeError, TubeRecord};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging. `RUST_LOG` takes precedence over `default_filter`.
///
/// Logs go to stderr; stdout is left to the transport.
pub fn init_logging(default_filter: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
