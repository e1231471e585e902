//! tubeseg Session Management
//!
//! A session is one loaded image plus everything derived from it: the
//! image-to-world transform, the tube id sequences and the tube catalog.
//! The [`SessionRegistry`] is the only place sessions are added or removed.

mod error;
mod registry;
mod session;
mod state;

pub use error::SessionError;
pub use registry::{SessionHandle, SessionRegistry, SessionSummary};
pub use session::ImageSession;
pub use state::SessionState;

/// Process-unique image identifier, starting at 1.
pub type ImageId = u64;

pub type Result<T> = std::result::Result<T, SessionError>;
