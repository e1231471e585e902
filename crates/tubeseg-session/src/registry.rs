//! Session Registry
//!
//! Owns every loaded image. The session map sits behind a reader/writer lock
//! that is only held long enough to look up, insert or remove an entry; each
//! session then has its own mutex, so work on one image never waits for
//! another.

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tubeseg_engine::{Engine, ImageHandle};
use tubeseg_tubes::Sequence;

use crate::error::SessionError;
use crate::session::ImageSession;
use crate::state::SessionState;
use crate::{ImageId, Result};

/// Shared handle to one session's critical section.
pub type SessionHandle<I> = Arc<Mutex<ImageSession<I>>>;

/// Read-only view of a session for listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: ImageId,
    pub source_path: PathBuf,
    pub state: SessionState,
    pub tube_count: usize,
    pub loaded_at: DateTime<Utc>,
}

struct Sessions<I: ImageHandle> {
    by_id: HashMap<ImageId, SessionHandle<I>>,
    /// Image ids, allocated only when a session is actually inserted
    ids: Sequence,
}

pub struct SessionRegistry<E: Engine> {
    engine: Arc<E>,
    sessions: Arc<RwLock<Sessions<E::Image>>>,
    /// Debug flag applied to each image's segmenter at load
    engine_debug: bool,
}

impl<E: Engine> SessionRegistry<E> {
    pub fn new(engine: Arc<E>) -> Self {
        Self {
            engine,
            sessions: Arc::new(RwLock::new(Sessions {
                by_id: HashMap::new(),
                ids: Sequence::new(1, 1),
            })),
            engine_debug: true,
        }
    }

    pub fn with_engine_debug(mut self, debug: bool) -> Self {
        self.engine_debug = debug;
        self
    }

    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }

    /// Decode `path` and register a new active session for it.
    ///
    /// Decoding runs without any registry lock held. Either a fully
    /// initialized session is registered and its id returned, or nothing
    /// changes and no id is consumed.
    pub fn create_session(&self, path: &Path) -> Result<ImageId> {
        let mut image = self.engine.decode_image(path).map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Image decode failed");
            SessionError::Load(e)
        })?;
        image.set_debug(self.engine_debug);

        let mut sessions = self.sessions.write();
        let id = sessions.ids.peek();

        let mut session = ImageSession::new(id, path.to_path_buf(), image);
        session.activate()?;

        let geometry = *session.geometry();
        sessions.ids.allocate();
        sessions.by_id.insert(id, Arc::new(Mutex::new(session)));
        drop(sessions);

        tracing::info!(
            image_id = id,
            path = %path.display(),
            spacing = ?geometry.spacing,
            origin = ?geometry.origin,
            "Loaded image"
        );

        Ok(id)
    }

    pub fn get_session(&self, id: ImageId) -> Result<SessionHandle<E::Image>> {
        self.sessions
            .read()
            .by_id
            .get(&id)
            .cloned()
            .ok_or(SessionError::NotFound(id))
    }

    /// Remove a session. Unknown or already removed ids are ignored.
    ///
    /// A call already running on the session finishes first; anything
    /// waiting on it afterwards sees the session as removed.
    pub fn remove_session(&self, id: ImageId) {
        let removed = self.sessions.write().by_id.remove(&id);

        match removed {
            Some(handle) => {
                let mut session = handle.lock();
                if let Err(e) = session.mark_removed() {
                    tracing::warn!(image_id = id, error = %e, "Unexpected session state on unload");
                }
                tracing::info!(
                    image_id = id,
                    tube_count = session.tube_count(),
                    "Unloaded image"
                );
            }
            None => {
                tracing::debug!(image_id = id, "Unload of unknown image ignored");
            }
        }
    }

    /// Summaries of all registered sessions, ordered by id.
    ///
    /// Waits for any extraction in progress on a listed session.
    pub fn list_sessions(&self) -> Vec<SessionSummary> {
        let mut handles: Vec<(ImageId, SessionHandle<E::Image>)> = self
            .sessions
            .read()
            .by_id
            .iter()
            .map(|(id, handle)| (*id, Arc::clone(handle)))
            .collect();
        handles.sort_by_key(|(id, _)| *id);

        handles
            .into_iter()
            .map(|(_, handle)| {
                let session = handle.lock();
                SessionSummary {
                    id: session.id(),
                    source_path: session.source_path().to_path_buf(),
                    state: session.state(),
                    tube_count: session.tube_count(),
                    loaded_at: session.loaded_at(),
                }
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: Engine> Clone for SessionRegistry<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            sessions: Arc::clone(&self.sessions),
            engine_debug: self.engine_debug,
        }
    }
}
