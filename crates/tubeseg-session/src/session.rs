//! Image session

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tubeseg_engine::{AffineTransform, ImageGeometry, ImageHandle, TubeHandle};
use tubeseg_tubes::{Sequence, TubeCatalog, TubeRecord};

use crate::error::SessionError;
use crate::state::SessionState;
use crate::{ImageId, Result};

/// One loaded image and all state derived from it.
pub struct ImageSession<I: ImageHandle> {
    id: ImageId,
    source_path: PathBuf,
    /// Engine image handle, owned exclusively by this session
    image: I,
    geometry: ImageGeometry,
    image_to_world: AffineTransform,
    /// Local tube ids handed to the engine
    tube_ids: Sequence,
    /// Client-facing tube uids
    tube_uids: Sequence,
    tubes: TubeCatalog<I::Tube>,
    state: SessionState,
    loaded_at: DateTime<Utc>,
}

impl<I: ImageHandle> ImageSession<I> {
    pub fn new(id: ImageId, source_path: PathBuf, image: I) -> Self {
        let geometry = *image.geometry();
        let image_to_world =
            tubeseg_transform::build_image_to_world_transform(geometry.spacing, geometry.origin);

        Self {
            id,
            source_path,
            image,
            geometry,
            image_to_world,
            tube_ids: Sequence::default(),
            tube_uids: Sequence::default(),
            tubes: TubeCatalog::new(),
            state: SessionState::Created,
            loaded_at: Utc::now(),
        }
    }

    pub fn transition_to(&mut self, new_state: SessionState) -> Result<()> {
        if !self.state.can_transition_to(new_state) {
            return Err(SessionError::InvalidTransition {
                from: self.state.to_string(),
                to: new_state.to_string(),
            });
        }

        tracing::debug!(
            image_id = self.id,
            from = %self.state,
            to = %new_state,
            "Session state transition"
        );

        self.state = new_state;
        Ok(())
    }

    pub fn activate(&mut self) -> Result<()> {
        self.transition_to(SessionState::Active)
    }

    pub fn mark_removed(&mut self) -> Result<()> {
        self.transition_to(SessionState::Removed)
    }

    pub fn id(&self) -> ImageId {
        self.id
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn geometry(&self) -> &ImageGeometry {
        &self.geometry
    }

    pub fn image_to_world(&self) -> &AffineTransform {
        &self.image_to_world
    }

    pub fn image(&self) -> &I {
        &self.image
    }

    pub fn image_mut(&mut self) -> &mut I {
        &mut self.image
    }

    pub fn tubes(&self) -> &TubeCatalog<I::Tube> {
        &self.tubes
    }

    pub fn tube_count(&self) -> usize {
        self.tubes.len()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Ids the next registered tube will receive, as `(local_id, uid)`.
    pub fn next_tube_ids(&self) -> (u64, u64) {
        (self.tube_ids.peek(), self.tube_uids.peek())
    }

    /// Take ownership of a freshly extracted tube: assign its ids, add it to
    /// the engine's tube group and record it in the catalog.
    ///
    /// The uid is checked before anything is mutated, so a failure leaves
    /// the session untouched.
    pub fn register_tube(&mut self, mut tube: I::Tube) -> Result<&TubeRecord<I::Tube>> {
        self.tubes.ensure_vacant(self.tube_uids.peek())?;

        let local_id = self.tube_ids.allocate();
        let uid = self.tube_uids.allocate();

        tube.set_id(local_id);
        self.image.add_tube(&tube);

        self.tubes
            .record(TubeRecord::from_extraction(local_id, uid, tube))?;

        tracing::info!(
            image_id = self.id,
            local_id = local_id,
            uid = uid,
            "Registered extracted tube"
        );

        Ok(self.tubes.get(uid)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubeseg_engine::{
        ContinuousIndex, Engine, ScriptedEngine, ScriptedImage, ScriptedTube, ScriptedVolume,
        TubePoint,
    };

    fn engine() -> ScriptedEngine {
        let tube = ScriptedTube {
            points: (0..3)
                .map(|i| TubePoint {
                    position: [5.0, 5.0, 5.0 + i as f64],
                    radius: 1.0,
                })
                .collect(),
        };
        let geometry = ImageGeometry::new([2.0, 2.0, 2.0], [1.0, 1.0, 1.0]);
        let volume = ScriptedVolume::new(geometry, [16, 16, 16]).with_tube(tube);
        ScriptedEngine::new().with_volume("/a.mha", volume)
    }

    fn session(engine: &ScriptedEngine) -> ImageSession<ScriptedImage> {
        let image = engine.decode_image(Path::new("/a.mha")).unwrap();
        ImageSession::new(1, PathBuf::from("/a.mha"), image)
    }

    #[test]
    fn test_new_session() {
        let engine = engine();
        let session = session(&engine);

        assert_eq!(session.state(), SessionState::Created);
        assert_eq!(session.tube_count(), 0);
        assert_eq!(session.next_tube_ids(), (0, 0));
        assert_eq!(
            session.image_to_world().transform_point([1.0, 2.0, 3.0]),
            [3.0, 5.0, 7.0]
        );
    }

    #[test]
    fn test_lifecycle() {
        let engine = engine();
        let mut session = session(&engine);

        session.activate().unwrap();
        assert_eq!(session.state(), SessionState::Active);

        session.mark_removed().unwrap();
        assert_eq!(session.state(), SessionState::Removed);

        assert!(matches!(
            session.activate(),
            Err(SessionError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_register_tube_assigns_both_ids() {
        let engine = engine();
        let mut session = session(&engine);
        session.activate().unwrap();

        for expected in 0..3 {
            let tube = session
                .image_mut()
                .extract_tube(ContinuousIndex([5.0, 5.0, 5.0]), 0, true)
                .unwrap();
            let record = session.register_tube(tube).unwrap();
            assert_eq!(record.uid(), expected);
            assert_eq!(record.local_id(), expected);
            assert_eq!(record.tube().id(), Some(expected));
            assert_eq!(record.points().len(), 3);
            assert_eq!(record.radii(), &[2.0, 2.0, 2.0]);
        }

        assert_eq!(session.tube_count(), 3);
        assert_eq!(session.image().tube_group(), &[0, 1, 2]);
        assert_eq!(session.next_tube_ids(), (3, 3));
    }
}
