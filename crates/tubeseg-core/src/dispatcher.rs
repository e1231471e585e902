//! Request Dispatcher
//!
//! Validates each client request and sequences it against the session
//! registry and the engine. Every operation completes or fails within the
//! call; nothing is retried and no failure leaves partial state behind.

use std::path::Path;
use std::sync::Arc;

use tubeseg_engine::{Engine, ImageHandle};
use tubeseg_session::{ImageId, SessionHandle, SessionRegistry, SessionSummary};
use tubeseg_tubes::TubeError;

use crate::config::Config;
use crate::error::CoreError;
use crate::types::{SegmentParams, SegmentResult};
use crate::Result;

pub struct Dispatcher<E: Engine> {
    registry: SessionRegistry<E>,
    config: Config,
}

impl<E: Engine> Dispatcher<E> {
    pub fn new(registry: SessionRegistry<E>, config: Config) -> Self {
        Self { registry, config }
    }

    /// Build a dispatcher with a fresh registry over `engine`.
    pub fn with_engine(engine: Arc<E>, config: Config) -> Self {
        let registry = SessionRegistry::new(engine).with_engine_debug(config.extraction_debug);
        Self::new(registry, config)
    }

    pub fn registry(&self) -> &SessionRegistry<E> {
        &self.registry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<ImageId> {
        Ok(self.registry.create_session(path.as_ref())?)
    }

    /// Always succeeds, including for ids that were never issued.
    pub fn unload_image(&self, image_id: ImageId) {
        self.registry.remove_session(image_id);
    }

    /// Extract a tube seeded at `ijk`, an index-space coordinate in the
    /// image identified by `image_id`.
    pub fn segment(
        &self,
        image_id: ImageId,
        ijk: [f64; 3],
        params: SegmentParams,
    ) -> Result<SegmentResult> {
        let handle = self.registry.get_session(image_id)?;
        self.segment_session(image_id, &handle, ijk, params)
    }

    fn segment_session(
        &self,
        image_id: ImageId,
        handle: &SessionHandle<E::Image>,
        ijk: [f64; 3],
        params: SegmentParams,
    ) -> Result<SegmentResult> {
        let mut session = handle.lock();

        // Unloaded while this call waited for the session
        if !session.state().accepts_extraction() {
            return Err(CoreError::SessionNotFound(image_id));
        }

        if !params.scale.is_finite() {
            return Err(CoreError::InvalidParams(format!(
                "scale must be a finite number, got {}",
                params.scale
            )));
        }

        // The caller's index goes through world space so it is normalized by
        // the same transforms the tube output uses
        let world = session.image_to_world().transform_point(ijk);
        let index = tubeseg_transform::world_to_continuous_index(session.image(), world)?;

        let scale_norm = tubeseg_transform::scale_norm(session.geometry().spacing);
        let radius = params.scale / scale_norm;
        if radius < self.config.min_scale_ratio {
            tracing::warn!(
                image_id = image_id,
                scale = params.scale,
                scale_norm = scale_norm,
                "Rejected extraction below minimum scale"
            );
            return Err(CoreError::ScaleTooSmall {
                scale: params.scale,
                scale_norm,
                min_ratio: self.config.min_scale_ratio,
            });
        }

        let image = session.image_mut();
        image.set_radius(radius);
        let extracted = image.extract_tube(
            index,
            self.config.seed_tube_id,
            self.config.extraction_debug,
        );

        let Some(tube) = extracted else {
            tracing::info!(image_id = image_id, ijk = ?ijk, radius = radius, "No tube found");
            return Ok(SegmentResult::no_tube());
        };

        let record = session.register_tube(tube).map_err(|e| {
            let e = CoreError::from(e);
            if matches!(e, CoreError::DuplicateUid(_)) {
                tracing::error!(image_id = image_id, error = %e, "Tube uid invariant violated");
            }
            e
        })?;

        tracing::info!(
            image_id = image_id,
            uid = record.uid(),
            points = record.point_count(),
            "Extracted tube"
        );

        SegmentResult::from_record(record)
    }

    /// Geometry of a tube previously returned by [`segment`](Self::segment).
    pub fn get_tube(&self, image_id: ImageId, uid: u64) -> Result<SegmentResult> {
        let handle = self.registry.get_session(image_id)?;
        self.get_session_tube(image_id, &handle, uid)
    }

    fn get_session_tube(
        &self,
        image_id: ImageId,
        handle: &SessionHandle<E::Image>,
        uid: u64,
    ) -> Result<SegmentResult> {
        let session = handle.lock();

        if !session.state().accepts_extraction() {
            return Err(CoreError::SessionNotFound(image_id));
        }

        match session.tubes().get(uid) {
            Ok(record) => SegmentResult::from_record(record),
            Err(TubeError::NotFound(uid)) => Err(CoreError::TubeNotFound { image_id, uid }),
            Err(e) => Err(CoreError::Internal(e.to_string())),
        }
    }

    pub fn list_images(&self) -> Vec<SessionSummary> {
        self.registry.list_sessions()
    }
}

impl<E: Engine> Clone for Dispatcher<E> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            config: self.config.clone(),
        }
    }
}
