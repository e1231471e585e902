//! Engine capability traits
//!
//! Handles are owned exclusively by whoever holds them: a session owns its
//! image handle and a tube record owns its tube handle. Nothing is shared
//! between sessions, so handles only need to be `Send`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::geometry::{AffineTransform, ContinuousIndex, ImageGeometry, Point3};
use crate::Result;

/// A single centerline sample on an extracted tube, in the tube's index space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TubePoint {
    pub position: Point3,
    pub radius: f64,
}

/// Decodes image files into engine-owned image handles.
pub trait Engine: Send + Sync + 'static {
    type Image: ImageHandle;

    /// Decode the image at `path`. Fails when the file is unreadable or its
    /// format is not recognized.
    fn decode_image(&self, path: &Path) -> Result<Self::Image>;
}

/// A decoded image together with the engine's tube segmenter bound to it.
pub trait ImageHandle: Send + 'static {
    type Tube: TubeHandle;

    fn geometry(&self) -> &ImageGeometry;

    /// Engine conversion from a physical point to a continuous index.
    /// Returns `None` when the point has no representable index.
    fn world_to_continuous_index(&self, point: Point3) -> Option<ContinuousIndex>;

    fn set_debug(&mut self, debug: bool);

    /// Set the extraction radius, in voxels, used by the next extraction.
    fn set_radius(&mut self, radius: f64);

    /// Trace a tube from `index`. `seed` is passed through to the engine
    /// unchanged. Returns `None` when no tube is found.
    fn extract_tube(&mut self, index: ContinuousIndex, seed: u64, debug: bool)
        -> Option<Self::Tube>;

    /// Register an extracted tube with the engine's internal tube group.
    fn add_tube(&mut self, tube: &Self::Tube);
}

/// An extracted tube.
pub trait TubeHandle: Send + 'static {
    fn set_id(&mut self, id: u64);

    fn point_count(&self) -> usize;

    /// # Panics
    ///
    /// Implementations may panic if `index >= point_count()`.
    fn point(&self, index: usize) -> TubePoint;

    fn index_to_world(&self) -> AffineTransform;
}
