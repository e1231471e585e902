//! Scripted in-memory engine
//!
//! A deterministic stand-in for the native toolkit. Volumes are described by
//! their geometry and a list of centerlines; an extraction succeeds when the
//! seed index lies within `capture_radius` voxels of a centerline sample.
//! Volumes can be registered in memory or read from a JSON description file.
//! Every engine call is appended to a shared [`EngineLog`] so callers can
//! inspect what the orchestration layer asked for.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use crate::engine::{Engine, ImageHandle, TubeHandle, TubePoint};
use crate::error::EngineError;
use crate::geometry::{AffineTransform, ContinuousIndex, ImageGeometry, Point3};
use crate::Result;

fn default_capture_radius() -> f64 {
    2.0
}

/// A centerline in index space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedTube {
    pub points: Vec<TubePoint>,
}

impl ScriptedTube {
    fn distance_to(&self, index: &ContinuousIndex) -> f64 {
        self.points
            .iter()
            .map(|p| {
                (0..3)
                    .map(|axis| (p.position[axis] - index.0[axis]).powi(2))
                    .sum::<f64>()
                    .sqrt()
            })
            .fold(f64::INFINITY, f64::min)
    }
}

/// Description of a synthetic volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedVolume {
    pub geometry: ImageGeometry,
    /// Grid size per axis, in voxels
    pub size: [usize; 3],
    #[serde(default)]
    pub tubes: Vec<ScriptedTube>,
    #[serde(default = "default_capture_radius")]
    pub capture_radius: f64,
}

impl ScriptedVolume {
    pub fn new(geometry: ImageGeometry, size: [usize; 3]) -> Self {
        Self {
            geometry,
            size,
            tubes: Vec::new(),
            capture_radius: default_capture_radius(),
        }
    }

    pub fn with_tube(mut self, tube: ScriptedTube) -> Self {
        self.tubes.push(tube);
        self
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if self.geometry.spacing.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(EngineError::UnsupportedFormat {
                path: path.to_path_buf(),
                reason: format!("invalid spacing {:?}", self.geometry.spacing),
            });
        }
        if self.size.contains(&0) {
            return Err(EngineError::UnsupportedFormat {
                path: path.to_path_buf(),
                reason: "empty image grid".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionCall {
    pub index: ContinuousIndex,
    pub radius: Option<f64>,
    pub seed: u64,
    pub debug: bool,
}

/// Record of every call made into a [`ScriptedEngine`].
#[derive(Debug, Clone, Default)]
pub struct EngineLog {
    pub decoded: Vec<PathBuf>,
    pub extractions: Vec<ExtractionCall>,
    /// Ids of tubes added to any image's tube group, in order
    pub tube_group: Vec<u64>,
}

#[derive(Default)]
pub struct ScriptedEngine {
    volumes: RwLock<HashMap<PathBuf, ScriptedVolume>>,
    log: Arc<Mutex<EngineLog>>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_volume(self, path: impl Into<PathBuf>, volume: ScriptedVolume) -> Self {
        self.insert_volume(path, volume);
        self
    }

    pub fn insert_volume(&self, path: impl Into<PathBuf>, volume: ScriptedVolume) {
        self.volumes.write().insert(path.into(), volume);
    }

    /// Snapshot of the calls made so far.
    pub fn log(&self) -> EngineLog {
        self.log.lock().clone()
    }

    fn read_volume(path: &Path) -> Result<ScriptedVolume> {
        let contents = std::fs::read_to_string(path).map_err(|e| EngineError::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&contents).map_err(|e| EngineError::UnsupportedFormat {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

impl Engine for ScriptedEngine {
    type Image = ScriptedImage;

    fn decode_image(&self, path: &Path) -> Result<ScriptedImage> {
        let registered = self.volumes.read().get(path).cloned();
        let volume = match registered {
            Some(volume) => volume,
            None => Self::read_volume(path)?,
        };
        volume.validate(path)?;

        self.log.lock().decoded.push(path.to_path_buf());
        tracing::debug!(path = %path.display(), size = ?volume.size, "Decoded scripted volume");

        Ok(ScriptedImage {
            volume,
            radius: None,
            debug: false,
            tube_group: Vec::new(),
            log: Arc::clone(&self.log),
        })
    }
}

pub struct ScriptedImage {
    volume: ScriptedVolume,
    radius: Option<f64>,
    debug: bool,
    tube_group: Vec<u64>,
    log: Arc<Mutex<EngineLog>>,
}

impl ScriptedImage {
    pub fn radius(&self) -> Option<f64> {
        self.radius
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn tube_group(&self) -> &[u64] {
        &self.tube_group
    }
}

impl ImageHandle for ScriptedImage {
    type Tube = ScriptedTubeHandle;

    fn geometry(&self) -> &ImageGeometry {
        &self.volume.geometry
    }

    fn world_to_continuous_index(&self, point: Point3) -> Option<ContinuousIndex> {
        let index = self.volume.geometry.physical_to_index(point);
        if !index.is_finite() {
            return None;
        }

        // Continuous indices are valid up to half a voxel past the grid
        let inside = index
            .0
            .iter()
            .zip(self.volume.size)
            .all(|(c, size)| *c >= -0.5 && *c <= size as f64 - 0.5);

        inside.then_some(index)
    }

    fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    fn set_radius(&mut self, radius: f64) {
        self.radius = Some(radius);
    }

    fn extract_tube(
        &mut self,
        index: ContinuousIndex,
        seed: u64,
        debug: bool,
    ) -> Option<ScriptedTubeHandle> {
        self.log.lock().extractions.push(ExtractionCall {
            index,
            radius: self.radius,
            seed,
            debug,
        });

        let capture = self.volume.capture_radius;
        let tube = self
            .volume
            .tubes
            .iter()
            .find(|tube| tube.distance_to(&index) <= capture)?;

        if debug {
            tracing::debug!(index = ?index.0, points = tube.points.len(), "Scripted tube traced");
        }

        Some(ScriptedTubeHandle {
            id: None,
            points: tube.points.clone(),
            index_to_world: self.volume.geometry.index_to_physical(),
        })
    }

    fn add_tube(&mut self, tube: &ScriptedTubeHandle) {
        if let Some(id) = tube.id {
            self.tube_group.push(id);
            self.log.lock().tube_group.push(id);
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScriptedTubeHandle {
    id: Option<u64>,
    points: Vec<TubePoint>,
    index_to_world: AffineTransform,
}

impl ScriptedTubeHandle {
    pub fn new(points: Vec<TubePoint>, index_to_world: AffineTransform) -> Self {
        Self {
            id: None,
            points,
            index_to_world,
        }
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }
}

impl TubeHandle for ScriptedTubeHandle {
    fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }

    fn point_count(&self) -> usize {
        self.points.len()
    }

    fn point(&self, index: usize) -> TubePoint {
        self.points[index]
    }

    fn index_to_world(&self) -> AffineTransform {
        self.index_to_world
    }
}
