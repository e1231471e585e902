//! Extracted tube record

use tubeseg_engine::{Point3, TubeHandle};

/// A successfully extracted tube, with its geometry already in world space.
///
/// Records are immutable once built; `points` and `radii` always have the
/// same length as the engine tube's point count.
#[derive(Debug)]
pub struct TubeRecord<T> {
    local_id: u64,
    uid: u64,
    tube: T,
    points: Vec<Point3>,
    radii: Vec<f64>,
}

impl<T: TubeHandle> TubeRecord<T> {
    pub fn from_extraction(local_id: u64, uid: u64, tube: T) -> Self {
        let (points, radii) = tubeseg_transform::extracted_tube_to_world(&tube);

        Self {
            local_id,
            uid,
            tube,
            points,
            radii,
        }
    }
}

impl<T> TubeRecord<T> {
    pub fn local_id(&self) -> u64 {
        self.local_id
    }

    pub fn uid(&self) -> u64 {
        self.uid
    }

    pub fn tube(&self) -> &T {
        &self.tube
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubeseg_engine::{AffineTransform, ScriptedTubeHandle, TubePoint};

    #[test]
    fn test_record_geometry_is_aligned() {
        let mut to_world = AffineTransform::identity();
        to_world.scale([0.5, 0.5, 0.5]);

        let mut tube = ScriptedTubeHandle::new(
            (0..4)
                .map(|i| TubePoint {
                    position: [i as f64, 0.0, 0.0],
                    radius: 2.0,
                })
                .collect(),
            to_world,
        );
        tube.set_id(3);

        let record = TubeRecord::from_extraction(3, 0, tube);
        assert_eq!(record.local_id(), 3);
        assert_eq!(record.uid(), 0);
        assert_eq!(record.point_count(), 4);
        assert_eq!(record.radii().len(), record.tube().point_count());
        assert_eq!(record.points()[2], [1.0, 0.0, 0.0]);
        assert!(record.radii().iter().all(|r| *r == 1.0));
        assert_eq!(record.tube().id(), Some(3));
    }
}
