//! tubeseg Coordinate Transform
//!
//! Conversions between the three coordinate spaces a request passes through:
//!
//! ```text
//! ijk (caller index) --image_to_world--> world --engine--> continuous index
//!                                                              |
//!                                                         extraction
//!                                                              v
//! world points + radii <--tube index_to_world-- tube samples (index space)
//! ```

mod error;

pub use error::TransformError;

use tubeseg_engine::{AffineTransform, ContinuousIndex, ImageHandle, Point3, TubeHandle};

pub type Result<T> = std::result::Result<T, TransformError>;

/// Build the image-to-world transform: scale by `spacing`, then translate
/// by `origin`. Direction cosines are not applied.
pub fn build_image_to_world_transform(spacing: [f64; 3], origin: [f64; 3]) -> AffineTransform {
    let mut transform = AffineTransform::identity();
    transform.scale(spacing);
    transform.translate(origin);
    transform
}

/// Convert a world point to the continuous index the engine expects.
pub fn world_to_continuous_index<I: ImageHandle>(
    image: &I,
    point: Point3,
) -> Result<ContinuousIndex> {
    if point.iter().any(|c| !c.is_finite()) {
        return Err(TransformError::Geometry(point));
    }

    match image.world_to_continuous_index(point) {
        Some(index) if index.is_finite() => {
            tracing::debug!(world = ?point, index = ?index.0, "World point to continuous index");
            Ok(index)
        }
        _ => Err(TransformError::Geometry(point)),
    }
}

/// Mean of the per-axis spacing; the unit extraction scales are normalized by.
pub fn scale_norm(spacing: [f64; 3]) -> f64 {
    spacing.iter().sum::<f64>() / 3.0
}

/// Map every sample of an extracted tube into world space.
///
/// Radii are scaled by the mean of the index-to-world matrix diagonal. That
/// is exact for isotropic, axis-aligned transforms only; sheared or
/// anisotropic matrices get an approximate radius.
pub fn extracted_tube_to_world<T: TubeHandle>(tube: &T) -> (Vec<Point3>, Vec<f64>) {
    let transform = tube.index_to_world();
    let scale = transform.matrix().diagonal().iter().sum::<f64>() / 3.0;

    let count = tube.point_count();
    let mut points = Vec::with_capacity(count);
    let mut radii = Vec::with_capacity(count);

    for i in 0..count {
        let sample = tube.point(i);
        points.push(transform.transform_point(sample.position));
        radii.push(sample.radius * scale);
    }

    (points, radii)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tubeseg_engine::{
        Engine, ImageGeometry, Matrix3, ScriptedEngine, ScriptedTubeHandle, ScriptedVolume,
        TubePoint,
    };

    fn assert_close(a: [f64; 3], b: [f64; 3]) {
        for axis in 0..3 {
            assert!((a[axis] - b[axis]).abs() < 1e-9, "{:?} != {:?}", a, b);
        }
    }

    #[test]
    fn test_unit_spacing_zero_origin_is_identity() {
        let t = build_image_to_world_transform([1.0, 1.0, 1.0], [0.0, 0.0, 0.0]);
        assert_eq!(t, AffineTransform::identity());
        assert_close(t.transform_point([10.0, 10.0, 10.0]), [10.0, 10.0, 10.0]);
    }

    #[test]
    fn test_origin_is_not_scaled() {
        let t = build_image_to_world_transform([2.0, 0.5, 3.0], [100.0, 200.0, 300.0]);
        assert_close(t.transform_point([0.0, 0.0, 0.0]), [100.0, 200.0, 300.0]);
        assert_close(t.transform_point([1.0, 2.0, 3.0]), [102.0, 201.0, 309.0]);
    }

    #[test]
    fn test_scale_norm_is_mean_spacing() {
        assert_eq!(scale_norm([1.0, 1.0, 1.0]), 1.0);
        assert!((scale_norm([0.5, 1.0, 3.0]) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_world_to_index_round_trip_through_engine() {
        let geometry = ImageGeometry::new([0.5, 0.5, 2.0], [10.0, 20.0, 30.0]);
        let engine = ScriptedEngine::new()
            .with_volume("/a.mha", ScriptedVolume::new(geometry, [64, 64, 16]));
        let image = engine.decode_image(Path::new("/a.mha")).unwrap();

        let to_world = build_image_to_world_transform(geometry.spacing, geometry.origin);
        let world = to_world.transform_point([12.0, 7.5, 3.0]);
        let index = world_to_continuous_index(&image, world).unwrap();
        assert_close(index.0, [12.0, 7.5, 3.0]);
    }

    #[test]
    fn test_out_of_range_point_is_geometry_error() {
        let geometry = ImageGeometry::new([1.0; 3], [0.0; 3]);
        let engine =
            ScriptedEngine::new().with_volume("/a.mha", ScriptedVolume::new(geometry, [8, 8, 8]));
        let image = engine.decode_image(Path::new("/a.mha")).unwrap();

        let result = world_to_continuous_index(&image, [100.0, 0.0, 0.0]);
        assert!(matches!(result, Err(TransformError::Geometry(_))));

        let result = world_to_continuous_index(&image, [f64::INFINITY, 0.0, 0.0]);
        assert!(matches!(result, Err(TransformError::Geometry(_))));
    }

    #[test]
    fn test_tube_to_world_scales_positions_and_radii() {
        let mut index_to_world = AffineTransform::identity();
        index_to_world.scale([2.0, 2.0, 2.0]);
        index_to_world.translate([1.0, 0.0, 0.0]);

        let tube = ScriptedTubeHandle::new(
            vec![
                TubePoint {
                    position: [0.0, 0.0, 0.0],
                    radius: 1.0,
                },
                TubePoint {
                    position: [1.0, 2.0, 3.0],
                    radius: 0.25,
                },
            ],
            index_to_world,
        );

        let (points, radii) = extracted_tube_to_world(&tube);
        assert_eq!(points.len(), tube.point_count());
        assert_eq!(radii.len(), tube.point_count());
        assert_close(points[0], [1.0, 0.0, 0.0]);
        assert_close(points[1], [3.0, 4.0, 6.0]);
        assert_eq!(radii, vec![2.0, 0.5]);
    }

    #[test]
    fn test_anisotropic_radius_uses_mean_diagonal() {
        let tube = ScriptedTubeHandle::new(
            vec![TubePoint {
                position: [0.0; 3],
                radius: 3.0,
            }],
            AffineTransform::new(Matrix3::from_diagonal([1.0, 2.0, 3.0]), [0.0; 3]),
        );

        let (_, radii) = extracted_tube_to_world(&tube);
        assert!((radii[0] - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_tube() {
        let tube = ScriptedTubeHandle::new(Vec::new(), AffineTransform::identity());
        let (points, radii) = extracted_tube_to_world(&tube);
        assert!(points.is_empty());
        assert!(radii.is_empty());
    }
}
