//! Geometry primitives shared by the engine and the transform pipeline
//!
//! All coordinates are 3-D and `f64`. Matrices are row-major.

use serde::{Deserialize, Serialize};

/// A point in world or physical space.
pub type Point3 = [f64; 3];

/// A continuous (sub-voxel) index into an image grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContinuousIndex(pub [f64; 3]);

impl ContinuousIndex {
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|c| c.is_finite())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix3(pub [[f64; 3]; 3]);

impl Matrix3 {
    pub fn identity() -> Self {
        Self::from_diagonal([1.0, 1.0, 1.0])
    }

    pub fn from_diagonal(diagonal: [f64; 3]) -> Self {
        let mut m = [[0.0; 3]; 3];
        for (i, value) in diagonal.into_iter().enumerate() {
            m[i][i] = value;
        }
        Self(m)
    }

    pub fn diagonal(&self) -> [f64; 3] {
        [self.0[0][0], self.0[1][1], self.0[2][2]]
    }

    pub fn transpose(&self) -> Self {
        let mut m = [[0.0; 3]; 3];
        for (r, row) in m.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                *value = self.0[c][r];
            }
        }
        Self(m)
    }

    /// `self * other`
    pub fn mul(&self, other: &Matrix3) -> Self {
        let mut m = [[0.0; 3]; 3];
        for (r, row) in m.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                *value = (0..3).map(|k| self.0[r][k] * other.0[k][c]).sum();
            }
        }
        Self(m)
    }

    pub fn mul_vec(&self, v: [f64; 3]) -> [f64; 3] {
        let mut out = [0.0; 3];
        for (r, value) in out.iter_mut().enumerate() {
            *value = (0..3).map(|k| self.0[r][k] * v[k]).sum();
        }
        out
    }
}

impl Default for Matrix3 {
    fn default() -> Self {
        Self::identity()
    }
}

/// An affine map `p -> matrix * p + offset`.
///
/// [`scale`](Self::scale) and [`translate`](Self::translate) compose on the
/// output side: each is applied after whatever the transform already does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    matrix: Matrix3,
    offset: [f64; 3],
}

impl AffineTransform {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
            offset: [0.0; 3],
        }
    }

    pub fn new(matrix: Matrix3, offset: [f64; 3]) -> Self {
        Self { matrix, offset }
    }

    pub fn matrix(&self) -> &Matrix3 {
        &self.matrix
    }

    pub fn offset(&self) -> [f64; 3] {
        self.offset
    }

    /// Scale the output of the current transform per axis.
    pub fn scale(&mut self, factors: [f64; 3]) {
        let s = Matrix3::from_diagonal(factors);
        self.matrix = s.mul(&self.matrix);
        self.offset = s.mul_vec(self.offset);
    }

    /// Translate the output of the current transform.
    pub fn translate(&mut self, offset: [f64; 3]) {
        for (o, t) in self.offset.iter_mut().zip(offset) {
            *o += t;
        }
    }

    pub fn transform_point(&self, point: Point3) -> Point3 {
        let mut out = self.matrix.mul_vec(point);
        for (o, t) in out.iter_mut().zip(self.offset) {
            *o += t;
        }
        out
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Voxel geometry of a decoded image, fixed at load time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageGeometry {
    pub spacing: [f64; 3],
    pub origin: [f64; 3],
    #[serde(default)]
    pub direction: Matrix3,
}

impl ImageGeometry {
    pub fn new(spacing: [f64; 3], origin: [f64; 3]) -> Self {
        Self {
            spacing,
            origin,
            direction: Matrix3::identity(),
        }
    }

    /// Full index-to-physical map including direction cosines.
    pub fn index_to_physical(&self) -> AffineTransform {
        let matrix = self.direction.mul(&Matrix3::from_diagonal(self.spacing));
        AffineTransform::new(matrix, self.origin)
    }

    /// Inverse of [`index_to_physical`](Self::index_to_physical), assuming
    /// orthonormal direction cosines.
    pub fn physical_to_index(&self, point: Point3) -> ContinuousIndex {
        let mut centered = point;
        for (c, o) in centered.iter_mut().zip(self.origin) {
            *c -= o;
        }
        let rotated = self.direction.transpose().mul_vec(centered);
        let mut index = [0.0; 3];
        for axis in 0..3 {
            index[axis] = rotated[axis] / self.spacing[axis];
        }
        ContinuousIndex(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: [f64; 3], b: [f64; 3]) {
        for axis in 0..3 {
            assert!((a[axis] - b[axis]).abs() < 1e-9, "{:?} != {:?}", a, b);
        }
    }

    #[test]
    fn test_scale_then_translate() {
        let mut t = AffineTransform::identity();
        t.scale([2.0, 3.0, 4.0]);
        t.translate([1.0, 1.0, 1.0]);

        assert_close(t.transform_point([1.0, 1.0, 1.0]), [3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_translate_then_scale_differs() {
        let mut t = AffineTransform::identity();
        t.translate([1.0, 1.0, 1.0]);
        t.scale([2.0, 2.0, 2.0]);

        // The translation is scaled too when it comes first
        assert_close(t.transform_point([0.0, 0.0, 0.0]), [2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_physical_index_inverse() {
        let mut geometry = ImageGeometry::new([0.5, 0.5, 2.0], [10.0, -5.0, 3.0]);
        // 90 degree rotation about z
        geometry.direction = Matrix3([[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);

        let index = [4.0, 7.0, 1.5];
        let physical = geometry.index_to_physical().transform_point(index);
        assert_close(geometry.physical_to_index(physical).0, index);
    }
}
