//! The triangle record indexed by the spatial kernels.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bounds::Aabb;

/// A world-space triangle tagged with its origin in the source mesh.
///
/// This is the fundamental work unit of the intersection kernels. A host
/// polygon may be fan-triangulated into several triangles; each carries the
/// id of the polygon that produced it (`face_index`) and its position in
/// the fan (`triangle_index`). The pair `(face_index, triangle_index)` is
/// unique within one mesh's triangle soup.
///
/// The `normal` is the *polygon* normal as supplied by the host, not
/// necessarily the triangle's own plane normal.
///
/// # Example
///
/// ```
/// use marker_types::{Point3, Triangle, Vector3};
///
/// let tri = Triangle::new(
///     3,
///     0,
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
///     Vector3::new(0.0, 0.0, 1.0),
/// );
///
/// assert_eq!(tri.face_index, 3);
/// assert!((tri.area() - 0.5).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Triangle {
    /// Id of the source polygon in the host mesh.
    pub face_index: u32,
    /// Which sub-triangle of the polygon's fan triangulation this is.
    pub triangle_index: u32,
    /// First vertex, world coordinates.
    pub v0: Point3<f64>,
    /// Second vertex, world coordinates.
    pub v1: Point3<f64>,
    /// Third vertex, world coordinates.
    pub v2: Point3<f64>,
    /// Polygon normal as supplied by the host (untransformed payload).
    pub normal: Vector3<f64>,
}

impl Triangle {
    /// Create a new triangle record.
    #[inline]
    #[must_use]
    pub const fn new(
        face_index: u32,
        triangle_index: u32,
        v0: Point3<f64>,
        v1: Point3<f64>,
        v2: Point3<f64>,
        normal: Vector3<f64>,
    ) -> Self {
        Self {
            face_index,
            triangle_index,
            v0,
            v1,
            v2,
            normal,
        }
    }

    /// Get the three vertices as an array.
    #[inline]
    #[must_use]
    pub const fn vertices(&self) -> [Point3<f64>; 3] {
        [self.v0, self.v1, self.v2]
    }

    /// Get the three edges as (start, end) pairs, in order v0→v1, v1→v2, v2→v0.
    #[inline]
    #[must_use]
    pub const fn edges(&self) -> [(Point3<f64>, Point3<f64>); 3] {
        [(self.v0, self.v1), (self.v1, self.v2), (self.v2, self.v0)]
    }

    /// Compute the AABB of the three vertices.
    ///
    /// This is the conservative bound used for tree pruning.
    #[must_use]
    pub fn aabb(&self) -> Aabb {
        let mut aabb = Aabb::from_point(self.v0);
        aabb.expand_to_include(&self.v1);
        aabb.expand_to_include(&self.v2);
        aabb
    }

    /// Compute the barycenter (arithmetic mean of the three vertices).
    #[inline]
    #[must_use]
    pub fn barycenter(&self) -> Point3<f64> {
        Point3::new(
            (self.v0.x + self.v1.x + self.v2.x) / 3.0,
            (self.v0.y + self.v1.y + self.v2.y) / 3.0,
            (self.v0.z + self.v1.z + self.v2.z) / 3.0,
        )
    }

    /// Compute the area of the triangle.
    #[inline]
    #[must_use]
    pub fn area(&self) -> f64 {
        let e1 = self.v1 - self.v0;
        let e2 = self.v2 - self.v0;
        e1.cross(&e2).norm() * 0.5
    }

    /// Check if the triangle is degenerate (area below `epsilon`).
    ///
    /// The intersection predicates answer conservatively on degenerate
    /// input rather than failing; this is a convenience for callers that
    /// want to filter first.
    #[inline]
    #[must_use]
    pub fn is_degenerate(&self, epsilon: f64) -> bool {
        self.area() < epsilon
    }
}
