//! Axis-aligned bounding box.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::triangle::Triangle;

/// An axis-aligned bounding box (AABB) in world coordinates.
///
/// The box is defined by its minimum and maximum corners with
/// `min.i <= max.i` on every axis for a non-empty box. All containment
/// and overlap predicates are closed: points on the boundary count as
/// inside, and boxes that merely touch count as intersecting.
///
/// # Example
///
/// ```
/// use marker_types::{Aabb, Point3};
///
/// let aabb = Aabb::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(2.0, 2.0, 2.0),
/// );
///
/// assert!(aabb.contains(&Point3::new(1.0, 1.0, 1.0)));
/// assert!(aabb.contains(&Point3::new(2.0, 2.0, 2.0))); // boundary
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Minimum corner (smallest x, y, z values).
    pub min: Point3<f64>,
    /// Maximum corner (largest x, y, z values).
    pub max: Point3<f64>,
}

impl Aabb {
    /// Create a new AABB from minimum and maximum corners.
    ///
    /// The corners are reordered per axis if min > max.
    #[must_use]
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self {
            min: Point3::new(min.x.min(max.x), min.y.min(max.y), min.z.min(max.z)),
            max: Point3::new(min.x.max(max.x), min.y.max(max.y), min.z.max(max.z)),
        }
    }

    /// Create an AABB spanning a single point (zero volume).
    #[inline]
    #[must_use]
    pub const fn from_point(point: Point3<f64>) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Create an empty (inverted) AABB.
    ///
    /// Useful as the identity for [`Aabb::expand_to_include`] and
    /// [`Aabb::union`].
    ///
    /// # Example
    ///
    /// ```
    /// use marker_types::{Aabb, Point3};
    ///
    /// let mut aabb = Aabb::empty();
    /// assert!(aabb.is_empty());
    ///
    /// aabb.expand_to_include(&Point3::new(1.0, 2.0, 3.0));
    /// assert!(!aabb.is_empty());
    /// ```
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Point3::new is not const in nalgebra
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Create an AABB enclosing an iterator of points.
    ///
    /// Returns an empty AABB for an empty iterator.
    #[must_use]
    pub fn from_points<'a>(points: impl Iterator<Item = &'a Point3<f64>>) -> Self {
        let mut aabb = Self::empty();
        for point in points {
            aabb.expand_to_include(point);
        }
        aabb
    }

    /// Check if the AABB is empty (min > max on any axis).
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Get the center of the AABB.
    #[inline]
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        Point3::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }

    /// Get the extent along each axis.
    #[inline]
    #[must_use]
    pub fn size(&self) -> nalgebra::Vector3<f64> {
        self.max - self.min
    }

    /// Get the diagonal length of the AABB.
    ///
    /// Returns 0.0 for empty AABBs.
    #[inline]
    #[must_use]
    pub fn diagonal(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.size().norm()
    }

    /// Check if the AABB contains a point (boundary included).
    #[inline]
    #[must_use]
    pub fn contains(&self, point: &Point3<f64>) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Check if this AABB intersects another.
    ///
    /// Touching boxes (coincident faces, edges, or corners) count as
    /// intersecting.
    ///
    /// # Example
    ///
    /// ```
    /// use marker_types::{Aabb, Point3};
    ///
    /// let a = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
    /// let b = Aabb::new(Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 1.0, 1.0));
    /// let c = Aabb::new(Point3::new(3.0, 0.0, 0.0), Point3::new(4.0, 1.0, 1.0));
    ///
    /// assert!(a.intersects(&b)); // share the x = 1 face
    /// assert!(!a.intersects(&c));
    /// ```
    #[inline]
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Check if any vertex of a triangle lies inside or on the AABB.
    #[must_use]
    pub fn contains_any_vertex(&self, tri: &Triangle) -> bool {
        self.contains(&tri.v0) || self.contains(&tri.v1) || self.contains(&tri.v2)
    }

    /// Check if all three vertices of a triangle lie inside or on the AABB.
    #[must_use]
    pub fn contains_all_vertices(&self, tri: &Triangle) -> bool {
        self.contains(&tri.v0) && self.contains(&tri.v1) && self.contains(&tri.v2)
    }

    /// Compute the union (enclosing AABB) of two AABBs.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self {
            min: Point3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Point3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    /// Expand the AABB in place to include a point.
    pub fn expand_to_include(&mut self, point: &Point3<f64>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    /// Subdivide the AABB into its eight octants around the center.
    ///
    /// The enumeration is fixed: octant `k` takes the upper half of axis
    /// `i` iff bit `i` of `k` is set (x = bit 0, y = bit 1, z = bit 2),
    /// so octant 0 is the min corner and octant 7 the max corner.
    ///
    /// # Example
    ///
    /// ```
    /// use marker_types::{Aabb, Point3};
    ///
    /// let aabb = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 2.0, 2.0));
    /// let octants = aabb.octants();
    ///
    /// assert_eq!(octants[0].max, Point3::new(1.0, 1.0, 1.0));
    /// assert_eq!(octants[7].min, Point3::new(1.0, 1.0, 1.0));
    /// ```
    #[must_use]
    pub fn octants(&self) -> [Self; 8] {
        let c = self.center();
        let mut out = [*self; 8];
        for (k, octant) in out.iter_mut().enumerate() {
            let min = Point3::new(
                if k & 1 == 0 { self.min.x } else { c.x },
                if k & 2 == 0 { self.min.y } else { c.y },
                if k & 4 == 0 { self.min.z } else { c.z },
            );
            let max = Point3::new(
                if k & 1 == 0 { c.x } else { self.max.x },
                if k & 2 == 0 { c.y } else { self.max.y },
                if k & 4 == 0 { c.z } else { self.max.z },
            );
            *octant = Self { min, max };
        }
        out
    }

    /// Get the eight corner points of the AABB.
    ///
    /// Corners follow the same bit-coded enumeration as [`Aabb::octants`].
    #[must_use]
    pub fn corners(&self) -> [Point3<f64>; 8] {
        let mut out = [self.min; 8];
        for (k, corner) in out.iter_mut().enumerate() {
            *corner = Point3::new(
                if k & 1 == 0 { self.min.x } else { self.max.x },
                if k & 2 == 0 { self.min.y } else { self.max.y },
                if k & 4 == 0 { self.min.z } else { self.max.z },
            );
        }
        out
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}
