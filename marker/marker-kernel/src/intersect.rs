//! Triangle-triangle and box-triangle overlap predicates.
//!
//! These are the exact tests behind every kernel query: a robust
//! triangle-triangle overlap predicate (interval method with a projected
//! 2D fallback for the coplanar case) and a 13-axis separating-axis test
//! between an AABB and a triangle.
//!
//! All predicates are pure and panic-free. Degenerate input (zero-area
//! triangles, empty boxes) yields a conservative answer rather than an
//! error. Overlap is *closed* throughout: triangles or boxes that merely
//! touch count as intersecting.

use marker_types::{Aabb, Point3, Triangle, Vector3};

/// A 1-D interval, grown from projected crossing points.
#[derive(Debug, Clone, Copy)]
struct Interval {
    min: f64,
    max: f64,
}

impl Interval {
    const fn empty() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    fn expand(&mut self, value: f64) {
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    /// Closed overlap; an empty interval overlaps nothing.
    const fn overlaps(&self, other: &Self) -> bool {
        self.min <= other.max && self.max >= other.min
    }
}

/// Index of the component of `v` with the largest magnitude.
fn dominant_axis(v: &Vector3<f64>) -> usize {
    let b = [v.x.abs(), v.y.abs(), v.z.abs()];
    if b[0] > b[1] {
        if b[0] > b[2] {
            0
        } else {
            2
        }
    } else if b[1] > b[2] {
        1
    } else {
        2
    }
}

/// Project a point onto the plane perpendicular to `axis`.
fn project_2d(p: &Point3<f64>, axis: usize) -> [f64; 2] {
    let u = (axis + 1) % 3;
    let v = (axis + 2) % 3;
    [p[u], p[v]]
}

/// Twice the signed area of the 2-D triangle (a, b, c).
fn orient_2d(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

/// Check if a collinear point `p` lies within the closed extent of segment (a, b).
fn on_segment_2d(a: [f64; 2], b: [f64; 2], p: [f64; 2]) -> bool {
    p[0] >= a[0].min(b[0])
        && p[0] <= a[0].max(b[0])
        && p[1] >= a[1].min(b[1])
        && p[1] <= a[1].max(b[1])
}

/// Closed 2-D segment-segment intersection.
fn segments_intersect_2d(p1: [f64; 2], p2: [f64; 2], q1: [f64; 2], q2: [f64; 2]) -> bool {
    let d1 = orient_2d(q1, q2, p1);
    let d2 = orient_2d(q1, q2, p2);
    let d3 = orient_2d(p1, p2, q1);
    let d4 = orient_2d(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment_2d(q1, q2, p1))
        || (d2 == 0.0 && on_segment_2d(q1, q2, p2))
        || (d3 == 0.0 && on_segment_2d(p1, p2, q1))
        || (d4 == 0.0 && on_segment_2d(p1, p2, q2))
}

/// Closed 2-D point-in-triangle test, winding-agnostic.
fn point_in_triangle_2d(p: [f64; 2], t: &[[f64; 2]; 3]) -> bool {
    let d1 = orient_2d(t[0], t[1], p);
    let d2 = orient_2d(t[1], t[2], p);
    let d3 = orient_2d(t[2], t[0], p);

    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;

    !(has_neg && has_pos)
}

/// Coplanar sub-case: project both triangles onto the dominant-axis plane
/// of `normal` and test edge crossings and mutual containment.
fn coplanar_triangles_overlap(
    a: &[Point3<f64>; 3],
    b: &[Point3<f64>; 3],
    normal: &Vector3<f64>,
) -> bool {
    let axis = dominant_axis(normal);
    let a2 = [
        project_2d(&a[0], axis),
        project_2d(&a[1], axis),
        project_2d(&a[2], axis),
    ];
    let b2 = [
        project_2d(&b[0], axis),
        project_2d(&b[1], axis),
        project_2d(&b[2], axis),
    ];

    for i in 0..3 {
        let (p1, p2) = (a2[i], a2[(i + 1) % 3]);
        for j in 0..3 {
            let (q1, q2) = (b2[j], b2[(j + 1) % 3]);
            if segments_intersect_2d(p1, p2, q1, q2) {
                return true;
            }
        }
    }

    // No edge crossings: one triangle may still sit entirely inside the other.
    a2.iter().any(|p| point_in_triangle_2d(*p, &b2))
        || b2.iter().any(|p| point_in_triangle_2d(*p, &a2))
}

/// Parameter of the zero crossing on the segment from distance `da` to `db`,
/// applied to the projected coordinates `pa`, `pb`.
fn crossing_point(pa: f64, pb: f64, da: f64, db: f64) -> f64 {
    let t = da / (da - db);
    pa + t * (pb - pa)
}

/// Test if two closed triangles share at least one point.
///
/// The triangles are projected onto each other's planes first; when either
/// lies within `epsilon` of the other's plane the coplanar sub-case is
/// answered in 2-D (any edge of one crossing the other, or one triangle
/// containing a vertex of the other). Otherwise the two 1-D intervals cut
/// on the line of plane intersection are compared, with touching counting
/// as overlap.
///
/// # Arguments
///
/// * `a`, `b` - The triangles, world coordinates
/// * `epsilon` - Absolute tolerance, normally derived from the scene
///   bounds diagonal
///
/// # Returns
///
/// `true` if the triangles overlap. Degenerate (zero-area) triangles may
/// answer either way but never panic.
#[must_use]
pub fn triangles_overlap(a: &Triangle, b: &Triangle, epsilon: f64) -> bool {
    let av = a.vertices();
    let bv = b.vertices();

    let na = (av[1] - av[0]).cross(&(av[2] - av[0]));
    let ca = na.dot(&av[0].coords);
    let nb = (bv[1] - bv[0]).cross(&(bv[2] - bv[0]));
    let cb = nb.dot(&bv[0].coords);

    // Signed distances of A's vertices to B's plane.
    let da = [
        nb.dot(&av[0].coords) - cb,
        nb.dot(&av[1].coords) - cb,
        nb.dot(&av[2].coords) - cb,
    ];
    if da.iter().all(|d| *d > epsilon) || da.iter().all(|d| *d < -epsilon) {
        return false;
    }

    // Signed distances of B's vertices to A's plane.
    let db = [
        na.dot(&bv[0].coords) - ca,
        na.dot(&bv[1].coords) - ca,
        na.dot(&bv[2].coords) - ca,
    ];
    if db.iter().all(|d| *d > epsilon) || db.iter().all(|d| *d < -epsilon) {
        return false;
    }

    if da.iter().all(|d| d.abs() < epsilon) || db.iter().all(|d| d.abs() < epsilon) {
        return coplanar_triangles_overlap(&av, &bv, &na);
    }

    // Both triangles straddle the other's plane: compare the intervals
    // each cuts on the direction of the plane-intersection line.
    let dir = na.cross(&nb);
    let pa = [
        dir.dot(&av[0].coords),
        dir.dot(&av[1].coords),
        dir.dot(&av[2].coords),
    ];
    let pb = [
        dir.dot(&bv[0].coords),
        dir.dot(&bv[1].coords),
        dir.dot(&bv[2].coords),
    ];

    let mut ia = Interval::empty();
    let mut ib = Interval::empty();
    for i in 0..3 {
        let j = (i + 1) % 3;
        if da[i].min(da[j]) <= 0.0 && da[i].max(da[j]) >= 0.0 && (da[i] - da[j]).abs() > 0.0 {
            ia.expand(crossing_point(pa[i], pa[j], da[i], da[j]));
        }
        if db[i].min(db[j]) <= 0.0 && db[i].max(db[j]) >= 0.0 && (db[i] - db[j]).abs() > 0.0 {
            ib.expand(crossing_point(pb[i], pb[j], db[i], db[j]));
        }
    }

    ia.overlaps(&ib)
}

/// Test a candidate separating axis; `true` means the axis separates.
fn axis_separates(axis: Vector3<f64>, v: &[Vector3<f64>; 3], half: &Vector3<f64>) -> bool {
    let p0 = v[0].dot(&axis);
    let p1 = v[1].dot(&axis);
    let p2 = v[2].dot(&axis);
    let r = half.x * axis.x.abs() + half.y * axis.y.abs() + half.z * axis.z.abs();
    p0.min(p1).min(p2) > r || p0.max(p1).max(p2) < -r
}

/// Test if an AABB and a triangle overlap.
///
/// Classical separating-axis test over the 13 candidate axes: the three
/// box axes, the triangle's plane normal, and the nine edge-edge cross
/// products. Touching counts as overlapping.
///
/// # Arguments
///
/// * `bbox` - The box; an empty box overlaps nothing
/// * `tri` - The triangle, world coordinates
///
/// # Returns
///
/// `true` if no separating axis exists.
#[must_use]
pub fn aabb_triangle_overlap(bbox: &Aabb, tri: &Triangle) -> bool {
    if bbox.is_empty() {
        return false;
    }

    let center = bbox.center();
    let half = bbox.size() * 0.5;

    // Triangle vertices relative to the box center.
    let v = [tri.v0 - center, tri.v1 - center, tri.v2 - center];

    // Box axes: the triangle's extent against the half extents per axis.
    for axis in 0..3 {
        let min = v[0][axis].min(v[1][axis]).min(v[2][axis]);
        let max = v[0][axis].max(v[1][axis]).max(v[2][axis]);
        if min > half[axis] || max < -half[axis] {
            return false;
        }
    }

    let edges = [v[1] - v[0], v[2] - v[1], v[0] - v[2]];

    // Triangle plane: the triangle projects to a single value on its normal.
    let normal = edges[0].cross(&edges[1]);
    if axis_separates(normal, &v, &half) {
        return false;
    }

    // Nine edge-edge cross products.
    let units = [Vector3::x(), Vector3::y(), Vector3::z()];
    for edge in &edges {
        for unit in &units {
            let axis = edge.cross(unit);
            if axis_separates(axis, &v, &half) {
                return false;
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use marker_types::Point3;

    const EPSILON: f64 = 1e-9;

    fn tri(v0: [f64; 3], v1: [f64; 3], v2: [f64; 3]) -> Triangle {
        Triangle::new(
            0,
            0,
            Point3::new(v0[0], v0[1], v0[2]),
            Point3::new(v1[0], v1[1], v1[2]),
            Point3::new(v2[0], v2[1], v2[2]),
            Vector3::new(0.0, 0.0, 1.0),
        )
    }

    #[test]
    fn piercing_triangles_overlap() {
        let a = tri([0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [1.0, 2.0, 0.0]);
        let b = tri([1.0, 0.5, -1.0], [1.0, 0.5, 1.0], [1.0, 1.5, 0.0]);
        assert!(triangles_overlap(&a, &b, EPSILON));
        assert!(triangles_overlap(&b, &a, EPSILON));
    }

    #[test]
    fn parallel_planes_do_not_overlap() {
        let a = tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, 1.0, 0.0]);
        let b = tri([0.0, 0.0, 2.0], [1.0, 0.0, 2.0], [0.5, 1.0, 2.0]);
        assert!(!triangles_overlap(&a, &b, EPSILON));
    }

    #[test]
    fn straddling_but_disjoint() {
        // B crosses A's plane but far outside A.
        let a = tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, 1.0, 0.0]);
        let b = tri([10.0, 10.0, -1.0], [10.0, 10.0, 1.0], [11.0, 10.0, 0.0]);
        assert!(!triangles_overlap(&a, &b, EPSILON));
    }

    #[test]
    fn vertex_touch_counts() {
        // B touches A's interior with a single vertex.
        let a = tri([0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [1.0, 2.0, 0.0]);
        let b = tri([1.0, 0.5, 0.0], [1.0, 0.5, 2.0], [2.0, 0.5, 2.0]);
        assert!(triangles_overlap(&a, &b, EPSILON));
    }

    #[test]
    fn coplanar_overlapping() {
        let a = tri([0.0, 0.0, 1.0], [2.0, 0.0, 1.0], [1.0, 2.0, 1.0]);
        let b = tri([1.0, 0.5, 1.0], [3.0, 0.5, 1.0], [2.0, 2.5, 1.0]);
        assert!(triangles_overlap(&a, &b, EPSILON));
    }

    #[test]
    fn coplanar_disjoint() {
        let a = tri([0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.5, 1.0, 1.0]);
        let b = tri([5.0, 0.0, 1.0], [6.0, 0.0, 1.0], [5.5, 1.0, 1.0]);
        assert!(!triangles_overlap(&a, &b, EPSILON));
    }

    #[test]
    fn coplanar_contained() {
        // B sits entirely inside A: no edges cross.
        let a = tri([0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [2.0, 4.0, 0.0]);
        let b = tri([1.5, 0.5, 0.0], [2.5, 0.5, 0.0], [2.0, 1.5, 0.0]);
        assert!(triangles_overlap(&a, &b, EPSILON));
        assert!(triangles_overlap(&b, &a, EPSILON));
    }

    #[test]
    fn coplanar_identical() {
        let a = tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, 1.0, 0.0]);
        assert!(triangles_overlap(&a, &a, EPSILON));
    }

    #[test]
    fn shared_edge_counts() {
        let a = tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, 1.0, 0.0]);
        let b = tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, -1.0, 0.0]);
        assert!(triangles_overlap(&a, &b, EPSILON));
    }

    #[test]
    fn degenerate_triangle_does_not_panic() {
        let a = tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]);
        let b = tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, 1.0, 0.0]);
        let _ = triangles_overlap(&a, &b, EPSILON);
        let _ = triangles_overlap(&a, &a, EPSILON);
    }

    #[test]
    fn box_contains_vertex() {
        let bbox = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let t = tri([0.5, 0.5, 0.5], [3.0, 0.0, 0.0], [3.0, 3.0, 0.0]);
        assert!(aabb_triangle_overlap(&bbox, &t));
    }

    #[test]
    fn box_disjoint_triangle() {
        let bbox = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let t = tri([3.0, 3.0, 3.0], [4.0, 3.0, 3.0], [3.5, 4.0, 3.0]);
        assert!(!aabb_triangle_overlap(&bbox, &t));
    }

    #[test]
    fn triangle_slices_box_without_interior_vertex() {
        // A large triangle cutting straight through the box; no vertex inside.
        let bbox = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let t = tri([-5.0, -5.0, 0.5], [5.0, -5.0, 0.5], [0.0, 10.0, 0.5]);
        assert!(aabb_triangle_overlap(&bbox, &t));
    }

    #[test]
    fn triangle_plane_separates() {
        // The triangle's aabb overlaps the box but its plane axis separates:
        // x + y + z = 3.5 stays beyond the (1, 1, 1) corner.
        let bbox = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let t = tri([3.5, 0.0, 0.0], [0.0, 3.5, 0.0], [0.0, 0.0, 3.5]);
        assert!(!aabb_triangle_overlap(&bbox, &t));
    }

    #[test]
    fn touching_face_counts() {
        // Triangle lies in the x = 1 face plane of the box.
        let bbox = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let t = tri([1.0, 0.2, 0.2], [1.0, 0.8, 0.2], [1.0, 0.5, 0.8]);
        assert!(aabb_triangle_overlap(&bbox, &t));
    }

    #[test]
    fn empty_box_overlaps_nothing() {
        let t = tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, 1.0, 0.0]);
        assert!(!aabb_triangle_overlap(&Aabb::empty(), &t));
    }
}
