//! Host-facing mesh input types.
//!
//! The host application supplies each mesh as a shared vertex position
//! array plus per-polygon data: the polygon normal and the polygon's fan
//! triangulation as vertex-index triples. Face ids are polygon indices.

use nalgebra::{Matrix4, Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bounds::Aabb;
use crate::triangle::Triangle;

/// One polygon of a host mesh.
///
/// A polygon with `n` vertices arrives fan-triangulated into `n - 2`
/// triangles; each triangle is three indices into the mesh's shared
/// vertex array. The normal is the polygon normal in object space.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Polygon {
    /// Polygon normal in object space, as supplied by the host.
    pub normal: Vector3<f64>,
    /// Fan triangulation: vertex-index triples into the shared array.
    pub triangles: Vec<[u32; 3]>,
}

impl Polygon {
    /// Create a polygon from its normal and triangle list.
    #[inline]
    #[must_use]
    pub const fn new(normal: Vector3<f64>, triangles: Vec<[u32; 3]>) -> Self {
        Self { normal, triangles }
    }
}

/// A triangulated mesh in the form the host hands over.
///
/// Object-space vertex positions plus a polygon table. The polygon index
/// is the *face id* reported back by intersection queries.
///
/// # Example
///
/// ```
/// use marker_types::{Matrix4, Point3, Polygon, PolygonMesh, Vector3};
///
/// let mut mesh = PolygonMesh::new();
/// mesh.vertices.push(Point3::new(0.0, 0.0, 0.0));
/// mesh.vertices.push(Point3::new(1.0, 0.0, 0.0));
/// mesh.vertices.push(Point3::new(0.0, 1.0, 0.0));
/// mesh.polygons
///     .push(Polygon::new(Vector3::new(0.0, 0.0, 1.0), vec![[0, 1, 2]]));
///
/// assert_eq!(mesh.polygon_count(), 1);
/// assert_eq!(mesh.triangle_count(), 1);
///
/// let world = mesh.world_triangles(&Matrix4::identity());
/// assert_eq!(world.len(), 1);
/// assert_eq!(world[0].face_index, 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PolygonMesh {
    /// Vertex positions in object space.
    pub vertices: Vec<Point3<f64>>,
    /// Polygons; the index in this table is the face id.
    pub polygons: Vec<Polygon>,
}

impl PolygonMesh {
    /// Create an empty mesh.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            polygons: Vec::new(),
        }
    }

    /// Number of polygons (the exclusive upper bound for face ids).
    #[inline]
    #[must_use]
    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    /// Total number of triangles across all polygon fans.
    #[inline]
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.polygons.iter().map(|p| p.triangles.len()).sum()
    }

    /// Check if the mesh has no triangles.
    ///
    /// An empty mesh is valid input: kernels build with an empty root and
    /// every query answers with empty sets.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangle_count() == 0
    }

    /// Find the first out-of-range vertex index, if any.
    ///
    /// Returns `(polygon_index, offending_vertex_index)`. The extraction
    /// methods below assume a mesh that passes this check.
    #[must_use]
    pub fn first_invalid_index(&self) -> Option<(usize, u32)> {
        let limit = self.vertices.len() as u32;
        for (p, polygon) in self.polygons.iter().enumerate() {
            for triple in &polygon.triangles {
                for &index in triple {
                    if index >= limit {
                        return Some((p, index));
                    }
                }
            }
        }
        None
    }

    /// Extract the world-space triangle soup.
    ///
    /// Applies `transform` to every vertex and stamps each triangle with
    /// its `(face_index, triangle_index)` identity. Polygon normals are
    /// carried through untransformed.
    ///
    /// Vertex indices must be in range (see
    /// [`PolygonMesh::first_invalid_index`]).
    #[must_use]
    pub fn world_triangles(&self, transform: &Matrix4<f64>) -> Vec<Triangle> {
        let mut soup = Vec::with_capacity(self.triangle_count());
        for (face, polygon) in self.polygons.iter().enumerate() {
            for (index, triple) in polygon.triangles.iter().enumerate() {
                soup.push(Triangle::new(
                    face as u32,
                    index as u32,
                    transform.transform_point(&self.vertices[triple[0] as usize]),
                    transform.transform_point(&self.vertices[triple[1] as usize]),
                    transform.transform_point(&self.vertices[triple[2] as usize]),
                    polygon.normal,
                ));
            }
        }
        soup
    }

    /// Compute the world-space AABB of the transformed vertex array.
    ///
    /// Convenience mirroring the enclosing box the host normally supplies
    /// alongside the mesh.
    #[must_use]
    pub fn world_bounds(&self, transform: &Matrix4<f64>) -> Aabb {
        let mut aabb = Aabb::empty();
        for vertex in &self.vertices {
            aabb.expand_to_include(&transform.transform_point(vertex));
        }
        aabb
    }
}

/// Build a unit cube centred at the origin (side length 1).
///
/// Six quad polygons, each fan-split into two triangles. Face ids follow
/// a fixed axis order: 0 = −X, 1 = +X, 2 = −Y, 3 = +Y, 4 = −Z, 5 = +Z.
///
/// # Example
///
/// ```
/// use marker_types::unit_cube;
///
/// let cube = unit_cube();
/// assert_eq!(cube.polygon_count(), 6);
/// assert_eq!(cube.triangle_count(), 12);
/// ```
#[must_use]
pub fn unit_cube() -> PolygonMesh {
    let h = 0.5;
    let mut mesh = PolygonMesh::new();

    // Corner k: upper half of axis i iff bit i of k is set.
    for k in 0..8u32 {
        mesh.vertices.push(Point3::new(
            if k & 1 == 0 { -h } else { h },
            if k & 2 == 0 { -h } else { h },
            if k & 4 == 0 { -h } else { h },
        ));
    }

    let quad = |normal: [f64; 3], corners: [u32; 4]| {
        let [a, b, c, d] = corners;
        Polygon::new(
            Vector3::new(normal[0], normal[1], normal[2]),
            vec![[a, b, c], [a, c, d]],
        )
    };

    mesh.polygons.push(quad([-1.0, 0.0, 0.0], [0, 4, 6, 2])); // 0: -X
    mesh.polygons.push(quad([1.0, 0.0, 0.0], [1, 3, 7, 5])); // 1: +X
    mesh.polygons.push(quad([0.0, -1.0, 0.0], [0, 1, 5, 4])); // 2: -Y
    mesh.polygons.push(quad([0.0, 1.0, 0.0], [2, 6, 7, 3])); // 3: +Y
    mesh.polygons.push(quad([0.0, 0.0, -1.0], [0, 2, 3, 1])); // 4: -Z
    mesh.polygons.push(quad([0.0, 0.0, 1.0], [4, 5, 7, 6])); // 5: +Z

    mesh
}

/// Build a unit right tetrahedron with its corner at the origin.
///
/// Four single-triangle polygons; face 3 is the slanted face.
#[must_use]
pub fn unit_tetrahedron() -> PolygonMesh {
    let mut mesh = PolygonMesh::new();

    mesh.vertices.push(Point3::new(0.0, 0.0, 0.0)); // 0
    mesh.vertices.push(Point3::new(1.0, 0.0, 0.0)); // 1
    mesh.vertices.push(Point3::new(0.0, 1.0, 0.0)); // 2
    mesh.vertices.push(Point3::new(0.0, 0.0, 1.0)); // 3

    let s = 1.0 / 3.0f64.sqrt();
    mesh.polygons
        .push(Polygon::new(Vector3::new(0.0, 0.0, -1.0), vec![[0, 2, 1]]));
    mesh.polygons
        .push(Polygon::new(Vector3::new(0.0, -1.0, 0.0), vec![[0, 1, 3]]));
    mesh.polygons
        .push(Polygon::new(Vector3::new(-1.0, 0.0, 0.0), vec![[0, 3, 2]]));
    mesh.polygons
        .push(Polygon::new(Vector3::new(s, s, s), vec![[1, 2, 3]]));

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Translation3;

    #[test]
    fn empty_mesh() {
        let mesh = PolygonMesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.polygon_count(), 0);

        // Vertices without polygons are still "empty".
        let mut mesh = PolygonMesh::new();
        mesh.vertices.push(Point3::new(0.0, 0.0, 0.0));
        assert!(mesh.is_empty());
    }

    #[test]
    fn cube_counts_and_identity() {
        let cube = unit_cube();
        assert_eq!(cube.polygon_count(), 6);
        assert_eq!(cube.triangle_count(), 12);
        assert!(cube.first_invalid_index().is_none());

        let soup = cube.world_triangles(&Matrix4::identity());
        assert_eq!(soup.len(), 12);

        // Two triangles per face, indices 0 and 1 within each fan.
        for face in 0..6u32 {
            let fan: Vec<_> = soup.iter().filter(|t| t.face_index == face).collect();
            assert_eq!(fan.len(), 2);
            assert_eq!(fan[0].triangle_index, 0);
            assert_eq!(fan[1].triangle_index, 1);
        }
    }

    #[test]
    fn cube_face_axis_order() {
        let cube = unit_cube();
        let soup = cube.world_triangles(&Matrix4::identity());

        // Face 1 is +X: both its triangles lie in the x = 0.5 plane.
        for tri in soup.iter().filter(|t| t.face_index == 1) {
            for v in tri.vertices() {
                assert!((v.x - 0.5).abs() < 1e-12);
            }
        }
        // Face 0 is -X.
        for tri in soup.iter().filter(|t| t.face_index == 0) {
            for v in tri.vertices() {
                assert!((v.x + 0.5).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn world_triangles_apply_transform() {
        let cube = unit_cube();
        let shift: Matrix4<f64> = Translation3::new(3.0, 0.0, 0.0).to_homogeneous();

        let bounds = cube.world_bounds(&shift);
        assert!((bounds.min.x - 2.5).abs() < 1e-12);
        assert!((bounds.max.x - 3.5).abs() < 1e-12);

        // Normals are carried through untouched.
        let soup = cube.world_triangles(&shift);
        let minus_x = soup.iter().find(|t| t.face_index == 0).map(|t| t.normal);
        assert_eq!(minus_x, Some(Vector3::new(-1.0, 0.0, 0.0)));
    }

    #[test]
    fn invalid_index_is_reported() {
        let mut mesh = unit_cube();
        mesh.polygons[2].triangles[0][1] = 99;
        assert_eq!(mesh.first_invalid_index(), Some((2, 99)));
    }

    #[test]
    fn tetrahedron_counts() {
        let tet = unit_tetrahedron();
        assert_eq!(tet.polygon_count(), 4);
        assert_eq!(tet.triangle_count(), 4);
        assert!(tet.first_invalid_index().is_none());
    }
}
