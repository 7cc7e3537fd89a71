//! Property-based tests for the intersection marker.
//!
//! Random triangle soups are marked through the kernels and compared
//! against the O(n·m) brute-force enumeration, under swapped operands
//! and shared rigid motions.
//!
//! Run with: cargo test -p marker-kernel --test proptest_marker

use hashbrown::HashSet;
use proptest::prelude::*;

use marker_kernel::intersect::triangles_overlap;
use marker_kernel::{mark_intersections, KernelKind, MarkerConfig, MeshInstance};
use marker_types::{Matrix4, Point3, Polygon, PolygonMesh, Vector3};
use nalgebra::{Rotation3, Translation3};

// =============================================================================
// Strategies
// =============================================================================

fn arb_point(range: f64) -> impl Strategy<Value = Point3<f64>> {
    prop::array::uniform3(-range..range).prop_map(|[x, y, z]| Point3::new(x, y, z))
}

/// A triangle soup where every triangle is its own single-triangle polygon.
fn arb_soup_mesh(max_triangles: usize) -> impl Strategy<Value = PolygonMesh> {
    prop::collection::vec(
        (arb_point(2.0), arb_point(2.0), arb_point(2.0)),
        0..=max_triangles,
    )
    .prop_map(|triangles| {
        let mut mesh = PolygonMesh::new();
        for (v0, v1, v2) in triangles {
            let base = mesh.vertices.len() as u32;
            let normal = (v1 - v0).cross(&(v2 - v0));
            mesh.vertices.extend([v0, v1, v2]);
            mesh.polygons
                .push(Polygon::new(normal, vec![[base, base + 1, base + 2]]));
        }
        mesh
    })
}

/// A rigid motion: rotation composed with translation.
fn arb_rigid_motion() -> impl Strategy<Value = Matrix4<f64>> {
    (
        prop::array::uniform3(-3.0..3.0_f64),
        prop::array::uniform3(-1.0..1.0_f64),
    )
        .prop_map(|([tx, ty, tz], [ax, ay, az])| {
            let rotation = Rotation3::new(Vector3::new(ax, ay, az));
            Translation3::new(tx, ty, tz).to_homogeneous() * rotation.to_homogeneous()
        })
}

// =============================================================================
// Reference enumeration
// =============================================================================

fn sorted(set: &HashSet<u32>) -> Vec<u32> {
    let mut v: Vec<u32> = set.iter().copied().collect();
    v.sort_unstable();
    v
}

/// The O(n·m) sweep the kernels must reproduce exactly.
fn brute_force(
    a: &MeshInstance<'_>,
    b: &MeshInstance<'_>,
    config: &MarkerConfig,
) -> (Vec<u32>, Vec<u32>) {
    let epsilon = config.tolerance_scale * a.bounds.union(&b.bounds).diagonal();
    let soup_a = a.mesh.world_triangles(&a.transform);
    let soup_b = b.mesh.world_triangles(&b.transform);

    let mut faces_a = HashSet::new();
    let mut faces_b = HashSet::new();
    for ta in &soup_a {
        for tb in &soup_b {
            if triangles_overlap(ta, tb, epsilon) {
                faces_a.insert(ta.face_index);
                faces_b.insert(tb.face_index);
            }
        }
    }
    (sorted(&faces_a), sorted(&faces_b))
}

/// Small leaf capacity forces real subdivision even on small soups.
fn config(kind: KernelKind) -> MarkerConfig {
    MarkerConfig::default()
        .with_kernel(kind)
        .with_max_triangles_per_node(2)
        .with_parallel(false)
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// The octree result equals the brute-force enumeration.
    #[test]
    fn octree_matches_brute_force(
        mesh_a in arb_soup_mesh(24),
        mesh_b in arb_soup_mesh(24),
    ) {
        let a = MeshInstance::with_computed_bounds(&mesh_a, Matrix4::identity());
        let b = MeshInstance::with_computed_bounds(&mesh_b, Matrix4::identity());
        let config = config(KernelKind::Octree);

        let marking = mark_intersections(&a, &b, &config).unwrap();
        let (expected_a, expected_b) = brute_force(&a, &b, &config);

        prop_assert_eq!(sorted(&marking.faces_a), expected_a);
        prop_assert_eq!(sorted(&marking.faces_b), expected_b);
    }

    /// The kd-tree result equals the brute-force enumeration.
    #[test]
    fn kdtree_matches_brute_force(
        mesh_a in arb_soup_mesh(24),
        mesh_b in arb_soup_mesh(24),
    ) {
        let a = MeshInstance::with_computed_bounds(&mesh_a, Matrix4::identity());
        let b = MeshInstance::with_computed_bounds(&mesh_b, Matrix4::identity());
        let config = config(KernelKind::KdTree);

        let marking = mark_intersections(&a, &b, &config).unwrap();
        let (expected_a, expected_b) = brute_force(&a, &b, &config);

        prop_assert_eq!(sorted(&marking.faces_a), expected_a);
        prop_assert_eq!(sorted(&marking.faces_b), expected_b);
    }

    /// Swapping the operands swaps the sets and changes nothing else.
    #[test]
    fn swapping_operands_swaps_sets(
        mesh_a in arb_soup_mesh(16),
        mesh_b in arb_soup_mesh(16),
    ) {
        let a = MeshInstance::with_computed_bounds(&mesh_a, Matrix4::identity());
        let b = MeshInstance::with_computed_bounds(&mesh_b, Matrix4::identity());
        let config = config(KernelKind::Octree);

        let ab = mark_intersections(&a, &b, &config).unwrap();
        let ba = mark_intersections(&b, &a, &config).unwrap();

        prop_assert_eq!(sorted(&ab.faces_a), sorted(&ba.faces_b));
        prop_assert_eq!(sorted(&ab.faces_b), sorted(&ba.faces_a));
    }

    /// Two runs over the same input produce the same marking.
    #[test]
    fn marking_is_deterministic(
        mesh_a in arb_soup_mesh(16),
        mesh_b in arb_soup_mesh(16),
    ) {
        let a = MeshInstance::with_computed_bounds(&mesh_a, Matrix4::identity());
        let b = MeshInstance::with_computed_bounds(&mesh_b, Matrix4::identity());
        let config = config(KernelKind::Octree);

        let first = mark_intersections(&a, &b, &config).unwrap();
        let second = mark_intersections(&a, &b, &config).unwrap();

        prop_assert_eq!(sorted(&first.faces_a), sorted(&second.faces_a));
        prop_assert_eq!(sorted(&first.faces_b), sorted(&second.faces_b));
    }

    /// Moving both meshes through the same rigid motion preserves the sets.
    #[test]
    fn shared_rigid_motion_preserves_sets(
        mesh_a in arb_soup_mesh(12),
        mesh_b in arb_soup_mesh(12),
        motion in arb_rigid_motion(),
    ) {
        let config = config(KernelKind::Octree);

        let a = MeshInstance::with_computed_bounds(&mesh_a, Matrix4::identity());
        let b = MeshInstance::with_computed_bounds(&mesh_b, Matrix4::identity());
        let baseline = mark_intersections(&a, &b, &config).unwrap();

        let a2 = MeshInstance::with_computed_bounds(&mesh_a, motion);
        let b2 = MeshInstance::with_computed_bounds(&mesh_b, motion);
        let moved = mark_intersections(&a2, &b2, &config).unwrap();

        prop_assert_eq!(sorted(&moved.faces_a), sorted(&baseline.faces_a));
        prop_assert_eq!(sorted(&moved.faces_b), sorted(&baseline.faces_b));
    }
}
