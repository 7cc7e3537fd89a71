//! The intersection driver: from two host meshes to two face-id sets.
//!
//! This is the entry point the host application calls. It validates the
//! inputs, builds one kernel per mesh, runs the kernel-vs-kernel query,
//! and collapses the hits to per-mesh sets of face ids suitable for
//! highlighting. Kernels live only for the duration of one call.

use hashbrown::HashSet;
use tracing::{debug, warn};

use marker_types::{Aabb, Matrix4, PolygonMesh};

use crate::config::MarkerConfig;
use crate::error::{MarkerError, MarkerResult};
use crate::kernel::Kernel;

/// One mesh as the host hands it over: object-space geometry, the world
/// transform, and the world-space box enclosing the transformed mesh.
#[derive(Debug, Clone, Copy)]
pub struct MeshInstance<'a> {
    /// The triangulated mesh.
    pub mesh: &'a PolygonMesh,
    /// Affine world transform applied to the vertices.
    pub transform: Matrix4<f64>,
    /// World-space AABB enclosing the transformed mesh.
    pub bounds: Aabb,
}

impl<'a> MeshInstance<'a> {
    /// Bundle a mesh with its transform and host-supplied bounds.
    #[must_use]
    pub const fn new(mesh: &'a PolygonMesh, transform: Matrix4<f64>, bounds: Aabb) -> Self {
        Self {
            mesh,
            transform,
            bounds,
        }
    }

    /// Bundle a mesh with its transform, computing the enclosing box from
    /// the transformed vertices.
    #[must_use]
    pub fn with_computed_bounds(mesh: &'a PolygonMesh, transform: Matrix4<f64>) -> Self {
        let bounds = mesh.world_bounds(&transform);
        Self {
            mesh,
            transform,
            bounds,
        }
    }
}

/// Counters from one marking run.
#[derive(Debug, Default, Clone)]
pub struct MarkerStats {
    /// Node pairs produced by the dual-tree descent.
    pub candidate_pairs: usize,
    /// Triangle pairs run through the exact predicate.
    pub pairs_tested: usize,
    /// Triangle pairs that overlapped.
    pub intersecting_pairs: usize,
    /// Face ids dropped during result assembly for being out of range.
    pub dropped_face_ids: usize,
    /// Whether any intersection was found.
    pub intersected: bool,
}

/// The driver's result: one face-id set per mesh, plus counters.
#[derive(Debug, Default, Clone)]
pub struct Marking {
    /// Face ids of mesh A that touch mesh B.
    pub faces_a: HashSet<u32>,
    /// Face ids of mesh B that touch mesh A.
    pub faces_b: HashSet<u32>,
    /// Query counters.
    pub stats: MarkerStats,
}

fn validate(instance: &MeshInstance<'_>, label: &str) -> MarkerResult<()> {
    if let Some((polygon, index)) = instance.mesh.first_invalid_index() {
        return Err(MarkerError::InvalidMesh {
            details: format!(
                "{label}: polygon {polygon} references vertex {index}, mesh has {} vertices",
                instance.mesh.vertices.len()
            ),
        });
    }
    if !instance.mesh.is_empty() && instance.bounds.is_empty() {
        return Err(MarkerError::DegenerateBounds {
            details: format!("{label}: enclosing box is empty or inverted"),
        });
    }
    Ok(())
}

fn retain_in_range(faces: &mut HashSet<u32>, polygon_count: usize, label: &str) -> usize {
    let limit = polygon_count as u32;
    let before = faces.len();
    faces.retain(|&face| face < limit);
    let removed = before - faces.len();
    if removed > 0 {
        warn!(
            mesh = label,
            removed, "dropped out-of-range face ids during result assembly"
        );
    }
    removed
}

/// Mark the faces of two meshes that participate in a surface-surface
/// intersection.
///
/// Builds a spatial-division kernel per mesh (the variant and limits come
/// from `config`), runs the pairwise kernel query, and returns the two
/// face-id sets. Empty meshes and disjoint bounds short-circuit to empty
/// sets.
///
/// # Errors
///
/// - [`MarkerError::InvalidMesh`] when a mesh references vertices outside
///   its vertex array.
/// - [`MarkerError::DegenerateBounds`] when a non-empty mesh arrives with
///   an empty or inverted enclosing box.
///
/// # Example
///
/// ```
/// use marker_kernel::{mark_intersections, MarkerConfig, MeshInstance};
/// use marker_types::{unit_cube, Matrix4};
/// use nalgebra::Translation3;
///
/// let cube = unit_cube();
/// let a = MeshInstance::with_computed_bounds(&cube, Matrix4::identity());
/// let b = MeshInstance::with_computed_bounds(
///     &cube,
///     Translation3::new(0.5, 0.0, 0.0).to_homogeneous(),
/// );
///
/// let marking = mark_intersections(&a, &b, &MarkerConfig::default())?;
/// assert!(marking.faces_a.contains(&1)); // +X face of A
/// assert!(marking.faces_b.contains(&0)); // -X face of B
/// # Ok::<(), marker_kernel::MarkerError>(())
/// ```
pub fn mark_intersections(
    a: &MeshInstance<'_>,
    b: &MeshInstance<'_>,
    config: &MarkerConfig,
) -> MarkerResult<Marking> {
    validate(a, "mesh A")?;
    validate(b, "mesh B")?;

    if a.mesh.is_empty() || b.mesh.is_empty() {
        debug!("one of the meshes has no triangles, nothing to mark");
        return Ok(Marking::default());
    }
    if !a.bounds.intersects(&b.bounds) {
        debug!("world bounds are disjoint, nothing to mark");
        return Ok(Marking::default());
    }

    let epsilon = config.tolerance_scale * a.bounds.union(&b.bounds).diagonal();

    let (kernel_a, kernel_b) = if config.parallel {
        rayon::join(
            || Kernel::build(a.mesh, &a.transform, &a.bounds, config),
            || Kernel::build(b.mesh, &b.transform, &b.bounds, config),
        )
    } else {
        (
            Kernel::build(a.mesh, &a.transform, &a.bounds, config),
            Kernel::build(b.mesh, &b.transform, &b.bounds, config),
        )
    };
    let (kernel_a, kernel_b) = (kernel_a?, kernel_b?);

    let hit = kernel_a.intersect(&kernel_b, epsilon, config.parallel);

    let mut faces_a = hit.faces_a;
    let mut faces_b = hit.faces_b;
    let mut dropped = retain_in_range(&mut faces_a, a.mesh.polygon_count(), "mesh A");
    dropped += retain_in_range(&mut faces_b, b.mesh.polygon_count(), "mesh B");

    let stats = MarkerStats {
        candidate_pairs: hit.candidate_pairs,
        pairs_tested: hit.pairs_tested,
        intersecting_pairs: hit.intersecting_pairs,
        dropped_face_ids: dropped,
        intersected: !faces_a.is_empty() || !faces_b.is_empty(),
    };
    debug!(
        kernel = %config.kernel,
        faces_a = faces_a.len(),
        faces_b = faces_b.len(),
        pairs_tested = stats.pairs_tested,
        "marked intersecting faces"
    );

    Ok(Marking {
        faces_a,
        faces_b,
        stats,
    })
}
