//! The spatial-division kernel: a tagged sum over the tree variants.
//!
//! An open trait-object design would have to fail at runtime when two
//! kernel shapes it cannot pair are handed to the same query. Here the
//! variants are one enum and every pairing runs through the generic
//! traversal, so an incompatible kernel cannot be expressed at all.

use hashbrown::HashSet;
use rayon::prelude::*;
use tracing::debug;

use marker_types::{Aabb, Matrix4, PolygonMesh, Triangle};

use crate::config::{KernelKind, MarkerConfig};
use crate::error::MarkerResult;
use crate::kdtree::KdTree;
use crate::octree::Octree;
use crate::traverse::{self, SpatialTree, TreeStats};

/// A spatial-division kernel over one mesh's world-space triangles.
///
/// Kernels are built per query and dropped with their trees; nothing is
/// shared or cached across queries.
#[derive(Debug)]
pub enum Kernel {
    /// Eight-way subdivision kernel.
    Octree(Octree),
    /// Binary midpoint-subdivision kernel.
    KdTree(KdTree),
}

/// Face-id sets produced by a kernel-vs-kernel query.
///
/// The sets are deduplicated: however many sub-triangles of a polygon
/// hit, and however many nodes a triangle was filed under, each face id
/// appears at most once.
#[derive(Debug, Default, Clone)]
pub struct KernelIntersection {
    /// Face ids of the first kernel's mesh that touch the second mesh.
    pub faces_a: HashSet<u32>,
    /// Face ids of the second kernel's mesh that touch the first mesh.
    pub faces_b: HashSet<u32>,
    /// Node pairs produced by the dual-tree descent.
    pub candidate_pairs: usize,
    /// Triangle pairs run through the exact predicate.
    pub pairs_tested: usize,
    /// Triangle pairs that actually overlapped.
    pub intersecting_pairs: usize,
}

/// Per-worker accumulator for the pair loop.
#[derive(Debug, Default)]
struct Accumulator {
    faces_a: HashSet<u32>,
    faces_b: HashSet<u32>,
    tested: usize,
    hits: usize,
}

impl Accumulator {
    fn merge(mut self, other: Self) -> Self {
        self.faces_a.extend(other.faces_a);
        self.faces_b.extend(other.faces_b);
        self.tested += other.tested;
        self.hits += other.hits;
        self
    }

    fn test_pair<A, B>(&mut self, a: &A, b: &B, na: u32, nb: u32, epsilon: f64)
    where
        A: SpatialTree,
        B: SpatialTree,
    {
        let soup_a = a.soup();
        let soup_b = b.soup();
        for &ia in a.local_triangles(na) {
            let ta = &soup_a[ia as usize];
            for &ib in b.local_triangles(nb) {
                let tb = &soup_b[ib as usize];
                self.tested += 1;
                if crate::intersect::triangles_overlap(ta, tb, epsilon) {
                    self.hits += 1;
                    self.faces_a.insert(ta.face_index);
                    self.faces_b.insert(tb.face_index);
                }
            }
        }
    }
}

fn intersect_trees<A, B>(a: &A, b: &B, epsilon: f64, parallel: bool) -> KernelIntersection
where
    A: SpatialTree + Sync,
    B: SpatialTree + Sync,
{
    let pairs = traverse::collect_candidates(a, b);
    let candidate_pairs = pairs.len();

    let acc = if parallel {
        pairs
            .par_iter()
            .fold(Accumulator::default, |mut acc, &(na, nb)| {
                acc.test_pair(a, b, na, nb, epsilon);
                acc
            })
            .reduce(Accumulator::default, Accumulator::merge)
    } else {
        let mut acc = Accumulator::default();
        for &(na, nb) in &pairs {
            acc.test_pair(a, b, na, nb, epsilon);
        }
        acc
    };

    debug!(
        candidate_pairs,
        pairs_tested = acc.tested,
        intersecting_pairs = acc.hits,
        "kernel-vs-kernel query finished"
    );

    KernelIntersection {
        faces_a: acc.faces_a,
        faces_b: acc.faces_b,
        candidate_pairs,
        pairs_tested: acc.tested,
        intersecting_pairs: acc.hits,
    }
}

impl Kernel {
    /// Build a kernel of the configured kind over a host mesh.
    ///
    /// Vertices are mapped through `transform`; `bounds` is the
    /// world-space box enclosing the transformed mesh.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MarkerError::DegenerateBounds`] for an empty or
    /// inverted `bounds` on a non-empty mesh.
    pub fn build(
        mesh: &PolygonMesh,
        transform: &Matrix4<f64>,
        bounds: &Aabb,
        config: &MarkerConfig,
    ) -> MarkerResult<Self> {
        let soup = mesh.world_triangles(transform);
        match config.kernel {
            KernelKind::Octree => Ok(Self::Octree(Octree::build(soup, *bounds, config)?)),
            KernelKind::KdTree => Ok(Self::KdTree(KdTree::build(soup, *bounds, config)?)),
        }
    }

    /// Which variant this kernel is.
    #[must_use]
    pub const fn kind(&self) -> KernelKind {
        match self {
            Self::Octree(_) => KernelKind::Octree,
            Self::KdTree(_) => KernelKind::KdTree,
        }
    }

    /// Number of triangles in the indexed soup.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        match self {
            Self::Octree(tree) => tree.triangle_count(),
            Self::KdTree(tree) => tree.triangle_count(),
        }
    }

    /// Check if the kernel indexes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Octree(tree) => tree.is_empty(),
            Self::KdTree(tree) => tree.is_empty(),
        }
    }

    /// Structure statistics of the underlying tree.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        match self {
            Self::Octree(tree) => tree.stats(),
            Self::KdTree(tree) => tree.stats(),
        }
    }

    /// Find all stored triangles that intersect `tri`.
    #[must_use]
    pub fn intersect_triangle(&self, tri: &Triangle, epsilon: f64) -> Vec<Triangle> {
        match self {
            Self::Octree(tree) => tree.intersect_triangle(tri, epsilon),
            Self::KdTree(tree) => tree.intersect_triangle(tri, epsilon),
        }
    }

    /// Run the kernel-vs-kernel intersection query.
    ///
    /// Any variant pairing is valid. With `parallel` the triangle-pair
    /// loop fans out over rayon with per-worker accumulators merged at
    /// the end; the resulting sets are identical to the serial ones.
    #[must_use]
    pub fn intersect(&self, other: &Self, epsilon: f64, parallel: bool) -> KernelIntersection {
        match (self, other) {
            (Self::Octree(a), Self::Octree(b)) => intersect_trees(a, b, epsilon, parallel),
            (Self::Octree(a), Self::KdTree(b)) => intersect_trees(a, b, epsilon, parallel),
            (Self::KdTree(a), Self::Octree(b)) => intersect_trees(a, b, epsilon, parallel),
            (Self::KdTree(a), Self::KdTree(b)) => intersect_trees(a, b, epsilon, parallel),
        }
    }
}
