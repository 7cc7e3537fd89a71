//! Generic traversal over spatial-division trees.
//!
//! Both kernels expose the same arena shape through [`SpatialTree`]:
//! a root id, per-node content bounds, a contiguous child range, and a
//! local triangle-id list. The breadth-first triangle query and the
//! simultaneous dual-tree descent are written once against that trait,
//! which also makes octree-vs-kd-tree pairings work without any cross-
//! variant plumbing.

use std::collections::VecDeque;
use std::ops::Range;

use hashbrown::HashSet;

use marker_types::{Aabb, Triangle};

use crate::intersect::{aabb_triangle_overlap, triangles_overlap};

/// Arena-tree access used by the generic traversals.
pub trait SpatialTree {
    /// Root node id, `None` when the tree indexes nothing.
    fn root(&self) -> Option<u32>;

    /// Content bounds of a node: encloses every triangle stored in the
    /// node's subtree, including the node's own list.
    fn bounds(&self, node: u32) -> &Aabb;

    /// Contiguous child id range, `None` for leaves.
    fn children(&self, node: u32) -> Option<Range<u32>>;

    /// Soup ids stored locally at this node.
    ///
    /// Leaves hold their triangles here; interior nodes may hold
    /// stragglers that no child accepted or that arrived past the depth
    /// cap.
    fn local_triangles(&self, node: u32) -> &[u32];

    /// The indexed triangle soup.
    fn soup(&self) -> &[Triangle];
}

/// Structure statistics of a spatial tree.
#[derive(Debug, Default, Clone)]
pub struct TreeStats {
    /// Total number of nodes.
    pub node_count: usize,
    /// Number of leaves.
    pub leaf_count: usize,
    /// Number of interior nodes.
    pub interior_count: usize,
    /// Deepest node level (root = 0).
    pub max_depth: usize,
    /// Largest local triangle list.
    pub max_leaf_size: usize,
    /// Total stored triangle references (counts duplicates).
    pub stored_triangles: usize,
}

/// Walk the tree and collect [`TreeStats`].
pub fn collect_stats<T: SpatialTree>(tree: &T) -> TreeStats {
    let mut stats = TreeStats::default();
    let Some(root) = tree.root() else {
        return stats;
    };

    let mut stack = vec![(root, 0_usize)];
    while let Some((node, depth)) = stack.pop() {
        stats.node_count += 1;
        stats.max_depth = stats.max_depth.max(depth);
        let held = tree.local_triangles(node).len();
        stats.stored_triangles += held;
        stats.max_leaf_size = stats.max_leaf_size.max(held);

        if let Some(children) = tree.children(node) {
            stats.interior_count += 1;
            for child in children {
                stack.push((child, depth + 1));
            }
        } else {
            stats.leaf_count += 1;
        }
    }
    stats
}

/// Find every stored triangle that intersects `tri`.
///
/// Breadth-first from the root: nodes whose content bounds fail the
/// box-triangle test are pruned with their whole subtree; the local list
/// of every surviving node (leaf or interior) is filtered through the
/// exact triangle-triangle predicate. Duplicated entries report once.
pub fn query_triangle<T: SpatialTree>(tree: &T, tri: &Triangle, epsilon: f64) -> Vec<Triangle> {
    let mut out = Vec::new();
    let Some(root) = tree.root() else {
        return out;
    };

    let soup = tree.soup();
    let mut seen: HashSet<u32> = HashSet::new();
    let mut queue: VecDeque<u32> = VecDeque::new();
    queue.push_back(root);

    while let Some(node) = queue.pop_front() {
        if !aabb_triangle_overlap(tree.bounds(node), tri) {
            continue;
        }
        for &id in tree.local_triangles(node) {
            if triangles_overlap(&soup[id as usize], tri, epsilon) && seen.insert(id) {
                out.push(soup[id as usize]);
            }
        }
        if let Some(children) = tree.children(node) {
            queue.extend(children);
        }
    }
    out
}

/// Collect every node pair whose local triangle lists have to be tested
/// against each other.
///
/// Simultaneous descent of both trees, pruned by content-bounds overlap.
/// A pair is emitted whenever both nodes hold triangles locally. Interior
/// nodes with a non-empty list are additionally walked against the other
/// subtree, so stragglers parked above the leaves take part in the query
/// like everything else.
pub fn collect_candidates<A, B>(a: &A, b: &B) -> Vec<(u32, u32)>
where
    A: SpatialTree,
    B: SpatialTree,
{
    let mut pairs = Vec::new();
    if let (Some(root_a), Some(root_b)) = (a.root(), b.root()) {
        descend(a, b, root_a, root_b, &mut pairs);
    }
    pairs
}

fn descend<A, B>(a: &A, b: &B, na: u32, nb: u32, pairs: &mut Vec<(u32, u32)>)
where
    A: SpatialTree,
    B: SpatialTree,
{
    if !a.bounds(na).intersects(b.bounds(nb)) {
        return;
    }
    if !a.local_triangles(na).is_empty() && !b.local_triangles(nb).is_empty() {
        pairs.push((na, nb));
    }

    match (a.children(na), b.children(nb)) {
        (None, None) => {}
        (None, Some(cb)) => {
            for child in cb {
                descend(a, b, na, child, pairs);
            }
        }
        (Some(ca), None) => {
            for child in ca {
                descend(a, b, child, nb, pairs);
            }
        }
        (Some(ca), Some(cb)) => {
            if !a.local_triangles(na).is_empty() {
                for child in cb.clone() {
                    descend_fixed_a(a, b, na, child, pairs);
                }
            }
            if !b.local_triangles(nb).is_empty() {
                for child in ca.clone() {
                    descend_fixed_b(a, b, child, nb, pairs);
                }
            }
            for ia in ca {
                for ib in cb.clone() {
                    descend(a, b, ia, ib, pairs);
                }
            }
        }
    }
}

/// Walk b's subtree against the list parked at interior node `na`.
fn descend_fixed_a<A, B>(a: &A, b: &B, na: u32, nb: u32, pairs: &mut Vec<(u32, u32)>)
where
    A: SpatialTree,
    B: SpatialTree,
{
    if !a.bounds(na).intersects(b.bounds(nb)) {
        return;
    }
    if !b.local_triangles(nb).is_empty() {
        pairs.push((na, nb));
    }
    if let Some(cb) = b.children(nb) {
        for child in cb {
            descend_fixed_a(a, b, na, child, pairs);
        }
    }
}

/// Walk a's subtree against the list parked at interior node `nb`.
fn descend_fixed_b<A, B>(a: &A, b: &B, na: u32, nb: u32, pairs: &mut Vec<(u32, u32)>)
where
    A: SpatialTree,
    B: SpatialTree,
{
    if !a.bounds(na).intersects(b.bounds(nb)) {
        return;
    }
    if !a.local_triangles(na).is_empty() {
        pairs.push((na, nb));
    }
    if let Some(ca) = a.children(na) {
        for child in ca {
            descend_fixed_b(a, b, child, nb, pairs);
        }
    }
}
