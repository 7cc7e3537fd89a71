//! Kd-tree spatial-division kernel.
//!
//! Binary counterpart of the octree: leaves split at the midpoint of the
//! longest axis of their region, and triangles descend by the side their
//! bounding-box center falls on. Each triangle lives in exactly one node,
//! so there is no duplication to undo at query time.
//!
//! Same arena layout as the octree (contiguous child pairs, one triangle
//! soup, `SmallVec` id lists per node).

use smallvec::SmallVec;
use tracing::debug;

use marker_types::{Aabb, Triangle};

use crate::config::MarkerConfig;
use crate::error::{MarkerError, MarkerResult};
use crate::traverse::{self, SpatialTree, TreeStats};

const NO_CHILD: u32 = u32::MAX;

#[derive(Debug)]
struct Node {
    region: Aabb,
    /// Content bounds (refitted after build); drives traversal pruning.
    bounds: Aabb,
    /// Left child id; the right child is `first_child + 1`. `NO_CHILD` for leaves.
    first_child: u32,
    split_axis: usize,
    split_value: f64,
    held: SmallVec<[u32; 10]>,
}

impl Node {
    fn leaf(region: Aabb) -> Self {
        Self {
            region,
            bounds: Aabb::empty(),
            first_child: NO_CHILD,
            split_axis: 0,
            split_value: 0.0,
            held: SmallVec::new(),
        }
    }

    const fn is_leaf(&self) -> bool {
        self.first_child == NO_CHILD
    }
}

/// Kd-tree index over one mesh's world-space triangle soup.
#[derive(Debug)]
pub struct KdTree {
    nodes: Vec<Node>,
    soup: Vec<Triangle>,
    max_triangles_per_node: usize,
    max_depth: u32,
}

impl KdTree {
    /// Build a kd-tree over a triangle soup.
    ///
    /// An empty soup builds an empty kernel. Triangles whose bounding box
    /// falls outside the supplied region are not indexed; a box that
    /// encloses the mesh (the host contract) never triggers this.
    ///
    /// # Errors
    ///
    /// Returns [`MarkerError::DegenerateBounds`] when `bounds` is empty or
    /// inverted while the soup is not empty.
    pub fn build(soup: Vec<Triangle>, bounds: Aabb, config: &MarkerConfig) -> MarkerResult<Self> {
        let mut tree = Self {
            nodes: Vec::new(),
            soup,
            max_triangles_per_node: config.max_triangles_per_node.max(1),
            max_depth: config.max_depth,
        };

        if tree.soup.is_empty() {
            return Ok(tree);
        }
        if bounds.is_empty() {
            return Err(MarkerError::DegenerateBounds {
                details: "kd-tree build requires a non-empty enclosing box".to_string(),
            });
        }

        tree.nodes.push(Node::leaf(bounds));
        for id in 0..tree.soup.len() as u32 {
            tree.insert(0, id, 0);
        }
        tree.refit();

        debug!(
            triangles = tree.soup.len(),
            nodes = tree.nodes.len(),
            "built kd-tree kernel"
        );
        Ok(tree)
    }

    /// Number of triangles in the indexed soup.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.soup.len()
    }

    /// Check if the kernel indexes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Structure statistics for diagnostics and tests.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        traverse::collect_stats(self)
    }

    /// Find all stored triangles that intersect `tri`.
    #[must_use]
    pub fn intersect_triangle(&self, tri: &Triangle, epsilon: f64) -> Vec<Triangle> {
        traverse::query_triangle(self, tri, epsilon)
    }

    fn insert(&mut self, node: usize, id: u32, depth: u32) {
        let tri_box = self.soup[id as usize].aabb();
        if !self.nodes[node].region.intersects(&tri_box) {
            return;
        }

        if self.nodes[node].is_leaf() {
            self.nodes[node].held.push(id);
            if self.nodes[node].held.len() > self.max_triangles_per_node && depth < self.max_depth
            {
                self.split(node);
            }
            return;
        }

        let side = usize::from(
            tri_box.center()[self.nodes[node].split_axis] >= self.nodes[node].split_value,
        );
        let child = self.nodes[node].first_child as usize + side;
        self.insert(child, id, depth + 1);
    }

    fn split(&mut self, node: usize) {
        let region = self.nodes[node].region;
        let extent = region.size();

        let axis = if extent.x > extent.y && extent.x > extent.z {
            0
        } else if extent.y > extent.z {
            1
        } else {
            2
        };
        let value = (region.min[axis] + region.max[axis]) * 0.5;

        let mut left = region;
        left.max[axis] = value;
        let mut right = region;
        right.min[axis] = value;

        let first = self.nodes.len();
        self.nodes[node].first_child = first as u32;
        self.nodes[node].split_axis = axis;
        self.nodes[node].split_value = value;
        self.nodes.push(Node::leaf(left));
        self.nodes.push(Node::leaf(right));

        let held = std::mem::take(&mut self.nodes[node].held);
        for id in held {
            let side = usize::from(self.soup[id as usize].aabb().center()[axis] >= value);
            self.nodes[first + side].held.push(id);
        }
    }

    /// Post-order content-bounds pass; children follow parents in the arena.
    fn refit(&mut self) {
        for i in (0..self.nodes.len()).rev() {
            let mut bounds = Aabb::empty();
            for &id in &self.nodes[i].held {
                bounds = bounds.union(&self.soup[id as usize].aabb());
            }
            if !self.nodes[i].is_leaf() {
                let first = self.nodes[i].first_child as usize;
                bounds = bounds.union(&self.nodes[first].bounds);
                bounds = bounds.union(&self.nodes[first + 1].bounds);
            }
            self.nodes[i].bounds = bounds;
        }
    }
}

impl SpatialTree for KdTree {
    fn root(&self) -> Option<u32> {
        if self.nodes.is_empty() {
            None
        } else {
            Some(0)
        }
    }

    fn bounds(&self, node: u32) -> &Aabb {
        &self.nodes[node as usize].bounds
    }

    fn children(&self, node: u32) -> Option<std::ops::Range<u32>> {
        let n = &self.nodes[node as usize];
        if n.is_leaf() {
            None
        } else {
            Some(n.first_child..n.first_child + 2)
        }
    }

    fn local_triangles(&self, node: u32) -> &[u32] {
        &self.nodes[node as usize].held
    }

    fn soup(&self) -> &[Triangle] {
        &self.soup
    }
}
