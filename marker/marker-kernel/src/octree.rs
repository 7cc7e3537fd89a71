//! Octree spatial-division kernel.
//!
//! The tree is a flat arena: nodes live in one `Vec`, children are
//! allocated as a contiguous block of eight and addressed through a
//! `first_child` id, and triangle records sit once in a soup with nodes
//! holding index lists. Dropping the kernel is dropping the two vectors.
//!
//! Insertion is vertex-driven: leaves split at capacity, an inserted
//! triangle descends into *every* octant that contains one of its
//! vertices (duplication is intentional and undone by set semantics at
//! query time), and a triangle no octant accepts stays behind on the
//! interior node.

use smallvec::SmallVec;
use tracing::debug;

use marker_types::{Aabb, Triangle};

use crate::config::MarkerConfig;
use crate::error::{MarkerError, MarkerResult};
use crate::traverse::{self, SpatialTree, TreeStats};

const NO_CHILD: u32 = u32::MAX;

#[derive(Debug)]
struct Node {
    /// Octant region; drives insertion and splitting.
    region: Aabb,
    /// Content bounds (refitted after build); drives traversal pruning.
    bounds: Aabb,
    /// First of eight contiguous children, `NO_CHILD` for a leaf.
    first_child: u32,
    /// Soup ids held at this node.
    held: SmallVec<[u32; 10]>,
}

impl Node {
    fn leaf(region: Aabb) -> Self {
        Self {
            region,
            bounds: Aabb::empty(),
            first_child: NO_CHILD,
            held: SmallVec::new(),
        }
    }

    const fn is_leaf(&self) -> bool {
        self.first_child == NO_CHILD
    }
}

/// Octree index over one mesh's world-space triangle soup.
#[derive(Debug)]
pub struct Octree {
    nodes: Vec<Node>,
    soup: Vec<Triangle>,
    max_triangles_per_node: usize,
    max_depth: u32,
}

impl Octree {
    /// Build an octree over a triangle soup.
    ///
    /// An empty soup builds an empty kernel. A non-empty soup requires a
    /// non-degenerate enclosing box.
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
                details: "octree build requires a non-empty enclosing box".to_string(),
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
            "built octree kernel"
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
        if depth > self.max_depth {
            // Overflow escape hatch: terminate regardless of capacity.
            self.nodes[node].held.push(id);
            return;
        }

        if self.nodes[node].is_leaf() {
            if self.nodes[node].held.len() < self.max_triangles_per_node {
                self.nodes[node].held.push(id);
            } else {
                self.split(node);
                self.insert(node, id, depth + 1);
            }
            return;
        }

        let first = self.nodes[node].first_child as usize;
        let tri = self.soup[id as usize];
        let mut accepted = false;
        for k in 0..8 {
            if self.nodes[first + k].region.contains_any_vertex(&tri) {
                self.insert(first + k, id, depth + 1);
                accepted = true;
            }
        }
        if !accepted {
            // The triangle straddles the octants without placing a vertex
            // in any of them; it stays on the interior node.
            self.nodes[node].held.push(id);
        }
    }

    fn split(&mut self, node: usize) {
        let octants = self.nodes[node].region.octants();
        let first = self.nodes.len();
        self.nodes[node].first_child = first as u32;
        for region in octants {
            self.nodes.push(Node::leaf(region));
        }

        let held = std::mem::take(&mut self.nodes[node].held);
        for id in held {
            let tri = self.soup[id as usize];

            // First octant that contains the whole triangle wins; otherwise
            // the octant whose center is nearest the barycenter (ties fall
            // to the lowest index).
            let mut target = None;
            for k in 0..8 {
                if self.nodes[first + k].region.contains_all_vertices(&tri) {
                    target = Some(first + k);
                    break;
                }
            }
            let target = if let Some(t) = target {
                t
            } else {
                let bary = tri.barycenter();
                let mut best = first;
                let mut best_dist = (self.nodes[first].region.center() - bary).norm_squared();
                for k in 1..8 {
                    let dist = (self.nodes[first + k].region.center() - bary).norm_squared();
                    if dist < best_dist {
                        best = first + k;
                        best_dist = dist;
                    }
                }
                best
            };
            self.nodes[target].held.push(id);
        }
    }

    /// Post-order content-bounds pass. Children always follow their parent
    /// in the arena, so a reverse scan visits them first.
    fn refit(&mut self) {
        for i in (0..self.nodes.len()).rev() {
            let mut bounds = Aabb::empty();
            for &id in &self.nodes[i].held {
                bounds = bounds.union(&self.soup[id as usize].aabb());
            }
            if !self.nodes[i].is_leaf() {
                let first = self.nodes[i].first_child as usize;
                for k in 0..8 {
                    bounds = bounds.union(&self.nodes[first + k].bounds);
                }
            }
            self.nodes[i].bounds = bounds;
        }
    }
}

impl SpatialTree for Octree {
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
            Some(n.first_child..n.first_child + 8)
        }
    }

    fn local_triangles(&self, node: u32) -> &[u32] {
        &self.nodes[node as usize].held
    }

    fn soup(&self) -> &[Triangle] {
        &self.soup
    }
}
