//! Configuration for kernel construction and intersection queries.
//!
//! [`MarkerConfig`] controls the spatial-division kernel variant, its
//! subdivision limits, the intersection tolerance, and parallelism.
//!
//! # Example
//!
//! ```
//! use marker_kernel::{KernelKind, MarkerConfig};
//!
//! let config = MarkerConfig::default()
//!     .with_kernel(KernelKind::KdTree)
//!     .with_parallel(false);
//!
//! assert_eq!(config.kernel, KernelKind::KdTree);
//! assert!(!config.parallel);
//! ```

/// Which spatial-division kernel to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KernelKind {
    /// Octree: eight-way subdivision around the box center.
    #[default]
    Octree,

    /// Kd-tree: binary subdivision at the longest-axis midpoint.
    KdTree,
}

impl std::fmt::Display for KernelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Octree => write!(f, "octree"),
            Self::KdTree => write!(f, "kd-tree"),
        }
    }
}

/// Configuration for kernel construction and intersection queries.
#[derive(Debug, Clone)]
pub struct MarkerConfig {
    /// Spatial-division kernel variant to build.
    pub kernel: KernelKind,

    /// Leaf capacity before a node splits.
    pub max_triangles_per_node: usize,

    /// Absolute recursion cap for subdivision.
    pub max_depth: u32,

    /// Intersection tolerance as a fraction of the scene bounds diagonal.
    ///
    /// The absolute epsilon handed to the triangle predicates is
    /// `tolerance_scale * diagonal(bounds_a ∪ bounds_b)`.
    pub tolerance_scale: f64,

    /// Whether to fan the triangle-pair tests out over rayon.
    ///
    /// The output sets are identical to the serial result; only wall-clock
    /// time changes.
    pub parallel: bool,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            kernel: KernelKind::default(),
            max_triangles_per_node: 10,
            max_depth: 32,
            tolerance_scale: 1e-9,
            parallel: true,
        }
    }
}

impl MarkerConfig {
    /// Set the kernel variant.
    #[must_use]
    pub fn with_kernel(mut self, kernel: KernelKind) -> Self {
        self.kernel = kernel;
        self
    }

    /// Set the leaf capacity before a node splits (minimum 1).
    #[must_use]
    pub fn with_max_triangles_per_node(mut self, capacity: usize) -> Self {
        self.max_triangles_per_node = capacity.max(1);
        self
    }

    /// Set the subdivision depth cap.
    #[must_use]
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the relative intersection tolerance.
    #[must_use]
    pub fn with_tolerance_scale(mut self, scale: f64) -> Self {
        self.tolerance_scale = scale.abs();
        self
    }

    /// Enable or disable parallel pair testing.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
