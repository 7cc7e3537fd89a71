//! Spatial-division kernels for marking mesh surface intersections.
//!
//! Given two triangulated meshes in a common world frame, this crate
//! computes the set of faces on each mesh that participate in a
//! surface-surface intersection, which is the data a host application
//! needs to highlight the intersecting regions.
//!
//! The work happens in three layers:
//!
//! - [`intersect`] - exact triangle-triangle and box-triangle predicates
//! - [`Octree`] / [`KdTree`] behind the [`Kernel`] sum type - spatial
//!   indexes over each mesh's world-space triangle soup, with a shared
//!   dual-tree traversal answering the pairwise query
//! - [`mark_intersections`] - the driver: validate, build two kernels,
//!   collapse the hits to per-mesh face-id sets
//!
//! No boolean output, no intersection curves, no persistence: the result
//! is two sets of face ids, rebuilt from scratch on every call.
//!
//! # Quick Start
//!
//! ```
//! use marker_kernel::{mark_intersections, MarkerConfig, MeshInstance};
//! use marker_types::{unit_cube, Matrix4};
//! use nalgebra::Translation3;
//!
//! let cube = unit_cube();
//! let a = MeshInstance::with_computed_bounds(&cube, Matrix4::identity());
//! let b = MeshInstance::with_computed_bounds(
//!     &cube,
//!     Translation3::new(0.5, 0.0, 0.0).to_homogeneous(),
//! );
//!
//! let marking = mark_intersections(&a, &b, &MarkerConfig::default())?;
//! assert!(marking.stats.intersected);
//! # Ok::<(), marker_kernel::MarkerError>(())
//! ```
//!
//! # Configuration
//!
//! [`MarkerConfig`] selects the kernel variant and its subdivision
//! limits:
//!
//! ```
//! use marker_kernel::{KernelKind, MarkerConfig};
//!
//! let config = MarkerConfig::default()
//!     .with_kernel(KernelKind::KdTree)
//!     .with_max_triangles_per_node(8)
//!     .with_parallel(false);
//! ```

// Tests may unwrap; library code may not.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::similar_names)]
// Single-char names are standard in geometry code.
#![allow(clippy::many_single_char_names)]
// Arena ids are u32 by design; trees stay far below that.
#![allow(clippy::cast_possible_truncation)]

pub mod config;
pub mod error;
pub mod intersect;
pub mod kdtree;
pub mod kernel;
pub mod marker;
pub mod octree;
pub mod traverse;

pub use config::{KernelKind, MarkerConfig};
pub use error::{MarkerError, MarkerResult};
pub use kdtree::KdTree;
pub use kernel::{Kernel, KernelIntersection};
pub use marker::{mark_intersections, Marking, MarkerStats, MeshInstance};
pub use octree::Octree;
pub use traverse::{SpatialTree, TreeStats};

// Re-export the geometry types for convenience
pub use marker_types::{Aabb, PolygonMesh, Triangle};

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```
/// use marker_kernel::prelude::*;
///
/// let config = MarkerConfig::default().with_kernel(KernelKind::Octree);
/// ```
pub mod prelude {
    pub use crate::config::{KernelKind, MarkerConfig};
    pub use crate::error::{MarkerError, MarkerResult};
    pub use crate::kernel::{Kernel, KernelIntersection};
    pub use crate::marker::{mark_intersections, Marking, MarkerStats, MeshInstance};
}
