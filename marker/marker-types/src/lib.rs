//! Core geometry types for the mesh surface-intersection marker.
//!
//! This crate provides the foundational types shared by the spatial
//! kernels and the intersection driver:
//!
//! - [`Aabb`] - Axis-aligned bounding box with closed overlap predicates
//! - [`Triangle`] - World-space triangle tagged with its source face id
//! - [`Polygon`] / [`PolygonMesh`] - The triangulated mesh as the host
//!   application hands it over
//!
//! All coordinates are `f64`. World transforms are plain
//! [`Matrix4`] affine matrices; points are mapped with
//! `transform_point`, polygon normals are carried through untransformed.
//!
//! # Example
//!
//! ```
//! use marker_types::{unit_cube, Matrix4};
//!
//! let cube = unit_cube();
//! let soup = cube.world_triangles(&Matrix4::identity());
//!
//! assert_eq!(soup.len(), 12);
//! assert!(soup.iter().all(|t| (t.face_index as usize) < cube.polygon_count()));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
// Mesh extraction casts counted indices to u32; hosts stay far below that.
#![allow(clippy::cast_possible_truncation)]

mod bounds;
mod mesh;
mod triangle;

pub use bounds::Aabb;
pub use mesh::{unit_cube, unit_tetrahedron, Polygon, PolygonMesh};
pub use triangle::Triangle;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point3, Vector3};
