//! Error types for intersection marking.

use thiserror::Error;

/// Errors that can occur when building kernels or marking intersections.
///
/// Meshes with zero triangles are *not* an error: kernels build with an
/// empty root and queries answer with empty face sets. Out-of-range face
/// ids discovered during result assembly are dropped and logged, never
/// raised.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MarkerError {
    /// The supplied enclosing bounding box is empty or inverted.
    #[error("degenerate bounds: {details}")]
    DegenerateBounds {
        /// Description of which box is degenerate and how.
        details: String,
    },

    /// A mesh references vertices outside its vertex array.
    #[error("invalid mesh: {details}")]
    InvalidMesh {
        /// Description of the offending polygon and index.
        details: String,
    },
}

/// Result type for intersection marking.
pub type MarkerResult<T> = Result<T, MarkerError>;
