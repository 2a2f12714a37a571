//! Error types for texmesh

use thiserror::Error;

/// Main error type for texmesh operations
///
/// Arithmetic trouble (collinear triangles, vanishing UV Jacobians, empty
/// clustering cells) is handled inside the algorithms and never surfaces
/// here. What does surface are caller mistakes: bad topology, mismatched
/// attribute arrays, empty meshes and out-of-range parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("mesh has no vertices")]
    EmptyMesh,

    #[error("triangle {triangle} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfBounds {
        triangle: usize,
        index: usize,
        vertex_count: usize,
    },

    #[error("attribute `{attribute}` has {actual} entries, expected {expected}")]
    AttributeLength {
        attribute: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type alias for texmesh operations
pub type Result<T> = std::result::Result<T, Error>;
