//! # texmesh Algorithms
//!
//! Per-vertex attribute derivation and in-place mesh operators.
//!
//! This crate provides the planar parameterization, the normal and tangent
//! frame estimator, the angle/cotangent-weighted Laplacian filter and the
//! midpoint 1-to-4 subdivision. Operators that move vertices or change the
//! topology refresh the derived attributes before they return.

pub mod geometry;
pub mod parameterization;
pub mod normals;
pub mod smoothing;
pub mod subdivision;

// Re-export commonly used items
pub use parameterization::*;
pub use normals::*;
pub use smoothing::*;
pub use subdivision::*;
