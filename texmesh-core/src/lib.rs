//! Core data structures for texmesh
//!
//! This crate provides the parallel-array mesh representation shared by every
//! texmesh algorithm, together with bounding volumes, host-side placement,
//! the buffer synchronisation contract and the common error type.

pub mod point;
pub mod bounds;
pub mod mesh;
pub mod shapes;
pub mod traits;
pub mod transform;
pub mod error;

pub use point::*;
pub use bounds::*;
pub use mesh::*;
pub use traits::*;
pub use transform::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point2, Point3, Vector2, Vector3, Matrix4, UnitQuaternion};
