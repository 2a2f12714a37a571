//! Point and vertex types

use bytemuck::{Pod, Zeroable};
use nalgebra::{Point2, Point3, Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// A 2D texture coordinate
pub type Point2f = Point2<f32>;

/// A 2D vector, used for texture coordinate deltas
pub type Vector2f = Vector2<f32>;

/// One interleaved vertex as laid out in a GPU vertex buffer.
///
/// Attribute locations follow the order of the fields: position (0),
/// normal (1), texture coordinate (2), tangent (3), bitangent (4).
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable, Serialize, Deserialize)]
#[repr(C)]
pub struct GpuVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
}

impl GpuVertex {
    /// Size in bytes of one vertex, the stride a renderer binds.
    pub const STRIDE: usize = std::mem::size_of::<GpuVertex>();
}
