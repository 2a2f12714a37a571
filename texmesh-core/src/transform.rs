//! Host-owned placement of a mesh in the world
//!
//! The mesh itself never stores a transform. A host that needs world-space
//! quantities (camera fitting, culling) passes its own [`Placement`] in.

use crate::point::*;
use nalgebra::{Isometry3, Matrix3, Matrix4, Translation3, UnitQuaternion};
use serde::{Deserialize, Serialize};

/// Translation, rotation and uniform scale, applied as `T * R * S`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub translation: Vector3f,
    pub rotation: UnitQuaternion<f32>,
    pub scale: f32,
}

impl Placement {
    /// Create an identity placement
    pub fn identity() -> Self {
        Self {
            translation: Vector3f::zeros(),
            rotation: UnitQuaternion::identity(),
            scale: 1.0,
        }
    }

    /// Create a pure translation
    pub fn translation(translation: Vector3f) -> Self {
        Self {
            translation,
            ..Self::identity()
        }
    }

    /// Create a pure rotation
    pub fn rotation(rotation: UnitQuaternion<f32>) -> Self {
        Self {
            rotation,
            ..Self::identity()
        }
    }

    /// Create a uniform scaling
    pub fn uniform_scaling(scale: f32) -> Self {
        Self {
            scale,
            ..Self::identity()
        }
    }

    /// Homogeneous model matrix, as uploaded to a shader uniform
    pub fn to_matrix(&self) -> Matrix4<f32> {
        let isometry = Isometry3::from_parts(Translation3::from(self.translation), self.rotation);
        isometry.to_homogeneous() * Matrix4::new_scaling(self.scale)
    }

    /// Matrix that maps object-space normals to world space
    pub fn normal_matrix(&self) -> Matrix3<f32> {
        // Uniform scale only changes length, so the rotation alone is enough.
        self.rotation.to_rotation_matrix().into_inner()
    }

    pub fn transform_point(&self, point: &Point3f) -> Point3f {
        self.rotation * (point * self.scale) + self.translation
    }

    pub fn transform_normal(&self, normal: &Vector3f) -> Vector3f {
        (self.rotation * normal).normalize()
    }

    /// `self` applied after `other`
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            translation: self.translation + self.rotation * (other.translation * self.scale),
            rotation: self.rotation * other.rotation,
            scale: self.scale * other.scale,
        }
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for Placement {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.compose(&rhs)
    }
}

impl From<Isometry3<f32>> for Placement {
    fn from(isometry: Isometry3<f32>) -> Self {
        Self {
            translation: isometry.translation.vector,
            rotation: isometry.rotation,
            scale: 1.0,
        }
    }
}
