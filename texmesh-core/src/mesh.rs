//! Mesh data structures and functionality

use crate::bounds::{BoundingBox, BoundingSphere};
use crate::error::{Error, Result};
use crate::point::*;
use crate::transform::Placement;
use serde::{Deserialize, Serialize};

/// A triangle mesh stored as parallel per-vertex arrays.
///
/// `positions` and `triangles` are authored (by a loader, a procedural
/// shape or the subdivider). Everything else is derived: texture coordinates
/// and the cached bounding box by the planar parameterizer, the tangent frame
/// by the normal/tangent estimator. Every per-vertex array has the same
/// length as `positions` and every triangle index is below that length;
/// [`Mesh::validate`] checks both and every operation calls it first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub positions: Vec<Point3f>,
    pub normals: Vec<Vector3f>,
    pub tangents: Vec<Vector3f>,
    pub bitangents: Vec<Vector3f>,
    pub tex_coords: Vec<Point2f>,
    pub triangles: Vec<[usize; 3]>,
    /// Cached bounds, refreshed by the planar parameterizer
    pub bounds: Option<BoundingBox>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh from loader output.
    ///
    /// Derived arrays are sized to match and zero-filled until the host
    /// runs the parameterizer and estimator.
    pub fn from_positions_and_triangles(
        positions: Vec<Point3f>,
        triangles: Vec<[usize; 3]>,
    ) -> Result<Self> {
        let mut mesh = Self {
            positions,
            triangles,
            ..Self::default()
        };
        mesh.reset_derived();
        mesh.validate()?;
        Ok(mesh)
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// A mesh without vertices
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Corner positions of triangle `t`
    pub fn triangle_positions(&self, t: usize) -> [Point3f; 3] {
        self.triangles[t].map(|i| self.positions[i])
    }

    /// Replace positions, keeping the vertex count.
    pub fn set_positions(&mut self, positions: Vec<Point3f>) -> Result<()> {
        if positions.len() != self.positions.len() {
            return Err(Error::AttributeLength {
                attribute: "positions",
                expected: self.positions.len(),
                actual: positions.len(),
            });
        }
        self.positions = positions;
        Ok(())
    }

    /// Resize every derived array to the vertex count, zero-filled.
    pub fn reset_derived(&mut self) {
        let n = self.positions.len();
        self.normals = vec![Vector3f::zeros(); n];
        self.tangents = vec![Vector3f::zeros(); n];
        self.bitangents = vec![Vector3f::zeros(); n];
        self.tex_coords = vec![Point2f::origin(); n];
    }

    /// Check that every triangle index addresses an existing vertex.
    pub fn validate_topology(&self) -> Result<()> {
        let vertex_count = self.positions.len();
        for (triangle, face) in self.triangles.iter().enumerate() {
            if let Some(&index) = face.iter().find(|&&i| i >= vertex_count) {
                return Err(Error::IndexOutOfBounds {
                    triangle,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }

    /// Check the parallel-array and topology invariants.
    pub fn validate(&self) -> Result<()> {
        let expected = self.positions.len();
        let lengths = [
            ("normals", self.normals.len()),
            ("tangents", self.tangents.len()),
            ("bitangents", self.bitangents.len()),
            ("tex_coords", self.tex_coords.len()),
        ];
        for (attribute, actual) in lengths {
            if actual != expected {
                return Err(Error::AttributeLength {
                    attribute,
                    expected,
                    actual,
                });
            }
        }
        self.validate_topology()
    }

    /// Fail with [`Error::EmptyMesh`] when there are no vertices.
    pub fn ensure_not_empty(&self) -> Result<()> {
        if self.is_empty() {
            Err(Error::EmptyMesh)
        } else {
            Ok(())
        }
    }

    /// Cached bounding box, `None` until the parameterizer has run
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.bounds
    }

    pub fn z_min(&self) -> Option<f32> {
        self.bounds.map(|b| b.z_min())
    }

    pub fn z_max(&self) -> Option<f32> {
        self.bounds.map(|b| b.z_max())
    }

    /// Sphere around the vertex centroid, used by hosts to fit the camera
    pub fn bounding_sphere(&self) -> Result<BoundingSphere> {
        BoundingSphere::from_points(&self.positions).ok_or(Error::EmptyMesh)
    }

    /// World-space bounds under a host-owned placement.
    ///
    /// Uses the cached box when present, otherwise scans the positions.
    pub fn world_bounds(&self, placement: &Placement) -> Result<BoundingBox> {
        let local = match self.bounds {
            Some(bounds) => bounds,
            None => BoundingBox::from_points(&self.positions).ok_or(Error::EmptyMesh)?,
        };
        Ok(local.transformed(placement))
    }

    /// Interleaved vertex buffer contents, one [`GpuVertex`] per vertex.
    pub fn interleaved_vertices(&self) -> Result<Vec<GpuVertex>> {
        self.validate()?;
        Ok((0..self.positions.len())
            .map(|i| GpuVertex {
                position: self.positions[i].coords.into(),
                normal: self.normals[i].into(),
                tex_coord: self.tex_coords[i].coords.into(),
                tangent: self.tangents[i].into(),
                bitangent: self.bitangents[i].into(),
            })
            .collect())
    }

    /// Flattened 32-bit index buffer, three entries per triangle.
    pub fn index_buffer(&self) -> Result<Vec<u32>> {
        self.triangles
            .iter()
            .flatten()
            .map(|&i| {
                u32::try_from(i).map_err(|_| {
                    Error::InvalidData(format!("vertex index {} does not fit in 32 bits", i))
                })
            })
            .collect()
    }

    /// Clear the mesh
    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.tangents.clear();
        self.bitangents.clear();
        self.tex_coords.clear();
        self.triangles.clear();
        self.bounds = None;
    }
}
