//! Vertex clustering for texmesh
//!
//! This crate snaps mesh vertices onto per-cluster representatives while
//! keeping the topology unchanged:
//! - Uniform grid clustering over the inflated bounding box
//! - Adaptive clustering over the leaves of a capacity-bounded octree
//!
//! Both read the bounding box cached by the planar parameterizer and the
//! current per-vertex normals, and write positions and normals only.

pub mod cluster;
pub mod grid;
pub mod octree;
pub mod adaptive;

pub use cluster::*;
pub use grid::*;
pub use octree::*;
pub use adaptive::*;

use texmesh_core::{Mesh, Result};

/// Snap the vertices of a mesh onto cluster representatives
pub trait VertexClusterer {
    /// Cluster `mesh` in place. Positions and normals of triangle vertices
    /// are replaced by the average of their cluster; nothing else changes.
    fn cluster(&self, mesh: &mut Mesh) -> Result<ClusteringStats>;
}
