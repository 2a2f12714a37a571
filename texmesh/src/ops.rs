//! Host-facing mesh operations
//!
//! Every operation validates first and commits only on success. Operators
//! that move vertices or change the topology rerun the parameterizer and
//! the angle-weighted estimator before returning; the clusterers only
//! rewrite positions and normals and keep the cached bounding box, so a
//! repeated clustering pass sees the same cells.

use texmesh_algorithms::{
    laplacian_smooth, recompute_tangent_frame, refresh_derived_attributes, NormalOptions,
    NormalStats, SmoothingOptions, SmoothingStats,
};
use texmesh_core::{Changes, Mesh, Result};
use texmesh_simplification::{
    ClusteringStats, GridClusteringOptions, OctreeClusteringOptions, VertexClusterer,
};

/// The operations a viewer triggers on its mesh
pub trait MeshOps {
    /// Planar parameterization followed by angle-weighted normals and
    /// tangent frames. Run once after loading.
    fn init(&mut self) -> Result<NormalStats>;

    /// Rerun the planar parameterization, then recompute normals and
    /// tangent frames from the current positions.
    fn recompute_per_vertex_normals(&mut self, angle_based: bool) -> Result<NormalStats>;

    /// One Laplacian smoothing pass.
    fn laplacian_filter(&mut self, alpha: f32, cotangent_weights: bool) -> Result<SmoothingStats>;

    /// Uniform grid clustering with `resolution³` cells.
    fn simplify(&mut self, resolution: usize) -> Result<ClusteringStats>;

    /// Octree clustering with at most `capacity` vertices per leaf.
    fn adaptive_simplify(&mut self, capacity: usize) -> Result<ClusteringStats>;

    /// Midpoint 1-to-4 subdivision.
    fn subdivide(&mut self) -> Result<NormalStats>;

    /// Smoothing with full options, including repeated passes.
    fn smooth(&mut self, options: &SmoothingOptions) -> Result<SmoothingStats>;

    /// Clustering with any clusterer.
    fn cluster(&mut self, clusterer: &dyn VertexClusterer) -> Result<ClusteringStats>;
}

/// Arrays each operation rewrites, as reported to a [`texmesh_core::BufferSync`].
pub(crate) mod changes {
    use super::Changes;

    pub const INIT: Changes = Changes::DERIVED;
    pub const NORMALS: Changes = Changes::DERIVED;
    pub const SMOOTH: Changes = Changes::POSITIONS.union(Changes::DERIVED);
    pub const CLUSTER: Changes = Changes::POSITIONS.union(Changes::NORMALS);
    pub const SUBDIVIDE: Changes = Changes::ALL;
}

impl MeshOps for Mesh {
    fn init(&mut self) -> Result<NormalStats> {
        refresh_derived_attributes(self, &NormalOptions::angle_weighted())
    }

    fn recompute_per_vertex_normals(&mut self, angle_based: bool) -> Result<NormalStats> {
        recompute_tangent_frame(self, &NormalOptions { angle_weighted: angle_based })
    }

    fn laplacian_filter(&mut self, alpha: f32, cotangent_weights: bool) -> Result<SmoothingStats> {
        laplacian_smooth(self, &SmoothingOptions::new(alpha, cotangent_weights))
    }

    fn simplify(&mut self, resolution: usize) -> Result<ClusteringStats> {
        GridClusteringOptions::new(resolution).cluster(self)
    }

    fn adaptive_simplify(&mut self, capacity: usize) -> Result<ClusteringStats> {
        OctreeClusteringOptions::new(capacity).cluster(self)
    }

    fn subdivide(&mut self) -> Result<NormalStats> {
        texmesh_algorithms::subdivide(self, &NormalOptions::angle_weighted())
    }

    fn smooth(&mut self, options: &SmoothingOptions) -> Result<SmoothingStats> {
        laplacian_smooth(self, options)
    }

    fn cluster(&mut self, clusterer: &dyn VertexClusterer) -> Result<ClusteringStats> {
        clusterer.cluster(self)
    }
}
