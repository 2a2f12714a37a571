//! # texmesh
//!
//! Mesh geometry-processing core for interactive textured mesh viewers.
//!
//! This is the umbrella crate that provides convenient access to all texmesh
//! functionality. You can use this crate to get everything in one place, or
//! use individual crates for more granular control over dependencies.
//!
//! ## Features
//!
//! - **Core**: Parallel-array mesh, bounding volumes, placement, buffer sync
//! - **Algorithms**: Planar parameterization, normal/tangent estimation,
//!   Laplacian smoothing, midpoint subdivision
//! - **Simplification**: Uniform grid and adaptive octree vertex clustering
//!
//! ## Quick Start
//!
//! ```rust
//! use texmesh::prelude::*;
//!
//! let mut mesh = shapes::uv_sphere(16, 24);
//! mesh.init()?;
//! mesh.laplacian_filter(0.5, true)?;
//! mesh.subdivide()?;
//! assert_eq!(mesh.vertex_count(), mesh.normals.len());
//! # Ok::<(), texmesh::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: Enables algorithms and simplification
//! - `algorithms`: Attribute derivation, smoothing and subdivision
//! - `simplification`: Vertex clustering
//!
//! The [`MeshOps`] facade, [`SyncedMesh`] and [`ViewerConfig`] need both.

// Re-export core functionality
pub use texmesh_core::*;

// Re-export sub-crates
#[cfg(feature = "algorithms")]
pub use texmesh_algorithms as algorithms;

#[cfg(feature = "simplification")]
pub use texmesh_simplification as simplification;

#[cfg(all(feature = "algorithms", feature = "simplification"))]
pub mod config;
#[cfg(all(feature = "algorithms", feature = "simplification"))]
pub mod ops;
#[cfg(all(feature = "algorithms", feature = "simplification"))]
pub mod synced;

#[cfg(all(feature = "algorithms", feature = "simplification"))]
pub use config::ViewerConfig;
#[cfg(all(feature = "algorithms", feature = "simplification"))]
pub use ops::MeshOps;
#[cfg(all(feature = "algorithms", feature = "simplification"))]
pub use synced::SyncedMesh;

/// Convenient imports for common use cases
pub mod prelude {
    pub use texmesh_core::*;
    pub use texmesh_core::shapes;

    #[cfg(feature = "algorithms")]
    pub use texmesh_algorithms::{
        NormalOptions, NormalStats, SmoothingOptions, SmoothingStats, TangentFrame,
    };

    #[cfg(feature = "simplification")]
    pub use texmesh_simplification::{
        ClusteringStats, GridClusteringOptions, Octree, OctreeClusteringOptions, VertexClusterer,
    };

    #[cfg(all(feature = "algorithms", feature = "simplification"))]
    pub use crate::{MeshOps, SyncedMesh, ViewerConfig};
}
