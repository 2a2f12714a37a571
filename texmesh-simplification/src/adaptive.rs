//! Adaptive vertex clustering over octree leaves
//!
//! Dense regions end up in small leaves and keep more detail, sparse
//! regions collapse into large ones. Aggregation and remapping are the same
//! as for the uniform grid.

use crate::cluster::{apply_clusters, clustering_bounds, ClusteringStats, CLUSTERING_MARGIN};
use crate::octree::{Octree, DEFAULT_MAX_DEPTH, MAX_OCTREE_DEPTH};
use crate::VertexClusterer;
use serde::{Deserialize, Serialize};
use texmesh_core::{Error, Mesh, Result};

/// Octree clusterer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OctreeClusteringOptions {
    /// Maximum number of vertices a node may hold without being split
    pub leaf_capacity: usize,
    /// Depth at which nodes stop splitting regardless of their count
    pub max_depth: usize,
    /// Fraction of each extent added on both sides of the cached box
    pub margin: f32,
}

impl Default for OctreeClusteringOptions {
    fn default() -> Self {
        Self {
            leaf_capacity: 10,
            max_depth: DEFAULT_MAX_DEPTH,
            margin: CLUSTERING_MARGIN,
        }
    }
}

impl OctreeClusteringOptions {
    pub fn new(leaf_capacity: usize) -> Self {
        Self {
            leaf_capacity,
            ..Self::default()
        }
    }

    pub fn with_params(leaf_capacity: usize, max_depth: usize, margin: f32) -> Self {
        Self {
            leaf_capacity,
            max_depth,
            margin,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }
}

/// Cluster `mesh` over the leaves of an octree holding at most
/// `leaf_capacity` vertices per leaf (depth permitting).
pub fn adaptive_simplify(mesh: &mut Mesh, leaf_capacity: usize) -> Result<ClusteringStats> {
    OctreeClusteringOptions::new(leaf_capacity).cluster(mesh)
}

impl VertexClusterer for OctreeClusteringOptions {
    fn cluster(&self, mesh: &mut Mesh) -> Result<ClusteringStats> {
        if self.leaf_capacity == 0 {
            return Err(Error::InvalidParameter(
                "octree leaf capacity must be at least 1".to_string(),
            ));
        }
        if self.max_depth > MAX_OCTREE_DEPTH {
            return Err(Error::InvalidParameter(format!(
                "octree depth limit {} exceeds {}",
                self.max_depth, MAX_OCTREE_DEPTH
            )));
        }
        let root = clustering_bounds(mesh, self.margin)?;
        let tree = Octree::build(&mesh.positions, root, self.leaf_capacity, self.max_depth);

        let leaves = tree.leaves();
        let mut slot_of_node = vec![None; tree.len()];
        for (slot, &leaf) in leaves.iter().enumerate() {
            slot_of_node[leaf] = Some(slot);
        }
        let assignment: Vec<Option<usize>> = mesh
            .positions
            .iter()
            .map(|p| tree.locate(p).and_then(|leaf| slot_of_node[leaf]))
            .collect();

        let stats = apply_clusters(
            mesh,
            &assignment,
            leaves.len(),
            ClusteringStats {
                cells: leaves.len(),
                ..ClusteringStats::default()
            },
        );

        log::debug!(
            "octree clustering with leaf capacity {}: {} nodes, depth {}, {} of {} leaves occupied",
            self.leaf_capacity,
            tree.len(),
            tree.depth(),
            stats.occupied_cells,
            stats.cells
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use texmesh_algorithms::{refresh_derived_attributes, NormalOptions};
    use texmesh_core::{shapes, Point3f};

    fn prepared(mut mesh: Mesh) -> Mesh {
        refresh_derived_attributes(&mut mesh, &NormalOptions::default()).unwrap();
        mesh
    }

    #[test]
    fn test_creation() {
        let options = OctreeClusteringOptions::default();
        assert_eq!(options.leaf_capacity, 10);
        assert_eq!(options.max_depth, 16);
        let options = OctreeClusteringOptions::with_params(4, 8, 0.05);
        assert_eq!(options, OctreeClusteringOptions::new(4).with_max_depth(8).with_margin(0.05));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut mesh = prepared(shapes::tetrahedron());
        let before = mesh.clone();
        assert!(matches!(adaptive_simplify(&mut mesh, 0), Err(Error::InvalidParameter(_))));
        assert!(matches!(
            OctreeClusteringOptions::new(4).with_margin(0.0).cluster(&mut mesh),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            OctreeClusteringOptions::new(1).with_max_depth(MAX_OCTREE_DEPTH + 1).cluster(&mut mesh),
            Err(Error::InvalidParameter(_))
        ));
        assert_eq!(mesh, before);
    }

    #[test]
    fn test_large_capacity_collapses_to_centroid() {
        let mut mesh = prepared(shapes::tetrahedron());
        let centroid = mesh.positions.iter().fold(Point3f::origin().coords, |acc, p| acc + p.coords) / 4.0;

        let stats = adaptive_simplify(&mut mesh, 10).unwrap();
        assert_eq!(stats.cells, 1);
        assert_eq!(stats.occupied_cells, 1);
        for p in &mesh.positions {
            assert_relative_eq!(p.coords, centroid, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_every_vertex_assigned() {
        let mut mesh = prepared(shapes::uv_sphere(12, 16));
        let stats = adaptive_simplify(&mut mesh, 4).unwrap();

        assert_eq!(stats.assigned_vertices, mesh.vertex_count());
        assert_eq!(stats.unassigned_vertices, 0);
        assert!(stats.occupied_cells < mesh.vertex_count());
        assert!(stats.occupied_cells <= stats.cells);
        assert!(mesh.validate().is_ok());
        for n in &mesh.normals {
            let len = n.norm();
            assert!(len == 0.0 || (len - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_capacity_one_keeps_distinct_vertices() {
        let mut mesh = prepared(shapes::plane_grid(5));
        let before = mesh.positions.clone();
        let stats = adaptive_simplify(&mut mesh, 1).unwrap();
        assert_eq!(stats.occupied_cells, 25);
        for (a, b) in mesh.positions.iter().zip(&before) {
            assert_relative_eq!(*a, *b, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_stale_bounds_leave_outside_vertices_untouched() {
        let mut mesh = prepared(shapes::unit_quad());
        // moved after the parameterizer cached the box
        mesh.positions[2] = Point3f::new(5.0, 5.0, 0.0);
        let stats = adaptive_simplify(&mut mesh, 10).unwrap();

        assert_eq!(stats.unassigned_vertices, 1);
        assert_eq!(mesh.positions[2], Point3f::new(5.0, 5.0, 0.0));
        let expected = Point3f::new(1.0 / 3.0, 1.0 / 3.0, 0.0);
        for i in [0, 1, 3] {
            assert_relative_eq!(mesh.positions[i], expected, epsilon = 1e-6);
        }
    }
}
