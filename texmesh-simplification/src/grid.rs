//! Uniform grid vertex clustering
//!
//! The inflated bounding box is cut into `R x R x R` equal cells. Every
//! vertex falls into exactly one cell and the vertices referenced by
//! triangles are moved onto their cell's averaged position and normal.
//! Topology is kept, so collapsed triangles remain in the index list.

use crate::cluster::{apply_clusters, clustering_bounds, ClusteringStats, CLUSTERING_MARGIN};
use crate::VertexClusterer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use texmesh_core::{BoundingBox, Error, Mesh, Point3f, Result, Vector3f};

/// Uniform grid clusterer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridClusteringOptions {
    /// Cells per axis, at least 1
    pub resolution: usize,
    /// Fraction of each extent added on both sides of the cached box
    pub margin: f32,
}

impl Default for GridClusteringOptions {
    fn default() -> Self {
        Self {
            resolution: 32,
            margin: CLUSTERING_MARGIN,
        }
    }
}

impl GridClusteringOptions {
    pub fn new(resolution: usize) -> Self {
        Self {
            resolution,
            ..Self::default()
        }
    }

    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    /// Total number of cells, `resolution³`.
    pub fn cell_count(&self) -> Result<usize> {
        if self.resolution == 0 {
            return Err(Error::InvalidParameter(
                "grid resolution must be at least 1".to_string(),
            ));
        }
        self.resolution
            .checked_mul(self.resolution)
            .and_then(|r2| r2.checked_mul(self.resolution))
            .ok_or_else(|| {
                Error::InvalidParameter(format!("grid resolution {} is too large", self.resolution))
            })
    }
}

/// Maps points to cells of a uniform grid over a box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformGrid {
    pub bounds: BoundingBox,
    pub resolution: usize,
    pub cell_size: Vector3f,
}

impl UniformGrid {
    /// `resolution` must be non-zero.
    pub fn new(bounds: BoundingBox, resolution: usize) -> Self {
        Self {
            bounds,
            resolution,
            cell_size: bounds.extent() / resolution as f32,
        }
    }

    /// Integer cell coordinates, clamped to `[0, R-1]` on every axis.
    ///
    /// Cells are half-open: a point on a shared face belongs to the cell
    /// whose minimum it touches.
    pub fn cell_coords(&self, p: &Point3f) -> [usize; 3] {
        let max = (self.resolution - 1) as f32;
        std::array::from_fn(|axis| {
            let t = ((p[axis] - self.bounds.min[axis]) / self.cell_size[axis]).floor();
            // NaN from a zero-size cell lands in cell 0
            t.clamp(0.0, max) as usize
        })
    }

    /// Linear cell index `ix * R² + iy * R + iz`.
    pub fn cell_index(&self, p: &Point3f) -> usize {
        let [ix, iy, iz] = self.cell_coords(p);
        let r = self.resolution;
        ix * r * r + iy * r + iz
    }
}

/// Cluster `mesh` on a uniform grid of `resolution³` cells.
///
/// A second pass over the same cached bounding box leaves the mesh
/// unchanged, unless a cell also holds vertices that no triangle
/// references: those still weigh into the cell average but are never
/// snapped, so the average keeps drifting towards them.
pub fn simplify(mesh: &mut Mesh, resolution: usize) -> Result<ClusteringStats> {
    GridClusteringOptions::new(resolution).cluster(mesh)
}

impl VertexClusterer for GridClusteringOptions {
    fn cluster(&self, mesh: &mut Mesh) -> Result<ClusteringStats> {
        let cells = self.cell_count()?;
        let bounds = clustering_bounds(mesh, self.margin)?;
        let grid = UniformGrid::new(bounds, self.resolution);

        // only occupied cells get a cluster slot
        let mut slots: HashMap<usize, usize> = HashMap::new();
        let assignment: Vec<Option<usize>> = mesh
            .positions
            .iter()
            .map(|p| {
                let next = slots.len();
                Some(*slots.entry(grid.cell_index(p)).or_insert(next))
            })
            .collect();

        let stats = apply_clusters(
            mesh,
            &assignment,
            slots.len(),
            ClusteringStats {
                cells,
                ..ClusteringStats::default()
            },
        );

        log::debug!(
            "grid clustering at resolution {}: {} of {} cells occupied by {} vertices",
            self.resolution,
            stats.occupied_cells,
            stats.cells,
            stats.assigned_vertices
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use texmesh_algorithms::refresh_derived_attributes;
    use texmesh_algorithms::NormalOptions;
    use texmesh_core::shapes;

    fn prepared(mut mesh: Mesh) -> Mesh {
        refresh_derived_attributes(&mut mesh, &NormalOptions::default()).unwrap();
        mesh
    }

    #[test]
    fn test_creation() {
        let options = GridClusteringOptions::default();
        assert_eq!(options.resolution, 32);
        assert_relative_eq!(options.margin, 0.01);
        assert_eq!(GridClusteringOptions::new(4).cell_count(), Ok(64));
    }

    #[test]
    fn test_zero_resolution_rejected() {
        let mut mesh = prepared(shapes::tetrahedron());
        let before = mesh.clone();
        assert!(matches!(simplify(&mut mesh, 0), Err(Error::InvalidParameter(_))));
        assert!(matches!(simplify(&mut mesh, usize::MAX), Err(Error::InvalidParameter(_))));
        assert_eq!(mesh, before);
    }

    #[test]
    fn test_missing_bounding_box_rejected() {
        let mut mesh = shapes::tetrahedron();
        assert!(mesh.bounding_box().is_none());
        assert!(matches!(simplify(&mut mesh, 4), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_empty_mesh_rejected() {
        let mut mesh = Mesh::new();
        assert_eq!(simplify(&mut mesh, 4), Err(Error::EmptyMesh));
    }

    #[test]
    fn test_cell_index_layout() {
        let grid = UniformGrid::new(
            BoundingBox::new(Point3f::origin(), Point3f::new(4.0, 4.0, 4.0)),
            4,
        );
        assert_eq!(grid.cell_index(&Point3f::new(0.5, 0.5, 0.5)), 0);
        assert_eq!(grid.cell_index(&Point3f::new(0.5, 0.5, 1.5)), 1);
        assert_eq!(grid.cell_index(&Point3f::new(0.5, 1.5, 0.5)), 4);
        assert_eq!(grid.cell_index(&Point3f::new(1.5, 0.5, 0.5)), 16);
        // shared faces belong to the upper cell, the far face is clamped
        assert_eq!(grid.cell_coords(&Point3f::new(1.0, 2.0, 3.0)), [1, 2, 3]);
        assert_eq!(grid.cell_coords(&Point3f::new(4.0, 4.0, 4.0)), [3, 3, 3]);
        assert_eq!(grid.cell_coords(&Point3f::new(-1.0, 9.0, 2.5)), [0, 3, 2]);
    }

    #[test]
    fn test_single_cell_collapses_to_centroid() {
        let mut mesh = prepared(shapes::tetrahedron());
        let centroid = mesh.positions.iter().fold(Vector3f::zeros(), |acc, p| acc + p.coords) / 4.0;
        let mean_normal = mesh
            .normals
            .iter()
            .fold(Vector3f::zeros(), |acc, n| acc + n)
            .normalize();

        let stats = simplify(&mut mesh, 1).unwrap();
        assert_eq!(stats.cells, 1);
        assert_eq!(stats.occupied_cells, 1);
        assert_eq!(stats.assigned_vertices, 4);
        assert_eq!(stats.unassigned_vertices, 0);

        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            assert_relative_eq!(p.coords, centroid, epsilon = 1e-6);
            assert_relative_eq!(*n, mean_normal, epsilon = 1e-5);
        }
        assert_eq!(mesh.triangle_count(), 4);
    }

    #[test]
    fn test_second_pass_is_idempotent() {
        let mut mesh = prepared(shapes::uv_sphere(6, 8));
        simplify(&mut mesh, 3).unwrap();
        let once = mesh.clone();
        simplify(&mut mesh, 3).unwrap();

        assert_eq!(mesh.bounding_box(), once.bounding_box());
        for (a, b) in mesh.positions.iter().zip(&once.positions) {
            assert_relative_eq!(*a, *b, epsilon = 1e-5);
        }
        for (a, b) in mesh.normals.iter().zip(&once.normals) {
            assert_relative_eq!(*a, *b, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_unreferenced_vertex_keeps_pulling_its_cell() {
        let mut mesh = shapes::unit_quad();
        mesh.positions.push(Point3f::new(1.0, 1.0, 0.0));
        let mut mesh = prepared(mesh);

        simplify(&mut mesh, 1).unwrap();
        assert_relative_eq!(mesh.positions[0], Point3f::new(0.6, 0.6, 0.0), epsilon = 1e-6);
        assert_eq!(mesh.positions[4], Point3f::new(1.0, 1.0, 0.0));

        // (4 * 0.6 + 1.0) / 5
        simplify(&mut mesh, 1).unwrap();
        assert_relative_eq!(mesh.positions[0], Point3f::new(0.68, 0.68, 0.0), epsilon = 1e-6);
        assert_eq!(mesh.positions[4], Point3f::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_fine_grid_keeps_distinct_vertices() {
        let mut mesh = prepared(shapes::plane_grid(4));
        let before = mesh.positions.clone();
        // lattice points 1 apart, cells about 0.1 wide
        let stats = simplify(&mut mesh, 32).unwrap();
        assert_eq!(stats.occupied_cells, 16);
        for (a, b) in mesh.positions.iter().zip(&before) {
            assert_relative_eq!(*a, *b, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_flat_mesh_gets_padded_cells() {
        // plane_grid lies in z = 0: zero z extent
        let mut mesh = prepared(shapes::plane_grid(5));
        let stats = simplify(&mut mesh, 2).unwrap();
        assert_eq!(stats.cells, 8);
        assert_eq!(stats.occupied_cells, 4);
        assert!(mesh.positions.iter().all(|p| p.coords.iter().all(|c| c.is_finite())));
        assert!(mesh.positions.iter().all(|p| p.z == 0.0));
    }
}
