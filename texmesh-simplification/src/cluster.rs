//! Cluster aggregation shared by the grid and octree clusterers

use serde::{Deserialize, Serialize};
use texmesh_core::{BoundingBox, Error, Mesh, Point3f, Result, Vector3f};

/// Default fraction of each bounding box extent added on both sides before
/// partitioning, so that vertices on the maximum faces fall inside.
pub const CLUSTERING_MARGIN: f32 = 0.01;

/// Outcome of one clustering pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusteringStats {
    /// Grid cells or octree leaves available
    pub cells: usize,
    /// Cells that received at least one vertex
    pub occupied_cells: usize,
    /// Vertices placed into a cell
    pub assigned_vertices: usize,
    /// Vertices outside every cell, left untouched
    pub unassigned_vertices: usize,
}

#[derive(Debug, Clone, Copy, Default)]
struct Cluster {
    position_sum: Vector3f,
    normal_sum: Vector3f,
    count: usize,
}

/// Averaged position and renormalized normal of one cluster
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Representative {
    pub position: Point3f,
    pub normal: Vector3f,
}

/// Average the members of every cluster.
///
/// `assignment[i]` is the cluster of vertex `i`, or `None` for a vertex
/// outside every cell. Empty clusters yield `None`; a cluster whose normals
/// cancel out gets a zero normal.
pub fn cluster_representatives(
    positions: &[Point3f],
    normals: &[Vector3f],
    assignment: &[Option<usize>],
    cluster_count: usize,
) -> Vec<Option<Representative>> {
    let mut clusters = vec![Cluster::default(); cluster_count];
    for ((p, n), cluster) in positions.iter().zip(normals).zip(assignment) {
        if let Some(c) = *cluster {
            clusters[c].position_sum += p.coords;
            clusters[c].normal_sum += n;
            clusters[c].count += 1;
        }
    }

    clusters
        .iter()
        .map(|c| {
            (c.count > 0).then(|| Representative {
                position: Point3f::from(c.position_sum / c.count as f32),
                normal: c.normal_sum.try_normalize(f32::EPSILON).unwrap_or_else(Vector3f::zeros),
            })
        })
        .collect()
}

/// Snap every vertex referenced by a triangle onto its cluster
/// representative, returning the new positions and normals.
///
/// Vertices that no triangle references keep their attributes, as do
/// unassigned ones. Indices must already be validated.
pub fn snap_to_clusters(
    positions: &[Point3f],
    normals: &[Vector3f],
    triangles: &[[usize; 3]],
    assignment: &[Option<usize>],
    representatives: &[Option<Representative>],
) -> (Vec<Point3f>, Vec<Vector3f>) {
    let mut new_positions = positions.to_vec();
    let mut new_normals = normals.to_vec();

    for &i in triangles.iter().flatten() {
        if let Some(rep) = assignment[i].and_then(|c| representatives[c]) {
            new_positions[i] = rep.position;
            new_normals[i] = rep.normal;
        }
    }

    (new_positions, new_normals)
}

/// Aggregate clusters, snap the mesh onto them and fill in the vertex counts
/// of `stats`. Commits positions and normals together.
pub(crate) fn apply_clusters(
    mesh: &mut Mesh,
    assignment: &[Option<usize>],
    cluster_count: usize,
    mut stats: ClusteringStats,
) -> ClusteringStats {
    let representatives = cluster_representatives(&mesh.positions, &mesh.normals, assignment, cluster_count);
    let (positions, normals) = snap_to_clusters(
        &mesh.positions,
        &mesh.normals,
        &mesh.triangles,
        assignment,
        &representatives,
    );

    stats.occupied_cells = representatives.iter().filter(|r| r.is_some()).count();
    stats.assigned_vertices = assignment.iter().filter(|a| a.is_some()).count();
    stats.unassigned_vertices = assignment.len() - stats.assigned_vertices;
    if stats.unassigned_vertices > 0 {
        log::warn!(
            "{} vertices lie outside the clustering bounds and were left untouched",
            stats.unassigned_vertices
        );
    }

    mesh.positions = positions;
    mesh.normals = normals;
    stats
}

/// The cached bounding box, inflated by `margin`.
///
/// Clustering partitions the box the parameterizer cached; it is never
/// recomputed here, so repeated passes see the same cells.
pub(crate) fn clustering_bounds(mesh: &Mesh, margin: f32) -> Result<BoundingBox> {
    if !(margin.is_finite() && margin > 0.0) {
        return Err(Error::InvalidParameter(format!(
            "clustering margin must be positive and finite, got {}",
            margin
        )));
    }
    mesh.ensure_not_empty()?;
    mesh.validate()?;

    let bounds = mesh.bounding_box().ok_or_else(|| {
        Error::InvalidData("bounding box has not been computed; run the planar parameterization first".to_string())
    })?;
    Ok(bounds.inflated(margin))
}
