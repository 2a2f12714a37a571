//! Laplacian smoothing
//!
//! Each vertex moves towards the weighted average of its one-ring
//! neighbours: `p' = p + alpha * Σ w_k (q_k - p) / Σ w_k`. With cotangent
//! weights the neighbour across an edge is weighted by the cotangent of the
//! angle opposite that edge, which keeps flat regions from drifting
//! tangentially; otherwise every neighbour counts once.
//!
//! Edges shared by two triangles are visited once per triangle, so an
//! interior neighbour is counted twice with the two opposite cotangents.

use crate::geometry::corner_angles;
use crate::normals::{refresh_derived_attributes, NormalOptions, NormalStats};
use serde::{Deserialize, Serialize};
use texmesh_core::{Error, Mesh, Point3f, Result, Vector3f};

/// Upper bound on a single cotangent weight; near-zero angles would
/// otherwise dominate the average.
pub const MAX_COTANGENT: f32 = 10.0;

/// Options for [`laplacian_smooth`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothingOptions {
    /// Step size, nominally in `[0, 1]`. Values above 1 overshoot the
    /// neighbour average, negative values inflate.
    pub alpha: f32,
    /// Weight neighbours by the clamped cotangent of the opposite angle
    pub cotangent_weights: bool,
    /// Number of smoothing passes
    pub iterations: usize,
    /// Estimator options for the derived attribute refresh afterwards
    pub normals: NormalOptions,
}

impl Default for SmoothingOptions {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            cotangent_weights: true,
            iterations: 1,
            normals: NormalOptions::angle_weighted(),
        }
    }
}

impl SmoothingOptions {
    pub fn new(alpha: f32, cotangent_weights: bool) -> Self {
        Self {
            alpha,
            cotangent_weights,
            ..Self::default()
        }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_cotangent_weights(mut self, cotangent_weights: bool) -> Self {
        self.cotangent_weights = cotangent_weights;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_normals(mut self, normals: NormalOptions) -> Self {
        self.normals = normals;
        self
    }

    fn validate(&self) -> Result<()> {
        if !self.alpha.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "smoothing alpha must be finite, got {}",
                self.alpha
            )));
        }
        if self.iterations == 0 {
            return Err(Error::InvalidParameter(
                "smoothing needs at least one iteration".to_string(),
            ));
        }
        Ok(())
    }
}

/// Degenerate input met by the last smoothing pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SmoothingStats {
    /// Triangles with a zero-length edge, skipped
    pub skipped_triangles: usize,
    /// Vertices with zero total weight that kept their position
    pub stationary_vertices: usize,
    /// Result of the derived attribute refresh
    pub normals: NormalStats,
}

fn cotangent(angle: f32) -> f32 {
    // sin == 0 gives an infinite cotangent, which the clamp absorbs
    (angle.cos() / angle.sin()).abs().min(MAX_COTANGENT)
}

/// One smoothing pass over `positions`, returning the new positions.
///
/// Both passes read the pre-update snapshot, so the result does not depend
/// on vertex order. Indices must already be validated.
pub fn smooth_positions(
    positions: &[Point3f],
    triangles: &[[usize; 3]],
    alpha: f32,
    cotangent_weights: bool,
) -> (Vec<Point3f>, SmoothingStats) {
    let mut stats = SmoothingStats::default();
    let mut weighted_deltas = vec![Vector3f::zeros(); positions.len()];
    let mut total_weights = vec![0.0f32; positions.len()];

    for &[i0, i1, i2] in triangles {
        let (p0, p1, p2) = (positions[i0], positions[i1], positions[i2]);
        let Some(angles) = corner_angles(&p0, &p1, &p2) else {
            stats.skipped_triangles += 1;
            continue;
        };

        let [cot0, cot1, cot2] = if cotangent_weights {
            angles.map(cotangent)
        } else {
            [1.0; 3]
        };

        // (vertex, neighbour, cotangent of the angle opposite their edge)
        let entries = [
            (i0, p1 - p0, cot2),
            (i0, p2 - p0, cot1),
            (i1, p0 - p1, cot2),
            (i1, p2 - p1, cot0),
            (i2, p0 - p2, cot1),
            (i2, p1 - p2, cot0),
        ];
        for (i, delta, w) in entries {
            weighted_deltas[i] += delta * w;
            total_weights[i] += w;
        }
    }

    let smoothed = positions
        .iter()
        .zip(weighted_deltas.iter().zip(&total_weights))
        .map(|(p, (delta, &w))| {
            if w > 0.0 {
                *p + delta * (alpha / w)
            } else {
                stats.stationary_vertices += 1;
                *p
            }
        })
        .collect();

    (smoothed, stats)
}

/// Smooth `mesh` in place and refresh its derived attributes.
///
/// The new positions and attributes are computed on a staged copy, so an
/// error leaves `mesh` untouched.
pub fn laplacian_smooth(mesh: &mut Mesh, options: &SmoothingOptions) -> Result<SmoothingStats> {
    options.validate()?;
    mesh.ensure_not_empty()?;
    mesh.validate_topology()?;

    let mut positions = mesh.positions.clone();
    let mut stats = SmoothingStats::default();
    for _ in 0..options.iterations {
        let (next, pass) = smooth_positions(&positions, &mesh.triangles, options.alpha, options.cotangent_weights);
        positions = next;
        stats = pass;
    }

    let mut staged = Mesh {
        positions,
        triangles: mesh.triangles.clone(),
        ..Mesh::default()
    };
    stats.normals = refresh_derived_attributes(&mut staged, &options.normals)?;

    log::debug!(
        "laplacian smoothing: alpha {}, {} weights, {} iteration(s), {} stationary vertices",
        options.alpha,
        if options.cotangent_weights { "cotangent" } else { "uniform" },
        options.iterations,
        stats.stationary_vertices
    );
    if stats.skipped_triangles > 0 {
        log::warn!("skipped {} triangles with a zero-length edge while smoothing", stats.skipped_triangles);
    }

    *mesh = staged;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use texmesh_core::shapes;

    fn assert_positions(mesh: &Mesh, expected: &[(f32, f32)]) {
        for (p, &(x, y)) in mesh.positions.iter().zip(expected) {
            assert_relative_eq!(p.x, x, epsilon = 1e-5);
            assert_relative_eq!(p.y, y, epsilon = 1e-5);
            assert_relative_eq!(p.z, 0.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_default_options() {
        let options = SmoothingOptions::default();
        assert_eq!(options.alpha, 0.5);
        assert!(options.cotangent_weights);
        assert_eq!(options.iterations, 1);
        assert!(options.normals.angle_weighted);

        let options = SmoothingOptions::new(0.1, false).with_iterations(3);
        assert_eq!(options.alpha, 0.1);
        assert!(!options.cotangent_weights);
        assert_eq!(options.iterations, 3);
    }

    #[test]
    fn test_uniform_quad_matches_hand_computed_averages() {
        let mut mesh = shapes::unit_quad();
        let stats = laplacian_smooth(&mut mesh, &SmoothingOptions::new(1.0, false)).unwrap();

        assert_eq!(stats.skipped_triangles, 0);
        assert_eq!(stats.stationary_vertices, 0);
        // vertex 0 and 2 sit on the diagonal shared by both triangles
        assert_positions(&mesh, &[(0.75, 0.75), (0.5, 0.5), (0.25, 0.25), (0.5, 0.5)]);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_cotangent_quad_shrinks_towards_centre() {
        let mut mesh = shapes::unit_quad();
        laplacian_smooth(&mut mesh, &SmoothingOptions::new(0.5, true)).unwrap();

        // right angles get a zero cotangent, the 45 degree corners a weight of 1
        assert_positions(&mesh, &[(0.25, 0.25), (0.75, 0.25), (0.75, 0.75), (0.25, 0.75)]);

        for n in &mesh.normals {
            assert_relative_eq!(*n, Vector3f::z(), epsilon = 1e-5);
        }
    }

    #[test]
    fn test_zero_alpha_keeps_positions() {
        let mut mesh = shapes::uv_sphere(6, 8);
        let before = mesh.positions.clone();
        laplacian_smooth(&mut mesh, &SmoothingOptions::new(0.0, true)).unwrap();
        assert_eq!(mesh.positions, before);
    }

    #[test]
    fn test_sphere_shrinks() {
        let mut mesh = shapes::uv_sphere(8, 12);
        laplacian_smooth(&mut mesh, &SmoothingOptions::new(0.5, true).with_iterations(2)).unwrap();
        for p in &mesh.positions {
            assert!(p.coords.norm() < 1.0);
            assert!(p.coords.iter().all(|c| c.is_finite()));
        }
    }

    #[test]
    fn test_collapsed_edges_do_not_produce_nan() {
        let mut mesh = shapes::unit_quad();
        // vertex 4 duplicates vertex 0; the sliver triangle has a zero-length edge
        mesh.positions.push(Point3f::origin());
        mesh.positions.push(Point3f::new(2.0, 0.0, 0.0));
        mesh.triangles.push([0, 4, 1]);
        // collinear but with non-zero edges: clamped cotangents
        mesh.triangles.push([0, 1, 5]);
        mesh.reset_derived();

        let stats = laplacian_smooth(&mut mesh, &SmoothingOptions::new(0.5, true)).unwrap();
        assert_eq!(stats.skipped_triangles, 1);
        // vertex 4 only appears in the skipped triangle
        assert_eq!(stats.stationary_vertices, 1);
        assert_eq!(mesh.positions[4], Point3f::origin());
        for p in &mesh.positions {
            assert!(p.coords.iter().all(|c| c.is_finite()));
        }
    }

    #[test]
    fn test_isolated_vertex_is_stationary() {
        let mut mesh = shapes::unit_quad();
        mesh.positions.push(Point3f::new(5.0, 5.0, 5.0));
        mesh.reset_derived();

        let stats = laplacian_smooth(&mut mesh, &SmoothingOptions::new(1.0, false)).unwrap();
        assert_eq!(stats.stationary_vertices, 1);
        assert_eq!(mesh.positions[4], Point3f::new(5.0, 5.0, 5.0));
        assert_eq!(mesh.normals.len(), 5);
    }

    #[test]
    fn test_invalid_input_leaves_mesh_untouched() {
        let mut mesh = shapes::unit_quad();
        let before = mesh.clone();
        assert!(matches!(
            laplacian_smooth(&mut mesh, &SmoothingOptions::new(f32::NAN, true)),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            laplacian_smooth(&mut mesh, &SmoothingOptions::default().with_iterations(0)),
            Err(Error::InvalidParameter(_))
        ));
        mesh.triangles.push([0, 1, 7]);
        let broken = mesh.clone();
        assert!(matches!(
            laplacian_smooth(&mut mesh, &SmoothingOptions::default()),
            Err(Error::IndexOutOfBounds { .. })
        ));
        assert_eq!(mesh, broken);
        mesh.triangles.pop();
        assert_eq!(mesh, before);
    }

    #[test]
    fn test_empty_mesh_rejected() {
        let mut mesh = Mesh::new();
        assert_eq!(
            laplacian_smooth(&mut mesh, &SmoothingOptions::default()),
            Err(Error::EmptyMesh)
        );
    }
}
