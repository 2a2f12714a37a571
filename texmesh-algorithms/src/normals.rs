//! Per-vertex normal and tangent frame estimation
//!
//! Face normals, and the tangent/bitangent pair solved from each triangle's
//! UV deltas, are accumulated at the corners with either unit weights or
//! the interior angle at that corner. Angle weighting removes most of the
//! bias that irregular triangulations put on plain averaging.
//!
//! Degenerate input is skipped rather than averaged in: collapsed or
//! collinear triangles contribute nothing, and triangles with a vanishing UV
//! determinant contribute their normal but no tangent frame.

use crate::geometry::{corner_angles, face_normal, orthogonalize, perpendicular, try_normalize};
use crate::parameterization::planar_tex_coords;
use itertools::izip;
use serde::{Deserialize, Serialize};
use texmesh_core::{BoundingBox, Error, Mesh, Point2f, Point3f, Result, Vector3f};

/// Triangles with `|det(ΔUV)|` below this contribute no tangent frame.
pub const UV_DETERMINANT_EPSILON: f32 = 1e-10;

/// Options for normal and tangent frame estimation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalOptions {
    /// Weight each corner by its interior angle instead of uniformly
    pub angle_weighted: bool,
}

impl Default for NormalOptions {
    fn default() -> Self {
        Self {
            angle_weighted: true,
        }
    }
}

impl NormalOptions {
    pub fn uniform() -> Self {
        Self {
            angle_weighted: false,
        }
    }

    pub fn angle_weighted() -> Self {
        Self {
            angle_weighted: true,
        }
    }
}

/// Per-vertex normal, tangent and bitangent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TangentFrame {
    pub normals: Vec<Vector3f>,
    pub tangents: Vec<Vector3f>,
    pub bitangents: Vec<Vector3f>,
}

/// Degenerate input encountered during one estimation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalStats {
    /// Collapsed or collinear triangles, skipped entirely
    pub degenerate_triangles: usize,
    /// Triangles whose UV determinant vanished, skipped for the tangent frame
    pub uv_degenerate_triangles: usize,
    /// Vertices that received no normal contribution at all
    pub isolated_vertices: usize,
}

/// Estimate the tangent frame from positions, topology and texture
/// coordinates.
///
/// Pure function of its inputs. Indices must already be validated against
/// `positions`, and `tex_coords` must have the same length.
pub fn estimate_tangent_frame(
    positions: &[Point3f],
    triangles: &[[usize; 3]],
    tex_coords: &[Point2f],
    options: &NormalOptions,
) -> (TangentFrame, NormalStats) {
    let n = positions.len();
    let mut normals = vec![Vector3f::zeros(); n];
    let mut tangents = vec![Vector3f::zeros(); n];
    let mut bitangents = vec![Vector3f::zeros(); n];
    let mut stats = NormalStats::default();

    for &[i0, i1, i2] in triangles {
        let (p0, p1, p2) = (positions[i0], positions[i1], positions[i2]);

        let (Some(normal), Some(angles)) = (face_normal(&p0, &p1, &p2), corner_angles(&p0, &p1, &p2)) else {
            stats.degenerate_triangles += 1;
            continue;
        };
        let weights = if options.angle_weighted { angles } else { [1.0; 3] };

        for (&i, &w) in [i0, i1, i2].iter().zip(&weights) {
            normals[i] += normal * w;
        }

        let edge1 = p1 - p0;
        let edge2 = p2 - p0;
        let delta_uv1 = tex_coords[i1] - tex_coords[i0];
        let delta_uv2 = tex_coords[i2] - tex_coords[i0];

        let det = delta_uv1.x * delta_uv2.y - delta_uv2.x * delta_uv1.y;
        if det.abs() < UV_DETERMINANT_EPSILON {
            stats.uv_degenerate_triangles += 1;
            continue;
        }
        let f = 1.0 / det;

        let tangent = (edge1 * delta_uv2.y - edge2 * delta_uv1.y) * f;
        let bitangent = (edge2 * delta_uv1.x - edge1 * delta_uv2.x) * f;

        for (&i, &w) in [i0, i1, i2].iter().zip(&weights) {
            tangents[i] += tangent * w;
            bitangents[i] += bitangent * w;
        }
    }

    for (normal, tangent, bitangent) in izip!(&mut normals, &mut tangents, &mut bitangents) {
        *normal = match try_normalize(normal) {
            Some(n) => n,
            None => {
                stats.isolated_vertices += 1;
                Vector3f::zeros()
            }
        };

        *tangent = try_normalize(tangent)
            .and_then(|t| orthogonalize(&t, normal))
            .unwrap_or_else(|| perpendicular(normal));

        *bitangent = try_normalize(bitangent)
            .or_else(|| try_normalize(&normal.cross(tangent)))
            .unwrap_or_else(|| perpendicular(tangent));
    }

    (
        TangentFrame {
            normals,
            tangents,
            bitangents,
        },
        stats,
    )
}

fn log_stats(stats: &NormalStats, vertex_count: usize) {
    log::debug!(
        "estimated tangent frames for {} vertices ({} degenerate, {} uv-degenerate triangles)",
        vertex_count,
        stats.degenerate_triangles,
        stats.uv_degenerate_triangles
    );
    if stats.degenerate_triangles > 0 {
        log::warn!(
            "skipped {} collapsed or collinear triangles during normal estimation",
            stats.degenerate_triangles
        );
    }
}

/// Recompute normals, tangents and bitangents from the current positions
/// and topology of `mesh`.
///
/// The planar parameterization is rerun first, so texture coordinates and
/// the cached bounding box follow any edit made to the positions since the
/// last refresh.
pub fn recompute_tangent_frame(mesh: &mut Mesh, options: &NormalOptions) -> Result<NormalStats> {
    mesh.ensure_not_empty()?;
    mesh.validate()?;
    refresh_derived_attributes(mesh, options)
}

/// Refresh every derived attribute: bounding box and planar
/// parameterization first, then the tangent frame that depends on them.
///
/// Only positions and topology are read, so this also repairs derived
/// arrays whose length went stale after the vertex count changed. Nothing
/// is written unless the whole refresh succeeds.
pub fn refresh_derived_attributes(mesh: &mut Mesh, options: &NormalOptions) -> Result<NormalStats> {
    mesh.validate_topology()?;
    let bounds = BoundingBox::from_points(&mesh.positions).ok_or(Error::EmptyMesh)?;
    let tex_coords = planar_tex_coords(&mesh.positions, &bounds);

    let (frame, stats) = estimate_tangent_frame(&mesh.positions, &mesh.triangles, &tex_coords, options);
    log_stats(&stats, mesh.vertex_count());

    mesh.bounds = Some(bounds);
    mesh.tex_coords = tex_coords;
    mesh.normals = frame.normals;
    mesh.tangents = frame.tangents;
    mesh.bitangents = frame.bitangents;
    Ok(stats)
}
