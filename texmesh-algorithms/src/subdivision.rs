//! Midpoint 1-to-4 subdivision
//!
//! Every triangle gets three fresh edge midpoints and is replaced by four
//! triangles. Midpoints are not shared between neighbouring triangles, so
//! the result is not vertex-welded: each edge midpoint exists once per
//! incident triangle.

use crate::normals::{refresh_derived_attributes, NormalOptions, NormalStats};
use texmesh_core::{Error, Mesh, Point3f, Result};

/// Split every triangle at its edge midpoints.
///
/// Triangle `t = (i0, i1, i2)` appends midpoints `m01, m12, m20`, keeps its
/// slot as `(m01, i1, m12)` and appends `(i0, m01, m20)`, `(m01, m12, m20)`
/// and `(m20, m12, i2)`. Winding is preserved. Indices must already be
/// validated.
pub fn midpoint_split(positions: &[Point3f], triangles: &[[usize; 3]]) -> (Vec<Point3f>, Vec<[usize; 3]>) {
    let mut new_positions = Vec::with_capacity(positions.len() + 3 * triangles.len());
    new_positions.extend_from_slice(positions);

    let mut new_triangles = Vec::with_capacity(4 * triangles.len());
    new_triangles.extend_from_slice(triangles);

    for (t, &[i0, i1, i2]) in triangles.iter().enumerate() {
        let (p0, p1, p2) = (positions[i0], positions[i1], positions[i2]);

        let m01 = new_positions.len();
        let m12 = m01 + 1;
        let m20 = m01 + 2;
        new_positions.push(nalgebra::center(&p0, &p1));
        new_positions.push(nalgebra::center(&p1, &p2));
        new_positions.push(nalgebra::center(&p2, &p0));

        new_triangles[t] = [m01, i1, m12];
        new_triangles.push([i0, m01, m20]);
        new_triangles.push([m01, m12, m20]);
        new_triangles.push([m20, m12, i2]);
    }

    (new_positions, new_triangles)
}

/// Subdivide `mesh` once and refresh its derived attributes.
pub fn subdivide(mesh: &mut Mesh, options: &NormalOptions) -> Result<NormalStats> {
    subdivide_times(mesh, 1, options)
}

/// Subdivide `mesh` `times` times, then refresh its derived attributes.
///
/// Every level quadruples the triangle count; the new vertex count is
/// `V + 3T` per level. Nothing is written unless the whole operation
/// succeeds.
pub fn subdivide_times(mesh: &mut Mesh, times: usize, options: &NormalOptions) -> Result<NormalStats> {
    if times == 0 {
        return Err(Error::InvalidParameter(
            "subdivision needs at least one level".to_string(),
        ));
    }
    mesh.ensure_not_empty()?;
    mesh.validate_topology()?;

    let triangles_after = times
        .checked_mul(2)
        .and_then(|bits| u32::try_from(bits).ok())
        .and_then(|bits| 1usize.checked_shl(bits))
        .and_then(|factor| mesh.triangle_count().checked_mul(factor));
    if triangles_after.is_none() {
        return Err(Error::InvalidParameter(format!(
            "{} subdivision levels overflow the triangle count",
            times
        )));
    }

    let mut positions = mesh.positions.clone();
    let mut triangles = mesh.triangles.clone();
    for _ in 0..times {
        (positions, triangles) = midpoint_split(&positions, &triangles);
    }

    let mut staged = Mesh {
        positions,
        triangles,
        ..Mesh::default()
    };
    let stats = refresh_derived_attributes(&mut staged, options)?;

    log::debug!(
        "subdivided {} -> {} triangles, {} -> {} vertices",
        mesh.triangle_count(),
        staged.triangle_count(),
        mesh.vertex_count(),
        staged.vertex_count()
    );

    *mesh = staged;
    Ok(stats)
}
