//! Planar parameterization
//!
//! Texture coordinates come from the x/y extents of the bounding box:
//! `u = (x - x_min) / (x_max - x_min)`, `v = (y - y_min) / (y_max - y_min)`.
//! This is a placeholder mapping, but the tangent frame is derived from it,
//! so it has to be refreshed whenever positions or the vertex count change.

use texmesh_core::{BoundingBox, Error, Mesh, Point2f, Point3f, Result};

/// Recompute and cache the bounding box of `mesh`.
///
/// Fails with [`Error::EmptyMesh`] on a mesh without vertices.
pub fn compute_bounding_box(mesh: &mut Mesh) -> Result<BoundingBox> {
    let bounds = BoundingBox::from_points(&mesh.positions).ok_or(Error::EmptyMesh)?;
    mesh.bounds = Some(bounds);
    Ok(bounds)
}

/// Bounding-box-normalized x/y coordinates for every position.
///
/// An axis with zero extent maps to `0.0` rather than dividing by zero.
pub fn planar_tex_coords(positions: &[Point3f], bounds: &BoundingBox) -> Vec<Point2f> {
    let scale = |extent: f32| if extent > 0.0 { 1.0 / extent } else { 0.0 };
    let su = scale(bounds.width());
    let sv = scale(bounds.height());

    positions
        .iter()
        .map(|p| Point2f::new((p.x - bounds.x_min()) * su, (p.y - bounds.y_min()) * sv))
        .collect()
}

/// Refresh the cached bounding box and the planar texture coordinates.
pub fn compute_planar_parameterization(mesh: &mut Mesh) -> Result<BoundingBox> {
    let bounds = BoundingBox::from_points(&mesh.positions).ok_or(Error::EmptyMesh)?;
    let tex_coords = planar_tex_coords(&mesh.positions, &bounds);

    mesh.bounds = Some(bounds);
    mesh.tex_coords = tex_coords;
    Ok(bounds)
}
