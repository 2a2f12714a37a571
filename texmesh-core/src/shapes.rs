//! Procedural meshes for demos, tests and benchmarks

use crate::mesh::Mesh;
use crate::point::Point3f;

fn build(positions: Vec<Point3f>, triangles: Vec<[usize; 3]>) -> Mesh {
    let mut mesh = Mesh {
        positions,
        triangles,
        ..Mesh::default()
    };
    mesh.reset_derived();
    mesh
}

/// Four vertices, four outward-facing triangles
pub fn tetrahedron() -> Mesh {
    build(
        vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(0.5, 1.0, 0.0),
            Point3f::new(0.5, 0.5, 1.0),
        ],
        vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
    )
}

/// Unit square in the z = 0 plane, split along the (0,0)-(1,1) diagonal
pub fn unit_quad() -> Mesh {
    build(
        vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(1.0, 1.0, 0.0),
            Point3f::new(0.0, 1.0, 0.0),
        ],
        vec![[0, 1, 2], [0, 2, 3]],
    )
}

/// `size` x `size` vertices on the integer lattice of the z = 0 plane
pub fn plane_grid(size: usize) -> Mesh {
    let mut positions = Vec::with_capacity(size * size);
    for y in 0..size {
        for x in 0..size {
            positions.push(Point3f::new(x as f32, y as f32, 0.0));
        }
    }

    let mut triangles = Vec::with_capacity(2 * size.saturating_sub(1).pow(2));
    for y in 0..size.saturating_sub(1) {
        for x in 0..size.saturating_sub(1) {
            let bl = y * size + x;
            let br = bl + 1;
            let tl = (y + 1) * size + x;
            let tr = tl + 1;
            triangles.push([bl, br, tr]);
            triangles.push([bl, tr, tl]);
        }
    }

    build(positions, triangles)
}

/// Latitude/longitude sphere of radius 1 centred at the origin.
///
/// Poles are single vertices; the seam is welded. `rings` must be at
/// least 2 and `segments` at least 3 to produce a closed surface.
pub fn uv_sphere(rings: usize, segments: usize) -> Mesh {
    use std::f32::consts::PI;

    let rings = rings.max(2);
    let segments = segments.max(3);

    let mut positions = vec![Point3f::new(0.0, 0.0, 1.0)];
    for r in 1..rings {
        let theta = PI * r as f32 / rings as f32;
        for s in 0..segments {
            let phi = 2.0 * PI * s as f32 / segments as f32;
            positions.push(Point3f::new(
                theta.sin() * phi.cos(),
                theta.sin() * phi.sin(),
                theta.cos(),
            ));
        }
    }
    let south = positions.len();
    positions.push(Point3f::new(0.0, 0.0, -1.0));

    let ring_start = |r: usize| 1 + (r - 1) * segments;
    let mut triangles = Vec::new();

    for s in 0..segments {
        let next = (s + 1) % segments;
        triangles.push([0, ring_start(1) + s, ring_start(1) + next]);
    }
    for r in 1..rings - 1 {
        for s in 0..segments {
            let next = (s + 1) % segments;
            let a = ring_start(r) + s;
            let b = ring_start(r) + next;
            let c = ring_start(r + 1) + s;
            let d = ring_start(r + 1) + next;
            triangles.push([a, c, d]);
            triangles.push([a, d, b]);
        }
    }
    for s in 0..segments {
        let next = (s + 1) % segments;
        triangles.push([south, ring_start(rings - 1) + next, ring_start(rings - 1) + s]);
    }

    build(positions, triangles)
}
