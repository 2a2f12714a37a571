//! Basic usage example for texmesh
//!
//! This example walks through what a viewer does with its mesh:
//! - Deriving texture coordinates and tangent frames after loading
//! - Smoothing, clustering and subdividing through the facade
//! - Handing GPU-ready buffers to a renderer after every change

use texmesh::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("texmesh Umbrella Crate Example");
    println!("==============================");

    let mesh = shapes::uv_sphere(16, 24);
    println!(
        "Created sphere with {} vertices and {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );

    // Stand-in for a renderer: report what would be re-uploaded
    let renderer = |mesh: &Mesh, changes: Changes| {
        let topology = if changes.contains(Changes::TOPOLOGY) { " (buffers resized)" } else { "" };
        println!(
            "  upload {:?}: {} vertices, {} indices{}",
            changes,
            mesh.vertex_count(),
            3 * mesh.triangle_count(),
            topology
        );
    };
    let mut viewer = SyncedMesh::new(mesh, renderer);
    viewer.sync_all();

    println!("\nDerived attributes:");
    let stats = viewer.init()?;
    let bounds = viewer
        .mesh()
        .bounding_box()
        .ok_or_else(|| anyhow::anyhow!("bounding box missing after init"))?;
    println!("- bounds {:?} .. {:?}", bounds.min, bounds.max);
    println!("- degenerate triangles: {}", stats.degenerate_triangles);

    let config = ViewerConfig::default();

    println!("\nSmoothing:");
    for preset in 0..config.smoothing_alphas.len() {
        if let Some(options) = config.smoothing(preset) {
            let stats = viewer.smooth(&options)?;
            let sphere = viewer.mesh().bounding_sphere()?;
            println!(
                "- alpha {}: radius now {:.4}, {} stationary vertices",
                options.alpha, sphere.radius, stats.stationary_vertices
            );
        }
    }

    println!("\nClustering:");
    let stats = viewer.cluster(&config.grid())?;
    println!(
        "- grid {}³: {} of {} cells occupied",
        config.grid_resolution, stats.occupied_cells, stats.cells
    );
    viewer.init()?;
    let stats = viewer.adaptive_simplify(config.leaf_capacity)?;
    println!("- octree: {} of {} leaves occupied", stats.occupied_cells, stats.cells);

    println!("\nSubdivision:");
    viewer.init()?;
    viewer.subdivide()?;

    let (mesh, _) = viewer.into_parts();
    let vertices = mesh.interleaved_vertices()?;
    let indices = mesh.index_buffer()?;
    println!(
        "- {} vertices ({} bytes), {} indices",
        vertices.len(),
        vertices.len() * GpuVertex::STRIDE,
        indices.len()
    );

    println!("\nExample completed successfully!");
    Ok(())
}
