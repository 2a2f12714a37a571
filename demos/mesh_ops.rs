//! mesh_ops - run texmesh operations from the command line.
//!
//! Usage: mesh_ops [OPTIONS] <COMMAND>
//!
//! Meshes are read and written as JSON; without `--input` a procedural
//! shape is used. Run `mesh_ops --help` for available commands.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use texmesh::prelude::*;

#[derive(Parser)]
#[command(name = "mesh_ops")]
#[command(author, version, about = "Mesh geometry-processing CLI", long_about = None)]
struct Cli {
    /// Input mesh (JSON); a procedural shape is used when omitted
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    /// Procedural shape used without --input
    #[arg(long, value_enum, default_value = "sphere", global = true)]
    shape: Shape,

    /// Output mesh (JSON)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Viewer presets (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `texmesh_simplification=trace`
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Shape {
    Tetrahedron,
    Quad,
    Grid,
    Sphere,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info,

    /// Recompute normals and tangent frames
    Normals {
        /// Weight corners uniformly instead of by angle
        #[arg(long)]
        uniform: bool,
    },

    /// Laplacian smoothing
    Smooth {
        /// Smoothing preset from the viewer config (0-based)
        #[arg(short, long, conflicts_with = "alpha")]
        preset: Option<usize>,

        /// Smoothing factor, overrides the preset
        #[arg(short, long)]
        alpha: Option<f32>,

        /// Number of iterations
        #[arg(long, default_value = "1")]
        iterations: usize,

        /// Use uniform weights instead of cotangent weights
        #[arg(long)]
        uniform: bool,
    },

    /// Uniform grid vertex clustering
    Simplify {
        /// Cells per axis (defaults to the viewer config)
        #[arg(short, long)]
        resolution: Option<usize>,
    },

    /// Octree vertex clustering
    Adaptive {
        /// Vertices per leaf (defaults to the viewer config)
        #[arg(short, long)]
        capacity: Option<usize>,
    },

    /// Midpoint 1-to-4 subdivision
    Subdivide {
        /// Number of levels
        #[arg(short, long, default_value = "1")]
        levels: usize,
    },

    /// Print the default viewer config as JSON
    Config,
}

fn init_logger(level: &str) {
    let mut builder = env_logger::Builder::new();
    builder.target(env_logger::Target::Stderr);
    builder.filter_level(log::LevelFilter::Info);
    builder.parse_filters(level);

    if let Err(err) = builder.try_init() {
        eprintln!("Failed to initialize logger: {}", err);
    }
}

fn load_mesh(cli: &Cli) -> Result<Mesh> {
    let mut mesh = match &cli.input {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let mesh: Mesh = serde_json::from_str(&json)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            mesh
        }
        None => match cli.shape {
            Shape::Tetrahedron => shapes::tetrahedron(),
            Shape::Quad => shapes::unit_quad(),
            Shape::Grid => shapes::plane_grid(16),
            Shape::Sphere => shapes::uv_sphere(24, 32),
        },
    };

    let stats = mesh.init()?;
    log::info!(
        "loaded mesh: {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    if stats.degenerate_triangles > 0 {
        log::warn!("{} degenerate triangles", stats.degenerate_triangles);
    }
    Ok(mesh)
}

fn print_info(mesh: &Mesh) -> Result<()> {
    println!("Vertices:  {}", mesh.vertex_count());
    println!("Triangles: {}", mesh.triangle_count());
    if let Some(bounds) = mesh.bounding_box() {
        println!(
            "Bounds:    [{:.4}, {:.4}, {:.4}] .. [{:.4}, {:.4}, {:.4}]",
            bounds.x_min(),
            bounds.y_min(),
            bounds.z_min(),
            bounds.x_max(),
            bounds.y_max(),
            bounds.z_max()
        );
    }
    let sphere = mesh.bounding_sphere()?;
    println!(
        "Sphere:    centre [{:.4}, {:.4}, {:.4}], radius {:.4}",
        sphere.center.x, sphere.center.y, sphere.center.z, sphere.radius
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(&cli.log_level);

    let config = match &cli.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };

    if let Commands::Config = cli.command {
        println!("{}", config.to_json_string()?);
        return Ok(());
    }

    let mut mesh = load_mesh(&cli)?;
    let start = Instant::now();

    match &cli.command {
        Commands::Info | Commands::Config => {}
        Commands::Normals { uniform } => {
            let stats = mesh.recompute_per_vertex_normals(!uniform)?;
            log::info!("{} isolated vertices", stats.isolated_vertices);
        }
        Commands::Smooth {
            preset,
            alpha,
            iterations,
            uniform,
        } => {
            let base = match alpha {
                Some(alpha) => SmoothingOptions::new(*alpha, true).with_normals(config.normal_options()),
                None => {
                    let preset = preset.unwrap_or(0);
                    match config.smoothing(preset) {
                        Some(options) => options,
                        None => bail!(
                            "smoothing preset {} does not exist ({} configured)",
                            preset,
                            config.smoothing_alphas.len()
                        ),
                    }
                }
            };
            let options = base
                .with_iterations(*iterations)
                .with_cotangent_weights(!uniform && config.cotangent_weights);
            let stats = mesh.smooth(&options)?;
            log::info!(
                "smoothed with alpha {}: {} stationary vertices, {} skipped triangles",
                options.alpha,
                stats.stationary_vertices,
                stats.skipped_triangles
            );
        }
        Commands::Simplify { resolution } => {
            let options = config.grid().with_resolution(resolution.unwrap_or(config.grid_resolution));
            let stats = mesh.cluster(&options)?;
            log::info!("{} of {} cells occupied", stats.occupied_cells, stats.cells);
        }
        Commands::Adaptive { capacity } => {
            let options = OctreeClusteringOptions::new(capacity.unwrap_or(config.leaf_capacity))
                .with_max_depth(config.max_depth);
            let stats = mesh.cluster(&options)?;
            log::info!(
                "{} of {} leaves occupied, {} vertices outside",
                stats.occupied_cells,
                stats.cells,
                stats.unassigned_vertices
            );
        }
        Commands::Subdivide { levels } => {
            texmesh::algorithms::subdivide_times(&mut mesh, *levels, &config.normal_options())?;
        }
    }

    log::info!("done in {:.2?}", start.elapsed());
    print_info(&mesh)?;

    if let Some(path) = &cli.output {
        let json = serde_json::to_string(&mesh)?;
        std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}
