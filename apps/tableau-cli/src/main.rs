use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use glam::{Vec2, Vec3};
use tableau_attr::AttributeArray;
use tableau_json::JsonBackend;
use tableau_scene::{
    BUILTIN_BACKENDS, Backend, Compatibility, Coords, DebugTextRenderer, Renderer, Scene,
    SceneConfig, SceneOverrides, backend_by_name,
};
use tableau_shapes::{BoxFrame, ConvexPolyhedra, Disks, Mesh, PrimitiveKind, Spheres};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tableau-cli", about = "CLI tool for tableau scenes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// What to do with primitives the backend can't draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Policy {
    /// Skip them with a warning
    Warn,
    /// Skip them silently
    Ignore,
    /// Fail the conversion
    Error,
}

impl From<Policy> for Compatibility {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Warn => Compatibility::Warn,
            Policy::Ignore => Compatibility::Ignore,
            Policy::Error => Compatibility::Error,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Show which primitive kinds each backend can draw
    Backends,
    /// Build a sample scene and convert it to a backend
    Demo {
        /// Target backend name
        #[arg(short, long, default_value = "json")]
        backend: String,
        /// What to do with unsupported primitives
        #[arg(short, long, value_enum, default_value = "warn")]
        compatibility: Policy,
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
        /// Number of spheres in the sample scene
        #[arg(short = 'n', long, default_value = "5")]
        particles: usize,
        /// Also write the converted scene as JSON to this file
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Convert a point between coordinate systems
    Transform {
        x: f32,
        y: f32,
        /// Source space: pixels_gui, pixels, ndc, or scene
        #[arg(long, default_value = "pixels_gui")]
        from: String,
        /// Destination space
        #[arg(long, default_value = "scene")]
        to: String,
        #[arg(long, default_value = "40")]
        width: f32,
        #[arg(long, default_value = "30")]
        height: f32,
        #[arg(long, default_value = "1")]
        zoom: f32,
        #[arg(long, default_value = "20")]
        pixel_scale: f32,
        /// Scene translation along x
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        tx: f32,
        /// Scene translation along y
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        ty: f32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("tableau-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", tableau_common::crate_info());
            println!("attr: {}", tableau_attr::crate_info());
            println!("shapes: {}", tableau_shapes::crate_info());
            println!("scene: {}", tableau_scene::crate_info());
            println!("json: {}", tableau_json::crate_info());
            println!("primitive kinds: {}", PrimitiveKind::ALL.len());
        }
        Commands::Backends => {
            print!("{}", support_matrix());
        }
        Commands::Demo {
            backend,
            compatibility,
            format,
            particles,
            save,
        } => {
            let compatibility = Compatibility::from(compatibility);
            let scene = sample_scene(particles)?;
            let converted = if backend == "json" {
                scene.convert(&JsonBackend::new(), compatibility, SceneOverrides::default())?
            } else {
                let table = backend_by_name(&backend)?;
                scene.convert(&table, compatibility, SceneOverrides::default())?
            };
            tracing::info!(
                backend = converted.backend(),
                kept = converted.len(),
                of = scene.len(),
                "converted sample scene"
            );

            match format {
                Format::Text => print!("{}", DebugTextRenderer::new().render(&converted)),
                Format::Json => println!("{}", JsonBackend::pretty().render(&converted)?),
            }

            if let Some(path) = save {
                JsonBackend::pretty().save(&converted, &path)?;
                println!("Saved: {}", path.display());
            }
        }
        Commands::Transform {
            x,
            y,
            from,
            to,
            width,
            height,
            zoom,
            pixel_scale,
            tx,
            ty,
        } => {
            let config = SceneConfig {
                size: Vec2::new(width, height),
                zoom,
                pixel_scale,
                translation: Vec3::new(tx, ty, SceneConfig::default().translation.z),
                ..SceneConfig::default()
            };
            let scene = Scene::new(config)?;
            if let Coords::Point(p) = scene.transform_named([x, y], &from, &to)? {
                println!("{from} ({x}, {y}) -> {to} ({}, {})", p.x, p.y);
            }
        }
    }

    Ok(())
}

/// One row per primitive kind, one column per backend.
fn support_matrix() -> String {
    let tables = BUILTIN_BACKENDS;
    let json = JsonBackend::new();
    let mut backends: Vec<&dyn Backend> = tables.iter().map(|b| b as &dyn Backend).collect();
    backends.push(&json);

    let mut out = format!("{:<22}", "");
    for backend in &backends {
        out.push_str(&format!("{:>11}", backend.name()));
    }
    out.push('\n');
    for kind in PrimitiveKind::ALL {
        out.push_str(&format!("{:<22}", kind.name()));
        for backend in &backends {
            let mark = if backend.supports(kind) { "x" } else { "." };
            out.push_str(&format!("{mark:>11}"));
        }
        out.push('\n');
    }
    out
}

/// Spheres on a line, a pair of disks, a box frame, a tetrahedron mesh,
/// and a pair of cubes.
fn sample_scene(particles: usize) -> anyhow::Result<Scene> {
    let positions: Vec<[f32; 3]> = (0..particles.max(1))
        .map(|i| [i as f32 * 1.5, 0.0, 0.0])
        .collect();
    let mut spheres = Spheres::from_attributes([("positions", positions)])?;
    spheres.set_diameters(1.0f32)?;

    let disks = Disks::from_attributes([
        ("positions", AttributeArray::from(vec![[-3.0f32, 2.0], [3.0, 2.0]])),
        ("colors", AttributeArray::from(vec![[0.9f32, 0.2, 0.2, 1.0], [0.2, 0.2, 0.9, 1.0]])),
    ])?;

    let frame = BoxFrame::from_lengths(&[12.0, 8.0, 6.0], 0.05, [0.0, 0.0, 0.0, 1.0])?;

    let tetrahedron = vec![
        [1.0f32, 1.0, 1.0],
        [1.0, -1.0, -1.0],
        [-1.0, 1.0, -1.0],
        [-1.0, -1.0, 1.0],
    ];
    let mut mesh = Mesh::from_attributes([("vertices", tetrahedron)])?;
    mesh.set_indices(vec![[0u32, 1, 2], [0, 2, 3], [0, 3, 1], [1, 3, 2]])?;

    let cube: Vec<[f32; 3]> = (0..8)
        .map(|i| [
            if i & 1 == 0 { -0.5 } else { 0.5 },
            if i & 2 == 0 { -0.5 } else { 0.5 },
            if i & 4 == 0 { -0.5 } else { 0.5 },
        ])
        .collect();
    let cubes = ConvexPolyhedra::from_attributes([
        ("vertices", AttributeArray::from(cube)),
        ("positions", AttributeArray::from(vec![[0.0f32, -4.0, 0.0], [4.0, -4.0, 0.0]])),
    ])?;

    let config = SceneConfig::default()
        .with_zoom(1.5)
        .with_feature("ambient_light", 0.25);
    let scene = Scene::with_primitives(
        config,
        [
            spheres.into_shape(),
            disks.into_shape(),
            frame.into_shape(),
            mesh.into_shape(),
            cubes.into_shape(),
        ],
    )?;
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compatibility_flag_is_validated() {
        let cli = Cli::try_parse_from(["tableau-cli", "demo", "-c", "ignore"]).unwrap();
        match cli.command {
            Commands::Demo { compatibility, .. } => {
                assert_eq!(Compatibility::from(compatibility), Compatibility::Ignore);
            }
            _ => panic!("expected demo"),
        }
        assert!(Cli::try_parse_from(["tableau-cli", "demo", "-c", "loud"]).is_err());
    }

    #[test]
    fn sample_scene_has_every_section() {
        let scene = sample_scene(4).unwrap();
        assert_eq!(scene.len(), 5);
        assert_eq!(scene.get(0).unwrap().len(), 4);
        assert_eq!(scene.get(2).unwrap().kind(), PrimitiveKind::Box);
        assert_eq!(scene.get(4).unwrap().len(), 2);
    }

    #[test]
    fn matrix_lists_every_kind_and_backend() {
        let matrix = support_matrix();
        let lines: Vec<&str> = matrix.lines().collect();
        assert_eq!(lines.len(), PrimitiveKind::ALL.len() + 1);
        assert!(lines[0].contains("blender") && lines[0].contains("json"));
        let voronoi = lines.iter().find(|l| l.starts_with("Voronoi")).unwrap();
        assert_eq!(voronoi.matches('x').count(), 2);
    }
}
