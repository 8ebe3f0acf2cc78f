//! Cornice CLI - mesh inspection, subdivision and analysis.
//!
//! Usage: cornice <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `cornice --help` for available commands. Set `RUST_LOG=debug` for
//! build and subdivision details.

use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};

use cornice::algo::analysis::{self, CheckerboardOptions};
use cornice::algo::subdivide::{self, SplitThresholds, SubdivideOptions};
use cornice::algo::Progress;
use cornice::io;
use cornice::mesh::TriMesh;

#[derive(Parser)]
#[command(name = "cornice")]
#[command(author, version, about = "Corner-table mesh CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input mesh file
        input: PathBuf,
    },

    /// Subdivide a mesh
    Subdivide {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Subdivision method
        #[arg(short, long, value_enum, default_value = "regular")]
        method: SubdivideMethod,

        /// Number of subdivision iterations
        #[arg(short, long, default_value = "1")]
        iterations: usize,

        /// Corners wider than this keep their triangle (degrees, irregular only)
        #[arg(long, default_value = "90")]
        obtuse: f64,

        /// Sliver tip angle (degrees, irregular only)
        #[arg(long, default_value = "30")]
        small: f64,

        /// Minimum angle of the other two sliver corners (degrees, irregular only)
        #[arg(long, default_value = "60")]
        wide: f64,

        /// Slivers below this fraction of the average area are kept (irregular only)
        #[arg(long, default_value = "0.25")]
        min_area_fraction: f64,
    },

    /// Color vertices by an analysis and print its summary
    Analyze {
        /// Input mesh file
        input: PathBuf,

        /// Analysis to run
        #[arg(short, long, value_enum, default_value = "valence")]
        kind: AnalysisKind,

        /// Checker cell size (checkerboard only)
        #[arg(short, long, default_value = "0.1")]
        period: f64,

        /// Write the colored mesh here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum SubdivideMethod {
    /// Split every triangle into four
    Regular,
    /// Split slivers along two edges, keep obtuse triangles
    Irregular,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum AnalysisKind {
    /// Valence deficit (6 - valence)
    Valence,
    /// Angle deficit (2π - angle sum)
    Angle,
    /// Object-space checker pattern
    Checkerboard,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => {
            cmd_info(&input)?;
        }

        Commands::Subdivide {
            input,
            output,
            method,
            iterations,
            obtuse,
            small,
            wide,
            min_area_fraction,
        } => {
            let thresholds = SplitThresholds::from_degrees(obtuse, small, wide)
                .with_min_area_fraction(min_area_fraction);
            let options = SubdivideOptions::new(iterations).with_thresholds(thresholds);
            cmd_subdivide(&input, &output, method, &options)?;
        }

        Commands::Analyze {
            input,
            kind,
            period,
            output,
        } => {
            cmd_analyze(&input, kind, period, output.as_ref())?;
        }
    }

    Ok(())
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    let max_percent = AtomicUsize::new(0);

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let percent = if current >= total {
            100
        } else {
            (current * 100) / total
        };

        // Only redraw when the bar moves forward
        let previous = max_percent.fetch_max(percent, Ordering::Relaxed);
        if percent <= previous && percent != 100 {
            return;
        }

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        let bar = "=".repeat(filled);
        let space = " ".repeat(bar_width - filled);

        eprint!("\r[{}{}] {:3}% {}", bar, space, percent, message);
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn cmd_info(input: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = io::load(input)?;
    let stats = mesh.stats();

    println!("File: {}", input.display());
    println!("Vertices: {}", stats.vertices);
    println!("Edges: {}", stats.edges);
    println!("Triangles: {}", stats.triangles);
    println!("Corners: {}", stats.corners);
    println!("Euler characteristic (V - E + F): {}", stats.euler_characteristic);

    println!("Surface area: {:.6}", mesh.surface_area());
    let (min_area, max_area) = mesh
        .triangles()
        .fold((f64::MAX, 0.0_f64), |(lo, hi), (_, t)| (lo.min(t.area), hi.max(t.area)));
    println!("Triangle area range: [{:.6}, {:.6}]", min_area, max_area);

    let sphere = mesh.bounding_sphere();
    println!(
        "Bounding sphere: center ({:.3}, {:.3}, {:.3}), radius {:.3}",
        sphere.center.x, sphere.center.y, sphere.center.z, sphere.radius
    );
    println!("Orientation: {:?}", mesh.orientation());

    if stats.boundary_edges == 0 {
        println!("Topology: Closed (no boundary)");
    } else {
        println!("Topology: Open ({} boundary edges)", stats.boundary_edges);
    }
    if stats.non_manifold_edges > 0 {
        println!("Non-manifold edges: {}", stats.non_manifold_edges);
    }

    Ok(())
}

fn cmd_subdivide(
    input: &PathBuf,
    output: &PathBuf,
    method: SubdivideMethod,
    options: &SubdivideOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh: TriMesh = io::load(input)?;
    println!("Loaded: {} vertices, {} triangles", mesh.num_vertices(), mesh.num_triangles());

    let progress = create_progress();
    let start = Instant::now();

    let stats = match method {
        SubdivideMethod::Regular => {
            println!("Applying regular subdivision ({} iterations)...", options.iterations);
            subdivide::regular_subdivide_with_progress(&mut mesh, options, &progress)?
        }
        SubdivideMethod::Irregular => {
            println!("Applying irregular subdivision ({} iterations)...", options.iterations);
            subdivide::irregular_subdivide_with_progress(&mut mesh, options, &progress)?
        }
    };

    let elapsed = start.elapsed();

    println!("Result: {} vertices, {} triangles", mesh.num_vertices(), mesh.num_triangles());
    if method == SubdivideMethod::Irregular {
        println!(
            "Splits: {} three-edge, {} two-edge; kept {} obtuse, {} small",
            stats.three_edge_splits, stats.two_edge_splits, stats.kept, stats.small_kept
        );
    }
    io::save(&mesh, output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}

fn cmd_analyze(
    input: &PathBuf,
    kind: AnalysisKind,
    period: f64,
    output: Option<&PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh: TriMesh = io::load(input)?;

    match kind {
        AnalysisKind::Valence => {
            let summary = analysis::valence_deficit(&mut mesh);
            println!("Total valence deficit: {}", summary.total());
            println!("Vertices with positive deficit: {}", summary.positive_count());
        }
        AnalysisKind::Angle => {
            let summary = analysis::angle_deficit(&mut mesh);
            println!("Total angle deficit: {:.6}", summary.total());
            println!(
                "Gauss-Bonnet Euler characteristic: {:.2}",
                summary.total() / (2.0 * std::f64::consts::PI)
            );
            println!("Vertices with positive deficit: {}", summary.positive_count());
        }
        AnalysisKind::Checkerboard => {
            analysis::checkerboard(&mut mesh, &CheckerboardOptions::new(period))?;
            println!("Checkerboard applied (period {})", period);
        }
    }

    if let Some(output) = output {
        io::save_with_colors(&mesh, output)?;
        println!("Saved: {}", output.display());
    }

    Ok(())
}
