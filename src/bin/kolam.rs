use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use std::error::Error;
use std::path::PathBuf;

use kolam_grid::config::KolamConfig;
use kolam_grid::features::classify_pattern;
use kolam_grid::grid::{Grid, build_grid_from_points, build_synthetic_grid};
use kolam_grid::grid_json::{KolamAnalysis, write_analysis_json};
use kolam_grid::kornia::{annotate_dots, detect_dots};
use kolam_grid::motifs::MotifStyle;
use kolam_grid::plot_grid::{RenderOptions, save_animation_frames, save_kolam_png};
use kolam_grid::symmetry::analyze_symmetries;

#[derive(Parser, Debug)]
#[command(
    name = "kolam",
    about = "Rebuild kolam dot grids from a spec or an image and report their symmetries",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    output: OutputArgs,

    /// JSON config file; command-line flags override its values
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a rectangular dot grid
    Synthetic {
        #[arg(long, default_value_t = 5)]
        rows: usize,
        #[arg(long, default_value_t = 5)]
        cols: usize,
        /// Distance between neighbouring dots
        #[arg(long)]
        spacing: Option<f64>,
    },
    /// Detect dots in an image and cluster them into a grid
    Image {
        #[arg(long, short = 'i')]
        image: PathBuf,
        /// Save the source image with detected dots marked
        #[arg(long)]
        overlay: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Clustering and comparison tolerance
    #[arg(long, short = 't', global = true)]
    tolerance: Option<f64>,

    /// Motif drawn around each dot
    #[arg(long, short = 's', value_enum, global = true)]
    style: Option<MotifStyle>,

    /// Write the rendered kolam as PNG
    #[arg(long, short = 'p', global = true)]
    plot: Option<PathBuf>,

    /// Write one PNG per drawing step into this directory
    #[arg(long, global = true)]
    frames: Option<PathBuf>,

    /// Write grid and analysis as JSON
    #[arg(long, short = 'j', global = true)]
    json: Option<PathBuf>,
}

fn load_config(cli: &Cli) -> Result<KolamConfig, Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => KolamConfig::load(path)?,
        None => KolamConfig::default(),
    };
    if let Some(t) = cli.output.tolerance {
        config.tolerance = t;
    }
    if let Some(style) = cli.output.style {
        config.render.style = style;
    }
    if let Command::Synthetic {
        spacing: Some(s), ..
    } = cli.command
    {
        config.spacing = s;
    }
    config.validate()?;
    Ok(config)
}

fn build_grid(command: &Command, config: &KolamConfig) -> Result<Grid, Box<dyn Error>> {
    match command {
        Command::Synthetic { rows, cols, .. } => {
            Ok(build_synthetic_grid(*rows, *cols, config.spacing))
        }
        Command::Image { image, overlay } => {
            let img = image::open(image)
                .map_err(|e| format!("Failed to open {}: {e}", image.display()))?;
            let dots = detect_dots(&img, &config.detection)?;
            info!("detected {} dots in {}", dots.len(), image.display());
            if let Some(out) = overlay {
                if let Some(parent) = out.parent()
                    && !parent.as_os_str().is_empty()
                {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
                }
                annotate_dots(&img, &dots)
                    .save(out)
                    .map_err(|e| format!("Failed to write {}: {e}", out.display()))?;
                info!("wrote overlay {}", out.display());
            }
            Ok(build_grid_from_points(&dots, config.tolerance))
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = load_config(&cli)?;
    let grid = build_grid(&cli.command, &config)?;

    println!("Dots: {}", grid.point_count());
    if grid.is_empty() {
        println!("No pattern found");
        return Ok(());
    }
    println!("Rows: {}", grid.row_count());
    if !grid.is_rectangular() {
        warn!(
            "irregular grid: row lengths range from {} to {}",
            grid.min_row_len().unwrap_or(0),
            grid.max_row_len()
        );
    }

    let report = analyze_symmetries(&grid, config.tolerance);
    println!("Symmetry analysis:");
    for (name, holds) in report.iter() {
        println!(" - {name}: {holds}");
    }
    println!("Score: {:.2}", report.score());
    println!("Class: {}", classify_pattern(&report));

    if let Some(out) = &cli.output.json {
        write_analysis_json(out, &KolamAnalysis::new(&grid, report))?;
        info!("wrote analysis {}", out.display());
    }

    let render = RenderOptions {
        width: config.render.width,
        height: config.render.height,
        style: config.render.style,
        margin: config.render.margin,
        motif_unit: config.render.motif_unit,
    };

    if let Some(out) = &cli.output.plot {
        save_kolam_png(out, &grid, &render, None)?;
        info!("wrote plot {}", out.display());
    }
    if let Some(dir) = &cli.output.frames {
        save_animation_frames(dir, &grid, &render)?;
    }

    Ok(())
}
