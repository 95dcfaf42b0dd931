use std::path::Path;

use plotters::prelude::*;

use crate::grid::Grid;
use crate::motifs::{MotifStyle, grid_motifs};

const DOT_COLOR: RGBColor = RGBColor(45, 55, 72);
const MOTIF_COLOR: RGBColor = RGBColor(66, 153, 225);
const DOT_RADIUS: i32 = 3;
const MOTIF_STROKE: u32 = 2;

#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    #[error("canvas {0}x{1} is too large")]
    CanvasTooLarge(u32, u32),
    #[error("drawing failed: {0}")]
    Backend(String),
    #[error("failed to build RGBA image for {0}x{1} canvas")]
    Buffer(u32, u32),
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        source: image::ImageError,
    },
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: String,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub style: MotifStyle,
    /// Empty border kept around the pattern, in pixels.
    pub margin: u32,
    /// Motif size unit in grid coordinates. Falls back to the grid's median
    /// dot spacing, then to 1.
    pub motif_unit: Option<f64>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 600,
            height: 600,
            style: MotifStyle::default(),
            margin: 24,
            motif_unit: None,
        }
    }
}

/// Scale that fits the grid, plus half a motif unit of padding on every
/// side, into the canvas minus its margin.
fn fit_scale(grid: &Grid, unit: f64, opts: &RenderOptions) -> f64 {
    let b = grid.bounds();
    let span_x = (b.width() + unit).max(f64::EPSILON);
    let span_y = (b.height() + unit).max(f64::EPSILON);
    let avail_x = opts.width.saturating_sub(2 * opts.margin).max(1) as f64;
    let avail_y = opts.height.saturating_sub(2 * opts.margin).max(1) as f64;
    (avail_x / span_x).min(avail_y / span_y)
}

fn px((x, y): (f64, f64)) -> (i32, i32) {
    (x.round() as i32, y.round() as i32)
}

/// Renders dots and motifs into an RGBA buffer of `width * height * 4`
/// bytes. With `max_motifs` set, only that many dots (row-major) get their
/// motif, which yields successive animation frames.
pub fn render_kolam_rgba(
    grid: &Grid,
    opts: &RenderOptions,
    max_motifs: Option<usize>,
) -> Result<Vec<u8>, PlotError> {
    let (width, height) = (opts.width, opts.height);
    if width == 0 || height == 0 {
        return Ok(Vec::new());
    }
    let pixel_count = (width as usize)
        .checked_mul(height as usize)
        .ok_or(PlotError::CanvasTooLarge(width, height))?;

    let mut rgb = vec![255u8; pixel_count * 3];
    {
        let root = BitMapBackend::with_buffer(&mut rgb, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(backend)?;

        if !grid.is_empty() {
            let unit = opts
                .motif_unit
                .or_else(|| grid.median_spacing())
                .unwrap_or(1.0);
            let scale = fit_scale(grid, unit, opts);
            let placed = grid
                .scaled(scale)
                .centered_in(width as f64, height as f64);

            for p in placed.points() {
                root.draw(&Circle::new(px((p.x, p.y)), DOT_RADIUS, DOT_COLOR.filled()))
                    .map_err(backend)?;
            }

            let limit = max_motifs.unwrap_or(usize::MAX);
            let stroke = MOTIF_COLOR.stroke_width(MOTIF_STROKE);
            for paths in grid_motifs(&placed, opts.style, unit * scale)
                .into_iter()
                .take(limit)
            {
                for path in paths {
                    let pixels: Vec<(i32, i32)> = path.into_iter().map(px).collect();
                    root.draw(&PathElement::new(pixels, stroke)).map_err(backend)?;
                }
            }
        }

        root.present().map_err(backend)?;
    }

    Ok(rgb_to_rgba(&rgb))
}

/// Renders and writes a PNG, creating missing parent directories.
pub fn save_kolam_png(
    path: &Path,
    grid: &Grid,
    opts: &RenderOptions,
    max_motifs: Option<usize>,
) -> Result<(), PlotError> {
    let pixels = render_kolam_rgba(grid, opts, max_motifs)?;
    let rgba = image::RgbaImage::from_raw(opts.width, opts.height, pixels)
        .ok_or(PlotError::Buffer(opts.width, opts.height))?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        create_dir(parent)?;
    }
    rgba.save(path).map_err(|source| PlotError::Write {
        path: path.display().to_string(),
        source,
    })
}

/// Writes one PNG per drawing step (`frame_000.png`, ...) into `dir`:
/// frame `k` shows the motifs of the first `k + 1` dots. Returns the number
/// of frames written.
pub fn save_animation_frames(
    dir: &Path,
    grid: &Grid,
    opts: &RenderOptions,
) -> Result<usize, PlotError> {
    create_dir(dir)?;
    let frames = grid.point_count();
    for k in 0..frames {
        let out = dir.join(format!("frame_{k:03}.png"));
        save_kolam_png(&out, grid, opts, Some(k + 1))?;
    }
    log::info!("wrote {frames} frames to {}", dir.display());
    Ok(frames)
}

fn create_dir(dir: &Path) -> Result<(), PlotError> {
    std::fs::create_dir_all(dir).map_err(|source| PlotError::CreateDir {
        path: dir.display().to_string(),
        source,
    })
}

fn backend<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::Backend(e.to_string())
}

fn rgb_to_rgba(rgb: &[u8]) -> Vec<u8> {
    rgb.chunks_exact(3)
        .flat_map(|px| [px[0], px[1], px[2], 255])
        .collect()
}
