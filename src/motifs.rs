//! Motif geometry drawn around each dot of a grid.
//!
//! Motifs are returned as polylines in grid coordinates; sizes are
//! multiples of a `unit`, normally the dot spacing.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::grid::{Grid, Point};

const LOOP_RADIUS: f64 = 0.35;
const LINE_HALF_LENGTH: f64 = 0.35;
const ARC_RADIUS: f64 = 0.4;
const SPIRAL_RADIUS: f64 = 0.4;
const SPIRAL_TURNS: f64 = 2.5;
const LOOP_SAMPLES: usize = 120;
const ARC_SAMPLES: usize = 80;
const SPIRAL_SAMPLES: usize = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MotifStyle {
    #[default]
    Loop,
    Cross,
    Diagonal,
    Arc,
    Spiral,
    /// Lines to the right and lower neighbours.
    Tiling,
}

/// An open polyline.
pub type Path = Vec<(f64, f64)>;

pub fn loop_around_dot(center: Point, radius: f64) -> Path {
    sample_arc(center, radius, 0.0, 2.0 * PI, LOOP_SAMPLES)
}

pub fn cross_lines(center: Point, half: f64) -> Vec<Path> {
    let Point { x, y } = center;
    vec![
        vec![(x - half, y), (x + half, y)],
        vec![(x, y - half), (x, y + half)],
    ]
}

pub fn diagonal_cross(center: Point, half: f64) -> Vec<Path> {
    let Point { x, y } = center;
    vec![
        vec![(x - half, y - half), (x + half, y + half)],
        vec![(x - half, y + half), (x + half, y - half)],
    ]
}

/// Half circle opening to the left (`right == true`) or to the right.
pub fn arc_motif(center: Point, radius: f64, right: bool) -> Path {
    let (start, end) = if right {
        (-0.5 * PI, 0.5 * PI)
    } else {
        (0.5 * PI, 1.5 * PI)
    };
    sample_arc(center, radius, start, end, ARC_SAMPLES)
}

/// Archimedean spiral growing from the dot outwards.
pub fn spiral(center: Point, radius: f64, turns: f64) -> Path {
    let n = SPIRAL_SAMPLES;
    (0..n)
        .map(|i| {
            let t = i as f64 / (n - 1) as f64;
            let theta = 2.0 * PI * turns * t;
            let r = radius * t;
            (center.x + r * theta.cos(), center.y + r * theta.sin())
        })
        .collect()
}

pub fn line_between_dots(a: Point, b: Point) -> Path {
    vec![(a.x, a.y), (b.x, b.y)]
}

/// Polylines of one dot's motif. Neighbour lookups for [`MotifStyle::Tiling`]
/// are bounds-checked since rows may differ in length.
pub fn motif_for_dot(grid: &Grid, row: usize, col: usize, style: MotifStyle, unit: f64) -> Vec<Path> {
    let rows = grid.rows();
    let Some(&p) = rows.get(row).and_then(|r| r.get(col)) else {
        return Vec::new();
    };
    match style {
        MotifStyle::Loop => vec![loop_around_dot(p, LOOP_RADIUS * unit)],
        MotifStyle::Cross => cross_lines(p, LINE_HALF_LENGTH * unit),
        MotifStyle::Diagonal => diagonal_cross(p, LINE_HALF_LENGTH * unit),
        MotifStyle::Arc => vec![arc_motif(p, ARC_RADIUS * unit, true)],
        MotifStyle::Spiral => vec![spiral(p, SPIRAL_RADIUS * unit, SPIRAL_TURNS)],
        MotifStyle::Tiling => {
            let mut out = Vec::new();
            if let Some(&right) = rows[row].get(col + 1) {
                out.push(line_between_dots(p, right));
            }
            if let Some(&below) = rows.get(row + 1).and_then(|r| r.get(col)) {
                out.push(line_between_dots(p, below));
            }
            out
        }
    }
}

/// Motifs for every dot in row-major order, one entry per dot.
pub fn grid_motifs(grid: &Grid, style: MotifStyle, unit: f64) -> Vec<Vec<Path>> {
    grid.rows()
        .iter()
        .enumerate()
        .flat_map(|(r, row)| (0..row.len()).map(move |c| (r, c)))
        .map(|(r, c)| motif_for_dot(grid, r, c, style, unit))
        .collect()
}

fn sample_arc(center: Point, radius: f64, start: f64, end: f64, samples: usize) -> Path {
    (0..=samples)
        .map(|i| {
            let theta = start + (end - start) * i as f64 / samples as f64;
            (center.x + radius * theta.cos(), center.y + radius * theta.sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::build_grid_from_points;

    #[test]
    fn loop_is_closed() {
        let p = loop_around_dot(Point::new(1.0, 1.0), 0.5);
        let (first, last) = (p[0], p[p.len() - 1]);
        assert!((first.0 - last.0).abs() < 1e-9);
        assert!((first.1 - last.1).abs() < 1e-9);
    }

    #[test]
    fn tiling_skips_missing_neighbours() {
        // Second row is shorter than the first.
        let grid = build_grid_from_points(vec![(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)], 2.0);
        let corner = motif_for_dot(&grid, 0, 1, MotifStyle::Tiling, 1.0);
        assert!(corner.is_empty());
        let origin = motif_for_dot(&grid, 0, 0, MotifStyle::Tiling, 1.0);
        assert_eq!(origin.len(), 2);
    }
}
