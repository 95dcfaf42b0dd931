//! Reflection and rotation checks on dot grids.
//!
//! Every transform works on grid *indices*: rows and positions within rows
//! are reordered, coordinates are never recomputed. Comparing a transformed
//! grid against the original then tells whether the dot positions line up
//! under that reordering.

use serde::Serialize;

use crate::grid::{DEFAULT_TOLERANCE, Grid, Row};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SymmetryError {
    #[error("grid has no rows; column count is undefined")]
    EmptyGrid,
}

/// Outcome of [`analyze_symmetries`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SymmetryReport {
    pub horizontal_reflection: bool,
    pub vertical_reflection: bool,
    pub rotation_90: bool,
    pub rotation_180: bool,
}

impl SymmetryReport {
    pub const NAMES: [&'static str; 4] = [
        "horizontal_reflection",
        "vertical_reflection",
        "rotation_90",
        "rotation_180",
    ];

    /// `(name, holds)` pairs in a fixed order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, bool)> {
        Self::NAMES.into_iter().zip([
            self.horizontal_reflection,
            self.vertical_reflection,
            self.rotation_90,
            self.rotation_180,
        ])
    }

    /// Fraction of the four symmetries that hold.
    pub fn score(&self) -> f64 {
        self.iter().filter(|(_, v)| *v).count() as f64 / Self::NAMES.len() as f64
    }
}

/// Swaps top and bottom: row order reversed, rows untouched.
pub fn reflect_horizontal(grid: &Grid) -> Grid {
    Grid::new(grid.rows().iter().rev().cloned().collect())
}

/// Swaps left and right within every row.
pub fn reflect_vertical(grid: &Grid) -> Grid {
    Grid::new(
        grid.rows()
            .iter()
            .map(|row| row.iter().rev().copied().collect())
            .collect(),
    )
}

/// Column-major regrouping. Only the first `min_row_len` columns survive;
/// points past the shortest row are dropped.
pub fn transpose(grid: &Grid) -> Result<Grid, SymmetryError> {
    let ncols = grid.min_row_len().ok_or(SymmetryError::EmptyGrid)?;
    let rows = grid.rows();
    let out: Vec<Row> = (0..ncols)
        .map(|c| rows.iter().map(|row| row[c]).collect())
        .collect();
    Ok(Grid::new(out))
}

/// Index rotation by a quarter turn: transpose, then reverse each row.
pub fn rotate90(grid: &Grid) -> Result<Grid, SymmetryError> {
    let t = transpose(grid)?;
    Ok(reflect_vertical(&t))
}

pub fn rotate180(grid: &Grid) -> Result<Grid, SymmetryError> {
    rotate90(&rotate90(grid)?)
}

/// Shape must match exactly; each point pair must agree within `tolerance`
/// on x and on y separately.
pub fn grids_equal(a: &Grid, b: &Grid, tolerance: f64) -> bool {
    if a.row_count() != b.row_count() {
        return false;
    }
    a.rows().iter().zip(b.rows()).all(|(ra, rb)| {
        ra.len() == rb.len()
            && ra.iter().zip(rb).all(|(p, q)| {
                (p.x - q.x).abs() <= tolerance && (p.y - q.y).abs() <= tolerance
            })
    })
}

/// Runs the four symmetry checks independently. A rotation that cannot be
/// computed counts as absent.
pub fn analyze_symmetries(grid: &Grid, tolerance: f64) -> SymmetryReport {
    let rotation_holds = |rotated: Result<Grid, SymmetryError>, label: &str| match rotated {
        Ok(r) => grids_equal(grid, &r, tolerance),
        Err(e) => {
            log::debug!("{label} skipped: {e}");
            false
        }
    };

    let report = SymmetryReport {
        horizontal_reflection: grids_equal(grid, &reflect_horizontal(grid), tolerance),
        vertical_reflection: grids_equal(grid, &reflect_vertical(grid), tolerance),
        rotation_90: rotation_holds(rotate90(grid), "rotation_90"),
        rotation_180: rotation_holds(rotate180(grid), "rotation_180"),
    };
    log::debug!("symmetry report {report:?}");
    report
}

/// [`analyze_symmetries`] with [`DEFAULT_TOLERANCE`].
pub fn analyze_symmetries_default(grid: &Grid) -> SymmetryReport {
    analyze_symmetries(grid, DEFAULT_TOLERANCE)
}
