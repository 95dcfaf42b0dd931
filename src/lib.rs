//! Kolam dot-grid reconstruction and symmetry analysis.
//!
//! Detected or synthetic dot centres are clustered into a [`grid::Grid`] of
//! rows, which [`symmetry::analyze_symmetries`] then tests for reflection and
//! quarter/half-turn symmetry under a positional tolerance.

pub mod config;
pub mod features;
pub mod grid;
pub mod grid_json;
pub mod kornia;
pub mod motifs;
pub mod plot_grid;
pub mod symmetry;

pub use grid::{
    DEFAULT_TOLERANCE, Grid, GridBounds, Point, Row, build_grid_from_points,
    build_synthetic_grid,
};
pub use symmetry::{SymmetryReport, analyze_symmetries};
