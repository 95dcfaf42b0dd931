//! Plain numeric features of a dot set and a symmetry-based pattern label.

use serde::Serialize;

use crate::grid::Point;
use crate::symmetry::SymmetryReport;

/// Spreads closer than this count as a square footprint.
pub const SQUARE_SPREAD_MARGIN: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Features {
    pub dot_count: usize,
    pub spread_x: f64,
    pub spread_y: f64,
    pub near_square: bool,
}

impl Features {
    /// `[dot_count, spread_x, spread_y, near_square]` for downstream models.
    pub fn to_vector(&self) -> [f64; 4] {
        [
            self.dot_count as f64,
            self.spread_x,
            self.spread_y,
            if self.near_square { 1.0 } else { 0.0 },
        ]
    }
}

pub fn extract_features<'a>(points: impl IntoIterator<Item = &'a Point>) -> Features {
    let mut count = 0usize;
    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in points {
        count += 1;
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }
    if count == 0 {
        return Features::default();
    }
    let spread_x = max_x - min_x;
    let spread_y = max_y - min_y;
    Features {
        dot_count: count,
        spread_x,
        spread_y,
        near_square: (spread_x - spread_y).abs() < SQUARE_SPREAD_MARGIN,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternClass {
    Symmetric,
    Tiling,
    Freeform,
}

impl std::fmt::Display for PatternClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PatternClass::Symmetric => "symmetric",
            PatternClass::Tiling => "tiling",
            PatternClass::Freeform => "freeform",
        };
        f.write_str(s)
    }
}

/// Three or more symmetries: symmetric; at least one: tiling.
pub fn classify_pattern(report: &SymmetryReport) -> PatternClass {
    let score = report.score();
    if score >= 0.75 {
        PatternClass::Symmetric
    } else if score >= 0.25 {
        PatternClass::Tiling
    } else {
        PatternClass::Freeform
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::build_synthetic_grid;

    #[test]
    fn empty_input_has_zero_features() {
        assert_eq!(extract_features(&[]), Features::default());
    }

    #[test]
    fn lattice_spread() {
        let grid = build_synthetic_grid(3, 5, 10.0);
        let f = extract_features(grid.points());
        assert_eq!(f.dot_count, 15);
        assert_eq!(f.spread_x, 40.0);
        assert_eq!(f.spread_y, 20.0);
        assert!(f.near_square);
        assert_eq!(f.to_vector(), [15.0, 40.0, 20.0, 1.0]);
    }

    #[test]
    fn classification_thresholds() {
        let mut report = SymmetryReport::default();
        assert_eq!(classify_pattern(&report), PatternClass::Freeform);
        report.rotation_180 = true;
        assert_eq!(classify_pattern(&report), PatternClass::Tiling);
        report.horizontal_reflection = true;
        report.vertical_reflection = true;
        assert_eq!(classify_pattern(&report), PatternClass::Symmetric);
    }
}
