use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::features::{Features, PatternClass, classify_pattern, extract_features};
use crate::grid::Grid;
use crate::symmetry::SymmetryReport;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Everything known about one analysed pattern.
#[derive(Debug, Clone, Serialize)]
pub struct KolamAnalysis<'a> {
    pub rows: usize,
    pub dots: usize,
    pub grid: &'a Grid,
    pub symmetries: SymmetryReport,
    pub score: f64,
    pub class: PatternClass,
    pub features: Features,
}

impl<'a> KolamAnalysis<'a> {
    pub fn new(grid: &'a Grid, symmetries: SymmetryReport) -> Self {
        Self {
            rows: grid.row_count(),
            dots: grid.point_count(),
            grid,
            symmetries,
            score: symmetries.score(),
            class: classify_pattern(&symmetries),
            features: extract_features(grid.points()),
        }
    }
}

pub fn analysis_json_string(analysis: &KolamAnalysis<'_>) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(analysis)?)
}

pub fn write_analysis_json(path: &Path, analysis: &KolamAnalysis<'_>) -> Result<(), ExportError> {
    let s = analysis_json_string(analysis)?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| ExportError::Write {
            path: parent.display().to_string(),
            source,
        })?;
    }
    fs::write(path, s).map_err(|source| ExportError::Write {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::build_synthetic_grid;
    use crate::symmetry::analyze_symmetries;

    #[test]
    fn grid_serializes_as_nested_pairs() {
        let grid = build_synthetic_grid(2, 2, 10.0);
        let report = analyze_symmetries(&grid, 12.0);
        let value: serde_json::Value =
            serde_json::from_str(&analysis_json_string(&KolamAnalysis::new(&grid, report)).unwrap())
                .unwrap();
        assert_eq!(value["rows"], 2);
        assert_eq!(value["dots"], 4);
        assert_eq!(value["grid"][1][0], serde_json::json!([0.0, 10.0]));
        assert_eq!(value["symmetries"]["rotation_90"], true);
        assert_eq!(value["class"], "symmetric");
    }
}
