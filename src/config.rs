//! Runtime configuration, read from an optional JSON file.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```json
//! { "tolerance": 8.0, "detection": { "min_component_pixels": 12 } }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::grid::DEFAULT_TOLERANCE;
use crate::kornia::DotConfig;
use crate::motifs::MotifStyle;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KolamConfig {
    /// Row-band tolerance for clustering and per-axis tolerance for
    /// symmetry comparison.
    pub tolerance: f64,
    /// Dot spacing used by synthetic grids.
    pub spacing: f64,
    pub detection: DotConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    pub style: MotifStyle,
    /// Motif size unit; the grid's dot spacing when unset.
    pub motif_unit: Option<f64>,
}

impl Default for KolamConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            spacing: 1.0,
            detection: DotConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 600,
            margin: 24,
            style: MotifStyle::Loop,
            motif_unit: None,
        }
    }
}

impl KolamConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: KolamConfig =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges; returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "tolerance must be a finite value >= 0, got {}",
                self.tolerance
            )));
        }
        if !self.spacing.is_finite() || self.spacing <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "spacing must be > 0, got {}",
                self.spacing
            )));
        }
        let d = &self.detection;
        if d.min_component_pixels > d.max_component_pixels {
            return Err(ConfigError::Invalid(format!(
                "min_component_pixels ({}) exceeds max_component_pixels ({})",
                d.min_component_pixels, d.max_component_pixels
            )));
        }
        if self.render.width == 0 || self.render.height == 0 {
            return Err(ConfigError::Invalid(
                "render width and height must be > 0".to_string(),
            ));
        }
        if let Some(unit) = self.render.motif_unit
            && !(unit.is_finite() && unit > 0.0)
        {
            return Err(ConfigError::Invalid(format!(
                "motif_unit must be > 0, got {unit}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: KolamConfig =
            serde_json::from_str(r#"{ "tolerance": 4.0, "render": { "style": "spiral" } }"#)
                .expect("parse");
        assert_eq!(cfg.tolerance, 4.0);
        assert_eq!(cfg.spacing, 1.0);
        assert_eq!(cfg.render.style, MotifStyle::Spiral);
        assert_eq!(cfg.render.width, 600);
        assert_eq!(cfg.detection, DotConfig::default());
    }

    #[test]
    fn negative_tolerance_is_rejected() {
        let cfg = KolamConfig {
            tolerance: -1.0,
            ..KolamConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn defaults_are_valid() {
        assert!(KolamConfig::default().validate().is_ok());
    }
}
