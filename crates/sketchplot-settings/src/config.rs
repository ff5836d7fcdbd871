//! Pipeline configuration for Sketchplot
//!
//! Every constant the image-to-toolpath pipeline depends on lives here and is
//! passed explicitly into the pipeline entry point. The defaults reproduce the
//! canonical plotter setup; configuration files (JSON or TOML) exist so tests
//! and experiments can use alternate geometries.
//!
//! Configuration is organized into logical sections:
//! - Raster preprocessing (canonical size, threshold, padding, thinning)
//! - Geometry (target width, sampling, noise filtering)
//! - Program output (units, feed rate, pen servo, precision)
//! - External tracer invocation

use crate::error::{SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
pub use sketchplot_core::units::MeasurementSystem;
use std::fmt;
use std::path::{Path, PathBuf};

/// Canonical square raster side in pixels
pub const CANONICAL_SIZE: u32 = 512;
/// Binarization threshold on 0-255 intensities
pub const THRESHOLD: u8 = 127;
/// Background margin added around the skeleton, in pixels
pub const BORDER_PAD: u32 = 50;
/// Width of the finished drawing in machine units
pub const TARGET_WIDTH: f64 = 80.0;
/// Samples per path used to estimate the bounding box (fractions 0, 0.1, ..., 1.0)
pub const BBOX_SAMPLES: usize = 11;
/// Linear moves emitted per path
pub const EMIT_SAMPLES: usize = 10;
/// Paths shorter than this (raster pixels, before scaling) are tracer noise
pub const MIN_PATH_LENGTH: f64 = 2.0;
/// Default drawing feed rate
pub const FEED_RATE: u32 = 3000;
/// Spindle word used as the pen servo setting in the preamble
pub const PEN_SERVO_VALUE: u32 = 1000;

/// Structuring element for morphological erosion/dilation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructuringElement {
    /// 3x3 cross (centre plus its four edge neighbours)
    #[default]
    Cross,
    /// Full 3x3 square
    Square,
}

impl StructuringElement {
    /// Neighbour offsets `(dx, dy)` covered by the element, centre included
    pub fn offsets(&self) -> &'static [(i32, i32)] {
        match self {
            Self::Cross => &[(0, 0), (-1, 0), (1, 0), (0, -1), (0, 1)],
            Self::Square => &[
                (0, 0),
                (-1, -1),
                (0, -1),
                (1, -1),
                (-1, 0),
                (1, 0),
                (-1, 1),
                (0, 1),
                (1, 1),
            ],
        }
    }
}

impl fmt::Display for StructuringElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cross => write!(f, "cross"),
            Self::Square => write!(f, "square"),
        }
    }
}

/// Raster preprocessing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterSettings {
    /// Side of the square canonical raster
    pub canonical_size: u32,
    /// Intensities at or below this value become foreground
    pub threshold: u8,
    /// Background margin in pixels on every side
    pub border_pad: u32,
    /// Structuring element used by the skeleton extractor
    pub structuring_element: StructuringElement,
    /// Iteration cap for skeletonization (`None` means `width + height`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_skeleton_iterations: Option<usize>,
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            canonical_size: CANONICAL_SIZE,
            threshold: THRESHOLD,
            border_pad: BORDER_PAD,
            structuring_element: StructuringElement::Cross,
            max_skeleton_iterations: None,
        }
    }
}

/// Geometry normalization settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometrySettings {
    /// Width the drawing is scaled to
    pub target_width: f64,
    /// Samples per path for bounding box estimation
    pub bbox_samples: usize,
    /// Linear moves emitted per path
    pub emit_samples: usize,
    /// Minimum arc length (pre-scale) for a path to be drawn
    pub min_path_length: f64,
    /// Curve flattening tolerance in raster pixels
    pub flatten_tolerance: f64,
}

impl Default for GeometrySettings {
    fn default() -> Self {
        Self {
            target_width: TARGET_WIDTH,
            bbox_samples: BBOX_SAMPLES,
            emit_samples: EMIT_SAMPLES,
            min_path_length: MIN_PATH_LENGTH,
            flatten_tolerance: 0.05,
        }
    }
}

/// Motion program output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramSettings {
    /// Unit declaration emitted in the preamble
    pub units: MeasurementSystem,
    /// Feed rate declared in the preamble
    pub feed_rate: u32,
    /// Servo value sent with the pen-ready command
    pub pen_servo_value: u32,
    /// Decimals for coordinate fields
    pub decimals: usize,
    /// Prefix the program with `;` comments describing the run
    pub include_header_comments: bool,
}

impl Default for ProgramSettings {
    fn default() -> Self {
        Self {
            units: MeasurementSystem::Metric,
            feed_rate: FEED_RATE,
            pen_servo_value: PEN_SERVO_VALUE,
            decimals: 2,
            include_header_comments: false,
        }
    }
}

/// External tracer settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TracerSettings {
    /// Explicit tracer executable; looked up on PATH when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary: Option<PathBuf>,
    /// Kill the tracer after this many seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Additional command-line arguments
    pub extra_args: Vec<String>,
}

/// Complete pipeline configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Raster preprocessing
    pub raster: RasterSettings,
    /// Geometry normalization
    pub geometry: GeometrySettings,
    /// Program output
    pub program: ProgramSettings,
    /// External tracer
    pub tracer: TracerSettings,
}

impl PipelineConfig {
    /// Load config from file (JSON or TOML, chosen by extension)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match extension(path).as_deref() {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            other => {
                return Err(SettingsError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ))
            }
        };

        config.validate()?;
        tracing::debug!("Loaded pipeline config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match extension(path).as_deref() {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => toml::to_string_pretty(self)?,
            other => {
                return Err(SettingsError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ))
            }
        };

        std::fs::write(path, content).map_err(|e| {
            SettingsError::SaveError(format!("{}: {}", path.display(), e))
        })?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if self.raster.canonical_size == 0 {
            return Err(SettingsError::invalid(
                "raster.canonical_size",
                "must be > 0",
            ));
        }

        if self.raster.max_skeleton_iterations == Some(0) {
            return Err(SettingsError::invalid(
                "raster.max_skeleton_iterations",
                "must be > 0 when set",
            ));
        }

        let geometry = &self.geometry;
        if !geometry.target_width.is_finite() || geometry.target_width <= 0.0 {
            return Err(SettingsError::invalid(
                "geometry.target_width",
                "must be a positive number",
            ));
        }

        if geometry.bbox_samples < 2 {
            return Err(SettingsError::invalid(
                "geometry.bbox_samples",
                "must be at least 2",
            ));
        }

        if geometry.emit_samples == 0 {
            return Err(SettingsError::invalid(
                "geometry.emit_samples",
                "must be > 0",
            ));
        }

        if !geometry.min_path_length.is_finite() || geometry.min_path_length < 0.0 {
            return Err(SettingsError::invalid(
                "geometry.min_path_length",
                "must be >= 0",
            ));
        }

        if !geometry.flatten_tolerance.is_finite() || geometry.flatten_tolerance <= 0.0 {
            return Err(SettingsError::invalid(
                "geometry.flatten_tolerance",
                "must be a positive number",
            ));
        }

        if self.program.decimals > 6 {
            return Err(SettingsError::invalid(
                "program.decimals",
                "must be <= 6",
            ));
        }

        if self.tracer.timeout_secs == Some(0) {
            return Err(SettingsError::invalid(
                "tracer.timeout_secs",
                "must be > 0 when set",
            ));
        }

        Ok(())
    }

    /// Default location of the user config file (`<config dir>/sketchplot/config.toml`)
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("sketchplot").join("config.toml"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no configuration directory on this platform".into())
            })
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}
