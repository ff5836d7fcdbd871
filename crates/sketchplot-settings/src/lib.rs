//! Sketchplot Settings Crate
//!
//! Handles pipeline configuration, its persistence, and validation.

pub mod config;
pub mod error;

pub use config::{
    GeometrySettings, MeasurementSystem, PipelineConfig, ProgramSettings, RasterSettings,
    StructuringElement, TracerSettings,
};
pub use error::{SettingsError, SettingsResult};
