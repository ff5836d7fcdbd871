//! # Sketchplot Core
//!
//! Core types and utilities shared by the Sketchplot crates.
//! Provides the error taxonomy for every pipeline stage, the planar geometry
//! primitives used between tracing and G-code emission, and unit handling.

pub mod error;
pub mod geometry;
pub mod units;

pub use error::{
    Error, PipelineError, RasterError, Result, SkeletonError, SourceError, Stage, TracerError,
};
pub use geometry::{MotorPosition, Point2};
pub use units::MeasurementSystem;
