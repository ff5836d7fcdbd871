//! Sketchplot CAM tools
//!
//! Turns a line-art raster into a CoreXY pen plotter program:
//!
//! 1. [`raster::normalize`]: decode, resize to the canonical square, binarize
//! 2. [`skeleton::skeletonize`]: reduce strokes to one-pixel-wide lines
//! 3. [`padding::pad`]: add a background margin
//! 4. [`tracer::Tracer`]: vectorize into continuous paths (potrace)
//! 5. [`scaling::ScaleTransform`]: move to the origin, scale to the target width
//! 6. [`corexy::to_corexy`]: map to motor space
//! 7. [`program::ProgramEmitter`]: write G-code
//!
//! [`pipeline::SketchPipeline`] runs all of them in order.

pub mod corexy;
pub mod error;
pub mod padding;
pub mod path;
pub mod pipeline;
pub mod program;
pub mod raster;
pub mod scaling;
pub mod skeleton;
pub mod source;
pub mod tracer;

pub use corexy::{from_corexy, to_corexy};
pub use error::{FileFormatError, FileFormatResult};
pub use padding::{pad, PaddedRaster};
pub use path::{PathSet, TracedPath};
pub use pipeline::{SketchOutcome, SketchPipeline, SketchResult};
pub use program::{Instruction, MotionProgram, ProgramEmitter};
pub use raster::{normalize, BinaryRaster};
pub use scaling::{NormalizedPoint, SampledBounds, ScaleTransform};
pub use skeleton::{skeletonize, Skeletonization};
pub use source::{compose_prompt, FileImageSource, ImageSource, DEFAULT_STYLE};
pub use tracer::{parse_svg, PotraceTracer, Tracer};
