//! CoreXY Kinematic Transform
//!
//! Two belts, two motors, both axes: motor A turns by `x + y` and motor B by
//! `x - y`. The transform only accepts [`NormalizedPoint`]s, so it cannot be
//! applied to raw raster coordinates or to an already transformed pair.

use crate::scaling::NormalizedPoint;
use sketchplot_core::{MotorPosition, Point2};

/// Map a normalized Cartesian point to motor space
pub fn to_corexy(point: NormalizedPoint) -> MotorPosition {
    MotorPosition::new(point.x() + point.y(), point.x() - point.y())
}

/// Recover the Cartesian point commanded by a motor position
pub fn from_corexy(position: MotorPosition) -> Point2 {
    Point2::new(
        (position.a + position.b) / 2.0,
        (position.a - position.b) / 2.0,
    )
}
