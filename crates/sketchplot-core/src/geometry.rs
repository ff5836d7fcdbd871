//! Planar geometry primitives.
//!
//! Cartesian drawing-space points and the two-motor command pairs that a
//! CoreXY mechanism consumes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in Cartesian drawing space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    /// Create a new point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &Point2) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation towards `other` (`t` = 0 gives `self`, 1 gives `other`)
    pub fn lerp(&self, other: &Point2, t: f64) -> Point2 {
        Point2 {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

impl fmt::Display for Point2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// A position in motor space: the pair of commands for motors A and B
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotorPosition {
    pub a: f64,
    pub b: f64,
}

impl MotorPosition {
    /// Create a new motor-space position
    pub const fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }
}

impl fmt::Display for MotorPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[A {:.3}, B {:.3}]", self.a, self.b)
    }
}
