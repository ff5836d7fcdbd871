//! Unit handling
//!
//! Selects the G-code unit declaration for emitted programs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Measurement system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    /// Metric system (mm)
    #[default]
    Metric,
    /// Imperial system (inches)
    Imperial,
}

impl MeasurementSystem {
    /// The G-code word that declares this unit system
    pub fn gcode_declaration(&self) -> &'static str {
        match self {
            Self::Metric => "G21",
            Self::Imperial => "G20",
        }
    }

    /// Short unit suffix for comments and logs
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Metric => "mm",
            Self::Imperial => "in",
        }
    }
}

impl fmt::Display for MeasurementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "Metric"),
            Self::Imperial => write!(f, "Imperial"),
        }
    }
}

impl FromStr for MeasurementSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" | "mm" => Ok(Self::Metric),
            "imperial" | "inch" | "in" => Ok(Self::Imperial),
            _ => Err(format!("Unknown measurement system: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration() {
        assert_eq!(MeasurementSystem::Metric.gcode_declaration(), "G21");
        assert_eq!(MeasurementSystem::Imperial.gcode_declaration(), "G20");
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "mm".parse::<MeasurementSystem>(),
            Ok(MeasurementSystem::Metric)
        );
        assert_eq!(
            "Inch".parse::<MeasurementSystem>(),
            Ok(MeasurementSystem::Imperial)
        );
        assert!("furlong".parse::<MeasurementSystem>().is_err());
    }
}
