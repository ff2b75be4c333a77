//! Numeric limits enforced by the bend engine.
//!
//! The defaults are the factory ranges of the press brake model. They are
//! plain values so that the settings layer can override them without the
//! engine depending on it.

use serde::{Deserialize, Serialize};

/// Minimum allowed dimension for sheet metal in mm
pub const MIN_SHEET_DIMENSION: f64 = 0.1;
/// Maximum allowed dimension for sheet metal in mm
pub const MAX_SHEET_DIMENSION: f64 = 10000.0;
/// Minimum inner bend radius in mm (0 is a sharp bend)
pub const MIN_BEND_RADIUS: f64 = 0.0;
/// Maximum inner bend radius in mm
pub const MAX_BEND_RADIUS: f64 = 500.0;
/// Minimum target angle in degrees (0 would be no bend)
pub const MIN_BEND_ANGLE: f64 = 1.0;
/// Maximum target angle in degrees (180 would be flat)
pub const MAX_BEND_ANGLE: f64 = 179.0;
/// Radii at or below this are treated as sharp and never warned about
pub const SHARP_RADIUS_EPSILON: f64 = 1e-6;
/// Fallback factor applied to thickness when a material has no factor
pub const FALLBACK_RADIUS_FACTOR: f64 = 0.5;

/// Allowed ranges for bend parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BendLimits {
    /// Minimum inner radius (inclusive)
    pub min_radius: f64,
    /// Maximum inner radius (inclusive)
    pub max_radius: f64,
    /// Minimum target angle (inclusive)
    pub min_angle: f64,
    /// Maximum target angle (inclusive)
    pub max_angle: f64,
}

impl Default for BendLimits {
    fn default() -> Self {
        Self {
            min_radius: MIN_BEND_RADIUS,
            max_radius: MAX_BEND_RADIUS,
            min_angle: MIN_BEND_ANGLE,
            max_angle: MAX_BEND_ANGLE,
        }
    }
}

impl BendLimits {
    /// Whether a radius lies inside the configured range
    pub fn radius_in_range(&self, radius: f64) -> bool {
        radius >= self.min_radius && radius <= self.max_radius
    }

    /// Whether an angle lies inside the configured range
    pub fn angle_in_range(&self, angle: f64) -> bool {
        angle >= self.min_angle && angle <= self.max_angle
    }
}

/// Allowed range for each sheet dimension
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetLimits {
    /// Minimum length, width, or thickness (inclusive)
    pub min_dimension: f64,
    /// Maximum length, width, or thickness (inclusive)
    pub max_dimension: f64,
}

impl Default for SheetLimits {
    fn default() -> Self {
        Self {
            min_dimension: MIN_SHEET_DIMENSION,
            max_dimension: MAX_SHEET_DIMENSION,
        }
    }
}

impl SheetLimits {
    /// Whether a dimension lies inside the configured range
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min_dimension && value <= self.max_dimension
    }
}
