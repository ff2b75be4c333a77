//! Bend validation
//!
//! Decides whether a proposed bend may become a step on a given sheet.
//! Validation is a pure function of the sheet, the parameters, and the
//! configured limits.

use crate::sheet::SheetMetal;
use crate::step::BendParams;
use bendkit_core::limits::SHARP_RADIUS_EPSILON;
use bendkit_core::{BendLimits, RadiusWarning, ValidationError};

/// Verdict on a proposed bend
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    /// The bend may be appended
    Accepted,
    /// The bend may be appended once the caller confirms the warning
    AcceptedWithWarning(RadiusWarning),
    /// The bend violates a hard bound
    Rejected(ValidationError),
}

impl Validation {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Validation::Accepted)
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Validation::Rejected(_))
    }

    pub fn needs_confirmation(&self) -> bool {
        matches!(self, Validation::AcceptedWithWarning(_))
    }
}

/// Checks bend parameters against the configured ranges and the sheet
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BendValidator {
    limits: BendLimits,
}

impl BendValidator {
    pub fn new(limits: BendLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &BendLimits {
        &self.limits
    }

    /// Validate a bend against a sheet
    ///
    /// Checks run in order: position, radius, angle. The first violated
    /// bound is reported. The position must lie strictly inside the sheet;
    /// a bend exactly on either edge is rejected.
    pub fn validate(&self, sheet: &SheetMetal, position: f64, angle: f64, radius: f64) -> Validation {
        let length = sheet.original_length();
        if !(position > 0.0 && position < length) {
            return Validation::Rejected(ValidationError::PositionOutOfBounds { position, length });
        }

        if !self.limits.radius_in_range(radius) {
            return Validation::Rejected(ValidationError::RadiusOutOfRange {
                radius,
                min: self.limits.min_radius,
                max: self.limits.max_radius,
            });
        }

        if !self.limits.angle_in_range(angle) {
            return Validation::Rejected(ValidationError::AngleOutOfRange {
                angle,
                min: self.limits.min_angle,
                max: self.limits.max_angle,
            });
        }

        let min_recommended = sheet.min_bend_radius();
        if radius > SHARP_RADIUS_EPSILON && radius < min_recommended {
            return Validation::AcceptedWithWarning(RadiusWarning {
                radius,
                min_recommended,
            });
        }

        Validation::Accepted
    }

    /// Validate a parameter set
    pub fn validate_params(&self, sheet: &SheetMetal, params: &BendParams) -> Validation {
        self.validate(sheet, params.position, params.angle, params.radius)
    }
}
