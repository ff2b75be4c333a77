//! Error handling for BendKit
//!
//! Provides the error kinds of the bend engine:
//! - Validation errors (a proposed bend is out of its configured bounds)
//! - Precondition errors (missing job, sheet, tooling, or catalog entry)
//! - Construction errors (invalid sheet, job, or material definitions)
//!
//! A [`RadiusWarning`] is deliberately not an error: it describes a bend that
//! may proceed once the caller confirms it.
//!
//! All error types use `thiserror` for ergonomic error handling.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Validation error type
///
/// A proposed bend parameter (or its textual form) violates a configured
/// bound. Never accompanied by a state change.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The bend line does not fall strictly inside the sheet length
    #[error("bend position ({position:.2}mm) is outside sheet length (0-{length:.2}mm)")]
    PositionOutOfBounds {
        /// The requested bend position.
        position: f64,
        /// The sheet's flat length.
        length: f64,
    },

    /// The inner bend radius is outside the configured range
    #[error("bend radius ({radius:.2}mm) is outside allowed range ({min:.2}-{max:.2}mm)")]
    RadiusOutOfRange {
        /// The requested radius.
        radius: f64,
        /// Lower bound (inclusive).
        min: f64,
        /// Upper bound (inclusive).
        max: f64,
    },

    /// The target angle is outside the configured range
    #[error("bend angle ({angle:.2}°) is outside allowed range ({min:.1}-{max:.1}°)")]
    AngleOutOfRange {
        /// The requested angle.
        angle: f64,
        /// Lower bound (inclusive).
        min: f64,
        /// Upper bound (inclusive).
        max: f64,
    },

    /// A numeric field could not be parsed
    #[error("invalid number for {field}: '{input}'")]
    InvalidNumber {
        /// The name of the field being parsed.
        field: String,
        /// The raw text supplied.
        input: String,
    },

    /// The bend direction token is unknown
    #[error("unknown bend direction '{0}' (expected Up or Down)")]
    UnknownDirection(String),
}

/// Precondition error type
///
/// The operation was refused because the engine is not in a state where it
/// can run. State is left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreconditionError {
    /// No job is currently selected
    #[error("no current job selected")]
    NoCurrentJob,

    /// The current job has no sheet attached
    #[error("current job has no sheet defined")]
    NoSheet,

    /// Punch or die is not selected on the press brake
    #[error("tooling not set")]
    ToolingNotSet,

    /// Execution was requested for a job without a sheet
    #[error("job or sheet is nil")]
    MissingJobOrSheet,

    /// Material name is not in the catalog
    #[error("unknown material: {0}")]
    UnknownMaterial(String),

    /// Punch name is not in the catalog
    #[error("unknown punch: {0}")]
    UnknownPunch(String),

    /// Die name is not in the catalog
    #[error("unknown die: {0}")]
    UnknownDie(String),

    /// The press brake cannot take this request in its current mode
    #[error("press brake unavailable: {0}")]
    MachineUnavailable(String),

    /// A proposal was committed after its job or sheet changed
    #[error("bend proposal is stale: {reason}")]
    StaleProposal {
        /// What changed since the proposal was made.
        reason: String,
    },
}

/// Construction error type
///
/// A sheet, job, or material could not be created. The previous entity, if
/// any, remains valid and in place.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConstructionError {
    /// Sheet identity is empty
    #[error("sheet id cannot be empty")]
    EmptySheetId,

    /// One or more sheet dimensions are not positive
    #[error("sheet dimensions must be positive (L:{length:.2}, W:{width:.2}, T:{thickness:.2})")]
    NonPositiveDimensions {
        /// Requested length.
        length: f64,
        /// Requested width.
        width: f64,
        /// Requested thickness.
        thickness: f64,
    },

    /// A sheet dimension is outside the global dimension range
    #[error("sheet {field} ({value:.2}mm) out of range ({min:.1}-{max:.1}mm)")]
    DimensionOutOfRange {
        /// The dimension name.
        field: String,
        /// The requested value.
        value: f64,
        /// Lower bound (inclusive).
        min: f64,
        /// Upper bound (inclusive).
        max: f64,
    },

    /// Sheet material is unspecified
    #[error("material must be specified")]
    MissingMaterial,

    /// Job name is empty
    #[error("job name cannot be empty")]
    EmptyJobName,

    /// Material properties are invalid
    #[error("invalid material '{name}': {reason}")]
    InvalidMaterial {
        /// The material name.
        name: String,
        /// Why the definition was refused.
        reason: String,
    },
}

/// Soft radius condition
///
/// The requested radius is below the recommended minimum for the sheet's
/// material and thickness. It may still be used after explicit confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadiusWarning {
    /// The requested inner radius.
    pub radius: f64,
    /// The minimum recommended inner radius for the sheet.
    pub min_recommended: f64,
}

impl fmt::Display for RadiusWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "radius ({:.2}mm) < recommended min ({:.2}mm), may cause cracking",
            self.radius, self.min_recommended
        )
    }
}

/// Main error type for BendKit
///
/// A unified error type that can represent any error from the engine.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Validation error
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Precondition error
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    /// Construction error
    #[error(transparent)]
    Construction(#[from] ConstructionError),
}

impl Error {
    /// Check if this is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// Check if this is a precondition error
    pub fn is_precondition_error(&self) -> bool {
        matches!(self, Error::Precondition(_))
    }

    /// Check if this is a construction error
    pub fn is_construction_error(&self) -> bool {
        matches!(self, Error::Construction(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::PositionOutOfBounds {
            position: 300.0,
            length: 300.0,
        };
        assert_eq!(
            err.to_string(),
            "bend position (300.00mm) is outside sheet length (0-300.00mm)"
        );

        let err = ValidationError::RadiusOutOfRange {
            radius: 600.0,
            min: 0.0,
            max: 500.0,
        };
        assert_eq!(
            err.to_string(),
            "bend radius (600.00mm) is outside allowed range (0.00-500.00mm)"
        );

        let err = ValidationError::AngleOutOfRange {
            angle: 180.0,
            min: 1.0,
            max: 179.0,
        };
        assert_eq!(
            err.to_string(),
            "bend angle (180.00°) is outside allowed range (1.0-179.0°)"
        );
    }

    #[test]
    fn test_precondition_error_display() {
        assert_eq!(
            PreconditionError::ToolingNotSet.to_string(),
            "tooling not set"
        );
        assert_eq!(
            PreconditionError::UnknownMaterial("Unobtainium".to_string()).to_string(),
            "unknown material: Unobtainium"
        );
        assert_eq!(
            PreconditionError::MachineUnavailable("executor has stopped".to_string()).to_string(),
            "press brake unavailable: executor has stopped"
        );
    }

    #[test]
    fn test_radius_warning_display() {
        let warning = RadiusWarning {
            radius: 1.0,
            min_recommended: 3.0,
        };
        assert!(warning.to_string().contains("1.00mm"));
        assert!(warning.to_string().contains("3.00mm"));
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = PreconditionError::NoCurrentJob.into();
        assert!(err.is_precondition_error());
        assert!(!err.is_validation_error());

        let err: Error = ConstructionError::EmptyJobName.into();
        assert!(err.is_construction_error());
        assert_eq!(err.to_string(), "job name cannot be empty");
    }
}
