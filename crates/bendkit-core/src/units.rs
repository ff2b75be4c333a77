//! Numeric input utilities
//!
//! All lengths in the engine share one linear unit (mm). Values arrive from
//! the outside as text and are parsed here, so that every rejection carries
//! the field name and the raw input.

use crate::error::ValidationError;

/// Parse a measurement typed by a user
///
/// * `field` - Name of the field, used in the error
/// * `text` - Raw input; surrounding whitespace is ignored
///
/// Non-finite values (`NaN`, `inf`) are rejected.
pub fn parse_measurement(field: &str, text: &str) -> Result<f64, ValidationError> {
    let invalid = || ValidationError::InvalidNumber {
        field: field.to_string(),
        input: text.to_string(),
    };

    let value: f64 = text.trim().parse().map_err(|_| invalid())?;
    if !value.is_finite() {
        return Err(invalid());
    }
    Ok(value)
}

/// Format length value for display
///
/// * `value_mm` - Value in millimeters
pub fn format_length(value_mm: f64) -> String {
    format!("{:.2}mm", value_mm)
}
