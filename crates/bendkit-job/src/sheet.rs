//! Sheet metal workpiece model
//!
//! A [`SheetMetal`] is one physical workpiece: its flat definition plus the
//! bends currently formed into it. Its dimensions are checked on
//! construction and never change afterwards; editing a sheet means building
//! a new one.

use crate::step::BendStep;
use bendkit_core::limits::FALLBACK_RADIUS_FACTOR;
use bendkit_core::{ConstructionError, MaterialDetails};
use serde::Serialize;

/// Whether a sheet carries formed bends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormState {
    /// No bends applied
    Flat,
    /// At least one bend applied by job execution
    Formed,
}

/// The workpiece
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetMetal {
    id: String,
    original_length: f64,
    width: f64,
    thickness: f64,
    material: MaterialDetails,
    current_bends: Vec<BendStep>,
}

impl SheetMetal {
    /// Create a flat sheet
    ///
    /// Fails when the id is empty, any dimension is not a positive finite
    /// number, or the material is unnamed.
    pub fn new(
        id: impl Into<String>,
        length: f64,
        width: f64,
        thickness: f64,
        material: MaterialDetails,
    ) -> Result<Self, ConstructionError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ConstructionError::EmptySheetId);
        }

        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !(positive(length) && positive(width) && positive(thickness)) {
            return Err(ConstructionError::NonPositiveDimensions {
                length,
                width,
                thickness,
            });
        }

        if material.name.is_empty() {
            return Err(ConstructionError::MissingMaterial);
        }

        Ok(Self {
            id,
            original_length: length,
            width,
            thickness,
            material,
            current_bends: Vec::new(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Flat length along which bend positions are measured (mm)
    pub fn original_length(&self) -> f64 {
        self.original_length
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    pub fn material(&self) -> &MaterialDetails {
        &self.material
    }

    /// Bends formed by the last job execution, in execution order
    pub fn current_bends(&self) -> &[BendStep] {
        &self.current_bends
    }

    pub fn form_state(&self) -> FormState {
        if self.current_bends.is_empty() {
            FormState::Flat
        } else {
            FormState::Formed
        }
    }

    /// Clear any applied bends, making the sheet flat again
    pub fn reset_form(&mut self) {
        self.current_bends.clear();
        tracing::info!(sheet = %self.id, "Sheet form reset (bends cleared)");
    }

    /// Recommended minimum inner bend radius for this material and thickness
    ///
    /// A material factor of zero falls back to half the thickness.
    pub fn min_bend_radius(&self) -> f64 {
        if self.thickness <= 0.0 {
            return 0.0;
        }
        if self.material.min_bend_radius_factor <= 0.0 {
            return self.thickness * FALLBACK_RADIUS_FACTOR;
        }
        self.thickness * self.material.min_bend_radius_factor
    }

    /// Reset the sheet and form every step onto it, in the given order
    ///
    /// The new bend list is built before it replaces the old one, so the
    /// sheet is never observed half-formed. Reached from outside this crate
    /// only through [`Job::form_sheet`](crate::Job::form_sheet).
    pub(crate) fn replay(&mut self, steps: &[BendStep]) {
        let formed: Vec<BendStep> = steps.to_vec();
        self.reset_form();
        self.current_bends = formed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::BendParams;
    use bendkit_core::{BendDirection, MaterialCatalog};

    fn steel() -> MaterialDetails {
        MaterialCatalog::standard().get("Steel").unwrap().clone()
    }

    #[test]
    fn test_new_sheet_is_flat() {
        let sheet = SheetMetal::new("S-1", 300.0, 100.0, 2.0, steel()).unwrap();
        assert_eq!(sheet.id(), "S-1");
        assert_eq!(sheet.original_length(), 300.0);
        assert_eq!(sheet.form_state(), FormState::Flat);
        assert!(sheet.current_bends().is_empty());
    }

    #[test]
    fn test_construction_rejects_bad_input() {
        assert_eq!(
            SheetMetal::new("", 300.0, 100.0, 2.0, steel()),
            Err(ConstructionError::EmptySheetId)
        );
        assert!(matches!(
            SheetMetal::new("S", 0.0, 100.0, 2.0, steel()),
            Err(ConstructionError::NonPositiveDimensions { .. })
        ));
        assert!(matches!(
            SheetMetal::new("S", 300.0, 100.0, -2.0, steel()),
            Err(ConstructionError::NonPositiveDimensions { .. })
        ));
        assert!(matches!(
            SheetMetal::new("S", f64::NAN, 100.0, 2.0, steel()),
            Err(ConstructionError::NonPositiveDimensions { .. })
        ));

        let mut unnamed = steel();
        unnamed.name = "".into();
        assert_eq!(
            SheetMetal::new("S", 300.0, 100.0, 2.0, unnamed),
            Err(ConstructionError::MissingMaterial)
        );
    }

    #[test]
    fn test_min_bend_radius_uses_factor() {
        let sheet = SheetMetal::new("S", 300.0, 100.0, 2.0, steel()).unwrap();
        assert_eq!(sheet.min_bend_radius(), 3.0);
    }

    #[test]
    fn test_min_bend_radius_fallback() {
        let material = MaterialDetails::new("Lead", 11340.0, 5.0, 16.0, 0.0).unwrap();
        let sheet = SheetMetal::new("S", 300.0, 100.0, 4.0, material).unwrap();
        assert_eq!(sheet.min_bend_radius(), 2.0);
    }

    #[test]
    fn test_replay_and_reset() {
        let mut sheet = SheetMetal::new("S", 300.0, 100.0, 2.0, steel()).unwrap();
        let steps = vec![
            BendStep::new(1, BendParams::new(50.0, 90.0, 3.0, BendDirection::Up)),
            BendStep::new(2, BendParams::new(150.0, 45.0, 3.0, BendDirection::Down)),
        ];

        sheet.replay(&steps);
        assert_eq!(sheet.form_state(), FormState::Formed);
        assert_eq!(sheet.current_bends(), steps.as_slice());

        sheet.replay(&steps);
        assert_eq!(sheet.current_bends().len(), 2);

        sheet.reset_form();
        assert_eq!(sheet.form_state(), FormState::Flat);
    }
}
