//! Materials catalog module
//!
//! This module provides:
//! - Material identifiers and physical properties
//! - The minimum bend radius factor used by the bend validator
//! - An immutable, name-keyed catalog with a preferred display order

use crate::error::ConstructionError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Material identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash, PartialOrd, Ord)]
pub struct MaterialName(pub String);

impl MaterialName {
    /// Structural steel
    pub const STEEL: &'static str = "Steel";
    /// Aluminum sheet
    pub const ALUMINUM: &'static str = "Aluminum";
    /// Stainless steel
    pub const STAINLESS: &'static str = "Stainless Steel";
    /// Copper sheet
    pub const COPPER: &'static str = "Copper";
    /// Mild steel
    pub const MILD_STEEL: &'static str = "Mild Steel";

    /// Preferred display order for the standard materials
    pub const PREFERRED_ORDER: [&'static str; 5] = [
        Self::STEEL,
        Self::ALUMINUM,
        Self::STAINLESS,
        Self::COPPER,
        Self::MILD_STEEL,
    ];

    /// Create a name from anything string-like
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the name is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for MaterialName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MaterialName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// Physical properties of a sheet material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDetails {
    /// Unique material name
    pub name: MaterialName,
    /// Density in kg/m³
    pub density: f64,
    /// Yield stress in MPa
    pub yield_stress: f64,
    /// Tensile (Young's) modulus in GPa
    pub tensile_modulus: f64,
    /// Factor times thickness for the minimum recommended bend radius.
    /// Zero selects the fallback rule of half the thickness.
    pub min_bend_radius_factor: f64,
}

impl MaterialDetails {
    /// Create a material, rejecting an empty name or a negative factor
    pub fn new(
        name: impl Into<MaterialName>,
        density: f64,
        yield_stress: f64,
        tensile_modulus: f64,
        min_bend_radius_factor: f64,
    ) -> Result<Self, ConstructionError> {
        let material = Self {
            name: name.into(),
            density,
            yield_stress,
            tensile_modulus,
            min_bend_radius_factor,
        };
        material.validate()?;
        Ok(material)
    }

    /// Check the invariants of a material definition
    pub fn validate(&self) -> Result<(), ConstructionError> {
        if self.name.is_empty() {
            return Err(ConstructionError::MissingMaterial);
        }
        if !self.min_bend_radius_factor.is_finite() || self.min_bend_radius_factor < 0.0 {
            return Err(ConstructionError::InvalidMaterial {
                name: self.name.to_string(),
                reason: format!(
                    "minimum bend radius factor must be >= 0 (got {})",
                    self.min_bend_radius_factor
                ),
            });
        }
        Ok(())
    }

    /// Whether the fallback radius rule applies to this material
    pub fn uses_fallback_radius(&self) -> bool {
        self.min_bend_radius_factor <= 0.0
    }

    // Standard entries are constant and known valid.
    fn standard(
        name: &str,
        density: f64,
        yield_stress: f64,
        tensile_modulus: f64,
        factor: f64,
    ) -> Self {
        Self {
            name: MaterialName::new(name),
            density,
            yield_stress,
            tensile_modulus,
            min_bend_radius_factor: factor,
        }
    }
}

/// Immutable material lookup keyed by name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterialCatalog {
    materials: HashMap<MaterialName, MaterialDetails>,
}

impl MaterialCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard material set
    pub fn standard() -> Self {
        Self::new()
            .with_material(MaterialDetails::standard(
                MaterialName::STEEL,
                7850.0,
                250.0,
                200.0,
                1.5,
            ))
            .with_material(MaterialDetails::standard(
                MaterialName::ALUMINUM,
                2700.0,
                100.0,
                70.0,
                1.0,
            ))
            .with_material(MaterialDetails::standard(
                MaterialName::STAINLESS,
                8000.0,
                215.0,
                193.0,
                2.0,
            ))
            .with_material(MaterialDetails::standard(
                MaterialName::COPPER,
                8960.0,
                70.0,
                117.0,
                0.8,
            ))
            .with_material(MaterialDetails::standard(
                MaterialName::MILD_STEEL,
                7850.0,
                220.0,
                200.0,
                1.2,
            ))
    }

    /// Return the catalog with a material added (or replaced by name)
    pub fn with_material(mut self, material: MaterialDetails) -> Self {
        self.materials.insert(material.name.clone(), material);
        self
    }

    /// Look up a material by name
    pub fn get(&self, name: &str) -> Option<&MaterialDetails> {
        self.materials.get(&MaterialName::new(name))
    }

    /// Whether a material exists
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Material names in display order: the standard names first, then
    /// any additional names alphabetically.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = MaterialName::PREFERRED_ORDER
            .iter()
            .filter(|name| self.contains(name))
            .map(|name| name.to_string())
            .collect();

        let mut extra: Vec<String> = self
            .materials
            .keys()
            .filter(|name| !MaterialName::PREFERRED_ORDER.contains(&name.as_str()))
            .map(|name| name.to_string())
            .collect();
        extra.sort();

        names.extend(extra);
        names
    }

    /// Number of materials
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
