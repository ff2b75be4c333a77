//! Data models for materials, tooling, and bend direction
//!
//! This module provides:
//! - Material details used to derive the minimum recommended bend radius
//! - Punch and die descriptors and the tooling catalog
//! - Bend direction tokens

pub mod materials;
pub mod tooling;

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use materials::{MaterialCatalog, MaterialDetails, MaterialName};
pub use tooling::{Die, Punch, ToolingCatalog};

/// Direction of the bend relative to the sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BendDirection {
    /// Material is bent upwards
    #[default]
    Up,
    /// Material is bent downwards
    Down,
}

impl BendDirection {
    /// Both directions in selector order
    pub fn all() -> &'static [BendDirection] {
        &[BendDirection::Up, BendDirection::Down]
    }
}

impl fmt::Display for BendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "Up"),
            Self::Down => write!(f, "Down"),
        }
    }
}

impl FromStr for BendDirection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            _ => Err(ValidationError::UnknownDirection(s.to_string())),
        }
    }
}
