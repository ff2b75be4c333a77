//! Press brake tooling module - punch and die definitions
//!
//! This module provides:
//! - Punch (upper tool) and die (lower V-die) descriptors
//! - An immutable tooling catalog with name lookup and defaults
//! - The standard tool set

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Name of the punch selected when nothing else is requested
pub const DEFAULT_PUNCH: &str = "Default Punch";
/// Name of the die selected when nothing else is requested
pub const DEFAULT_DIE: &str = "Default Die";

/// Upper tool of the press brake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Punch {
    /// Catalog name
    pub name: String,
    /// Tool height in mm
    pub height: f64,
    /// Tip angle in degrees
    pub angle: f64,
    /// Tip radius in mm
    pub radius: f64,
}

impl Punch {
    /// Create a punch descriptor
    pub fn new(name: impl Into<String>, height: f64, angle: f64, radius: f64) -> Self {
        Self {
            name: name.into(),
            height,
            angle,
            radius,
        }
    }
}

/// Lower tool (V-die) of the press brake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Die {
    /// Catalog name
    pub name: String,
    /// Width of the V-opening in mm
    pub v_opening: f64,
    /// Angle of the V in degrees
    pub angle: f64,
    /// Radius of the die shoulders in mm
    pub shoulder_radius: f64,
}

impl Die {
    /// Create a die descriptor
    pub fn new(name: impl Into<String>, v_opening: f64, angle: f64, shoulder_radius: f64) -> Self {
        Self {
            name: name.into(),
            v_opening,
            angle,
            shoulder_radius,
        }
    }
}

/// Available punches and dies, keyed by name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolingCatalog {
    punches: HashMap<String, Punch>,
    dies: HashMap<String, Die>,
}

impl ToolingCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard tool set
    pub fn standard() -> Self {
        Self::new()
            .with_punch(Punch::new("P88.10.R06", 60.0, 88.0, 0.6))
            .with_punch(Punch::new("P30.15.R1", 65.0, 30.0, 1.0))
            .with_punch(Punch::new(DEFAULT_PUNCH, 50.0, 90.0, 1.0))
            .with_die(Die::new("D12.90.R2", 12.0, 90.0, 2.0))
            .with_die(Die::new("D20.60.R3", 20.0, 60.0, 3.0))
            .with_die(Die::new(DEFAULT_DIE, 16.0, 90.0, 2.0))
    }

    /// Return the catalog with a punch added (or replaced by name)
    pub fn with_punch(mut self, punch: Punch) -> Self {
        self.punches.insert(punch.name.clone(), punch);
        self
    }

    /// Return the catalog with a die added (or replaced by name)
    pub fn with_die(mut self, die: Die) -> Self {
        self.dies.insert(die.name.clone(), die);
        self
    }

    /// Look up a punch by name
    pub fn punch(&self, name: &str) -> Option<&Punch> {
        self.punches.get(name)
    }

    /// Look up a die by name
    pub fn die(&self, name: &str) -> Option<&Die> {
        self.dies.get(name)
    }

    /// Punch names, sorted
    pub fn punch_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.punches.keys().cloned().collect();
        names.sort();
        names
    }

    /// Die names, sorted
    pub fn die_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.dies.keys().cloned().collect();
        names.sort();
        names
    }

    /// The default punch, else the first punch by name
    pub fn default_punch(&self) -> Option<&Punch> {
        self.punch(DEFAULT_PUNCH).or_else(|| {
            self.punch_names()
                .first()
                .and_then(|name| self.punches.get(name))
        })
    }

    /// The default die, else the first die by name
    pub fn default_die(&self) -> Option<&Die> {
        self.die(DEFAULT_DIE).or_else(|| {
            self.die_names()
                .first()
                .and_then(|name| self.dies.get(name))
        })
    }

    /// Number of punches
    pub fn punch_count(&self) -> usize {
        self.punches.len()
    }

    /// Number of dies
    pub fn die_count(&self) -> usize {
        self.dies.len()
    }
}
