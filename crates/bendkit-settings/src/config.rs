//! Engine configuration for BendKit
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats; the default location is platform specific.
//!
//! Configuration is organized into logical sections:
//! - Limits (bend parameter ranges, sheet dimension range)
//! - Session defaults (machine, job, initial sheet, initial tooling)
//! - Executor tuning
//! - Extra materials, punches, and dies merged over the standard catalogs

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
use bendkit_core::data::tooling::{DEFAULT_DIE, DEFAULT_PUNCH};
use bendkit_core::{
    BendLimits, Die, MaterialCatalog, MaterialDetails, MaterialName, Punch, SheetLimits,
    ToolingCatalog,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Numeric limits enforced by the engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitSettings {
    pub bend: BendLimits,
    pub sheet: SheetLimits,
}

/// What a new session starts with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionDefaults {
    /// Press brake name
    pub machine_name: String,
    /// Name of the initial job
    pub job_name: String,
    /// Id of the initial sheet
    pub sheet_id: String,
    /// Initial sheet length in mm
    pub sheet_length: f64,
    /// Initial sheet width in mm
    pub sheet_width: f64,
    /// Initial sheet thickness in mm
    pub sheet_thickness: f64,
    /// Material of the initial sheet
    pub material: String,
    /// Punch mounted at start, if any
    pub punch: Option<String>,
    /// Die mounted at start, if any
    pub die: Option<String>,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            machine_name: "PressBrake-1".to_string(),
            job_name: "Default Job".to_string(),
            sheet_id: "Sheet-1".to_string(),
            sheet_length: 300.0,
            sheet_width: 100.0,
            sheet_thickness: 2.0,
            material: MaterialName::STEEL.to_string(),
            punch: Some(DEFAULT_PUNCH.to_string()),
            die: Some(DEFAULT_DIE.to_string()),
        }
    }
}

/// Executor tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorSettings {
    /// Depth of the command queue in front of the press brake task
    pub queue_capacity: usize,
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self { queue_capacity: 16 }
    }
}

/// Complete engine configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub limits: LimitSettings,
    pub defaults: SessionDefaults,
    pub executor: ExecutorSettings,
    /// Extra materials; an entry with a standard name replaces it
    pub materials: Vec<MaterialDetails>,
    pub punches: Vec<Punch>,
    pub dies: Vec<Die>,
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

impl EngineConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config dir>/bendkit/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        let base = dirs::config_dir().ok_or_else(|| {
            SettingsError::ConfigDirectory("no configuration directory on this platform".to_string())
        })?;
        Ok(base.join("bendkit").join("config.toml"))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = Format::of(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        tracing::info!(path = %path.display(), "Configuration saved");
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let bend = &self.limits.bend;
        check_range("limits.bend.radius", bend.min_radius, bend.max_radius)?;
        check_range("limits.bend.angle", bend.min_angle, bend.max_angle)?;
        if bend.min_radius < 0.0 {
            return Err(out_of_range("limits.bend.min_radius", bend.min_radius));
        }

        let sheet = &self.limits.sheet;
        check_range("limits.sheet", sheet.min_dimension, sheet.max_dimension)?;
        if sheet.min_dimension <= 0.0 {
            return Err(out_of_range("limits.sheet.min_dimension", sheet.min_dimension));
        }

        let d = &self.defaults;
        for (key, name) in [
            ("defaults.machine_name", &d.machine_name),
            ("defaults.job_name", &d.job_name),
            ("defaults.sheet_id", &d.sheet_id),
            ("defaults.material", &d.material),
        ] {
            if name.trim().is_empty() {
                return Err(ConfigError::EmptyName(key.to_string()));
            }
        }
        for (key, value) in [
            ("defaults.sheet_length", d.sheet_length),
            ("defaults.sheet_width", d.sheet_width),
            ("defaults.sheet_thickness", d.sheet_thickness),
        ] {
            if !sheet.contains(value) {
                return Err(out_of_range(key, value));
            }
        }

        if self.executor.queue_capacity == 0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "executor.queue_capacity".to_string(),
                value: "0".to_string(),
            });
        }

        for material in &self.materials {
            material.validate()?;
        }
        if self.punches.iter().any(|p| p.name.trim().is_empty()) {
            return Err(ConfigError::EmptyName("punches.name".to_string()));
        }
        if self.dies.iter().any(|d| d.name.trim().is_empty()) {
            return Err(ConfigError::EmptyName("dies.name".to_string()));
        }

        Ok(())
    }

    /// Standard materials plus the configured extras
    pub fn material_catalog(&self) -> MaterialCatalog {
        self.materials
            .iter()
            .cloned()
            .fold(MaterialCatalog::standard(), MaterialCatalog::with_material)
    }

    /// Standard tooling plus the configured extras
    pub fn tooling_catalog(&self) -> ToolingCatalog {
        let catalog = self
            .punches
            .iter()
            .cloned()
            .fold(ToolingCatalog::standard(), ToolingCatalog::with_punch);
        self.dies
            .iter()
            .cloned()
            .fold(catalog, ToolingCatalog::with_die)
    }
}

fn check_range(key: &str, min: f64, max: f64) -> ConfigResult<()> {
    if !min.is_finite() || !max.is_finite() || min > max {
        return Err(ConfigError::InvertedRange {
            key: key.to_string(),
            min,
            max,
        });
    }
    Ok(())
}

fn out_of_range(key: &str, value: f64) -> ConfigError {
    ConfigError::ValueOutOfRange {
        key: key.to_string(),
        value: value.to_string(),
    }
}
