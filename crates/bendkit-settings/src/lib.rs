//! BendKit Settings Crate
//!
//! Engine configuration: limit overrides, session defaults, executor tuning,
//! and extra catalog entries, stored as JSON or TOML.

pub mod config;
pub mod error;

pub use config::{EngineConfig, ExecutorSettings, LimitSettings, SessionDefaults};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
