//! # BendKit Core
//!
//! Core types, catalogs, and utilities for BendKit.
//! Provides the error taxonomy, the configured numeric limits, the
//! material and tooling catalogs, input parsing, and the engine event bus.

pub mod data;
pub mod error;
pub mod event_bus;
pub mod limits;
pub mod units;

pub use data::{
    BendDirection, Die, MaterialCatalog, MaterialDetails, MaterialName, Punch, ToolingCatalog,
};

pub use error::{
    ConstructionError, Error, PreconditionError, RadiusWarning, Result, ValidationError,
};

pub use event_bus::{
    EngineEvent, EventBus, EventBusConfig, EventCategory, EventFilter, JobEvent, MachineEvent,
    StatusEvent, StatusLevel, SubscriptionId,
};

pub use limits::{BendLimits, SheetLimits};
pub use units::{format_length, parse_measurement};
