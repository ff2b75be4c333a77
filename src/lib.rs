//! # BendKit
//!
//! A press brake bend planning and execution engine:
//! - Material and tooling catalogs
//! - Validated bend sequences with a confirm/cancel step for tight radii
//! - Deterministic replay of a job onto its sheet on a press brake
//! - A serialized async executor with a pluggable profile exporter
//!
//! ## Architecture
//!
//! BendKit is organized as a workspace with multiple crates:
//!
//! 1. **bendkit-core** - Errors, limits, catalogs, input parsing, events
//! 2. **bendkit-job** - Sheet model, validator, job, job controller
//! 3. **bendkit-machine** - Press brake, executor, profile export
//! 4. **bendkit-settings** - Engine configuration files
//! 5. **bendkit** - Session facade for string input, and the demo binary

pub mod session;

pub use bendkit_core::{
    format_length, parse_measurement, BendDirection, BendLimits, ConstructionError, Die,
    EngineEvent, Error, EventBus, EventBusConfig, EventFilter, JobEvent, MachineEvent,
    MaterialCatalog, MaterialDetails, MaterialName, PreconditionError, Punch, RadiusWarning,
    Result, SheetLimits, StatusEvent, StatusLevel, ToolingCatalog, ValidationError,
};
pub use bendkit_job::{
    AddStepOutcome, BendParams, BendStep, BendValidator, FormState, Job, JobController, Proposal,
    ProposalOutcome, SheetMetal, SheetUpdate, Validation,
};
pub use bendkit_machine::{
    ExecutionError, ExecutionReport, ExecutorHandle, ExportError, JsonProfileExporter,
    MachineStatus, PressBrake, PressBrakeExecutor, ProfileArtifact, ProfileExporter,
    ProfileSnapshot,
};
pub use bendkit_settings::{EngineConfig, SessionDefaults, SettingsError};
pub use session::{BendRequest, BendSession};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support (defaults to `info`)
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
