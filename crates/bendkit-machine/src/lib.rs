//! # BendKit Machine
//!
//! The press brake and everything that runs on it: job processing, the
//! serialized executor task, and the profile export seam.

pub mod error;
pub mod executor;
pub mod export;
pub mod press_brake;

pub use error::{ExecutionError, ExecutionResult, ExportError};
pub use executor::{
    ExecutionReport, ExecutorHandle, MachineStatus, PressBrakeExecutor, DEFAULT_QUEUE_CAPACITY,
};
pub use export::{JsonProfileExporter, ProfileArtifact, ProfileExporter, ProfileSnapshot};
pub use press_brake::PressBrake;
