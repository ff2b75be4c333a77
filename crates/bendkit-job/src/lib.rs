//! BendKit job planning
//!
//! The workpiece model, the bend validator, and the job controller that is
//! the only writer of a job's bend sequence.

pub mod controller;
pub mod job;
pub mod sheet;
pub mod step;
pub mod validator;

pub use controller::{AddStepOutcome, JobController, Proposal, ProposalOutcome, SheetUpdate};
pub use job::Job;
pub use sheet::{FormState, SheetMetal};
pub use step::{BendParams, BendStep};
pub use validator::{BendValidator, Validation};
