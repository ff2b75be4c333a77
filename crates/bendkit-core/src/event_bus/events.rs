//! Event type definitions for the event bus.
//!
//! This module defines the engine events organized by category.
//! Events are cloneable and serializable so a UI can log or replay them.

use serde::{Deserialize, Serialize};

use crate::data::BendDirection;

/// Root event enum for all engine events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// Bend plan and sheet changes
    Job(JobEvent),
    /// Press brake tooling and execution
    Machine(MachineEvent),
    /// Human-readable status line for the UI
    Status(StatusEvent),
}

impl EngineEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            EngineEvent::Job(_) => EventCategory::Job,
            EngineEvent::Machine(_) => EventCategory::Machine,
            EngineEvent::Status(_) => EventCategory::Status,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            EngineEvent::Job(e) => e.description(),
            EngineEvent::Machine(e) => e.description(),
            EngineEvent::Status(e) => e.message.clone(),
        }
    }

    /// Shorthand for an informational status event
    pub fn info(message: impl Into<String>) -> Self {
        EngineEvent::Status(StatusEvent {
            level: StatusLevel::Info,
            message: message.into(),
        })
    }

    /// Shorthand for a warning status event
    pub fn warning(message: impl Into<String>) -> Self {
        EngineEvent::Status(StatusEvent {
            level: StatusLevel::Warning,
            message: message.into(),
        })
    }

    /// Shorthand for an error status event
    pub fn error(message: impl Into<String>) -> Self {
        EngineEvent::Status(StatusEvent {
            level: StatusLevel::Error,
            message: message.into(),
        })
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Bend plan and sheet events.
    Job,
    /// Tooling and execution events.
    Machine,
    /// Status line events.
    Status,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Job => write!(f, "Job"),
            EventCategory::Machine => write!(f, "Machine"),
            EventCategory::Status => write!(f, "Status"),
        }
    }
}

/// Bend plan events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JobEvent {
    /// A different job became current.
    JobReplaced {
        /// Name of the new current job.
        job: String,
    },
    /// A bend step was appended.
    StepAdded {
        /// Job name.
        job: String,
        /// 1-based sequence order of the new step.
        sequence: u32,
        /// Bend position in mm.
        position: f64,
        /// Target angle in degrees.
        angle: f64,
        /// Inner radius in mm.
        radius: f64,
        /// Bend direction.
        direction: BendDirection,
    },
    /// All steps were removed and the sheet flattened.
    StepsCleared {
        /// Job name.
        job: String,
        /// Number of steps removed.
        removed: usize,
    },
    /// The sheet was rebuilt with new properties.
    SheetUpdated {
        /// Job name.
        job: String,
        /// Sheet id.
        sheet: String,
        /// Steps that no longer fit the new geometry.
        invalid_steps: Vec<u32>,
    },
    /// A pending bend awaiting confirmation was dropped.
    ProposalDiscarded {
        /// Job name.
        job: String,
    },
}

impl JobEvent {
    fn description(&self) -> String {
        match self {
            JobEvent::JobReplaced { job } => format!("Current job is now '{}'", job),
            JobEvent::StepAdded {
                job,
                sequence,
                position,
                angle,
                radius,
                direction,
            } => format!(
                "Added bend step {} to job '{}': Pos:{:.1}, Ang:{:.1}, Rad:{:.1}, Dir:{}",
                sequence, job, position, angle, radius, direction
            ),
            JobEvent::StepsCleared { job, removed } => {
                format!("Cleared {} bend steps from job '{}'", removed, job)
            }
            JobEvent::SheetUpdated {
                job,
                sheet,
                invalid_steps,
            } => {
                if invalid_steps.is_empty() {
                    format!("Sheet '{}' properties updated for job '{}'", sheet, job)
                } else {
                    format!(
                        "Sheet '{}' properties updated for job '{}'; steps {:?} no longer fit",
                        sheet, job, invalid_steps
                    )
                }
            }
            JobEvent::ProposalDiscarded { job } => {
                format!("Bend addition cancelled for job '{}'", job)
            }
        }
    }
}

/// Press brake events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MachineEvent {
    /// A punch was selected.
    PunchChanged {
        /// Punch name.
        punch: String,
    },
    /// A die was selected.
    DieChanged {
        /// Die name.
        die: String,
    },
    /// A job was replayed onto its sheet.
    JobProcessed {
        /// Job name.
        job: String,
        /// Number of bends now on the sheet.
        bends: usize,
        /// Parts bent on this machine since start-up.
        parts_bent_session: u64,
    },
    /// Job execution was refused or failed.
    ProcessingFailed {
        /// Job name.
        job: String,
        /// Error message.
        error: String,
    },
}

impl MachineEvent {
    fn description(&self) -> String {
        match self {
            MachineEvent::PunchChanged { punch } => format!("Punch set to '{}'", punch),
            MachineEvent::DieChanged { die } => format!("Die set to '{}'", die),
            MachineEvent::JobProcessed {
                job,
                bends,
                parts_bent_session,
            } => format!(
                "Job '{}' processed ({} bends). Total parts bent this session: {}",
                job, bends, parts_bent_session
            ),
            MachineEvent::ProcessingFailed { job, error } => {
                format!("Job '{}' processing error: {}", job, error)
            }
        }
    }
}

/// Severity of a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusLevel {
    /// Normal progress message.
    Info,
    /// Something needs the user's attention.
    Warning,
    /// An operation was refused.
    Error,
}

/// Status line shown to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEvent {
    /// Severity.
    pub level: StatusLevel,
    /// Message text.
    pub message: String,
}
