//! Serialized press brake executor
//!
//! A single tokio task owns the [`PressBrake`]. Callers talk to it through a
//! cloneable [`ExecutorHandle`]; every command goes through one bounded
//! queue, so jobs against the same press never overlap and the part counter
//! has exactly one writer.
//!
//! A run processes the job and then, if an exporter is configured, exports
//! the formed profile. Runs are not cancellable and have no timeout.

use crate::error::{ExecutionError, ExecutionResult};
use crate::export::{ProfileArtifact, ProfileExporter, ProfileSnapshot};
use crate::press_brake::PressBrake;
use bendkit_core::{Die, Punch};
use bendkit_job::{Job, SheetMetal};
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Default depth of the command queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 16;

/// Outcome of a successful run
#[derive(Debug)]
pub struct ExecutionReport {
    /// The job, handed back with its sheet formed
    pub job: Job,
    /// Snapshot of the formed sheet
    pub sheet: SheetMetal,
    /// Counter value after this run
    pub parts_bent_session: u64,
    pub profile: Option<ProfileArtifact>,
    pub completed_at: DateTime<Utc>,
}

/// Snapshot of the press brake as last seen by the executor task
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MachineStatus {
    pub name: String,
    pub punch: Option<String>,
    pub die: Option<String>,
    pub total_parts_bent_session: u64,
}

impl MachineStatus {
    /// Status of a press brake held outside an executor
    pub fn of(press: &PressBrake) -> Self {
        Self {
            name: press.name().to_string(),
            punch: press.current_punch().map(|p| p.name.clone()),
            die: press.current_die().map(|d| d.name.clone()),
            total_parts_bent_session: press.total_parts_bent_session(),
        }
    }
}

enum Command {
    Execute {
        job: Box<Job>,
        reply: oneshot::Sender<ExecutionResult<ExecutionReport>>,
    },
    SetPunch {
        punch: Punch,
        reply: oneshot::Sender<()>,
    },
    SetDie {
        die: Die,
        reply: oneshot::Sender<()>,
    },
    Shutdown,
}

/// Spawns the executor task
pub struct PressBrakeExecutor;

impl PressBrakeExecutor {
    /// Start a task owning `press` and return a handle to it
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        press: PressBrake,
        exporter: Option<Arc<dyn ProfileExporter>>,
        capacity: usize,
    ) -> ExecutorHandle {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let status = Arc::new(RwLock::new(MachineStatus::of(&press)));

        tracing::info!(machine = %press.name(), capacity, "Press brake executor started");
        let task = tokio::spawn(run(press, exporter, rx, status.clone()));

        ExecutorHandle {
            tx,
            status,
            task: Arc::new(Mutex::new(Some(task))),
        }
    }
}

async fn run(
    mut press: PressBrake,
    exporter: Option<Arc<dyn ProfileExporter>>,
    mut rx: mpsc::Receiver<Command>,
    status: Arc<RwLock<MachineStatus>>,
) -> PressBrake {
    while let Some(command) = rx.recv().await {
        match command {
            Command::Execute { job, reply } => {
                let result = run_job(&mut press, exporter.as_deref(), *job).await;
                if let Err(err) = &result {
                    tracing::error!(machine = %press.name(), %err, "Execution failed");
                }
                *status.write() = MachineStatus::of(&press);
                if reply.send(result).is_err() {
                    tracing::debug!("Execution result dropped, caller went away");
                }
            }
            Command::SetPunch { punch, reply } => {
                press.set_punch(punch);
                *status.write() = MachineStatus::of(&press);
                let _ = reply.send(());
            }
            Command::SetDie { die, reply } => {
                press.set_die(die);
                *status.write() = MachineStatus::of(&press);
                let _ = reply.send(());
            }
            Command::Shutdown => break,
        }
    }

    tracing::info!(
        machine = %press.name(),
        parts_bent_session = press.total_parts_bent_session(),
        "Press brake executor stopped"
    );
    press
}

async fn run_job(
    press: &mut PressBrake,
    exporter: Option<&dyn ProfileExporter>,
    mut job: Job,
) -> ExecutionResult<ExecutionReport> {
    let sheet = press.process_job(&mut job)?;
    let parts_bent_session = press.total_parts_bent_session();

    let profile = match exporter {
        Some(exporter) => {
            let snapshot = ProfileSnapshot::from_sheet(job.name(), &sheet);
            let artifact = exporter
                .export(&snapshot)
                .await
                .map_err(|source| ExecutionError::Export {
                    parts_bent_session,
                    source,
                })?;
            Some(artifact)
        }
        None => None,
    };

    Ok(ExecutionReport {
        job,
        sheet,
        parts_bent_session,
        profile,
        completed_at: Utc::now(),
    })
}

/// Cloneable handle to a running executor
#[derive(Clone)]
pub struct ExecutorHandle {
    tx: mpsc::Sender<Command>,
    status: Arc<RwLock<MachineStatus>>,
    task: Arc<Mutex<Option<JoinHandle<PressBrake>>>>,
}

impl std::fmt::Debug for ExecutorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutorHandle")
            .field("status", &*self.status.read())
            .field("running", &self.is_running())
            .finish()
    }
}

impl ExecutorHandle {
    /// Queue a job for execution
    ///
    /// The job moves into the executor and comes back in the
    /// [`ExecutionReport`]. The returned receiver resolves once the run
    /// (processing and export) has finished.
    pub async fn execute(
        &self,
        job: Job,
    ) -> ExecutionResult<oneshot::Receiver<ExecutionResult<ExecutionReport>>> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Execute {
                job: Box::new(job),
                reply,
            })
            .await
            .map_err(|_| ExecutionError::ExecutorStopped)?;
        Ok(rx)
    }

    /// Queue a job and wait for its report
    pub async fn execute_and_wait(&self, job: Job) -> ExecutionResult<ExecutionReport> {
        let rx = self.execute(job).await?;
        rx.await.map_err(|_| ExecutionError::ExecutorStopped)?
    }

    pub async fn set_punch(&self, punch: Punch) -> ExecutionResult<()> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::SetPunch { punch, reply })
            .await
            .map_err(|_| ExecutionError::ExecutorStopped)?;
        rx.await.map_err(|_| ExecutionError::ExecutorStopped)
    }

    pub async fn set_die(&self, die: Die) -> ExecutionResult<()> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::SetDie { die, reply })
            .await
            .map_err(|_| ExecutionError::ExecutorStopped)?;
        rx.await.map_err(|_| ExecutionError::ExecutorStopped)
    }

    /// Last published machine status
    pub fn status(&self) -> MachineStatus {
        self.status.read().clone()
    }

    pub fn is_running(&self) -> bool {
        !self.tx.is_closed()
    }

    /// Stop the executor after queued commands drain
    ///
    /// Returns the press brake to the first caller; later calls and clones
    /// get `None`.
    pub async fn shutdown(&self) -> Option<PressBrake> {
        // Already-closed queues mean the task is gone
        let _ = self.tx.send(Command::Shutdown).await;
        let task = self.task.lock().take()?;
        match task.await {
            Ok(press) => Some(press),
            Err(err) => {
                tracing::error!(%err, "Press brake executor task failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bendkit_core::{MaterialCatalog, ToolingCatalog};

    fn job() -> Job {
        let steel = MaterialCatalog::standard().get("Steel").unwrap().clone();
        Job::new("Bracket", SheetMetal::new("S-1", 300.0, 100.0, 2.0, steel).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_untooled_press_reports_precondition() {
        let handle = PressBrakeExecutor::spawn(PressBrake::new("PB", None, None), None, 4);
        let err = handle.execute_and_wait(job()).await.unwrap_err();
        assert!(matches!(err, ExecutionError::Engine(ref e) if e.is_precondition_error()));
        assert!(!err.part_was_bent());
        assert_eq!(handle.status().total_parts_bent_session, 0);
    }

    #[tokio::test]
    async fn test_tooling_commands_update_status() {
        let tooling = ToolingCatalog::standard();
        let handle = PressBrakeExecutor::spawn(PressBrake::new("PB", None, None), None, 4);
        handle.set_punch(tooling.punch("P88.10.R06").unwrap().clone()).await.unwrap();
        handle.set_die(tooling.die("D12.90.R2").unwrap().clone()).await.unwrap();

        let status = handle.status();
        assert_eq!(status.punch.as_deref(), Some("P88.10.R06"));
        assert_eq!(status.die.as_deref(), Some("D12.90.R2"));

        let report = handle.execute_and_wait(job()).await.unwrap();
        assert_eq!(report.parts_bent_session, 1);
        assert!(report.profile.is_none());
    }

    #[tokio::test]
    async fn test_shutdown_returns_press() {
        let handle = PressBrakeExecutor::spawn(PressBrake::new("PB", None, None), None, 1);
        let press = handle.shutdown().await.unwrap();
        assert_eq!(press.name(), "PB");
        assert!(handle.shutdown().await.is_none());
        assert!(matches!(
            handle.execute_and_wait(job()).await,
            Err(ExecutionError::ExecutorStopped)
        ));
    }
}
