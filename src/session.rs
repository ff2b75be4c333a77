//! Bend session
//!
//! [`BendSession`] is the surface an operator UI talks to. It accepts raw
//! text for numbers, names, and direction tokens, drives the job controller
//! and the press brake, and publishes an [`EngineEvent`] for every outcome.
//! Errors are published as status events and also returned to the caller.
//!
//! The session holds the only press brake. It starts out driven in place by
//! [`BendSession::process`]; [`BendSession::attach_executor`] moves it into a
//! [`PressBrakeExecutor`] task, after which tooling changes and runs go
//! through that executor's queue until [`BendSession::detach_executor`]
//! hands it back.

use bendkit_core::{
    format_length, parse_measurement, BendDirection, EngineEvent, Error, EventBus, JobEvent,
    MachineEvent, MaterialCatalog, PreconditionError, Result, ToolingCatalog,
};
use bendkit_job::{AddStepOutcome, BendStep, Job, JobController, Proposal, SheetMetal, SheetUpdate};
use bendkit_machine::{
    ExecutionError, ExecutionReport, ExecutorHandle, MachineStatus, PressBrake,
    PressBrakeExecutor, ProfileExporter,
};
use bendkit_settings::EngineConfig;
use std::sync::Arc;

/// Outcome of [`BendSession::add_bend`]
#[derive(Debug, PartialEq)]
pub enum BendRequest {
    /// The bend was appended
    Added(BendStep),
    /// The radius is tighter than recommended; confirm or cancel the proposal
    NeedsConfirmation(Proposal),
}

/// Where the session's press brake currently lives
#[derive(Debug)]
enum Machine {
    Local(PressBrake),
    Executor(ExecutorHandle),
}

/// One operator session: a current job, a press brake, and the catalogs
pub struct BendSession {
    controller: JobController,
    machine: Machine,
    materials: Arc<MaterialCatalog>,
    tooling: Arc<ToolingCatalog>,
    bus: Arc<EventBus>,
}

impl std::fmt::Debug for BendSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BendSession")
            .field("controller", &self.controller)
            .field("machine", &self.machine)
            .finish_non_exhaustive()
    }
}

impl BendSession {
    /// Build the initial job and press brake from the configured defaults
    pub fn new(
        config: &EngineConfig,
        materials: Arc<MaterialCatalog>,
        tooling: Arc<ToolingCatalog>,
        bus: Arc<EventBus>,
    ) -> Result<Self> {
        let defaults = &config.defaults;

        let material = materials
            .get(&defaults.material)
            .cloned()
            .ok_or_else(|| PreconditionError::UnknownMaterial(defaults.material.clone()))?;
        let sheet = SheetMetal::new(
            defaults.sheet_id.clone(),
            defaults.sheet_length,
            defaults.sheet_width,
            defaults.sheet_thickness,
            material,
        )?;
        let job = Job::new(defaults.job_name.clone(), sheet)?;

        let punch = match &defaults.punch {
            Some(name) => Some(
                tooling
                    .punch(name)
                    .cloned()
                    .ok_or_else(|| PreconditionError::UnknownPunch(name.clone()))?,
            ),
            None => None,
        };
        let die = match &defaults.die {
            Some(name) => Some(
                tooling
                    .die(name)
                    .cloned()
                    .ok_or_else(|| PreconditionError::UnknownDie(name.clone()))?,
            ),
            None => None,
        };

        let mut controller = JobController::with_limits(config.limits.bend, config.limits.sheet);
        controller.set_current_job(job);
        let press = PressBrake::new(defaults.machine_name.clone(), punch, die);

        tracing::info!(
            machine = %press.name(),
            job = %defaults.job_name,
            materials = materials.len(),
            punches = tooling.punch_count(),
            dies = tooling.die_count(),
            "Bend session ready"
        );

        Ok(Self {
            controller,
            machine: Machine::Local(press),
            materials,
            tooling,
            bus,
        })
    }

    fn emit(&self, event: EngineEvent) {
        if self.bus.publish(event).is_err() {
            tracing::trace!("No event subscribers");
        }
    }

    fn fail<T>(&self, err: Error) -> Result<T> {
        tracing::warn!(%err, "Request refused");
        self.emit(EngineEvent::error(err.to_string()));
        Err(err)
    }

    fn job_name(&self) -> String {
        self.controller
            .current_job()
            .map(|j| j.name().to_string())
            .unwrap_or_default()
    }

    /// Replace the current job, returning the previous one
    pub fn set_job(&mut self, job: Job) -> Option<Job> {
        let name = job.name().to_string();
        let previous = self.controller.set_current_job(job);
        self.emit(EngineEvent::Job(JobEvent::JobReplaced { job: name }));
        previous
    }

    /// Rebuild the sheet from text input
    ///
    /// Existing steps stay; the ones that no longer fit are listed in the
    /// returned [`SheetUpdate`].
    pub fn update_sheet(
        &mut self,
        length: &str,
        thickness: &str,
        width: &str,
        material_name: &str,
    ) -> Result<SheetUpdate> {
        let parsed = (|| -> Result<_> {
            let length = parse_measurement("length", length)?;
            let thickness = parse_measurement("thickness", thickness)?;
            let width = parse_measurement("width", width)?;
            let material = self
                .materials
                .get(material_name.trim())
                .cloned()
                .ok_or_else(|| PreconditionError::UnknownMaterial(material_name.to_string()))?;
            Ok((length, thickness, width, material))
        })();
        let (length, thickness, width, material) = match parsed {
            Ok(values) => values,
            Err(err) => return self.fail(err),
        };

        match self.controller.update_sheet(length, width, thickness, material) {
            Ok(update) => {
                self.emit(EngineEvent::Job(JobEvent::SheetUpdated {
                    job: self.job_name(),
                    sheet: update.sheet_id.clone(),
                    invalid_steps: update.invalid_steps.clone(),
                }));
                if !update.all_steps_valid() {
                    self.emit(EngineEvent::warning(format!(
                        "Steps {:?} no longer fit the sheet",
                        update.invalid_steps
                    )));
                }
                Ok(update)
            }
            Err(err) => self.fail(err),
        }
    }

    /// Request a bend from text input
    pub fn add_bend(
        &mut self,
        position: &str,
        angle: &str,
        radius: &str,
        direction: &str,
    ) -> Result<BendRequest> {
        let parsed = (|| -> Result<_> {
            let position = parse_measurement("position", position)?;
            let angle = parse_measurement("angle", angle)?;
            let radius = parse_measurement("radius", radius)?;
            let direction: BendDirection = direction.parse()?;
            Ok((position, angle, radius, direction))
        })();
        let (position, angle, radius, direction) = match parsed {
            Ok(values) => values,
            Err(err) => return self.fail(err),
        };

        match self.controller.add_step(position, angle, radius, direction) {
            Ok(AddStepOutcome::Appended(step)) => {
                self.step_added(&step);
                Ok(BendRequest::Added(step))
            }
            Ok(AddStepOutcome::NeedsConfirmation(proposal)) => {
                if let Some(warning) = proposal.warning() {
                    self.emit(EngineEvent::warning(format!(
                        "Warning: {}. Confirm to add anyway.",
                        warning
                    )));
                }
                Ok(BendRequest::NeedsConfirmation(proposal))
            }
            Err(err) => self.fail(err),
        }
    }

    /// Accept a bend that needed confirmation
    pub fn confirm(&mut self, proposal: Proposal) -> Result<BendStep> {
        match self.controller.commit(proposal) {
            Ok(step) => {
                self.step_added(&step);
                Ok(step)
            }
            Err(err) => self.fail(err),
        }
    }

    /// Drop a bend that needed confirmation
    pub fn cancel(&mut self, proposal: Proposal) {
        self.controller.discard(proposal);
        self.emit(EngineEvent::Job(JobEvent::ProposalDiscarded {
            job: self.job_name(),
        }));
    }

    fn step_added(&self, step: &BendStep) {
        self.emit(EngineEvent::Job(JobEvent::StepAdded {
            job: self.job_name(),
            sequence: step.sequence_order(),
            position: step.position(),
            angle: step.target_angle(),
            radius: step.radius(),
            direction: step.direction(),
        }));
    }

    /// Remove all steps from the current job
    pub fn clear_steps(&mut self) -> Result<usize> {
        match self.controller.clear_steps() {
            Ok(removed) => {
                self.emit(EngineEvent::Job(JobEvent::StepsCleared {
                    job: self.job_name(),
                    removed,
                }));
                Ok(removed)
            }
            Err(err) => self.fail(err),
        }
    }

    /// Select a punch by name on the session's press brake
    pub async fn select_punch(&mut self, name: &str) -> Result<()> {
        let Some(punch) = self.tooling.punch(name.trim()).cloned() else {
            return self.fail(PreconditionError::UnknownPunch(name.to_string()).into());
        };
        let punch_name = punch.name.clone();
        let applied = match &mut self.machine {
            Machine::Local(press) => {
                press.set_punch(punch);
                true
            }
            Machine::Executor(handle) => handle.set_punch(punch).await.is_ok(),
        };
        if !applied {
            return self.fail(executor_stopped());
        }
        self.emit(EngineEvent::Machine(MachineEvent::PunchChanged { punch: punch_name }));
        Ok(())
    }

    /// Select a die by name on the session's press brake
    pub async fn select_die(&mut self, name: &str) -> Result<()> {
        let Some(die) = self.tooling.die(name.trim()).cloned() else {
            return self.fail(PreconditionError::UnknownDie(name.to_string()).into());
        };
        let die_name = die.name.clone();
        let applied = match &mut self.machine {
            Machine::Local(press) => {
                press.set_die(die);
                true
            }
            Machine::Executor(handle) => handle.set_die(die).await.is_ok(),
        };
        if !applied {
            return self.fail(executor_stopped());
        }
        self.emit(EngineEvent::Machine(MachineEvent::DieChanged { die: die_name }));
        Ok(())
    }

    /// Move the press brake into a serialized executor task
    ///
    /// Must be called from within a tokio runtime. If an executor is
    /// already attached its handle is returned and nothing is spawned.
    pub fn attach_executor(
        &mut self,
        exporter: Option<Arc<dyn ProfileExporter>>,
        capacity: usize,
    ) -> ExecutorHandle {
        let press = match &self.machine {
            Machine::Executor(handle) => return handle.clone(),
            Machine::Local(press) => press.clone(),
        };
        let handle = PressBrakeExecutor::spawn(press, exporter, capacity);
        self.machine = Machine::Executor(handle.clone());
        handle
    }

    /// Stop the attached executor and take the press brake back
    ///
    /// Queued commands drain first. A no-op when no executor is attached.
    pub async fn detach_executor(&mut self) -> Result<()> {
        let Machine::Executor(handle) = &self.machine else {
            return Ok(());
        };
        match handle.shutdown().await {
            Some(press) => {
                tracing::info!(
                    machine = %press.name(),
                    parts_bent_session = press.total_parts_bent_session(),
                    "Press brake returned to session"
                );
                self.machine = Machine::Local(press);
                Ok(())
            }
            None => self.fail(executor_stopped()),
        }
    }

    /// Run the current job on the session's press brake in place
    ///
    /// Refused while the press brake is attached to an executor; use
    /// [`BendSession::execute`] then.
    pub fn process(&mut self) -> Result<SheetMetal> {
        let job_name = self.job_name();
        let result = match &mut self.machine {
            Machine::Local(press) => match self.controller.current_job_mut() {
                Some(job) => press.process_job(job),
                None => Err(PreconditionError::MissingJobOrSheet.into()),
            },
            Machine::Executor(_) => Err(PreconditionError::MachineUnavailable(
                "attached to an executor".to_string(),
            )
            .into()),
        };

        match result {
            Ok(sheet) => {
                self.emit(EngineEvent::Machine(MachineEvent::JobProcessed {
                    job: job_name,
                    bends: sheet.current_bends().len(),
                    parts_bent_session: self.parts_bent_session(),
                }));
                self.emit(EngineEvent::info(format!(
                    "Processed {} bends on {} sheet",
                    sheet.current_bends().len(),
                    format_length(sheet.original_length())
                )));
                Ok(sheet)
            }
            Err(err) => {
                self.emit(EngineEvent::Machine(MachineEvent::ProcessingFailed {
                    job: job_name,
                    error: err.to_string(),
                }));
                self.fail(err)
            }
        }
    }

    /// Run a copy of the current job on the attached executor
    ///
    /// On success the formed job handed back by the executor becomes the
    /// current job, unless the current job was replaced meanwhile.
    pub async fn execute(&mut self) -> std::result::Result<ExecutionReport, ExecutionError> {
        let handle = match &self.machine {
            Machine::Executor(handle) => handle.clone(),
            Machine::Local(_) => {
                let err: Error =
                    PreconditionError::MachineUnavailable("no executor attached".to_string())
                        .into();
                self.emit(EngineEvent::error(err.to_string()));
                return Err(err.into());
            }
        };
        let Some(job) = self.controller.current_job().cloned() else {
            let err: Error = PreconditionError::MissingJobOrSheet.into();
            self.emit(EngineEvent::error(err.to_string()));
            return Err(err.into());
        };
        let job_name = job.name().to_string();
        let job_id = job.id();

        match handle.execute_and_wait(job).await {
            Ok(report) => {
                if self.controller.current_job().map(Job::id) == Some(job_id) {
                    self.controller.set_current_job(report.job.clone());
                }
                self.emit(EngineEvent::Machine(MachineEvent::JobProcessed {
                    job: job_name,
                    bends: report.sheet.current_bends().len(),
                    parts_bent_session: report.parts_bent_session,
                }));
                Ok(report)
            }
            Err(err) => {
                tracing::warn!(%err, "Execution refused");
                self.emit(EngineEvent::Machine(MachineEvent::ProcessingFailed {
                    job: job_name,
                    error: err.to_string(),
                }));
                Err(err)
            }
        }
    }

    pub fn current_job(&self) -> Option<&Job> {
        self.controller.current_job()
    }

    /// Steps of the current job, read-only
    pub fn steps(&self) -> &[BendStep] {
        self.controller
            .current_job()
            .map(Job::steps)
            .unwrap_or_default()
    }

    pub fn sheet(&self) -> Option<&SheetMetal> {
        self.controller.current_job().and_then(Job::sheet)
    }

    /// Name, tooling and counter of the session's press brake
    pub fn machine_status(&self) -> MachineStatus {
        match &self.machine {
            Machine::Local(press) => MachineStatus::of(press),
            Machine::Executor(handle) => handle.status(),
        }
    }

    /// The attached executor, if any
    pub fn executor(&self) -> Option<&ExecutorHandle> {
        match &self.machine {
            Machine::Executor(handle) => Some(handle),
            Machine::Local(_) => None,
        }
    }

    pub fn parts_bent_session(&self) -> u64 {
        match &self.machine {
            Machine::Local(press) => press.total_parts_bent_session(),
            Machine::Executor(handle) => handle.status().total_parts_bent_session,
        }
    }

    pub fn material_names(&self) -> Vec<String> {
        self.materials.names()
    }

    pub fn punch_names(&self) -> Vec<String> {
        self.tooling.punch_names()
    }

    pub fn die_names(&self) -> Vec<String> {
        self.tooling.die_names()
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }
}

fn executor_stopped() -> Error {
    PreconditionError::MachineUnavailable("executor has stopped".to_string()).into()
}
