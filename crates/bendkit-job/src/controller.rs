//! Job controller
//!
//! The controller owns the current job and is the only component that
//! appends bend steps. Every bend passes through the [`BendValidator`];
//! bends that only trip the radius warning go through a two-phase
//! propose/commit exchange so that nothing is appended before the caller
//! explicitly confirms.

use crate::job::Job;
use crate::sheet::SheetMetal;
use crate::step::{BendParams, BendStep};
use crate::validator::{BendValidator, Validation};
use bendkit_core::{
    BendDirection, BendLimits, ConstructionError, MaterialDetails, PreconditionError,
    RadiusWarning, Result, SheetLimits, ValidationError,
};
use uuid::Uuid;

/// Validator verdict carried by a [`Proposal`]
#[derive(Debug, Clone, PartialEq)]
pub enum ProposalOutcome {
    Accepted,
    Rejected(ValidationError),
    NeedsConfirmation(RadiusWarning),
}

impl From<Validation> for ProposalOutcome {
    fn from(v: Validation) -> Self {
        match v {
            Validation::Accepted => ProposalOutcome::Accepted,
            Validation::AcceptedWithWarning(w) => ProposalOutcome::NeedsConfirmation(w),
            Validation::Rejected(e) => ProposalOutcome::Rejected(e),
        }
    }
}

/// A validated but not yet appended bend
///
/// A proposal is bound to the job and sheet revision it was validated
/// against. It is consumed by [`JobController::commit`] or
/// [`JobController::discard`].
#[derive(Debug, PartialEq)]
pub struct Proposal {
    job_id: Uuid,
    sheet_revision: u64,
    params: BendParams,
    outcome: ProposalOutcome,
}

impl Proposal {
    pub fn job_id(&self) -> Uuid {
        self.job_id
    }

    pub fn sheet_revision(&self) -> u64 {
        self.sheet_revision
    }

    pub fn params(&self) -> &BendParams {
        &self.params
    }

    pub fn outcome(&self) -> &ProposalOutcome {
        &self.outcome
    }

    /// The radius warning awaiting confirmation, if any
    pub fn warning(&self) -> Option<&RadiusWarning> {
        match &self.outcome {
            ProposalOutcome::NeedsConfirmation(w) => Some(w),
            _ => None,
        }
    }
}

/// Result of a one-shot [`JobController::add_step`]
#[derive(Debug, PartialEq)]
pub enum AddStepOutcome {
    /// The bend passed validation and was appended
    Appended(BendStep),
    /// The bend needs confirmation; nothing was appended
    NeedsConfirmation(Proposal),
}

/// Result of replacing the current job's sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetUpdate {
    /// Id of the sheet now attached
    pub sheet_id: String,
    /// Sequence orders of kept steps that the new geometry rejects
    pub invalid_steps: Vec<u32>,
}

impl SheetUpdate {
    pub fn all_steps_valid(&self) -> bool {
        self.invalid_steps.is_empty()
    }
}

/// Manages the current job and its bend sequence
#[derive(Debug, Default)]
pub struct JobController {
    current: Option<Job>,
    validator: BendValidator,
    sheet_limits: SheetLimits,
}

impl JobController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(bend_limits: BendLimits, sheet_limits: SheetLimits) -> Self {
        Self {
            current: None,
            validator: BendValidator::new(bend_limits),
            sheet_limits,
        }
    }

    pub fn validator(&self) -> &BendValidator {
        &self.validator
    }

    pub fn sheet_limits(&self) -> &SheetLimits {
        &self.sheet_limits
    }

    /// Make `job` current, returning the previous job unchanged
    pub fn set_current_job(&mut self, job: Job) -> Option<Job> {
        tracing::info!(job = %job.name(), id = %job.id(), "Current job set");
        self.current.replace(job)
    }

    pub fn current_job(&self) -> Option<&Job> {
        self.current.as_ref()
    }

    /// Mutable access for collaborators that need the job itself, such as
    /// the press brake. Steps can still only be appended here.
    pub fn current_job_mut(&mut self) -> Option<&mut Job> {
        self.current.as_mut()
    }

    pub fn take_current_job(&mut self) -> Option<Job> {
        self.current.take()
    }

    fn job_with_sheet(&self) -> Result<(&Job, &SheetMetal)> {
        let job = self.current.as_ref().ok_or(PreconditionError::NoCurrentJob)?;
        let sheet = job.sheet().ok_or(PreconditionError::NoSheet)?;
        Ok((job, sheet))
    }

    /// Validate a bend against the current job without changing anything
    pub fn propose(
        &self,
        position: f64,
        angle: f64,
        radius: f64,
        direction: BendDirection,
    ) -> Result<Proposal> {
        let (job, sheet) = self.job_with_sheet()?;
        let params = BendParams::new(position, angle, radius, direction);
        let outcome = ProposalOutcome::from(self.validator.validate_params(sheet, &params));

        tracing::debug!(
            job = %job.name(),
            position,
            angle,
            radius,
            %direction,
            ?outcome,
            "Bend proposed"
        );

        Ok(Proposal {
            job_id: job.id(),
            sheet_revision: job.sheet_revision(),
            params,
            outcome,
        })
    }

    /// Append the bend described by `proposal`
    ///
    /// Committing a proposal that needs confirmation is the confirmation.
    pub fn commit(&mut self, proposal: Proposal) -> Result<BendStep> {
        let job = self.current.as_mut().ok_or(PreconditionError::NoCurrentJob)?;

        if let ProposalOutcome::Rejected(err) = &proposal.outcome {
            return Err(err.clone().into());
        }

        if proposal.job_id != job.id() {
            return Err(PreconditionError::StaleProposal {
                reason: "the current job changed".to_string(),
            }
            .into());
        }
        if proposal.sheet_revision != job.sheet_revision() {
            return Err(PreconditionError::StaleProposal {
                reason: "the sheet was replaced".to_string(),
            }
            .into());
        }
        if !job.has_sheet() {
            return Err(PreconditionError::NoSheet.into());
        }

        let confirmed = proposal.warning().is_some();
        let step = job.push_step(proposal.params);
        if confirmed {
            tracing::warn!(job = %job.name(), step = %step, "Bend added after radius warning confirmed");
        } else {
            tracing::info!(job = %job.name(), step = %step, "Bend added");
        }
        Ok(step)
    }

    /// Drop a proposal without appending
    pub fn discard(&self, proposal: Proposal) {
        tracing::info!(
            position = proposal.params.position,
            radius = proposal.params.radius,
            "Bend proposal discarded"
        );
    }

    /// Validate and append in one call when no confirmation is needed
    ///
    /// A rejected bend is returned as an error. A bend that trips the radius
    /// warning comes back as a [`Proposal`] to commit or discard.
    pub fn add_step(
        &mut self,
        position: f64,
        angle: f64,
        radius: f64,
        direction: BendDirection,
    ) -> Result<AddStepOutcome> {
        let proposal = self.propose(position, angle, radius, direction)?;
        match &proposal.outcome {
            ProposalOutcome::Rejected(err) => {
                tracing::warn!(%err, "Bend rejected");
                Err(err.clone().into())
            }
            ProposalOutcome::NeedsConfirmation(warning) => {
                tracing::warn!(%warning, "Bend needs confirmation");
                Ok(AddStepOutcome::NeedsConfirmation(proposal))
            }
            ProposalOutcome::Accepted => self.commit(proposal).map(AddStepOutcome::Appended),
        }
    }

    /// Remove every step from the current job and flatten its sheet
    ///
    /// Returns the number of steps removed.
    pub fn clear_steps(&mut self) -> Result<usize> {
        let job = self.current.as_mut().ok_or(PreconditionError::NoCurrentJob)?;
        let removed = job.clear_steps();
        if let Some(sheet) = job.sheet_mut() {
            sheet.reset_form();
        }
        tracing::info!(job = %job.name(), removed, "All bend steps cleared");
        Ok(removed)
    }

    /// Replace the current job's sheet with one of the given geometry
    ///
    /// The old sheet stays in place when any dimension is out of range or
    /// the new sheet cannot be built. Existing steps are kept and revalidated;
    /// the ones the new sheet rejects are reported in
    /// [`SheetUpdate::invalid_steps`].
    pub fn update_sheet(
        &mut self,
        length: f64,
        width: f64,
        thickness: f64,
        material: MaterialDetails,
    ) -> Result<SheetUpdate> {
        let job = self.current.as_mut().ok_or(PreconditionError::NoCurrentJob)?;

        for (field, value) in [("length", length), ("width", width), ("thickness", thickness)] {
            if !self.sheet_limits.contains(value) {
                return Err(ConstructionError::DimensionOutOfRange {
                    field: field.to_string(),
                    value,
                    min: self.sheet_limits.min_dimension,
                    max: self.sheet_limits.max_dimension,
                }
                .into());
            }
        }

        let id = match job.sheet() {
            Some(sheet) => sheet.id().to_string(),
            None => format!("Sheet-{}", job.name()),
        };
        let sheet = SheetMetal::new(id, length, width, thickness, material)?;

        let invalid_steps: Vec<u32> = job
            .steps()
            .iter()
            .filter(|step| self.validator.validate_params(&sheet, &step.params()).is_rejected())
            .map(|step| step.sequence_order())
            .collect();

        let sheet_id = sheet.id().to_string();
        job.attach_sheet(sheet);

        tracing::info!(
            job = %job.name(),
            sheet = %sheet_id,
            length,
            width,
            thickness,
            invalid = invalid_steps.len(),
            "Sheet updated"
        );
        if !invalid_steps.is_empty() {
            tracing::warn!(steps = ?invalid_steps, "Existing steps no longer fit the sheet");
        }

        Ok(SheetUpdate {
            sheet_id,
            invalid_steps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bendkit_core::{Error, MaterialCatalog};

    fn steel() -> MaterialDetails {
        MaterialCatalog::standard().get("Steel").unwrap().clone()
    }

    fn controller_with_job() -> JobController {
        let sheet = SheetMetal::new("S-1", 300.0, 100.0, 2.0, steel()).unwrap();
        let mut controller = JobController::new();
        controller.set_current_job(Job::new("Bracket", sheet).unwrap());
        controller
    }

    #[test]
    fn test_preconditions() {
        let mut controller = JobController::new();
        assert_eq!(
            controller.add_step(50.0, 90.0, 3.0, BendDirection::Up),
            Err(Error::Precondition(PreconditionError::NoCurrentJob))
        );
        assert_eq!(
            controller.clear_steps(),
            Err(Error::Precondition(PreconditionError::NoCurrentJob))
        );

        controller.set_current_job(Job::draft("Draft").unwrap());
        assert_eq!(
            controller.propose(50.0, 90.0, 3.0, BendDirection::Up).unwrap_err(),
            Error::Precondition(PreconditionError::NoSheet)
        );
    }

    #[test]
    fn test_add_step_appends_in_order() {
        let mut controller = controller_with_job();
        let first = controller.add_step(50.0, 90.0, 3.0, BendDirection::Up).unwrap();
        let second = controller.add_step(150.0, 45.0, 4.0, BendDirection::Down).unwrap();
        assert!(matches!(first, AddStepOutcome::Appended(s) if s.sequence_order() == 1));
        assert!(matches!(second, AddStepOutcome::Appended(s) if s.sequence_order() == 2));
        assert_eq!(controller.current_job().unwrap().step_count(), 2);
    }

    #[test]
    fn test_rejected_step_leaves_job_unchanged() {
        let mut controller = controller_with_job();
        let err = controller.add_step(350.0, 90.0, 3.0, BendDirection::Up).unwrap_err();
        assert!(err.is_validation_error());
        assert_eq!(controller.current_job().unwrap().step_count(), 0);
    }

    #[test]
    fn test_warning_requires_commit() {
        let mut controller = controller_with_job();
        let outcome = controller.add_step(50.0, 90.0, 1.0, BendDirection::Up).unwrap();
        let AddStepOutcome::NeedsConfirmation(proposal) = outcome else {
            panic!("expected a confirmation request");
        };
        assert_eq!(proposal.warning().unwrap().min_recommended, 3.0);
        assert_eq!(controller.current_job().unwrap().step_count(), 0);

        let step = controller.commit(proposal).unwrap();
        assert_eq!(step.radius(), 1.0);
        assert_eq!(controller.current_job().unwrap().step_count(), 1);
    }

    #[test]
    fn test_discard_appends_nothing() {
        let mut controller = controller_with_job();
        let proposal = controller.propose(50.0, 90.0, 1.0, BendDirection::Up).unwrap();
        controller.discard(proposal);
        assert_eq!(controller.current_job().unwrap().step_count(), 0);
    }

    #[test]
    fn test_commit_rejected_proposal_fails() {
        let mut controller = controller_with_job();
        let proposal = controller.propose(50.0, 200.0, 3.0, BendDirection::Up).unwrap();
        assert!(controller.commit(proposal).unwrap_err().is_validation_error());
    }

    #[test]
    fn test_stale_proposal_after_sheet_update() {
        let mut controller = controller_with_job();
        let proposal = controller.propose(50.0, 90.0, 1.0, BendDirection::Up).unwrap();
        controller.update_sheet(400.0, 100.0, 2.0, steel()).unwrap();
        assert!(matches!(
            controller.commit(proposal),
            Err(Error::Precondition(PreconditionError::StaleProposal { .. }))
        ));
    }

    #[test]
    fn test_stale_proposal_after_job_change() {
        let mut controller = controller_with_job();
        let proposal = controller.propose(50.0, 90.0, 1.0, BendDirection::Up).unwrap();
        let sheet = SheetMetal::new("S-2", 300.0, 100.0, 2.0, steel()).unwrap();
        controller.set_current_job(Job::new("Other", sheet).unwrap());
        assert!(matches!(
            controller.commit(proposal),
            Err(Error::Precondition(PreconditionError::StaleProposal { .. }))
        ));
    }

    #[test]
    fn test_clear_steps_is_idempotent() {
        let mut controller = controller_with_job();
        controller.add_step(50.0, 90.0, 3.0, BendDirection::Up).unwrap();
        assert_eq!(controller.clear_steps(), Ok(1));
        assert_eq!(controller.clear_steps(), Ok(0));
    }

    #[test]
    fn test_update_sheet_rejects_out_of_range() {
        let mut controller = controller_with_job();
        let err = controller.update_sheet(20000.0, 100.0, 2.0, steel()).unwrap_err();
        assert!(err.is_construction_error());
        assert_eq!(controller.current_job().unwrap().sheet().unwrap().original_length(), 300.0);
    }

    #[test]
    fn test_update_sheet_reports_invalid_steps() {
        let mut controller = controller_with_job();
        controller.add_step(50.0, 90.0, 3.0, BendDirection::Up).unwrap();
        controller.add_step(250.0, 90.0, 3.0, BendDirection::Up).unwrap();

        let update = controller.update_sheet(200.0, 100.0, 2.0, steel()).unwrap();
        assert_eq!(update.sheet_id, "S-1");
        assert_eq!(update.invalid_steps, vec![2]);
        assert_eq!(controller.current_job().unwrap().step_count(), 2);
    }

    #[test]
    fn test_update_sheet_names_draft_sheet() {
        let mut controller = JobController::new();
        controller.set_current_job(Job::draft("Panel").unwrap());
        let update = controller.update_sheet(300.0, 100.0, 2.0, steel()).unwrap();
        assert_eq!(update.sheet_id, "Sheet-Panel");
        assert!(update.all_steps_valid());
    }
}
