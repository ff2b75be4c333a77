//! Press brake model
//!
//! The press brake holds the mounted tooling and forms a job's bend
//! sequence onto its sheet. It keeps a running count of parts bent during
//! the session.

use bendkit_core::{Die, PreconditionError, Punch, Result};
use bendkit_job::{Job, SheetMetal};

/// A press brake with its currently mounted punch and die
#[derive(Debug, Clone)]
pub struct PressBrake {
    name: String,
    current_punch: Option<Punch>,
    current_die: Option<Die>,
    total_parts_bent_session: u64,
}

impl PressBrake {
    pub fn new(name: impl Into<String>, punch: Option<Punch>, die: Option<Die>) -> Self {
        Self {
            name: name.into(),
            current_punch: punch,
            current_die: die,
            total_parts_bent_session: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn current_punch(&self) -> Option<&Punch> {
        self.current_punch.as_ref()
    }

    pub fn current_die(&self) -> Option<&Die> {
        self.current_die.as_ref()
    }

    /// Parts successfully processed since this press brake was created
    pub fn total_parts_bent_session(&self) -> u64 {
        self.total_parts_bent_session
    }

    pub fn is_tooled(&self) -> bool {
        self.current_punch.is_some() && self.current_die.is_some()
    }

    pub fn set_punch(&mut self, punch: Punch) {
        tracing::info!(machine = %self.name, punch = %punch.name, "Punch changed");
        self.current_punch = Some(punch);
    }

    pub fn set_die(&mut self, die: Die) {
        tracing::info!(machine = %self.name, die = %die.name, "Die changed");
        self.current_die = Some(die);
    }

    /// Form every step of `job` onto its sheet, in sequence order
    ///
    /// The sheet is flattened first, so processing the same job twice yields
    /// the same formed sheet. On success the session counter goes up by one
    /// and a snapshot of the formed sheet is returned. On failure nothing
    /// changes.
    pub fn process_job(&mut self, job: &mut Job) -> Result<SheetMetal> {
        if !job.has_sheet() {
            tracing::error!(machine = %self.name, job = %job.name(), "Cannot process: job has no sheet");
            return Err(PreconditionError::MissingJobOrSheet.into());
        }
        let (Some(punch), Some(die)) = (&self.current_punch, &self.current_die) else {
            tracing::error!(machine = %self.name, job = %job.name(), "Cannot process: tooling not set");
            return Err(PreconditionError::ToolingNotSet.into());
        };

        tracing::info!(
            machine = %self.name,
            job = %job.name(),
            steps = job.step_count(),
            punch = %punch.name,
            die = %die.name,
            "Processing job"
        );

        let formed = job
            .form_sheet()
            .ok_or(PreconditionError::MissingJobOrSheet)?
            .clone();
        for step in formed.current_bends() {
            tracing::debug!(sheet = %formed.id(), %step, "Bend formed");
        }

        self.total_parts_bent_session += 1;
        tracing::info!(
            machine = %self.name,
            job = %job.name(),
            bends = formed.current_bends().len(),
            parts_bent_session = self.total_parts_bent_session,
            "Job processed"
        );
        Ok(formed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bendkit_core::{BendDirection, Error, MaterialCatalog, ToolingCatalog};
    use bendkit_job::JobController;

    fn tooled_press() -> PressBrake {
        let tooling = ToolingCatalog::standard();
        PressBrake::new(
            "PB-1",
            tooling.default_punch().cloned(),
            tooling.default_die().cloned(),
        )
    }

    fn job_with_bends() -> Job {
        let steel = MaterialCatalog::standard().get("Steel").unwrap().clone();
        let sheet = SheetMetal::new("S-1", 300.0, 100.0, 2.0, steel).unwrap();
        let mut controller = JobController::new();
        controller.set_current_job(Job::new("Bracket", sheet).unwrap());
        controller.add_step(50.0, 90.0, 3.0, BendDirection::Up).unwrap();
        controller.add_step(150.0, 45.0, 3.0, BendDirection::Down).unwrap();
        controller.take_current_job().unwrap()
    }

    #[test]
    fn test_process_forms_steps_in_order() {
        let mut press = tooled_press();
        let mut job = job_with_bends();

        let formed = press.process_job(&mut job).unwrap();
        assert_eq!(formed.current_bends(), job.steps());
        assert_eq!(job.sheet().unwrap(), &formed);
        assert_eq!(press.total_parts_bent_session(), 1);
    }

    #[test]
    fn test_reprocessing_does_not_accumulate_bends() {
        let mut press = tooled_press();
        let mut job = job_with_bends();
        let first = press.process_job(&mut job).unwrap();
        let second = press.process_job(&mut job).unwrap();
        assert_eq!(second.current_bends(), job.steps());
        assert_eq!(second, first);
        assert_eq!(press.total_parts_bent_session(), 2);
    }

    #[test]
    fn test_missing_tooling_leaves_counter() {
        let mut press = PressBrake::new("PB-1", None, ToolingCatalog::standard().default_die().cloned());
        let mut job = job_with_bends();
        assert_eq!(
            press.process_job(&mut job),
            Err(Error::Precondition(PreconditionError::ToolingNotSet))
        );
        assert_eq!(press.total_parts_bent_session(), 0);
        assert!(job.sheet().unwrap().current_bends().is_empty());
    }

    #[test]
    fn test_missing_sheet() {
        let mut press = tooled_press();
        let mut job = Job::draft("Draft").unwrap();
        assert_eq!(
            press.process_job(&mut job),
            Err(Error::Precondition(PreconditionError::MissingJobOrSheet))
        );
    }

    #[test]
    fn test_empty_job_still_counts() {
        let mut press = tooled_press();
        let steel = MaterialCatalog::standard().get("Steel").unwrap().clone();
        let sheet = SheetMetal::new("S-1", 300.0, 100.0, 2.0, steel).unwrap();
        let mut job = Job::new("Blank", sheet).unwrap();
        let formed = press.process_job(&mut job).unwrap();
        assert!(formed.current_bends().is_empty());
        assert_eq!(press.total_parts_bent_session(), 1);
    }
}
