use crate::sheet::SheetMetal;
use crate::step::{BendParams, BendStep};
use bendkit_core::ConstructionError;
use serde::Serialize;
use uuid::Uuid;

/// A named, ordered sequence of bends to be formed on one sheet
///
/// The step list can only grow through the
/// [`JobController`](crate::JobController), which validates every bend
/// before it is appended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Job {
    id: Uuid,
    name: String,
    sheet: Option<SheetMetal>,
    steps: Vec<BendStep>,
    sheet_revision: u64,
}

impl Job {
    /// Create a job for an existing sheet
    pub fn new(name: impl Into<String>, sheet: SheetMetal) -> Result<Self, ConstructionError> {
        let mut job = Self::draft(name)?;
        job.sheet = Some(sheet);
        Ok(job)
    }

    /// Create a job with no sheet attached yet
    pub fn draft(name: impl Into<String>) -> Result<Self, ConstructionError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConstructionError::EmptyJobName);
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            sheet: None,
            steps: Vec::new(),
            sheet_revision: 0,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sheet(&self) -> Option<&SheetMetal> {
        self.sheet.as_ref()
    }

    pub(crate) fn sheet_mut(&mut self) -> Option<&mut SheetMetal> {
        self.sheet.as_mut()
    }

    pub fn has_sheet(&self) -> bool {
        self.sheet.is_some()
    }

    /// Ordered bend steps, read-only
    pub fn steps(&self) -> &[BendStep] {
        &self.steps
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Incremented every time the sheet is replaced
    pub fn sheet_revision(&self) -> u64 {
        self.sheet_revision
    }

    /// Replace the sheet, returning the previous one
    ///
    /// The incoming sheet starts flat. Steps are kept.
    pub fn attach_sheet(&mut self, mut sheet: SheetMetal) -> Option<SheetMetal> {
        sheet.reset_form();
        self.sheet_revision += 1;
        self.sheet.replace(sheet)
    }

    /// Replay the steps onto the sheet, returning the formed sheet
    ///
    /// Reserved for press brake execution, which also counts the part.
    /// `None` when no sheet is attached.
    #[doc(hidden)]
    pub fn form_sheet(&mut self) -> Option<&SheetMetal> {
        let sheet = self.sheet.as_mut()?;
        sheet.replay(&self.steps);
        Some(sheet)
    }

    pub(crate) fn push_step(&mut self, params: BendParams) -> BendStep {
        // steps[i].sequence_order == i + 1
        let order = self.steps.len() as u32 + 1;
        let step = BendStep::new(order, params);
        self.steps.push(step);
        step
    }

    pub(crate) fn clear_steps(&mut self) -> usize {
        let removed = self.steps.len();
        self.steps.clear();
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::FormState;
    use bendkit_core::{BendDirection, MaterialCatalog};

    fn sheet() -> SheetMetal {
        let steel = MaterialCatalog::standard().get("Steel").unwrap().clone();
        SheetMetal::new("S-1", 300.0, 100.0, 2.0, steel).unwrap()
    }

    fn params(position: f64) -> BendParams {
        BendParams::new(position, 90.0, 3.0, BendDirection::Up)
    }

    #[test]
    fn test_job_requires_name() {
        assert_eq!(Job::new("  ", sheet()), Err(ConstructionError::EmptyJobName));
        assert_eq!(Job::draft(""), Err(ConstructionError::EmptyJobName));
    }

    #[test]
    fn test_jobs_get_distinct_ids() {
        let a = Job::new("A", sheet()).unwrap();
        let b = Job::new("A", sheet()).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_draft_has_no_sheet() {
        let job = Job::draft("Draft").unwrap();
        assert!(!job.has_sheet());
        assert_eq!(job.step_count(), 0);
    }

    #[test]
    fn test_sequence_orders_follow_positions() {
        let mut job = Job::new("A", sheet()).unwrap();
        job.push_step(params(50.0));
        job.push_step(params(150.0));
        let orders: Vec<u32> = job.steps().iter().map(|s| s.sequence_order()).collect();
        assert_eq!(orders, vec![1, 2]);

        assert_eq!(job.clear_steps(), 2);
        let step = job.push_step(params(80.0));
        assert_eq!(step.sequence_order(), 1);
    }

    #[test]
    fn test_form_sheet_replays_own_steps() {
        let mut job = Job::new("A", sheet()).unwrap();
        job.push_step(params(50.0));
        job.push_step(params(150.0));

        let formed = job.form_sheet().unwrap().clone();
        assert_eq!(formed.current_bends(), job.steps());
        assert_eq!(formed.form_state(), FormState::Formed);

        job.clear_steps();
        assert!(job.form_sheet().unwrap().current_bends().is_empty());
        assert!(Job::draft("Draft").unwrap().form_sheet().is_none());
    }

    #[test]
    fn test_attach_sheet_bumps_revision() {
        let mut job = Job::draft("Draft").unwrap();
        assert!(job.attach_sheet(sheet()).is_none());
        assert_eq!(job.sheet_revision(), 1);
        assert!(job.attach_sheet(sheet()).is_some());
        assert_eq!(job.sheet_revision(), 2);
    }
}
