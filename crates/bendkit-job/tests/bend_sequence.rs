use bendkit_core::{
    BendDirection, ConstructionError, Error, MaterialCatalog, MaterialDetails, PreconditionError,
    ValidationError,
};
use bendkit_job::{AddStepOutcome, Job, JobController, ProposalOutcome, SheetMetal};

fn material(name: &str) -> MaterialDetails {
    MaterialCatalog::standard().get(name).unwrap().clone()
}

fn controller(length: f64, thickness: f64, material_name: &str) -> JobController {
    let sheet = SheetMetal::new("Sheet-1", length, 100.0, thickness, material(material_name)).unwrap();
    let mut controller = JobController::new();
    controller.set_current_job(Job::new("Part", sheet).unwrap());
    controller
}

fn appended(outcome: AddStepOutcome) -> bendkit_job::BendStep {
    match outcome {
        AddStepOutcome::Appended(step) => step,
        AddStepOutcome::NeedsConfirmation(p) => panic!("unexpected confirmation: {:?}", p),
    }
}

#[test]
fn test_steel_bend_above_recommended_radius_is_appended() {
    let mut c = controller(300.0, 2.0, "Steel");
    let step = appended(c.add_step(50.0, 90.0, 3.5, BendDirection::Up).unwrap());

    assert_eq!(step.sequence_order(), 1);
    assert_eq!(step.position(), 50.0);
    assert_eq!(step.target_angle(), 90.0);
    assert_eq!(step.radius(), 3.5);
    assert_eq!(step.direction(), BendDirection::Up);
    assert_eq!(c.current_job().unwrap().steps(), &[step]);
}

#[test]
fn test_sharp_bend_is_appended_without_warning() {
    let mut c = controller(300.0, 2.0, "Steel");
    let step = appended(c.add_step(150.0, 45.0, 0.0, BendDirection::Down).unwrap());
    assert_eq!(step.radius(), 0.0);
}

#[test]
fn test_tight_radius_warns_then_appends_on_commit() {
    let mut c = controller(300.0, 2.0, "Steel");
    let proposal = match c.add_step(100.0, 90.0, 1.0, BendDirection::Up).unwrap() {
        AddStepOutcome::NeedsConfirmation(p) => p,
        other => panic!("expected confirmation, got {:?}", other),
    };

    let warning = proposal.warning().copied().unwrap();
    assert_eq!(warning.min_recommended, 3.0);
    assert_eq!(
        warning.to_string(),
        "radius (1.00mm) < recommended min (3.00mm), may cause cracking"
    );
    assert_eq!(c.current_job().unwrap().step_count(), 0);

    let step = c.commit(proposal).unwrap();
    assert_eq!(step.sequence_order(), 1);
    assert_eq!(c.current_job().unwrap().step_count(), 1);
}

#[test]
fn test_tight_radius_cancelled_leaves_job_unchanged() {
    let mut c = controller(300.0, 2.0, "Steel");
    let proposal = c.propose(100.0, 90.0, 1.0, BendDirection::Up).unwrap();
    assert!(matches!(proposal.outcome(), ProposalOutcome::NeedsConfirmation(_)));
    c.discard(proposal);
    assert_eq!(c.current_job().unwrap().step_count(), 0);
}

#[test]
fn test_bend_beyond_sheet_is_rejected() {
    let mut c = controller(300.0, 2.0, "Steel");
    let err = c.add_step(350.0, 90.0, 3.0, BendDirection::Up).unwrap_err();
    assert_eq!(
        err,
        Error::Validation(ValidationError::PositionOutOfBounds {
            position: 350.0,
            length: 300.0
        })
    );
    assert_eq!(
        err.to_string(),
        "bend position (350.00mm) is outside sheet length (0-300.00mm)"
    );
    assert_eq!(c.current_job().unwrap().step_count(), 0);
}

#[test]
fn test_angle_above_maximum_is_rejected() {
    let mut c = controller(300.0, 2.0, "Steel");
    let err = c.add_step(50.0, 180.0, 3.0, BendDirection::Up).unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::AngleOutOfRange { angle, .. }) if angle == 180.0
    ));
}

#[test]
fn test_sequence_orders_stay_contiguous() {
    let mut c = controller(1000.0, 1.0, "Aluminum");
    for i in 1..=5 {
        let step = appended(c.add_step(i as f64 * 100.0, 90.0, 2.0, BendDirection::Up).unwrap());
        assert_eq!(step.sequence_order(), i);
    }

    let job = c.current_job().unwrap();
    for (i, step) in job.steps().iter().enumerate() {
        assert_eq!(step.sequence_order() as usize, i + 1);
    }
}

#[test]
fn test_clear_then_add_restarts_numbering() {
    let mut c = controller(300.0, 2.0, "Steel");
    c.add_step(50.0, 90.0, 3.0, BendDirection::Up).unwrap();
    c.add_step(100.0, 90.0, 3.0, BendDirection::Up).unwrap();
    c.clear_steps().unwrap();

    let step = appended(c.add_step(75.0, 90.0, 3.0, BendDirection::Down).unwrap());
    assert_eq!(step.sequence_order(), 1);
}

#[test]
fn test_sheet_update_with_invalid_dimensions_keeps_old_sheet() {
    let mut c = controller(300.0, 2.0, "Steel");
    let before = c.current_job().unwrap().sheet().unwrap().clone();

    let err = c.update_sheet(0.0, 100.0, 2.0, material("Steel")).unwrap_err();
    assert!(matches!(
        err,
        Error::Construction(ConstructionError::DimensionOutOfRange { ref field, .. }) if field == "length"
    ));
    assert_eq!(c.current_job().unwrap().sheet().unwrap(), &before);
}

#[test]
fn test_sheet_update_changes_recommended_radius() {
    let mut c = controller(300.0, 2.0, "Steel");
    c.update_sheet(300.0, 100.0, 2.0, material("Copper")).unwrap();

    // Copper at 2mm recommends 1.6mm
    let step = appended(c.add_step(50.0, 90.0, 1.6, BendDirection::Up).unwrap());
    assert_eq!(step.radius(), 1.6);
}

#[test]
fn test_draft_job_preconditions() {
    let mut c = JobController::new();
    c.set_current_job(Job::draft("Draft").unwrap());
    assert_eq!(
        c.add_step(50.0, 90.0, 3.0, BendDirection::Up).unwrap_err(),
        Error::Precondition(PreconditionError::NoSheet)
    );

    c.update_sheet(300.0, 100.0, 2.0, material("Steel")).unwrap();
    assert!(c.add_step(50.0, 90.0, 3.0, BendDirection::Up).is_ok());
}

#[test]
fn test_set_current_job_returns_previous() {
    let mut c = controller(300.0, 2.0, "Steel");
    c.add_step(50.0, 90.0, 3.0, BendDirection::Up).unwrap();

    let previous = c.set_current_job(Job::draft("Next").unwrap()).unwrap();
    assert_eq!(previous.name(), "Part");
    assert_eq!(previous.step_count(), 1);
    assert_eq!(c.current_job().unwrap().name(), "Next");
}
