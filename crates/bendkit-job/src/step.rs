use bendkit_core::BendDirection;
use serde::{Deserialize, Serialize};

/// Parameters of a bend as requested, before it is accepted into a job
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BendParams {
    /// Distance from the reference edge to the bend line (mm)
    pub position: f64,
    /// Desired internal bend angle (degrees)
    pub angle: f64,
    /// Desired inner bend radius (mm)
    pub radius: f64,
    /// Direction of the bend
    pub direction: BendDirection,
}

impl BendParams {
    pub fn new(position: f64, angle: f64, radius: f64, direction: BendDirection) -> Self {
        Self {
            position,
            angle,
            radius,
            direction,
        }
    }
}

/// A single accepted bend operation in a job
///
/// Only a [`Job`](crate::Job) creates steps; once created a step never
/// changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BendStep {
    sequence_order: u32,
    position: f64,
    target_angle: f64,
    radius: f64,
    direction: BendDirection,
}

impl BendStep {
    pub(crate) fn new(sequence_order: u32, params: BendParams) -> Self {
        Self {
            sequence_order,
            position: params.position,
            target_angle: params.angle,
            radius: params.radius,
            direction: params.direction,
        }
    }

    /// 1-based order of this bend in its job
    pub fn sequence_order(&self) -> u32 {
        self.sequence_order
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn target_angle(&self) -> f64 {
        self.target_angle
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn direction(&self) -> BendDirection {
        self.direction
    }

    /// The parameters this step was accepted with
    pub fn params(&self) -> BendParams {
        BendParams::new(
            self.position,
            self.target_angle,
            self.radius,
            self.direction,
        )
    }
}

impl std::fmt::Display for BendStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{}: Pos {:.1}mm, Ang {:.1}°, Rad {:.1}mm, Dir {}",
            self.sequence_order, self.position, self.target_angle, self.radius, self.direction
        )
    }
}
