//! Projection from angular states to Cartesian bob positions.
//!
//! The pivot sits at the origin; y points up, so a pendulum hanging straight
//! down has negative bob heights. This sign convention matches the dynamics
//! module, where angles are measured from the downward vertical.

use crate::pendulum::dynamics::PhysicalParams;
use crate::pendulum::simulation::Trajectory;
use nalgebra::{Vector2, Vector4};
use serde::{Deserialize, Serialize};

/// Cartesian positions of both bobs for one trajectory sample.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct BobPositions {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BobPositions {
    pub fn bob_1(&self) -> Vector2<f64> {
        Vector2::new(self.x1, self.y1)
    }

    pub fn bob_2(&self) -> Vector2<f64> {
        Vector2::new(self.x2, self.y2)
    }
}

/// A projected trajectory: one `BobPositions` per sample, read-only view
/// derived from a `Trajectory`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CartesianTrajectory {
    pub times: Vec<f64>,
    pub positions: Vec<BobPositions>,
}

impl CartesianTrajectory {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Maps one angular state to bob positions. Pure and deterministic.
pub fn bob_positions(physics: &PhysicalParams, state: &Vector4<f64>) -> BobPositions {
    let (th1, th2) = (state[0], state[2]);
    let x1 = physics.l1 * th1.sin();
    let y1 = -physics.l1 * th1.cos();
    BobPositions {
        x1,
        y1,
        x2: x1 + physics.l2 * th2.sin(),
        y2: y1 - physics.l2 * th2.cos(),
    }
}

/// Projects a full trajectory. Output length always equals the input length.
pub fn project(physics: &PhysicalParams, trajectory: &Trajectory) -> CartesianTrajectory {
    CartesianTrajectory {
        times: trajectory.times.clone(),
        positions: trajectory
            .states
            .iter()
            .map(|state| bob_positions(physics, state))
            .collect(),
    }
}

/// Euclidean distance between the second bobs of two projected samples.
/// Used to measure how far the baseline and perturbed runs have diverged.
pub fn bob_2_distance(a: &BobPositions, b: &BobPositions) -> f64 {
    (a.bob_2() - b.bob_2()).norm()
}
