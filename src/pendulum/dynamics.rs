//! Equations of motion for the double pendulum.
//!
//! Two rigid massless arms with point-mass bobs, hinged in series from a fixed
//! pivot, driven by gravity only. The state vector is `(th1, w1, th2, w2)`:
//! angle and angular rate of each arm, in radians, measured from the downward
//! vertical with counter-clockwise positive.

use crate::pendulum::error::SimulationError;
use nalgebra::Vector4;
use serde::{Deserialize, Serialize};

/// Physical constants for one simulation run. Immutable once validated;
/// pass by reference into the integrator rather than stashing in a global
/// so that multiple parameter sets can be evaluated in parallel.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PhysicalParams {
    /// Gravitational acceleration (m/s^2)
    pub g: f64,
    /// Length of the first arm (m)
    pub l1: f64,
    /// Length of the second arm (m)
    pub l2: f64,
    /// Mass of the first bob (kg)
    pub m1: f64,
    /// Mass of the second bob (kg)
    pub m2: f64,
}

impl Default for PhysicalParams {
    fn default() -> PhysicalParams {
        PhysicalParams {
            g: 9.81,
            l1: 1.0,
            l2: 1.0,
            m1: 1.0,
            m2: 1.0,
        }
    }
}

impl PhysicalParams {
    /// All parameters must be finite and strictly positive. With positive
    /// masses the shared denominator in `state_derivative` is bounded away
    /// from zero, so validating here rules out division by zero later.
    pub fn validate(&self) -> Result<(), SimulationError> {
        let entries = [
            ("g", self.g),
            ("l1", self.l1),
            ("l2", self.l2),
            ("m1", self.m1),
            ("m2", self.m2),
        ];
        for (name, value) in entries {
            if !value.is_finite() || value <= 0.0 {
                return Err(SimulationError::InvalidConfiguration(format!(
                    "physical parameter `{}` must be positive and finite, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Time derivative of the state vector, from the Lagrangian equations of
    /// motion. The system is autonomous; `t` exists to satisfy the ODE solver
    /// interface. Pure function of its arguments, safe to call concurrently.
    pub fn state_derivative(&self, _t: f64, state: Vector4<f64>) -> Vector4<f64> {
        let (th1, w1, th2, w2) = (state[0], state[1], state[2], state[3]);
        // Sign matters: the sin(delta) coupling terms below require
        // delta = th1 - th2, or the vector field stops conserving energy.
        let delta = th1 - th2;

        // Both angular accelerations share one denominator.
        let den = (2.0 * self.m1 + self.m2) - self.m2 * (2.0 * delta).cos();

        let num1 = -self.g * (2.0 * self.m1 + self.m2) * th1.sin()
            - self.m2 * self.g * (th1 - 2.0 * th2).sin()
            - 2.0 * delta.sin() * self.m2 * (w2 * w2 * self.l2 + w1 * w1 * self.l1 * delta.cos());
        let w1_dot = num1 / (self.l1 * den);

        let num2 = 2.0
            * delta.sin()
            * (w1 * w1 * self.l1 * (self.m1 + self.m2)
                + self.g * (self.m1 + self.m2) * th1.cos()
                + w2 * w2 * self.l2 * self.m2 * delta.cos());
        let w2_dot = num2 / (self.l2 * den);

        Vector4::new(w1, w1_dot, w2, w2_dot)
    }

    /// Total mechanical energy (kinetic + potential) of a state, with the
    /// potential zero at the pivot. Conserved by the true dynamics, which
    /// makes it a good accuracy check on the integrator.
    pub fn total_energy(&self, state: Vector4<f64>) -> f64 {
        let (th1, w1, th2, w2) = (state[0], state[1], state[2], state[3]);

        let bob_1_speed_sq = self.l1 * self.l1 * w1 * w1;
        let bob_2_speed_sq = bob_1_speed_sq
            + self.l2 * self.l2 * w2 * w2
            + 2.0 * self.l1 * self.l2 * w1 * w2 * (th1 - th2).cos();
        let kinetic = 0.5 * self.m1 * bob_1_speed_sq + 0.5 * self.m2 * bob_2_speed_sq;

        let potential =
            -(self.m1 + self.m2) * self.g * self.l1 * th1.cos() - self.m2 * self.g * self.l2 * th2.cos();

        kinetic + potential
    }
}
