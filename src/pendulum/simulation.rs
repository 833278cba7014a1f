//! Trajectory integration for the double pendulum.

use crate::core::ode_solvers::{solve_at_sample_times, StepSizeControl};
use crate::pendulum::dynamics::PhysicalParams;
use crate::pendulum::error::SimulationError;
use nalgebra::Vector4;
use serde::{Deserialize, Serialize};

/// Uniformly spaced output grid over the simulation horizon, e.g. one sample
/// per animation frame.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct TimeGridParams {
    pub t_begin: f64,
    pub t_final: f64,
    pub sample_count: usize,
}

impl TimeGridParams {
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !self.t_begin.is_finite() || !self.t_final.is_finite() {
            return Err(SimulationError::InvalidConfiguration(format!(
                "time grid bounds must be finite, got [{}, {}]",
                self.t_begin, self.t_final
            )));
        }
        if self.t_begin >= self.t_final {
            return Err(SimulationError::InvalidConfiguration(format!(
                "time grid requires t_begin < t_final, got [{}, {}]",
                self.t_begin, self.t_final
            )));
        }
        if self.sample_count == 0 {
            return Err(SimulationError::InvalidConfiguration(
                "time grid requires at least one sample".to_owned(),
            ));
        }
        Ok(())
    }

    /// `sample_count` evenly spaced times spanning `[t_begin, t_final]`.
    /// A single-sample grid collapses to `[t_begin]`.
    pub fn sample_times(&self) -> Vec<f64> {
        if self.sample_count == 1 {
            return vec![self.t_begin];
        }
        let scale = (self.t_final - self.t_begin) / ((self.sample_count - 1) as f64);
        let mut times: Vec<f64> = (0..self.sample_count)
            .map(|k| self.t_begin + (k as f64) * scale)
            .collect();
        // Pin the endpoint exactly; accumulated rounding must not push the
        // last sample past the integration interval.
        *times.last_mut().unwrap() = self.t_final;
        times
    }
}

/// An integrated trajectory: one state per sample time, in chronological
/// order. Immutable once produced.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub times: Vec<f64>,
    pub states: Vec<Vector4<f64>>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Integrates the double pendulum from `initial_state` and samples the
/// solution on the uniform grid. Validation happens up front; no integration
/// work starts if the configuration is bad.
pub fn simulate(
    physics: &PhysicalParams,
    time_grid: &TimeGridParams,
    initial_state: Vector4<f64>,
    control: &StepSizeControl,
) -> Result<Trajectory, SimulationError> {
    physics.validate()?;
    time_grid.validate()?;
    if initial_state.iter().any(|value| !value.is_finite()) {
        return Err(SimulationError::InvalidInput(format!(
            "initial state must be finite, got {:?}",
            initial_state
        )));
    }

    let times = time_grid.sample_times();
    if time_grid.sample_count == 1 {
        // Nothing to integrate; the grid is just the starting point.
        return Ok(Trajectory {
            times,
            states: vec![initial_state],
        });
    }

    let dynamics = |t: f64, state: Vector4<f64>| physics.state_derivative(t, state);
    let states = solve_at_sample_times(
        &dynamics,
        time_grid.t_begin,
        time_grid.t_final,
        initial_state,
        &times,
        control,
    )?;

    Ok(Trajectory { times, states })
}

/// Integrates the baseline and perturbed initial conditions on worker threads.
/// The two runs are independent, so one failing does not abort the other;
/// each gets its own result.
#[allow(clippy::type_complexity)]
pub fn simulate_pair(
    physics: &PhysicalParams,
    time_grid: &TimeGridParams,
    baseline_state: Vector4<f64>,
    perturbed_state: Vector4<f64>,
    control: &StepSizeControl,
) -> (
    Result<Trajectory, SimulationError>,
    Result<Trajectory, SimulationError>,
) {
    rayon::join(
        || simulate(physics, time_grid, baseline_state, control),
        || simulate(physics, time_grid, perturbed_state, control),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use more_asserts::assert_gt;

    fn short_grid() -> TimeGridParams {
        TimeGridParams {
            t_begin: 0.0,
            t_final: 1.0,
            sample_count: 11,
        }
    }

    #[test]
    fn sample_times_span_the_interval_uniformly() {
        let times = short_grid().sample_times();
        assert_eq!(times.len(), 11);
        assert_eq!(*times.first().unwrap(), 0.0);
        assert_eq!(*times.last().unwrap(), 1.0);
        for (k, time) in times.iter().enumerate() {
            assert_relative_eq!(*time, 0.1 * (k as f64), epsilon = 1e-12);
        }
    }

    #[test]
    fn single_sample_grid_returns_the_initial_state() {
        let grid = TimeGridParams {
            t_begin: 0.5,
            t_final: 2.0,
            sample_count: 1,
        };
        assert_eq!(grid.sample_times(), vec![0.5]);

        let initial_state = Vector4::new(2.0, 0.0, -0.2, 0.0);
        let trajectory = simulate(
            &PhysicalParams::default(),
            &grid,
            initial_state,
            &StepSizeControl::default(),
        )
        .unwrap();
        assert_eq!(trajectory.len(), 1);
        assert_eq!(trajectory.states[0], initial_state);
    }

    #[test]
    fn degenerate_time_grids_are_rejected() {
        let empty = TimeGridParams {
            t_begin: 0.0,
            t_final: 1.0,
            sample_count: 0,
        };
        assert!(matches!(
            empty.validate(),
            Err(SimulationError::InvalidConfiguration(_))
        ));

        let collapsed = TimeGridParams {
            t_begin: 1.0,
            t_final: 1.0,
            sample_count: 10,
        };
        assert!(matches!(
            collapsed.validate(),
            Err(SimulationError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn non_finite_initial_state_is_rejected() {
        let result = simulate(
            &PhysicalParams::default(),
            &short_grid(),
            Vector4::new(f64::NAN, 0.0, 0.0, 0.0),
            &StepSizeControl::default(),
        );
        assert!(matches!(result, Err(SimulationError::InvalidInput(_))));
    }

    #[test]
    fn trajectory_length_matches_the_sample_grid() {
        let trajectory = simulate(
            &PhysicalParams::default(),
            &short_grid(),
            Vector4::new(1.0, 0.0, 0.5, 0.0),
            &StepSizeControl::default(),
        )
        .unwrap();
        assert_eq!(trajectory.len(), 11);
        assert_eq!(trajectory.times.len(), trajectory.states.len());
    }

    #[test]
    fn pair_simulation_isolates_failures() {
        let (baseline, perturbed) = simulate_pair(
            &PhysicalParams::default(),
            &short_grid(),
            Vector4::new(f64::INFINITY, 0.0, 0.0, 0.0),
            Vector4::new(1.0, 0.0, 0.5, 0.0),
            &StepSizeControl::default(),
        );
        assert!(baseline.is_err());
        assert!(perturbed.is_ok());
        assert_gt!(perturbed.unwrap().len(), 0);
    }
}
