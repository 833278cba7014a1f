//! Adaptive ODE integration with dense output.
//!
//! The solver is an embedded Runge-Kutta-Fehlberg 4(5) pair with proportional
//! step-size control. Accepted steps land wherever the error controller wants
//! them; output samples are reconstructed with cubic Hermite interpolation, so
//! the caller gets values at exactly the times it asked for.

use nalgebra::SVector;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum OdeSolverError {
    #[error("step size underflow at t = {t}: tolerances cannot be met with step >= {min_step}")]
    StepSizeUnderflow { t: f64, min_step: f64 },

    #[error("step budget exhausted: {max_steps} steps taken before reaching the end of the interval")]
    StepBudgetExhausted { max_steps: u32 },
}

/// Tolerances and limits for the adaptive step-size controller.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct StepSizeControl {
    pub relative_tolerance: f64,
    pub absolute_tolerance: f64,
    pub min_step: f64,
    pub max_step: f64,
    pub safety_factor: f64,
    pub max_steps: u32,
}

impl Default for StepSizeControl {
    fn default() -> StepSizeControl {
        StepSizeControl {
            relative_tolerance: 1e-9,
            absolute_tolerance: 1e-9,
            min_step: 1e-10,
            max_step: 0.25,
            safety_factor: 0.9,
            max_steps: 1_000_000,
        }
    }
}

// Limits on how fast the controller may grow or shrink the step between
// attempts. Standard values for embedded RK pairs.
const MAX_STEP_GROWTH: f64 = 5.0;
const MIN_STEP_SHRINK: f64 = 0.2;

/// Single trial step of the Fehlberg 4(5) pair.
///
/// `dx` must equal `dynamics(t, x)`; passing it in lets the caller reuse the
/// derivative it already evaluated for dense output. Returns the fifth-order
/// solution along with the scaled error norm against the embedded fourth-order
/// solution (accept the step iff the norm is <= 1).
pub fn rkf45_step<F, const N: usize>(
    dynamics: &F,
    t: f64,
    x: SVector<f64, N>,
    dx: SVector<f64, N>,
    h: f64,
    control: &StepSizeControl,
) -> (SVector<f64, N>, f64)
where
    F: Fn(f64, SVector<f64, N>) -> SVector<f64, N>,
{
    let k1 = dx;
    let k2 = dynamics(t + 0.25 * h, x + h * 0.25 * k1);
    let k3 = dynamics(
        t + 0.375 * h,
        x + h * ((3.0 / 32.0) * k1 + (9.0 / 32.0) * k2),
    );
    let k4 = dynamics(
        t + (12.0 / 13.0) * h,
        x + h * ((1932.0 / 2197.0) * k1 - (7200.0 / 2197.0) * k2 + (7296.0 / 2197.0) * k3),
    );
    let k5 = dynamics(
        t + h,
        x + h * ((439.0 / 216.0) * k1 - 8.0 * k2 + (3680.0 / 513.0) * k3 - (845.0 / 4104.0) * k4),
    );
    let k6 = dynamics(
        t + 0.5 * h,
        x + h
            * ((-8.0 / 27.0) * k1 + 2.0 * k2 - (3544.0 / 2565.0) * k3 + (1859.0 / 4104.0) * k4
                - (11.0 / 40.0) * k5),
    );

    let x_fifth = x
        + h * ((16.0 / 135.0) * k1 + (6656.0 / 12825.0) * k3 + (28561.0 / 56430.0) * k4
            - (9.0 / 50.0) * k5
            + (2.0 / 55.0) * k6);
    let x_fourth = x
        + h * ((25.0 / 216.0) * k1 + (1408.0 / 2565.0) * k3 + (2197.0 / 4104.0) * k4
            - (1.0 / 5.0) * k5);

    let mut error_norm: f64 = 0.0;
    for i in 0..N {
        let scale = control.absolute_tolerance
            + control.relative_tolerance * x[i].abs().max(x_fifth[i].abs());
        error_norm = error_norm.max(((x_fifth[i] - x_fourth[i]) / scale).abs());
    }

    (x_fifth, error_norm)
}

/// Cubic Hermite interpolation between two solution points with known
/// derivatives. Exact at both endpoints.
pub fn hermite_interpolate<const N: usize>(
    t0: f64,
    x0: &SVector<f64, N>,
    dx0: &SVector<f64, N>,
    t1: f64,
    x1: &SVector<f64, N>,
    dx1: &SVector<f64, N>,
    t: f64,
) -> SVector<f64, N> {
    let h = t1 - t0;
    if h == 0.0 {
        return *x1;
    }
    let s = (t - t0) / h;
    let s2 = s * s;
    let s3 = s2 * s;
    let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
    let h10 = s3 - 2.0 * s2 + s;
    let h01 = -2.0 * s3 + 3.0 * s2;
    let h11 = s3 - s2;
    x0 * h00 + dx0 * (h * h10) + x1 * h01 + dx1 * (h * h11)
}

/// Integrates `d(x)/dt = dynamics(t, x)` over `[t_begin, t_final]` and returns
/// the solution evaluated at each entry of `sample_times`, in order.
///
/// Preconditions (enforced by the caller): `t_begin < t_final` and
/// `sample_times` is nonempty, strictly increasing, and contained in
/// `[t_begin, t_final]`. The solver never truncates: it either fills every
/// requested sample or fails with an error.
pub fn solve_at_sample_times<F, const N: usize>(
    dynamics: &F,
    t_begin: f64,
    t_final: f64,
    x_begin: SVector<f64, N>,
    sample_times: &[f64],
    control: &StepSizeControl,
) -> Result<Vec<SVector<f64, N>>, OdeSolverError>
where
    F: Fn(f64, SVector<f64, N>) -> SVector<f64, N>,
{
    debug_assert!(t_begin < t_final);
    debug_assert!(sample_times.windows(2).all(|pair| pair[0] < pair[1]));

    let mut samples = Vec::with_capacity(sample_times.len());
    let mut next_sample = sample_times.iter().copied().peekable();

    let mut t = t_begin;
    let mut x = x_begin;
    let mut dx = dynamics(t, x);

    // Samples at (or numerically before) the start of the interval.
    while let Some(&time) = next_sample.peek() {
        if time <= t_begin {
            samples.push(x);
            next_sample.next();
        } else {
            break;
        }
    }

    let mut h = ((t_final - t_begin) / 64.0).clamp(control.min_step, control.max_step);
    let mut n_steps: u32 = 0;

    while next_sample.peek().is_some() {
        if n_steps >= control.max_steps {
            return Err(OdeSolverError::StepBudgetExhausted {
                max_steps: control.max_steps,
            });
        }
        n_steps += 1;

        let end_of_interval = h >= t_final - t;
        let h_trial = h.min(t_final - t);
        let (x_trial, error_norm) = rkf45_step(dynamics, t, x, dx, h_trial, control);

        // Note: a NaN error norm fails this comparison, so a diverging
        // integration falls through to the rejection path below.
        if error_norm <= 1.0 {
            let t_next = if end_of_interval { t_final } else { t + h_trial };
            let dx_next = dynamics(t_next, x_trial);
            while let Some(&time) = next_sample.peek() {
                if time <= t_next {
                    samples.push(hermite_interpolate(
                        t, &x, &dx, t_next, &x_trial, &dx_next, time,
                    ));
                    next_sample.next();
                } else {
                    break;
                }
            }
            t = t_next;
            x = x_trial;
            dx = dx_next;
        } else if h_trial <= control.min_step {
            return Err(OdeSolverError::StepSizeUnderflow {
                t,
                min_step: control.min_step,
            });
        }

        // A NaN error norm (diverging trial step) must shrink the step, not
        // grow it, so that min_step can eventually surface an underflow.
        let scale = if error_norm.is_nan() {
            MIN_STEP_SHRINK
        } else if error_norm > 1e-12 {
            control.safety_factor * error_norm.powf(-0.2)
        } else {
            MAX_STEP_GROWTH
        };
        h = (h_trial * scale.clamp(MIN_STEP_SHRINK, MAX_STEP_GROWTH))
            .clamp(control.min_step, control.max_step);
    }

    Ok(samples)
}
