//! JSON export of the projected trajectories, for consumption by any
//! downstream rendering backend.

use crate::core::file_io::{serialize_to_json_or_panic, FilePrefix};
use crate::pendulum::{
    projection::{project, BobPositions},
    render::DoublePendulumParams,
    simulation::simulate_pair,
};
use serde::{Deserialize, Serialize};

/// Both Cartesian frame sequences plus the shared sample grid. This is the
/// whole external data contract of the core: four reals per pendulum per
/// sample.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CartesianExport {
    pub times: Vec<f64>,
    pub baseline: Vec<BobPositions>,
    pub perturbed: Vec<BobPositions>,
}

pub fn compute_cartesian_export(
    params: &DoublePendulumParams,
) -> Result<CartesianExport, crate::pendulum::error::SimulationError> {
    let (baseline, perturbed) = simulate_pair(
        &params.physics,
        &params.time_grid,
        params.baseline_state.into(),
        params.perturbed_state.into(),
        &params.solver,
    );
    let baseline = project(&params.physics, &baseline?);
    let perturbed = project(&params.physics, &perturbed?);
    Ok(CartesianExport {
        times: baseline.times,
        baseline: baseline.positions,
        perturbed: perturbed.positions,
    })
}

/// Simulates both initial conditions and writes the result as a single JSON
/// document next to a copy of the parameters that produced it.
pub fn export_cartesian_data(
    params: &DoublePendulumParams,
    file_prefix: FilePrefix,
) -> Result<(), Box<dyn std::error::Error>> {
    serialize_to_json_or_panic(file_prefix.full_path_with_suffix(".json"), &params);
    let export = compute_cartesian_export(params)?;
    serialize_to_json_or_panic(file_prefix.full_path_with_suffix("_cartesian.json"), &export);
    Ok(())
}
