//! Error types for pendulum simulation.

use crate::core::ode_solvers::OdeSolverError;
use thiserror::Error;

/// Everything that can go wrong while producing a trajectory. All variants
/// are fatal for the affected trajectory: the caller decides whether to abort
/// or retry with adjusted parameters, nothing is substituted silently.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    /// Bad physical parameters or sample grid, caught before integration starts.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Malformed runtime input, e.g. a non-finite initial state.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The adaptive solver gave up.
    #[error("integration failure: {0}")]
    Integration(#[from] OdeSolverError),
}
