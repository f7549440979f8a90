//! Error types for solver operations.

use pf_model::ModelError;
use thiserror::Error;

/// Errors that prevent a solve from starting or evaluating.
///
/// A solve that runs but does not converge is not an error; it is reported
/// through [`crate::TerminationCondition`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Unknown solver '{name}' (available: {available})")]
    UnknownSolver { name: String, available: String },

    #[error("Model is not square: {dof} degrees of freedom")]
    NotSquare { dof: i64 },

    #[error("Residual evaluation failed: {what}")]
    Evaluation { what: String },

    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

pub type SolverResult<T> = Result<T, SolverError>;
