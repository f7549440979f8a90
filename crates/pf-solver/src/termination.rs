//! Solver outcome reporting.

use std::fmt;

/// Outcome category of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationCondition {
    /// Residual norm below tolerance.
    Optimal,
    MaxIterations,
    /// Line search could not reduce the residual.
    Infeasible,
    /// Singular Jacobian or evaluation failure mid-solve.
    NumericalError,
}

impl TerminationCondition {
    pub fn as_str(self) -> &'static str {
        match self {
            TerminationCondition::Optimal => "optimal",
            TerminationCondition::MaxIterations => "maxIterations",
            TerminationCondition::Infeasible => "infeasible",
            TerminationCondition::NumericalError => "numericalError",
        }
    }

    pub fn status(self) -> SolverStatus {
        match self {
            TerminationCondition::Optimal => SolverStatus::Ok,
            TerminationCondition::MaxIterations | TerminationCondition::Infeasible => {
                SolverStatus::Warning
            }
            TerminationCondition::NumericalError => SolverStatus::Error,
        }
    }
}

impl fmt::Display for TerminationCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse solver status derived from the termination condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverStatus {
    Ok,
    Warning,
    Error,
}

impl fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SolverStatus::Ok => "ok",
            SolverStatus::Warning => "warning",
            SolverStatus::Error => "error",
        })
    }
}

/// Summary returned by [`crate::Solver::solve`].
#[derive(Debug, Clone, PartialEq)]
pub struct SolverResults {
    pub solver: String,
    pub status: SolverStatus,
    pub termination_condition: TerminationCondition,
    pub iterations: usize,
    /// Final 2-norm of the scaled residuals.
    pub residual_norm: f64,
    pub message: String,
}

impl SolverResults {
    pub fn is_optimal(&self) -> bool {
        self.termination_condition == TerminationCondition::Optimal
    }
}
