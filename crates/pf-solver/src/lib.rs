//! Nonlinear equation solvers for procflow models.
//!
//! Solvers are looked up by name through [`SolverFactory`]. The registered
//! `newton` solver extracts the free variables and active constraints of a
//! square model, runs a damped Newton iteration with a finite-difference
//! Jacobian and bound-respecting line search, and writes the final iterate
//! back into the model.

pub mod error;
pub mod factory;
pub mod jacobian;
pub mod newton;
pub mod problem;
pub mod termination;

pub use error::{SolverError, SolverResult};
pub use factory::{NewtonSolver, Solver, SolverFactory, SolverOptions};
pub use newton::{NewtonConfig, NewtonResult};
pub use problem::ModelProblem;
pub use termination::{SolverResults, SolverStatus, TerminationCondition};
