//! Solvers selected by name.

use crate::error::{SolverError, SolverResult};
use crate::newton::{NewtonConfig, newton_solve};
use crate::problem::ModelProblem;
use crate::termination::{SolverResults, TerminationCondition};
use pf_model::Model;
use tracing::{info, warn};

/// A nonlinear equation solver operating on a square model.
pub trait Solver {
    fn name(&self) -> &str;

    /// Solve the model in place. `tee` raises iteration logging to `info`.
    fn solve(&self, model: &mut Model, tee: bool) -> SolverResult<SolverResults>;
}

/// Generic options applied on top of a solver's defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverOptions {
    pub max_iterations: Option<usize>,
    pub abs_tol: Option<f64>,
}

type Constructor = fn(&SolverOptions) -> Box<dyn Solver>;

fn newton(options: &SolverOptions) -> Box<dyn Solver> {
    let mut config = NewtonConfig::default();
    if let Some(n) = options.max_iterations {
        config.max_iterations = n;
    }
    if let Some(tol) = options.abs_tol {
        config.abs_tol = tol;
    }
    Box::new(NewtonSolver::new(config))
}

// `ipopt` runs Newton; only square systems without an objective are solved.
const REGISTRY: &[(&str, Constructor)] = &[("newton", newton), ("ipopt", newton)];

/// Lookup of registered solvers.
pub struct SolverFactory;

impl SolverFactory {
    /// Names of all registered solvers.
    pub fn available() -> Vec<&'static str> {
        REGISTRY.iter().map(|(name, _)| *name).collect()
    }

    pub fn get(name: &str) -> SolverResult<Box<dyn Solver>> {
        Self::get_with_options(name, &SolverOptions::default())
    }

    pub fn get_with_options(name: &str, options: &SolverOptions) -> SolverResult<Box<dyn Solver>> {
        REGISTRY
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, make)| make(options))
            .ok_or_else(|| SolverError::UnknownSolver {
                name: name.to_string(),
                available: Self::available().join(", "),
            })
    }
}

/// Damped Newton on the free variables of a square model.
#[derive(Debug, Clone, Default)]
pub struct NewtonSolver {
    pub config: NewtonConfig,
}

impl NewtonSolver {
    pub fn new(config: NewtonConfig) -> Self {
        Self { config }
    }
}

impl Solver for NewtonSolver {
    fn name(&self) -> &str {
        "newton"
    }

    fn solve(&self, model: &mut Model, tee: bool) -> SolverResult<SolverResults> {
        let dof = model.degrees_of_freedom();
        if dof != 0 {
            return Err(SolverError::NotSquare { dof });
        }
        let violated = model.check_fixed_constraints(self.config.abs_tol)?;

        let problem = ModelProblem::new(model);
        if tee {
            info!(
                variables = problem.free.len(),
                constraints = problem.constraints.len(),
                "starting newton solve"
            );
        }
        let result = newton_solve(
            problem.x0(),
            &problem.bounds,
            |x| problem.residual(x),
            &self.config,
            tee,
        )?;
        if result.termination != TerminationCondition::Optimal {
            if let Some((name, r)) = problem.worst_constraint(&result.x) {
                warn!(constraint = %name, residual = r, "largest remaining residual");
            }
        }
        let free = problem.free.clone();
        model.load_free(&free, result.x.as_slice());

        let mut termination = result.termination;
        let mut message = result.message;
        if violated > 0 && termination == TerminationCondition::Optimal {
            termination = TerminationCondition::Infeasible;
            message = format!("{violated} constraint(s) on fixed variables are violated");
        }

        info!(
            solver = self.name(),
            termination = %termination,
            iterations = result.iterations,
            residual = result.residual_norm,
            "solve finished"
        );

        Ok(SolverResults {
            solver: self.name().to_string(),
            status: termination.status(),
            termination_condition: termination,
            iterations: result.iterations,
            residual_norm: result.residual_norm,
            message,
        })
    }
}
