//! Damped Newton solver with bound handling.

use crate::error::SolverResult;
use crate::jacobian::{central_difference_jacobian, forward_difference_jacobian};
use crate::termination::TerminationCondition;
use nalgebra::DVector;
use tracing::{debug, info};

/// Newton solver configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct NewtonConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Absolute tolerance for the scaled residual 2-norm
    pub abs_tol: f64,
    /// Line search backtracking factor
    pub line_search_beta: f64,
    /// Maximum line search iterations
    pub max_line_search_iters: usize,
    /// Relative finite difference step
    pub fd_epsilon: f64,
    /// Use central instead of forward differences
    pub central_differences: bool,
    /// Fraction of the distance to a bound a single step may cover
    pub bound_push: f64,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            abs_tol: 1e-8,
            line_search_beta: 0.5,
            max_line_search_iters: 30,
            fd_epsilon: 1e-7,
            central_differences: false,
            bound_push: 0.995,
        }
    }
}

/// Newton iteration result.
#[derive(Debug, Clone)]
pub struct NewtonResult {
    /// Last accepted iterate
    pub x: DVector<f64>,
    /// Final residual norm
    pub residual_norm: f64,
    /// Number of iterations
    pub iterations: usize,
    pub termination: TerminationCondition,
    pub message: String,
}

/// Per-variable bounds; `None` means unbounded on that side.
pub type Bounds = [(Option<f64>, Option<f64>)];

/// Move `x` strictly inside its bounds.
pub fn push_into_bounds(x: &mut DVector<f64>, bounds: &Bounds) {
    for (xi, (lb, ub)) in x.iter_mut().zip(bounds) {
        let margin = |b: f64| 1e-8 * b.abs().max(1.0);
        match (lb, ub) {
            (Some(lb), Some(ub)) if ub - lb <= 2.0 * margin(*lb).max(margin(*ub)) => {
                *xi = 0.5 * (lb + ub);
            }
            _ => {
                if let Some(lb) = lb {
                    if *xi <= *lb {
                        *xi = lb + margin(*lb);
                    }
                }
                if let Some(ub) = ub {
                    if *xi >= *ub {
                        *xi = ub - margin(*ub);
                    }
                }
            }
        }
    }
}

/// Largest step fraction in `(0, 1]` keeping `x + alpha * dx` inside bounds
/// by at least `1 - push` of the current distance.
pub fn fraction_to_boundary(x: &DVector<f64>, dx: &DVector<f64>, bounds: &Bounds, push: f64) -> f64 {
    let mut alpha: f64 = 1.0;
    for ((xi, di), (lb, ub)) in x.iter().zip(dx.iter()).zip(bounds) {
        if *di < 0.0 {
            if let Some(lb) = lb {
                alpha = alpha.min(push * (xi - lb) / -di);
            }
        } else if *di > 0.0 {
            if let Some(ub) = ub {
                alpha = alpha.min(push * (ub - xi) / di);
            }
        }
    }
    alpha.max(0.0)
}

/// Solve `residual_fn(x) = 0` from `x0` by damped Newton.
///
/// Returns `Err` only when the starting point cannot be evaluated.
/// Convergence failures are reported through `termination`.
pub fn newton_solve<F>(
    x0: DVector<f64>,
    bounds: &Bounds,
    residual_fn: F,
    config: &NewtonConfig,
    tee: bool,
) -> SolverResult<NewtonResult>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
{
    let log_iter = |iter: usize, r_norm: f64, alpha: f64| {
        if tee {
            info!(iter, residual = r_norm, step = alpha, "newton iteration");
        } else {
            debug!(iter, residual = r_norm, step = alpha, "newton iteration");
        }
    };

    let mut x = x0;
    push_into_bounds(&mut x, bounds);
    let mut r = residual_fn(&x)?;
    let mut r_norm = r.norm();
    let mut alpha = 0.0;

    let finish = |x: DVector<f64>,
                  r_norm: f64,
                  iterations: usize,
                  termination: TerminationCondition,
                  message: String|
     -> SolverResult<NewtonResult> {
        Ok(NewtonResult {
            x,
            residual_norm: r_norm,
            iterations,
            termination,
            message,
        })
    };

    for iter in 0..config.max_iterations {
        log_iter(iter, r_norm, alpha);

        // Check convergence
        if r_norm < config.abs_tol {
            return finish(
                x,
                r_norm,
                iter,
                TerminationCondition::Optimal,
                format!("converged in {iter} iterations"),
            );
        }

        let jac = if config.central_differences {
            central_difference_jacobian(&x, &residual_fn, config.fd_epsilon)
        } else {
            forward_difference_jacobian(&x, &r, &residual_fn, config.fd_epsilon)
        };
        let jac = match jac {
            Ok(jac) => jac,
            Err(e) => {
                return finish(
                    x,
                    r_norm,
                    iter,
                    TerminationCondition::NumericalError,
                    format!("Jacobian evaluation failed: {e}"),
                );
            }
        };

        // Solve J * dx = -r
        let Some(dx) = jac.lu().solve(&(-&r)) else {
            return finish(
                x,
                r_norm,
                iter,
                TerminationCondition::NumericalError,
                format!("singular Jacobian at iteration {iter}"),
            );
        };

        // Backtracking line search inside the bounds
        alpha = fraction_to_boundary(&x, &dx, bounds, config.bound_push);
        let mut accepted = None;
        for _ in 0..config.max_line_search_iters {
            let x_new = &x + alpha * &dx;
            match residual_fn(&x_new) {
                Ok(r_new) if r_new.iter().all(|v| v.is_finite()) && r_new.norm() < r_norm => {
                    accepted = Some((x_new, r_new));
                    break;
                }
                _ => alpha *= config.line_search_beta,
            }
        }

        let Some((x_new, r_new)) = accepted else {
            return finish(
                x,
                r_norm,
                iter,
                TerminationCondition::Infeasible,
                format!("line search stagnated at iteration {iter}"),
            );
        };

        // Update solution
        x = x_new;
        r = r_new;
        r_norm = r.norm();
    }

    log_iter(config.max_iterations, r_norm, alpha);
    if r_norm < config.abs_tol {
        return finish(
            x,
            r_norm,
            config.max_iterations,
            TerminationCondition::Optimal,
            format!("converged in {} iterations", config.max_iterations),
        );
    }
    finish(
        x,
        r_norm,
        config.max_iterations,
        TerminationCondition::MaxIterations,
        format!(
            "maximum iterations {} reached, residual = {r_norm:e}",
            config.max_iterations
        ),
    )
}
