//! Finite difference Jacobian computation.

use crate::error::SolverResult;
use nalgebra::{DMatrix, DVector};

/// Compute Jacobian using forward finite differences.
///
/// For each column j, perturbs x[j] by epsilon and computes (f(x+e) - f(x))/epsilon.
/// `f_x` is the residual at `x`, which callers already hold.
pub fn forward_difference_jacobian<F>(
    x: &DVector<f64>,
    f_x: &DVector<f64>,
    f: F,
    epsilon: f64,
) -> SolverResult<DMatrix<f64>>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
{
    let n = x.len();
    let m = f_x.len();
    let mut jac = DMatrix::zeros(m, n);
    let mut x_perturbed = x.clone();

    for j in 0..n {
        let dx = epsilon * x[j].abs().max(1.0);
        x_perturbed[j] = x[j] + dx;
        let f_perturbed = f(&x_perturbed)?;
        x_perturbed[j] = x[j];

        jac.set_column(j, &((f_perturbed - f_x) / dx));
    }

    Ok(jac)
}

/// Compute Jacobian using central finite differences (more accurate but 2x cost).
pub fn central_difference_jacobian<F>(
    x: &DVector<f64>,
    f: F,
    epsilon: f64,
) -> SolverResult<DMatrix<f64>>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
{
    let n = x.len();
    let mut columns = Vec::with_capacity(n);
    let mut x_perturbed = x.clone();

    for j in 0..n {
        let dx = epsilon * x[j].abs().max(1.0);

        x_perturbed[j] = x[j] + dx;
        let f_plus = f(&x_perturbed)?;
        x_perturbed[j] = x[j] - dx;
        let f_minus = f(&x_perturbed)?;
        x_perturbed[j] = x[j];

        columns.push((f_plus - f_minus) / (2.0 * dx));
    }

    if columns.is_empty() {
        return Ok(DMatrix::zeros(0, 0));
    }
    Ok(DMatrix::from_columns(&columns))
}
