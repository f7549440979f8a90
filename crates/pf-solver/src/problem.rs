//! Square nonlinear system extracted from a model.

use crate::error::{SolverError, SolverResult};
use nalgebra::DVector;
use pf_core::{ConstraintId, VarId};
use pf_model::Model;

/// Free variables and active constraints of a [`Model`], viewed as `F(x) = 0`.
pub struct ModelProblem<'a> {
    model: &'a Model,
    pub free: Vec<VarId>,
    pub constraints: Vec<ConstraintId>,
    pub bounds: Vec<(Option<f64>, Option<f64>)>,
}

impl<'a> ModelProblem<'a> {
    pub fn new(model: &'a Model) -> Self {
        let free = model.free_vars();
        let constraints = model.active_constraints();
        let bounds = free.iter().map(|id| model.bounds(*id)).collect();
        Self {
            model,
            free,
            constraints,
            bounds,
        }
    }

    pub fn is_square(&self) -> bool {
        self.free.len() == self.constraints.len()
    }

    /// Current values of the free variables.
    pub fn x0(&self) -> DVector<f64> {
        DVector::from_iterator(self.free.len(), self.free.iter().map(|id| self.model.value(*id)))
    }

    /// Scaled residuals at `x`.
    pub fn residual(&self, x: &DVector<f64>) -> SolverResult<DVector<f64>> {
        let r = self
            .model
            .residuals_at(&self.free, x.as_slice(), &self.constraints)?;
        if let Some(i) = r.iter().position(|v| !v.is_finite()) {
            return Err(SolverError::Evaluation {
                what: format!(
                    "non-finite residual in {}",
                    self.model.constraint(self.constraints[i]).name
                ),
            });
        }
        Ok(DVector::from_vec(r))
    }

    /// Name of the constraint with the largest scaled residual at `x`.
    pub fn worst_constraint(&self, x: &DVector<f64>) -> Option<(String, f64)> {
        let r = self.residual(x).ok()?;
        let (i, v) = r
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))?;
        Some((self.model.constraint(self.constraints[i]).name.clone(), *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_free_system() {
        let mut m = Model::new();
        let x = m.add_var("x", 1.0).unwrap();
        let y = m.add_var("y", 2.0).unwrap();
        m.set_bounds(y, Some(0.0), None);
        m.add_constraint("sum", vec![x, y], 2.0, move |v| Ok(v[x] + v[y] - 3.0))
            .unwrap();
        m.fix(x, 1.0);

        let p = ModelProblem::new(&m);
        assert!(p.is_square());
        assert_eq!(p.free, vec![y]);
        assert_eq!(p.bounds, vec![(Some(0.0), None)]);
        let r = p.residual(&DVector::from_element(1, 4.0)).unwrap();
        assert_eq!(r[0], 4.0);
        let (name, _) = p.worst_constraint(&p.x0()).unwrap();
        assert_eq!(name, "sum");
    }
}
