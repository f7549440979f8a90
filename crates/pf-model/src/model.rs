//! Equation-oriented model: named variables and residual constraints.
//!
//! Every quantity in a flowsheet is a [`Var`] with a value, a fixed flag and
//! optional bounds. Every equation is a [`Constraint`] whose residual is a
//! closure over variable values. The solver only sees *active* constraints
//! (those touching at least one free variable) and the free variables that
//! appear in them.

use crate::error::{ModelError, ModelResult};
use pf_core::{ConstraintId, VarId};
use std::collections::HashMap;
use std::ops::Index;
use tracing::{debug, warn};

/// Residual closure evaluated on a snapshot of variable values.
pub type Residual = Box<dyn Fn(&Values<'_>) -> ModelResult<f64> + Send + Sync>;

/// Read-only view of all variable values, indexed by [`VarId`].
#[derive(Clone, Copy)]
pub struct Values<'a> {
    data: &'a [f64],
}

impl<'a> Values<'a> {
    pub fn new(data: &'a [f64]) -> Self {
        Self { data }
    }

    pub fn get(&self, id: VarId) -> f64 {
        self.data[id.slot()]
    }

    pub fn gather(&self, ids: &[VarId]) -> Vec<f64> {
        ids.iter().map(|id| self.get(*id)).collect()
    }
}

impl Index<VarId> for Values<'_> {
    type Output = f64;

    fn index(&self, id: VarId) -> &f64 {
        &self.data[id.slot()]
    }
}

/// A model variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Var {
    pub name: String,
    pub fixed: bool,
    pub lb: Option<f64>,
    pub ub: Option<f64>,
}

/// A named equality constraint `residual(values) * scale = 0`.
pub struct Constraint {
    pub name: String,
    /// Variables the residual reads.
    pub vars: Vec<VarId>,
    pub scale: f64,
    residual: Residual,
}

impl Constraint {
    /// Unscaled residual.
    pub fn residual(&self, values: &Values<'_>) -> ModelResult<f64> {
        (self.residual)(values)
    }
}

impl std::fmt::Debug for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Constraint")
            .field("name", &self.name)
            .field("vars", &self.vars)
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}

/// Container for variables, aliases and constraints.
#[derive(Debug, Default)]
pub struct Model {
    vars: Vec<Var>,
    values: Vec<f64>,
    constraints: Vec<Constraint>,
    /// Variable names and aliases.
    names: HashMap<String, VarId>,
    constraint_names: HashMap<String, ConstraintId>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a free, unbounded variable with an initial value.
    pub fn add_var(&mut self, name: impl Into<String>, value: f64) -> ModelResult<VarId> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(ModelError::DuplicateName { name });
        }
        let id = VarId::from_index(self.vars.len() as u32);
        self.names.insert(name.clone(), id);
        self.vars.push(Var {
            name,
            fixed: false,
            lb: None,
            ub: None,
        });
        self.values.push(value);
        Ok(id)
    }

    /// Register another name for an existing variable.
    pub fn add_alias(&mut self, alias: impl Into<String>, target: VarId) -> ModelResult<()> {
        let alias = alias.into();
        self.check_var(target)?;
        if self.names.contains_key(&alias) {
            return Err(ModelError::DuplicateName { name: alias });
        }
        self.names.insert(alias, target);
        Ok(())
    }

    /// Add a residual constraint over `vars`.
    ///
    /// `scale` multiplies the residual seen by the solver; it does not change
    /// the solution set.
    pub fn add_constraint<F>(
        &mut self,
        name: impl Into<String>,
        vars: Vec<VarId>,
        scale: f64,
        residual: F,
    ) -> ModelResult<ConstraintId>
    where
        F: Fn(&Values<'_>) -> ModelResult<f64> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.constraint_names.contains_key(&name) {
            return Err(ModelError::DuplicateName { name });
        }
        for id in &vars {
            self.check_var(*id)?;
        }
        if !scale.is_finite() || scale == 0.0 {
            return Err(ModelError::Construction {
                what: "constraint scale must be finite and non-zero",
            });
        }
        let id = ConstraintId::from_index(self.constraints.len() as u32);
        debug!(constraint = %name, vars = vars.len(), "adding constraint");
        self.constraint_names.insert(name.clone(), id);
        self.constraints.push(Constraint {
            name,
            vars,
            scale,
            residual: Box::new(residual),
        });
        Ok(id)
    }

    fn check_var(&self, id: VarId) -> ModelResult<()> {
        if id.slot() < self.vars.len() {
            Ok(())
        } else {
            Err(pf_core::PfError::IndexOob {
                what: "variable id",
                index: id.slot(),
                len: self.vars.len(),
            }
            .into())
        }
    }

    /// Resolve a variable name or alias.
    pub fn find(&self, name: &str) -> ModelResult<VarId> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| ModelError::UnknownName {
                name: name.to_string(),
            })
    }

    pub fn find_constraint(&self, name: &str) -> ModelResult<ConstraintId> {
        self.constraint_names
            .get(name)
            .copied()
            .ok_or_else(|| ModelError::UnknownName {
                name: name.to_string(),
            })
    }

    pub fn var(&self, id: VarId) -> &Var {
        &self.vars[id.slot()]
    }

    pub fn constraint(&self, id: ConstraintId) -> &Constraint {
        &self.constraints[id.slot()]
    }

    pub fn value(&self, id: VarId) -> f64 {
        self.values[id.slot()]
    }

    /// Value of a variable looked up by name or alias.
    pub fn value_of(&self, name: &str) -> ModelResult<f64> {
        self.find(name).map(|id| self.value(id))
    }

    pub fn set_value(&mut self, id: VarId, value: f64) {
        self.values[id.slot()] = value;
    }

    /// Set the value and mark the variable fixed.
    pub fn fix(&mut self, id: VarId, value: f64) {
        self.values[id.slot()] = value;
        self.vars[id.slot()].fixed = true;
    }

    pub fn unfix(&mut self, id: VarId) {
        self.vars[id.slot()].fixed = false;
    }

    pub fn is_fixed(&self, id: VarId) -> bool {
        self.vars[id.slot()].fixed
    }

    pub fn set_bounds(&mut self, id: VarId, lb: Option<f64>, ub: Option<f64>) {
        let var = &mut self.vars[id.slot()];
        var.lb = lb;
        var.ub = ub;
    }

    pub fn bounds(&self, id: VarId) -> (Option<f64>, Option<f64>) {
        let var = &self.vars[id.slot()];
        (var.lb, var.ub)
    }

    pub fn values(&self) -> Values<'_> {
        Values::new(&self.values)
    }

    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Constraints that touch at least one free variable.
    pub fn active_constraints(&self) -> Vec<ConstraintId> {
        self.constraints
            .iter()
            .enumerate()
            .filter(|(_, c)| c.vars.iter().any(|v| !self.is_fixed(*v)))
            .map(|(i, _)| ConstraintId::from_index(i as u32))
            .collect()
    }

    /// Free variables appearing in active constraints, in id order.
    pub fn free_vars(&self) -> Vec<VarId> {
        let mut seen = vec![false; self.vars.len()];
        for c in &self.constraints {
            for v in &c.vars {
                if !self.is_fixed(*v) {
                    seen[v.slot()] = true;
                }
            }
        }
        seen.iter()
            .enumerate()
            .filter(|(_, s)| **s)
            .map(|(i, _)| VarId::from_index(i as u32))
            .collect()
    }

    /// Free variables in active constraints minus active constraints.
    pub fn degrees_of_freedom(&self) -> i64 {
        self.free_vars().len() as i64 - self.active_constraints().len() as i64
    }

    /// Scaled residuals of `constraints` with `free` set to `x`.
    ///
    /// The model itself is not modified.
    pub fn residuals_at(
        &self,
        free: &[VarId],
        x: &[f64],
        constraints: &[ConstraintId],
    ) -> ModelResult<Vec<f64>> {
        if free.len() != x.len() {
            return Err(ModelError::Construction {
                what: "free variable count does not match iterate length",
            });
        }
        let mut scratch = self.values.clone();
        for (id, v) in free.iter().zip(x) {
            scratch[id.slot()] = *v;
        }
        let values = Values::new(&scratch);
        constraints
            .iter()
            .map(|cid| {
                let c = &self.constraints[cid.slot()];
                Ok(c.residual(&values)? * c.scale)
            })
            .collect()
    }

    /// Write solver iterates back into the model.
    pub fn load_free(&mut self, free: &[VarId], x: &[f64]) {
        for (id, v) in free.iter().zip(x) {
            self.values[id.slot()] = *v;
        }
    }

    /// Unscaled residual of one constraint at the current values.
    pub fn residual(&self, id: ConstraintId) -> ModelResult<f64> {
        self.constraints[id.slot()].residual(&self.values())
    }

    /// Check constraints whose variables are all fixed.
    ///
    /// These are dropped from the solve; any that are violated beyond `tol`
    /// are logged and counted.
    pub fn check_fixed_constraints(&self, tol: f64) -> ModelResult<usize> {
        let values = self.values();
        let mut violated = 0;
        for c in &self.constraints {
            if c.vars.iter().all(|v| self.is_fixed(*v)) {
                let r = c.residual(&values)? * c.scale;
                if r.abs() > tol {
                    warn!(constraint = %c.name, residual = r, "constraint on fixed variables is violated");
                    violated += 1;
                }
            }
        }
        Ok(violated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle() -> (Model, VarId, VarId) {
        let mut m = Model::new();
        let x = m.add_var("x", 1.0).unwrap();
        let y = m.add_var("y", 1.0).unwrap();
        m.add_constraint("circle", vec![x, y], 1.0, move |v| {
            Ok(v[x] * v[x] + v[y] * v[y] - 4.0)
        })
        .unwrap();
        (m, x, y)
    }

    #[test]
    fn duplicate_names_rejected() {
        let (mut m, x, _) = circle();
        assert!(matches!(
            m.add_var("x", 0.0),
            Err(ModelError::DuplicateName { .. })
        ));
        assert!(m.add_alias("y", x).is_err());
        assert!(m
            .add_constraint("circle", vec![x], 1.0, |_| Ok(0.0))
            .is_err());
    }

    #[test]
    fn alias_resolves_to_same_id() {
        let (mut m, x, _) = circle();
        m.add_alias("radius_x", x).unwrap();
        assert_eq!(m.find("radius_x").unwrap(), x);
        assert_eq!(m.find("x").unwrap(), x);
    }

    #[test]
    fn degrees_of_freedom_follow_fixing() {
        let (mut m, x, y) = circle();
        assert_eq!(m.degrees_of_freedom(), 1);
        m.fix(x, 0.0);
        assert_eq!(m.free_vars(), vec![y]);
        assert_eq!(m.degrees_of_freedom(), 0);
        m.fix(y, 2.0);
        assert!(m.active_constraints().is_empty());
        assert_eq!(m.degrees_of_freedom(), 0);
        m.unfix(x);
        assert_eq!(m.degrees_of_freedom(), 0);
    }

    #[test]
    fn residuals_at_does_not_mutate() {
        let (m, x, y) = circle();
        let cons = m.active_constraints();
        let r = m.residuals_at(&[x, y], &[2.0, 0.0], &cons).unwrap();
        assert_eq!(r, vec![0.0]);
        assert_eq!(m.value(x), 1.0);
    }

    #[test]
    fn load_free_writes_back() {
        let (mut m, x, y) = circle();
        m.load_free(&[x, y], &[2.0, 0.5]);
        assert_eq!(m.value_of("x").unwrap(), 2.0);
        assert_eq!(m.value(y), 0.5);
    }

    #[test]
    fn violated_fixed_constraints_are_counted() {
        let (mut m, x, y) = circle();
        m.fix(x, 1.0);
        m.fix(y, 1.0);
        assert_eq!(m.check_fixed_constraints(1e-8).unwrap(), 1);
        m.fix(x, 0.0);
        m.fix(y, 2.0);
        assert_eq!(m.check_fixed_constraints(1e-8).unwrap(), 0);
    }

    #[test]
    fn zero_scale_rejected() {
        let (mut m, x, _) = circle();
        assert!(m.add_constraint("bad", vec![x], 0.0, |_| Ok(0.0)).is_err());
    }
}
