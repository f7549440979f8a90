//! State blocks: FTPx variables for one material state plus property expressions.

use crate::error::ModelResult;
use crate::model::{Model, Values};
use pf_core::VarId;
use pf_props::{PhaseSplit, PropertyPackage, StateOptions, StateVars};
use std::sync::Arc;

const DEFAULT_FLOW: f64 = 1.0;
const DEFAULT_TEMPERATURE: f64 = 298.15;
const DEFAULT_PRESSURE: f64 = 101_325.0;

/// Variables describing one material state, built from a property package.
#[derive(Clone)]
pub struct StateBlock {
    /// Full block name, e.g. `fs.heater.control_volume.properties_in[0]`.
    pub name: String,
    pub flow_mol: VarId,
    pub mole_frac_comp: Vec<VarId>,
    pub temperature: VarId,
    pub pressure: VarId,
    /// Inlet-type blocks are fully specified from outside and carry no
    /// closure constraint on the mole fractions.
    pub defined_state: bool,
    package: Arc<dyn PropertyPackage>,
    options: StateOptions,
}

impl StateBlock {
    /// Create the FTPx variables (and the fraction closure when
    /// `defined_state` is false) in `model`.
    pub fn build(
        model: &mut Model,
        name: impl Into<String>,
        package: Arc<dyn PropertyPackage>,
        options: StateOptions,
        defined_state: bool,
    ) -> ModelResult<Self> {
        let name = name.into();
        let bounds = package.state_bounds();
        let components: Vec<String> = package
            .component_names()
            .iter()
            .map(|c| c.to_string())
            .collect();
        let n = components.len();

        let flow_mol = model.add_var(
            format!("{name}.flow_mol"),
            bounds.flow_mol.map_or(DEFAULT_FLOW, |b| b.nominal),
        )?;
        if let Some(b) = bounds.flow_mol {
            model.set_bounds(flow_mol, Some(b.lb), Some(b.ub));
        }

        let mut mole_frac_comp = Vec::with_capacity(n);
        for c in &components {
            let id = model.add_var(format!("{name}.mole_frac_comp[{c}]"), 1.0 / n as f64)?;
            model.set_bounds(id, Some(0.0), Some(1.0));
            mole_frac_comp.push(id);
        }

        let temperature = model.add_var(
            format!("{name}.temperature"),
            bounds.temperature.map_or(DEFAULT_TEMPERATURE, |b| b.nominal),
        )?;
        if let Some(b) = bounds.temperature {
            model.set_bounds(temperature, Some(b.lb), Some(b.ub));
        }

        let pressure = model.add_var(
            format!("{name}.pressure"),
            bounds.pressure.map_or(DEFAULT_PRESSURE, |b| b.nominal),
        )?;
        if let Some(b) = bounds.pressure {
            model.set_bounds(pressure, Some(b.lb), Some(b.ub));
        }

        if !defined_state {
            let x = mole_frac_comp.clone();
            model.add_constraint(
                format!("{name}.sum_mole_frac"),
                x.clone(),
                1.0,
                move |v| Ok(x.iter().map(|id| v[*id]).sum::<f64>() - 1.0),
            )?;
        }

        Ok(Self {
            name,
            flow_mol,
            mole_frac_comp,
            temperature,
            pressure,
            defined_state,
            package,
            options,
        })
    }

    pub fn package(&self) -> &Arc<dyn PropertyPackage> {
        &self.package
    }

    pub fn options(&self) -> StateOptions {
        self.options
    }

    /// All state variables in FTPx order.
    pub fn vars(&self) -> Vec<VarId> {
        let mut ids = Vec::with_capacity(self.mole_frac_comp.len() + 3);
        ids.push(self.flow_mol);
        ids.extend_from_slice(&self.mole_frac_comp);
        ids.push(self.temperature);
        ids.push(self.pressure);
        ids
    }

    /// Port member names paired with their variables.
    pub fn port_members(&self) -> Vec<(String, VarId)> {
        let mut members = vec![("flow_mol".to_string(), self.flow_mol)];
        for (c, id) in self
            .package
            .component_names()
            .iter()
            .zip(&self.mole_frac_comp)
        {
            members.push((format!("mole_frac_comp[{c}]"), *id));
        }
        members.push(("temperature".to_string(), self.temperature));
        members.push(("pressure".to_string(), self.pressure));
        members
    }

    /// Read the state from a value snapshot.
    pub fn state(&self, values: &Values<'_>) -> StateVars {
        StateVars::new(
            values[self.flow_mol],
            values.gather(&self.mole_frac_comp),
            values[self.temperature],
            values[self.pressure],
        )
    }

    pub fn current_state(&self, model: &Model) -> StateVars {
        self.state(&model.values())
    }

    /// Molar enthalpy at a value snapshot.
    pub fn enth_mol(&self, values: &Values<'_>) -> ModelResult<f64> {
        Ok(self.package.enth_mol(&self.state(values), &self.options)?)
    }

    /// Total enthalpy flow `F * h` [W] at a value snapshot.
    pub fn enth_flow(&self, values: &Values<'_>) -> ModelResult<f64> {
        Ok(values[self.flow_mol] * self.enth_mol(values)?)
    }

    pub fn phase_split(&self, model: &Model) -> ModelResult<PhaseSplit> {
        Ok(self
            .package
            .phase_split(&self.current_state(model), &self.options)?)
    }

    /// Fix every state variable to `state`.
    pub fn fix_state(&self, model: &mut Model, state: &StateVars) -> ModelResult<()> {
        state.check_components(self.mole_frac_comp.len())?;
        model.fix(self.flow_mol, state.flow_mol);
        for (id, x) in self.mole_frac_comp.iter().zip(&state.mole_frac_comp) {
            model.fix(*id, *x);
        }
        model.fix(self.temperature, state.temperature);
        model.fix(self.pressure, state.pressure);
        Ok(())
    }
}

impl std::fmt::Debug for StateBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateBlock")
            .field("name", &self.name)
            .field("package", &self.package.name())
            .field("defined_state", &self.defined_state)
            .finish_non_exhaustive()
    }
}
