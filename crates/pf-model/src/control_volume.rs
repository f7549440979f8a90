//! Steady-state 0D control volume.
//!
//! Construction is split into independent steps so unit models choose which
//! balances to write:
//!
//! 1. [`ControlVolume0D::add_state_blocks`]
//! 2. [`ControlVolume0D::add_material_balances`]
//! 3. [`ControlVolume0D::add_energy_balances`]
//! 4. [`ControlVolume0D::add_momentum_balances`]
//!
//! Ports are then derived from the inlet and outlet state blocks.

use crate::error::{ModelError, ModelResult};
use crate::model::Model;
use crate::port::Port;
use crate::state_block::StateBlock;
use pf_core::{ConstraintId, VarId};
use pf_props::{PropertyPackage, StateOptions};
use std::sync::Arc;
use tracing::debug;

/// Energy balance residuals are in W; this brings them near the size of
/// the material balance residuals.
const ENERGY_BALANCE_SCALE: f64 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialBalanceType {
    /// One balance per component on total (all-phase) flow.
    ComponentTotal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergyBalanceType {
    /// One balance on total enthalpy flow.
    EnthalpyTotal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MomentumBalanceType {
    PressureTotal,
}

impl MaterialBalanceType {
    /// Parse a configuration string; `useDefault` selects `componentTotal`.
    pub fn from_config(value: &str) -> ModelResult<Self> {
        match value {
            "useDefault" | "componentTotal" => Ok(Self::ComponentTotal),
            other => Err(ModelError::configuration(format!(
                "Unsupported material balance type '{other}'"
            ))),
        }
    }
}

impl EnergyBalanceType {
    /// Parse a configuration string; `useDefault` selects `enthalpyTotal`.
    pub fn from_config(value: &str) -> ModelResult<Self> {
        match value {
            "useDefault" | "enthalpyTotal" => Ok(Self::EnthalpyTotal),
            other => Err(ModelError::configuration(format!(
                "Unsupported energy balance type '{other}'"
            ))),
        }
    }
}

impl MomentumBalanceType {
    pub fn from_config(value: &str) -> ModelResult<Self> {
        match value {
            "pressureTotal" => Ok(Self::PressureTotal),
            other => Err(ModelError::configuration(format!(
                "Unsupported momentum balance type '{other}'"
            ))),
        }
    }
}

/// Inlet/outlet state blocks plus the balance equations between them.
#[derive(Debug)]
pub struct ControlVolume0D {
    /// Block name, e.g. `fs.heater.control_volume`.
    pub name: String,
    package: Arc<dyn PropertyPackage>,
    properties_in: Option<StateBlock>,
    properties_out: Option<StateBlock>,
    heat: Option<VarId>,
    delta_p: Option<VarId>,
    balances: Vec<ConstraintId>,
}

impl ControlVolume0D {
    pub fn new(name: impl Into<String>, package: Arc<dyn PropertyPackage>) -> Self {
        Self {
            name: name.into(),
            package,
            properties_in: None,
            properties_out: None,
            heat: None,
            delta_p: None,
            balances: Vec::new(),
        }
    }

    pub fn package(&self) -> &Arc<dyn PropertyPackage> {
        &self.package
    }

    /// Build `properties_in[0]` (defined state) and `properties_out[0]`.
    pub fn add_state_blocks(
        &mut self,
        model: &mut Model,
        has_phase_equilibrium: bool,
    ) -> ModelResult<()> {
        if self.properties_in.is_some() {
            return Err(ModelError::Construction {
                what: "state blocks already added",
            });
        }
        let options = StateOptions {
            has_phase_equilibrium,
        };
        let inlet = StateBlock::build(
            model,
            format!("{}.properties_in[0]", self.name),
            self.package.clone(),
            options,
            true,
        )?;
        let outlet = StateBlock::build(
            model,
            format!("{}.properties_out[0]", self.name),
            self.package.clone(),
            options,
            false,
        )?;
        debug!(control_volume = %self.name, package = self.package.name(), "added state blocks");
        self.properties_in = Some(inlet);
        self.properties_out = Some(outlet);
        Ok(())
    }

    fn states(&self) -> ModelResult<(&StateBlock, &StateBlock)> {
        match (&self.properties_in, &self.properties_out) {
            (Some(i), Some(o)) => Ok((i, o)),
            _ => Err(ModelError::Construction {
                what: "state blocks must be added before balances and ports",
            }),
        }
    }

    pub fn properties_in(&self) -> ModelResult<&StateBlock> {
        self.states().map(|(i, _)| i)
    }

    pub fn properties_out(&self) -> ModelResult<&StateBlock> {
        self.states().map(|(_, o)| o)
    }

    /// `F_in x_in,j - F_out x_out,j = 0` for each component.
    pub fn add_material_balances(
        &mut self,
        model: &mut Model,
        balance_type: MaterialBalanceType,
    ) -> ModelResult<()> {
        let MaterialBalanceType::ComponentTotal = balance_type;
        let (inlet, outlet) = self.states()?;
        let (f_in, f_out) = (inlet.flow_mol, outlet.flow_mol);
        let mut added = Vec::new();
        for (j, c) in self.package.component_names().iter().enumerate() {
            let (x_in, x_out) = (inlet.mole_frac_comp[j], outlet.mole_frac_comp[j]);
            let id = model.add_constraint(
                format!("{}.material_balances[0,{c}]", self.name),
                vec![f_in, x_in, f_out, x_out],
                1.0,
                move |v| Ok(v[f_in] * v[x_in] - v[f_out] * v[x_out]),
            )?;
            added.push(id);
        }
        self.balances.extend(added);
        Ok(())
    }

    /// `F_in h_in + Q - F_out h_out = 0`.
    ///
    /// With `has_heat_transfer` a free `heat[0]` variable [W] is created.
    pub fn add_energy_balances(
        &mut self,
        model: &mut Model,
        balance_type: EnergyBalanceType,
        has_heat_transfer: bool,
    ) -> ModelResult<()> {
        let EnergyBalanceType::EnthalpyTotal = balance_type;
        let heat = if has_heat_transfer {
            Some(model.add_var(format!("{}.heat[0]", self.name), 0.0)?)
        } else {
            None
        };

        let (inlet, outlet) = self.states()?;
        let mut vars = inlet.vars();
        vars.extend(outlet.vars());
        vars.extend(heat);

        let (inlet, outlet) = (inlet.clone(), outlet.clone());
        let id = model.add_constraint(
            format!("{}.enthalpy_balances[0]", self.name),
            vars,
            ENERGY_BALANCE_SCALE,
            move |v| {
                let q = heat.map_or(0.0, |id| v[id]);
                Ok(inlet.enth_flow(v)? + q - outlet.enth_flow(v)?)
            },
        )?;
        self.heat = heat;
        self.balances.push(id);
        Ok(())
    }

    /// `P_in (+ deltaP) - P_out = 0`.
    pub fn add_momentum_balances(
        &mut self,
        model: &mut Model,
        balance_type: MomentumBalanceType,
        has_pressure_change: bool,
    ) -> ModelResult<()> {
        let MomentumBalanceType::PressureTotal = balance_type;
        let delta_p = if has_pressure_change {
            Some(model.add_var(format!("{}.deltaP[0]", self.name), 0.0)?)
        } else {
            None
        };

        let (inlet, outlet) = self.states()?;
        let (p_in, p_out) = (inlet.pressure, outlet.pressure);
        let mut vars = vec![p_in, p_out];
        vars.extend(delta_p);

        let id = model.add_constraint(
            format!("{}.pressure_balance[0]", self.name),
            vars,
            1.0,
            move |v| {
                let dp = delta_p.map_or(0.0, |id| v[id]);
                Ok(v[p_in] + dp - v[p_out])
            },
        )?;
        self.delta_p = delta_p;
        self.balances.push(id);
        Ok(())
    }

    pub fn heat(&self) -> Option<VarId> {
        self.heat
    }

    pub fn delta_p(&self) -> Option<VarId> {
        self.delta_p
    }

    pub fn balances(&self) -> &[ConstraintId] {
        &self.balances
    }

    /// Port exposing the inlet state block.
    pub fn add_inlet_port(&self, name: impl Into<String>) -> ModelResult<Port> {
        let (inlet, _) = self.states()?;
        Ok(Port::new(name, inlet.port_members()))
    }

    /// Port exposing the outlet state block.
    pub fn add_outlet_port(&self, name: impl Into<String>) -> ModelResult<Port> {
        let (_, outlet) = self.states()?;
        Ok(Port::new(name, outlet.port_members()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_props::ConstantCpPackage;

    fn built(has_pressure_change: bool) -> (Model, ControlVolume0D) {
        let mut m = Model::new();
        let mut cv = ControlVolume0D::new("cv", Arc::new(ConstantCpPackage::reference()));
        cv.add_state_blocks(&mut m, false).unwrap();
        cv.add_material_balances(&mut m, MaterialBalanceType::ComponentTotal)
            .unwrap();
        cv.add_energy_balances(&mut m, EnergyBalanceType::EnthalpyTotal, true)
            .unwrap();
        cv.add_momentum_balances(&mut m, MomentumBalanceType::PressureTotal, has_pressure_change)
            .unwrap();
        (m, cv)
    }

    #[test]
    fn balance_counts() {
        let (m, cv) = built(false);
        // 7 + 7 state vars + heat
        assert_eq!(m.num_vars(), 15);
        // closure + 4 material + energy + momentum
        assert_eq!(m.num_constraints(), 7);
        assert_eq!(cv.balances().len(), 6);
        assert!(m.find("cv.heat[0]").is_ok());
        assert!(m.find("cv.deltaP[0]").is_err());
    }

    #[test]
    fn pressure_change_adds_variable() {
        let (m, cv) = built(true);
        assert_eq!(m.num_vars(), 16);
        assert_eq!(m.find("cv.deltaP[0]").unwrap(), cv.delta_p().unwrap());
    }

    #[test]
    fn balances_require_state_blocks() {
        let mut m = Model::new();
        let mut cv = ControlVolume0D::new("cv", Arc::new(ConstantCpPackage::reference()));
        assert!(matches!(
            cv.add_material_balances(&mut m, MaterialBalanceType::ComponentTotal),
            Err(ModelError::Construction { .. })
        ));
        assert!(cv.add_inlet_port("inlet").is_err());
    }

    #[test]
    fn energy_residual_is_zero_for_consistent_state() {
        let (mut m, cv) = built(false);
        let inlet = cv.properties_in().unwrap().clone();
        let outlet = cv.properties_out().unwrap().clone();
        let state = pf_props::StateVars::new(1.0, vec![0.25; 4], 3.0, 0.1);
        inlet.fix_state(&mut m, &state).unwrap();
        let mut out_state = state.clone();
        out_state.temperature = 3.0 + 5.0 / 3.806;
        outlet.fix_state(&mut m, &out_state).unwrap();
        m.fix(cv.heat().unwrap(), 5.0);
        let id = m.find_constraint("cv.enthalpy_balances[0]").unwrap();
        assert!(m.residual(id).unwrap().abs() < 1e-10);
    }

    #[test]
    fn balance_type_parsing() {
        assert_eq!(
            MaterialBalanceType::from_config("useDefault").unwrap(),
            MaterialBalanceType::ComponentTotal
        );
        assert!(EnergyBalanceType::from_config("none").is_err());
        assert!(MomentumBalanceType::from_config("useDefault").is_err());
    }
}
