//! Pure-component parameter sets.

use crate::correlations::{NistAntoine, PerryLiquidCp, RppIdealGasCp};

/// Phases a component may appear in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    /// Condensable: distributes between vapor and liquid.
    VaporLiquid,
    /// Non-condensable: vapor only.
    VaporOnly,
}

/// Parameters of one component in an ideal VLE package.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentData {
    pub name: &'static str,
    /// Molecular weight [kg/mol]
    pub mw: f64,
    pub phases: PhaseKind,
    pub cp_ig: RppIdealGasCp,
    /// Present for condensable components only.
    pub cp_liq: Option<PerryLiquidCp>,
    /// Present for condensable components only.
    pub pressure_sat: Option<NistAntoine>,
    /// Vapor formation enthalpy at the reference state [J/mol]
    pub enth_form_vap: f64,
    /// Liquid formation enthalpy at the reference state [J/mol]
    pub enth_form_liq: Option<f64>,
}

impl ComponentData {
    pub fn is_condensable(&self) -> bool {
        self.phases == PhaseKind::VaporLiquid
    }

    /// Ideal-gas molar enthalpy [J/mol] including formation enthalpy.
    pub fn enth_mol_vap(&self, t: f64, t_ref: f64) -> f64 {
        self.enth_form_vap + self.cp_ig.enth_mol(t, t_ref)
    }

    /// Liquid molar enthalpy [J/mol], `None` for non-condensables.
    pub fn enth_mol_liq(&self, t: f64, t_ref: f64) -> Option<f64> {
        let cp = self.cp_liq?;
        let form = self.enth_form_liq?;
        Some(form + cp.enth_mol(t, t_ref))
    }
}
