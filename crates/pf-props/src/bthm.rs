//! Benzene-toluene-hydrogen-methane ideal VLE package.
//!
//! Ideal gas vapor, ideal liquid, Raoult's law equilibrium with hydrogen
//! and methane treated as non-condensable. Parameters are taken from
//! Reid, Prausnitz & Poling (ideal gas Cp), Perry's handbook (liquid Cp)
//! and the NIST webbook (Antoine coefficients).

use crate::component::{ComponentData, PhaseKind};
use crate::correlations::{NistAntoine, PerryLiquidCp, RppIdealGasCp};
use crate::error::PropsResult;
use crate::flash::ideal_flash;
use crate::package::{PropertyPackage, validation};
use crate::state::{Bound, PhaseSplit, StateBounds, StateOptions, StateVars};

/// Reference temperature for enthalpies [K]
pub const TEMPERATURE_REF: f64 = 300.0;

/// Reference pressure [Pa]
pub const PRESSURE_REF: f64 = 101_325.0;

const COMPONENTS: [ComponentData; 4] = [
    ComponentData {
        name: "benzene",
        mw: 78.1136e-3,
        phases: PhaseKind::VaporLiquid,
        cp_ig: RppIdealGasCp::new(-3.392e1, 4.739e-1, -3.017e-4, 7.130e-8),
        cp_liq: Some(PerryLiquidCp::new([1.29e5, -1.7e2, 6.48e-1, 0.0, 0.0])),
        pressure_sat: Some(NistAntoine::new(4.60362, 1701.073, 20.806)),
        enth_form_vap: 82.9e3,
        enth_form_liq: Some(49.0e3),
    },
    ComponentData {
        name: "toluene",
        mw: 92.1405e-3,
        phases: PhaseKind::VaporLiquid,
        cp_ig: RppIdealGasCp::new(-2.435e1, 5.125e-1, -2.765e-4, 4.911e-8),
        cp_liq: Some(PerryLiquidCp::new([1.40e5, -1.522, 6.95e-1, 0.0, 0.0])),
        pressure_sat: Some(NistAntoine::new(4.54436, 1738.123, 0.394)),
        enth_form_vap: 50.1e3,
        enth_form_liq: Some(12.0e3),
    },
    ComponentData {
        name: "hydrogen",
        mw: 2.016e-3,
        phases: PhaseKind::VaporOnly,
        cp_ig: RppIdealGasCp::new(2.714e1, 9.274e-3, -1.381e-5, 7.645e-9),
        cp_liq: None,
        pressure_sat: None,
        enth_form_vap: 0.0,
        enth_form_liq: None,
    },
    ComponentData {
        name: "methane",
        mw: 16.043e-3,
        phases: PhaseKind::VaporOnly,
        cp_ig: RppIdealGasCp::new(1.925e1, 5.213e-2, 1.197e-5, -1.132e-8),
        cp_liq: None,
        pressure_sat: None,
        enth_form_vap: -75.0e3,
        enth_form_liq: None,
    },
];

/// Ideal VLE package for the BTHM system.
#[derive(Debug, Clone)]
pub struct BthmIdealPackage {
    components: Vec<ComponentData>,
    temperature_ref: f64,
}

impl Default for BthmIdealPackage {
    fn default() -> Self {
        Self::new()
    }
}

impl BthmIdealPackage {
    pub fn new() -> Self {
        Self {
            components: COMPONENTS.to_vec(),
            temperature_ref: TEMPERATURE_REF,
        }
    }

    pub fn components(&self) -> &[ComponentData] {
        &self.components
    }

    /// Raoult's law K-values at (T, P); `None` for non-condensables.
    pub fn k_values(&self, t: f64, p: f64) -> PropsResult<Vec<Option<f64>>> {
        self.components
            .iter()
            .map(|c| match c.pressure_sat {
                Some(antoine) => antoine.pressure_sat(t).map(|psat| Some(psat / p)),
                None => Ok(None),
            })
            .collect()
    }

    fn validate(&self, state: &StateVars) -> PropsResult<()> {
        state.check_components(self.components.len())?;
        validation::validate_temperature(state.temperature)?;
        validation::validate_pressure(state.pressure)?;
        validation::validate_fractions(&state.mole_frac_comp)
    }
}

impl PropertyPackage for BthmIdealPackage {
    fn name(&self) -> &str {
        "bthm_ideal"
    }

    fn component_names(&self) -> Vec<&str> {
        self.components.iter().map(|c| c.name).collect()
    }

    fn state_bounds(&self) -> StateBounds {
        StateBounds {
            flow_mol: Some(Bound::new(0.0, 100.0, 1000.0)),
            temperature: Some(Bound::new(273.15, 300.0, 1000.0)),
            pressure: Some(Bound::new(5e4, 1e5, 1e6)),
        }
    }

    fn phase_split(&self, state: &StateVars, options: &StateOptions) -> PropsResult<PhaseSplit> {
        self.validate(state)?;
        if !options.has_phase_equilibrium {
            return Ok(PhaseSplit::all_vapor(&state.mole_frac_comp));
        }
        let k = self.k_values(state.temperature, state.pressure)?;
        ideal_flash(&state.mole_frac_comp, &k)
    }

    fn enth_mol(&self, state: &StateVars, options: &StateOptions) -> PropsResult<f64> {
        let split = self.phase_split(state, options)?;
        let t = state.temperature;
        let t_ref = self.temperature_ref;

        let mut h_vap = 0.0;
        let mut h_liq = 0.0;
        for (j, c) in self.components.iter().enumerate() {
            h_vap += split.vap_frac_comp[j] * c.enth_mol_vap(t, t_ref);
            if let Some(h) = c.enth_mol_liq(t, t_ref) {
                h_liq += split.liq_frac_comp[j] * h;
            }
        }
        let v = split.vap_frac;
        Ok(v * h_vap + (1.0 - v) * h_liq)
    }

    fn mw_comp(&self) -> Option<Vec<f64>> {
        Some(self.components.iter().map(|c| c.mw).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(t: f64, p: f64) -> StateVars {
        StateVars::new(1.0, vec![0.25; 4], t, p)
    }

    #[test]
    fn component_list() {
        let pkg = BthmIdealPackage::new();
        assert_eq!(
            pkg.component_names(),
            vec!["benzene", "toluene", "hydrogen", "methane"]
        );
        assert_eq!(pkg.component_index("methane").unwrap(), 3);
        assert!(pkg.component_index("water").is_err());
    }

    #[test]
    fn hot_feed_is_all_vapor() {
        let pkg = BthmIdealPackage::new();
        let split = pkg
            .phase_split(&state(500.0, 1e5), &StateOptions::default())
            .unwrap();
        assert_eq!(split.vap_frac, 1.0);
    }

    #[test]
    fn cold_feed_splits_and_keeps_gases_in_vapor() {
        let pkg = BthmIdealPackage::new();
        let split = pkg
            .phase_split(&state(300.0, 1e5), &StateOptions::default())
            .unwrap();
        assert!(split.vap_frac > 0.5 && split.vap_frac < 0.65, "V={}", split.vap_frac);
        assert_eq!(split.liq_frac_comp[2], 0.0);
        assert_eq!(split.liq_frac_comp[3], 0.0);
        // Toluene is the heavier aromatic
        assert!(split.liq_frac_comp[1] > split.liq_frac_comp[0]);
    }

    #[test]
    fn vapor_enthalpy_slope_is_ideal_gas_cp() {
        let pkg = BthmIdealPackage::new();
        let opts = StateOptions::default();
        let h0 = pkg.enth_mol(&state(500.0, 1e5), &opts).unwrap();
        let h1 = pkg.enth_mol(&state(501.0, 1e5), &opts).unwrap();
        let cp = h1 - h0;
        assert!(cp > 94.0 && cp < 97.0, "cp={cp}");
    }

    #[test]
    fn disabling_equilibrium_gives_vapor() {
        let pkg = BthmIdealPackage::new();
        let opts = StateOptions {
            has_phase_equilibrium: false,
        };
        let split = pkg.phase_split(&state(300.0, 1e5), &opts).unwrap();
        assert_eq!(split.vap_frac, 1.0);
        let h = pkg.enth_mol(&state(300.0, 1e5), &opts).unwrap();
        // At the reference temperature only formation enthalpies remain
        let expected = 0.25 * (82.9e3 + 50.1e3 + 0.0 - 75.0e3);
        assert!((h - expected).abs() < 1e-6);
    }

    #[test]
    fn rejects_wrong_component_count() {
        let pkg = BthmIdealPackage::new();
        let bad = StateVars::new(1.0, vec![0.5, 0.5], 300.0, 1e5);
        assert!(pkg.enth_mol(&bad, &StateOptions::default()).is_err());
    }
}
