//! FTPx state representation.

use crate::error::{PropsError, PropsResult};
use pf_core::units::{Pressure, Temperature, k, pa};

/// Total flow, mole fractions, temperature and pressure of one material state.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVars {
    /// Total molar flow [mol/s]
    pub flow_mol: f64,
    pub mole_frac_comp: Vec<f64>,
    /// [K]
    pub temperature: f64,
    /// [Pa]
    pub pressure: f64,
}

impl StateVars {
    pub fn new(flow_mol: f64, mole_frac_comp: Vec<f64>, temperature: f64, pressure: f64) -> Self {
        Self {
            flow_mol,
            mole_frac_comp,
            temperature,
            pressure,
        }
    }

    pub fn temperature(&self) -> Temperature {
        k(self.temperature)
    }

    pub fn pressure(&self) -> Pressure {
        pa(self.pressure)
    }

    pub fn num_components(&self) -> usize {
        self.mole_frac_comp.len()
    }

    /// Check that the fraction vector matches the package's component list.
    pub fn check_components(&self, expected: usize) -> PropsResult<()> {
        if self.mole_frac_comp.len() != expected {
            return Err(PropsError::InvalidArg {
                what: "mole fraction count does not match component list",
            });
        }
        Ok(())
    }
}

/// Lower bound, nominal value and upper bound of a state variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub lb: f64,
    pub nominal: f64,
    pub ub: f64,
}

impl Bound {
    pub const fn new(lb: f64, nominal: f64, ub: f64) -> Self {
        Self { lb, nominal, ub }
    }
}

/// Optional bounds on the FTPx state variables.
///
/// Mole fractions are always bounded to `[0, 1]` by the state block.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StateBounds {
    pub flow_mol: Option<Bound>,
    pub temperature: Option<Bound>,
    pub pressure: Option<Bound>,
}

/// Options parsed from `property_package_args`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateOptions {
    /// Compute the vapor/liquid split when true; treat the mixture as vapor otherwise.
    pub has_phase_equilibrium: bool,
}

impl Default for StateOptions {
    fn default() -> Self {
        Self {
            has_phase_equilibrium: true,
        }
    }
}

/// Result of an equilibrium calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseSplit {
    /// Vapor fraction of the total flow, in `[0, 1]`.
    pub vap_frac: f64,
    /// Liquid mole fractions (zero for non-condensables).
    pub liq_frac_comp: Vec<f64>,
    pub vap_frac_comp: Vec<f64>,
}

impl PhaseSplit {
    /// Single vapor phase carrying the overall composition.
    pub fn all_vapor(z: &[f64]) -> Self {
        Self {
            vap_frac: 1.0,
            liq_frac_comp: vec![0.0; z.len()],
            vap_frac_comp: z.to_vec(),
        }
    }

    pub fn is_two_phase(&self) -> bool {
        self.vap_frac > 0.0 && self.vap_frac < 1.0
    }
}
