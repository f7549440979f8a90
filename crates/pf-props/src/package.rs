//! Property package trait and validation helpers.

use crate::error::{PropsError, PropsResult};
use crate::state::{PhaseSplit, StateBounds, StateOptions, StateVars};
use pf_core::ConfigValue;
use std::collections::BTreeMap;

/// Trait for physical property packages.
///
/// A package describes a fixed component list and evaluates the properties
/// state blocks need to write balance equations. Implementations must be
/// thread-safe so a single package can be shared by many units through `Arc`.
pub trait PropertyPackage: Send + Sync + std::fmt::Debug {
    /// Get the package name (for debugging/logging).
    fn name(&self) -> &str;

    fn component_names(&self) -> Vec<&str>;

    fn num_components(&self) -> usize {
        self.component_names().len()
    }

    /// Index of a component by name.
    fn component_index(&self, name: &str) -> PropsResult<usize> {
        self.component_names()
            .iter()
            .position(|c| *c == name)
            .ok_or_else(|| PropsError::UnknownComponent {
                name: name.to_string(),
            })
    }

    /// Bounds and nominal values for FTPx variables.
    fn state_bounds(&self) -> StateBounds {
        StateBounds::default()
    }

    /// Parse package-specific arguments passed through a unit's
    /// `property_package_args` block.
    fn state_options(&self, args: &BTreeMap<String, ConfigValue>) -> PropsResult<StateOptions> {
        let mut options = StateOptions::default();
        for (key, value) in args {
            match key.as_str() {
                "has_phase_equilibrium" => {
                    options.has_phase_equilibrium =
                        value.as_bool().ok_or(PropsError::InvalidArg {
                            what: "has_phase_equilibrium must be a bool",
                        })?;
                }
                _ => return Err(PropsError::UnknownOption { name: key.clone() }),
            }
        }
        Ok(options)
    }

    /// Mixture molar enthalpy [J/mol].
    fn enth_mol(&self, state: &StateVars, options: &StateOptions) -> PropsResult<f64>;

    /// Vapor/liquid split at the given state.
    fn phase_split(&self, state: &StateVars, options: &StateOptions) -> PropsResult<PhaseSplit>;

    /// Component molecular weights [kg/mol], when the package defines them.
    fn mw_comp(&self) -> Option<Vec<f64>> {
        None
    }
}

/// Validation helpers for state inputs.
pub(crate) mod validation {
    use super::*;

    /// Ensure temperature is positive and finite.
    pub fn validate_temperature(t: f64) -> PropsResult<()> {
        if !t.is_finite() || t <= 0.0 {
            return Err(PropsError::NonPhysical {
                what: "temperature must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure pressure is positive and finite.
    pub fn validate_pressure(p: f64) -> PropsResult<()> {
        if !p.is_finite() || p <= 0.0 {
            return Err(PropsError::NonPhysical {
                what: "pressure must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure all mole fractions are finite.
    ///
    /// Fractions are not required to sum to one: intermediate solver
    /// iterates routinely violate the closure constraint.
    pub fn validate_fractions(z: &[f64]) -> PropsResult<()> {
        if z.iter().any(|v| !v.is_finite()) {
            return Err(PropsError::NonPhysical {
                what: "non-finite mole fraction",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::validation::*;

    #[test]
    fn validate_positive_temperature() {
        assert!(validate_temperature(300.0).is_ok());
        assert!(validate_temperature(3.0).is_ok());
        assert!(validate_temperature(0.0).is_err());
        assert!(validate_temperature(f64::NAN).is_err());
    }

    #[test]
    fn validate_positive_pressure() {
        assert!(validate_pressure(0.1).is_ok());
        assert!(validate_pressure(-1.0).is_err());
    }

    #[test]
    fn fractions_need_not_sum_to_one() {
        assert!(validate_fractions(&[0.3, 0.3]).is_ok());
        assert!(validate_fractions(&[0.3, f64::INFINITY]).is_err());
    }
}
