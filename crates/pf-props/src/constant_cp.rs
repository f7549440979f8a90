//! Ideal mixture with constant component heat capacities.

use crate::error::{PropsError, PropsResult};
use crate::package::{PropertyPackage, validation};
use crate::state::{PhaseSplit, StateOptions, StateVars};

/// One component with a constant molar heat capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantCpComponent {
    pub name: String,
    /// Molar heat capacity [J/(mol·K)]
    pub cp_mol: f64,
}

impl ConstantCpComponent {
    pub fn new(name: impl Into<String>, cp_mol: f64) -> Self {
        Self {
            name: name.into(),
            cp_mol,
        }
    }
}

/// Single-phase ideal package: `h = Σ x_j cp_j (T - T_ref)`.
///
/// No state bounds are imposed, so the package can be used at any positive
/// temperature and pressure.
#[derive(Debug, Clone)]
pub struct ConstantCpPackage {
    components: Vec<ConstantCpComponent>,
    temperature_ref: f64,
}

impl ConstantCpPackage {
    pub fn new(components: Vec<ConstantCpComponent>, temperature_ref: f64) -> PropsResult<Self> {
        if components.is_empty() {
            return Err(PropsError::InvalidArg {
                what: "empty component list",
            });
        }
        for c in &components {
            if !c.cp_mol.is_finite() || c.cp_mol <= 0.0 {
                return Err(PropsError::NonPhysical {
                    what: "cp must be positive and finite",
                });
            }
        }
        for (i, c) in components.iter().enumerate() {
            if components[..i].iter().any(|other| other.name == c.name) {
                return Err(PropsError::InvalidArg {
                    what: "duplicate component name",
                });
            }
        }
        validation::validate_temperature(temperature_ref)?;
        Ok(Self {
            components,
            temperature_ref,
        })
    }

    /// Four-component mixture used by the reference heater case.
    ///
    /// Mixture heat capacity at equal fractions is 3.806 J/(mol·K).
    pub fn reference() -> Self {
        Self {
            components: vec![
                ConstantCpComponent::new("benzene", 3.2),
                ConstantCpComponent::new("toluene", 3.6),
                ConstantCpComponent::new("hydrogen", 4.0),
                ConstantCpComponent::new("methane", 4.424),
            ],
            temperature_ref: 298.15,
        }
    }

    pub fn components(&self) -> &[ConstantCpComponent] {
        &self.components
    }

    pub fn temperature_ref(&self) -> f64 {
        self.temperature_ref
    }

    /// Mixture heat capacity for the given fractions.
    pub fn cp_mix(&self, x: &[f64]) -> f64 {
        x.iter()
            .zip(&self.components)
            .map(|(xj, c)| xj * c.cp_mol)
            .sum()
    }
}

impl PropertyPackage for ConstantCpPackage {
    fn name(&self) -> &str {
        "constant_cp"
    }

    fn component_names(&self) -> Vec<&str> {
        self.components.iter().map(|c| c.name.as_str()).collect()
    }

    fn enth_mol(&self, state: &StateVars, _options: &StateOptions) -> PropsResult<f64> {
        state.check_components(self.components.len())?;
        validation::validate_temperature(state.temperature)?;
        validation::validate_fractions(&state.mole_frac_comp)?;
        Ok(self.cp_mix(&state.mole_frac_comp) * (state.temperature - self.temperature_ref))
    }

    fn phase_split(&self, state: &StateVars, _options: &StateOptions) -> PropsResult<PhaseSplit> {
        state.check_components(self.components.len())?;
        Ok(PhaseSplit::all_vapor(&state.mole_frac_comp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn reference_mixture_cp() {
        let pkg = ConstantCpPackage::reference();
        assert!((pkg.cp_mix(&[0.25; 4]) - 3.806).abs() < 1e-12);
        assert!(pkg.state_bounds().temperature.is_none());
    }

    #[test]
    fn rejects_bad_components() {
        assert!(ConstantCpPackage::new(vec![], 298.15).is_err());
        assert!(
            ConstantCpPackage::new(vec![ConstantCpComponent::new("a", -1.0)], 298.15).is_err()
        );
        let dup = vec![
            ConstantCpComponent::new("a", 1.0),
            ConstantCpComponent::new("a", 2.0),
        ];
        assert!(ConstantCpPackage::new(dup, 298.15).is_err());
    }

    #[test]
    fn rejects_non_positive_temperature() {
        let pkg = ConstantCpPackage::reference();
        let s = StateVars::new(1.0, vec![0.25; 4], 0.0, 0.1);
        assert!(pkg.enth_mol(&s, &StateOptions::default()).is_err());
    }

    #[test]
    fn unknown_package_option_rejected() {
        let pkg = ConstantCpPackage::reference();
        let mut args = std::collections::BTreeMap::new();
        args.insert("eos".to_string(), pf_core::ConfigValue::from("pr"));
        assert!(matches!(
            pkg.state_options(&args),
            Err(PropsError::UnknownOption { .. })
        ));
    }

    proptest! {
        #[test]
        fn enthalpy_difference_is_cp_times_dt(t0 in 1.0f64..1000.0, dt in -0.5f64..500.0) {
            let pkg = ConstantCpPackage::reference();
            let opts = StateOptions::default();
            let a = StateVars::new(1.0, vec![0.25; 4], t0, 0.1);
            let b = StateVars::new(1.0, vec![0.25; 4], t0 + dt, 0.1);
            let dh = pkg.enth_mol(&b, &opts).unwrap() - pkg.enth_mol(&a, &opts).unwrap();
            prop_assert!((dh - 3.806 * dt).abs() < 1e-8 * (1.0 + dh.abs()));
        }
    }
}
