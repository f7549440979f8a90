//! Scenario file schema.
//!
//! A scenario describes one heater case: the property package, unit
//! configuration overrides, the fixed inlet state and heat duty, and the
//! solver to use.

use pf_core::ConfigValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub flowsheet: FlowsheetDef,
    pub property_package: PropertyPackageDef,
    #[serde(default)]
    pub unit: UnitDef,
    pub inlet: InletDef,
    /// Heat duty [W]
    pub heat_duty: f64,
    /// Pressure change [Pa]; requires the unit's pressure change term.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure_change: Option<f64>,
    /// Copy the inlet state to the outlet before solving.
    #[serde(default)]
    pub initialize: bool,
    #[serde(default)]
    pub solver: SolverDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expect: Option<ExpectDef>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct FlowsheetDef {
    #[serde(default)]
    pub dynamic: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyPackageDef {
    ConstantCp {
        components: Vec<ComponentDef>,
        #[serde(default = "default_temperature_ref")]
        temperature_ref: f64,
    },
    BthmIdeal,
}

fn default_temperature_ref() -> f64 {
    298.15
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentDef {
    pub name: String,
    /// Molar heat capacity [J/(mol·K)]
    pub cp_mol: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnitDef {
    #[serde(default = "default_unit_name")]
    pub name: String,
    /// Overrides applied to the heater's declared configuration.
    #[serde(default)]
    pub config: BTreeMap<String, ConfigValue>,
}

fn default_unit_name() -> String {
    "heater".to_string()
}

impl Default for UnitDef {
    fn default() -> Self {
        Self {
            name: default_unit_name(),
            config: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InletDef {
    /// [mol/s]
    pub flow_mol: f64,
    /// Mole fractions by component name; unlisted components are zero.
    pub mole_frac_comp: BTreeMap<String, f64>,
    /// [K]
    pub temperature: f64,
    /// [Pa]
    pub pressure: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolverDef {
    #[serde(default = "default_solver_name")]
    pub name: String,
    #[serde(default)]
    pub tee: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<usize>,
}

fn default_solver_name() -> String {
    "newton".to_string()
}

impl Default for SolverDef {
    fn default() -> Self {
        Self {
            name: default_solver_name(),
            tee: false,
            max_iterations: None,
        }
    }
}

/// Expected outlet temperature checked after the solve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ExpectDef {
    pub outlet_temperature: f64,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

fn default_tolerance() -> f64 {
    1e-3
}

const REFERENCE_COMPONENTS: [(&str, f64); 4] = [
    ("benzene", 3.2),
    ("toluene", 3.6),
    ("hydrogen", 4.0),
    ("methane", 4.424),
];

impl Scenario {
    /// The reference heater case: four equimolar components at 3 K and
    /// 0.1 Pa heated by 5 W; the outlet settles at 4.3138 K.
    pub fn reference() -> Self {
        Self {
            name: "reference_heater".to_string(),
            flowsheet: FlowsheetDef { dynamic: false },
            property_package: PropertyPackageDef::ConstantCp {
                components: REFERENCE_COMPONENTS
                    .iter()
                    .map(|(name, cp)| ComponentDef {
                        name: name.to_string(),
                        cp_mol: *cp,
                    })
                    .collect(),
                temperature_ref: default_temperature_ref(),
            },
            unit: UnitDef::default(),
            inlet: InletDef {
                flow_mol: 1.0,
                mole_frac_comp: REFERENCE_COMPONENTS
                    .iter()
                    .map(|(name, _)| (name.to_string(), 0.25))
                    .collect(),
                temperature: 3.0,
                pressure: 0.1,
            },
            heat_duty: 5.0,
            pressure_change: None,
            initialize: false,
            solver: SolverDef::default(),
            expect: Some(ExpectDef {
                outlet_temperature: 4.3138,
                tolerance: 1e-3,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_yaml_uses_defaults() {
        let yaml = r#"
name: minimal
property_package:
  type: bthm_ideal
inlet:
  flow_mol: 1.0
  mole_frac_comp: { benzene: 0.5, toluene: 0.5 }
  temperature: 400
  pressure: 100000
heat_duty: 100
"#;
        let s: Scenario = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(s.property_package, PropertyPackageDef::BthmIdeal);
        assert_eq!(s.unit.name, "heater");
        assert_eq!(s.solver.name, "newton");
        assert!(!s.flowsheet.dynamic);
        assert!(!s.initialize);
        assert!(s.expect.is_none());
        assert_eq!(s.inlet.temperature, 400.0);
    }

    #[test]
    fn unit_config_values_parse_untagged() {
        let yaml = r#"
name: cfg
property_package:
  type: constant_cp
  components:
    - { name: a, cp_mol: 1.0 }
unit:
  config:
    dynamic: false
    has_holdup: useDefault
    property_package_args: { has_phase_equilibrium: false }
inlet: { flow_mol: 1, mole_frac_comp: { a: 1 }, temperature: 3, pressure: 0.1 }
heat_duty: 5
"#;
        let s: Scenario = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(s.unit.config["dynamic"], ConfigValue::Bool(false));
        assert!(s.unit.config["has_holdup"].is_use_default());
        assert!(matches!(
            s.unit.config["property_package_args"],
            ConfigValue::Block(_)
        ));
        match &s.property_package {
            PropertyPackageDef::ConstantCp {
                temperature_ref, ..
            } => assert_eq!(*temperature_ref, 298.15),
            other => panic!("unexpected package {other:?}"),
        }
    }

    #[test]
    fn reference_scenario_survives_yaml() {
        let reference = Scenario::reference();
        let yaml = serde_yaml::to_string(&reference).unwrap();
        let back: Scenario = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, reference);
    }
}
