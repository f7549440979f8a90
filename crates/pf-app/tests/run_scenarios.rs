//! End-to-end scenario runs through the service layer.

use pf_app::{
    AppError, PropertyPackageDef, Scenario, build_flowsheet, run_scenario, validate_scenario,
};
use pf_core::ConfigValue;
use proptest::prelude::*;
use std::collections::BTreeMap;

fn bthm_vapor() -> Scenario {
    let yaml = r#"
name: bthm_vapor
property_package:
  type: bthm_ideal
inlet:
  flow_mol: 1.0
  mole_frac_comp:
    benzene: 0.25
    toluene: 0.25
    hydrogen: 0.25
    methane: 0.25
  temperature: 500
  pressure: 100000
heat_duty: 300
initialize: true
"#;
    serde_yaml::from_str(yaml).unwrap()
}

#[test]
fn reference_scenario_reaches_expected_outlet() {
    let report = run_scenario(&Scenario::reference()).unwrap();
    assert!(report.optimal, "termination {}", report.termination);
    assert_eq!(report.termination, "optimal");
    assert_eq!(report.degrees_of_freedom, 0);
    assert!((report.outlet.temperature - 4.3138).abs() < 1e-3);
    let expectation = report.expectation.unwrap();
    assert!(expectation.passed);
    assert!(report.passed());
    assert!((report.outlet.flow_mol - 1.0).abs() < 1e-8);
    assert!((report.outlet.pressure - 0.1).abs() < 1e-8);
    assert_eq!(report.outlet.vap_frac, Some(1.0));
}

#[test]
fn reference_scenario_is_deterministic() {
    let a = run_scenario(&Scenario::reference()).unwrap();
    let b = run_scenario(&Scenario::reference()).unwrap();
    assert_eq!(a, b);
    assert_eq!(
        a.outlet.temperature.to_bits(),
        b.outlet.temperature.to_bits()
    );
}

#[test]
fn report_text_and_json() {
    let report = run_scenario(&Scenario::reference()).unwrap();
    assert!(report.report_text.contains("Unit : fs.heater"));
    assert!(report.report_text.contains("Heat Duty"));
    let json = report.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["termination"], "optimal");
    assert!(value.get("report_text").is_none());
    let benzene = value["outlet"]["mole_frac_comp"]["benzene"].as_f64().unwrap();
    assert!((benzene - 0.25).abs() < 1e-9);
}

#[test]
fn unknown_solver_is_rejected() {
    let mut s = Scenario::reference();
    s.solver.name = "cplex".to_string();
    let err = run_scenario(&s).unwrap_err();
    assert!(matches!(err, AppError::Solver(_)));
    assert!(err.to_string().contains("cplex"));
    assert!(err.to_string().contains("newton"));
}

#[test]
fn reference_scenario_solves_under_ipopt_name() {
    let mut s = Scenario::reference();
    s.solver.name = "ipopt".to_string();
    let report = run_scenario(&s).unwrap();
    assert!(report.optimal, "termination {}", report.termination);
    assert!((report.outlet.temperature - 4.3138).abs() < 1e-3);
    assert!(report.passed());
}

#[test]
fn iteration_cap_reports_max_iterations() {
    let mut s = Scenario::reference();
    s.solver.max_iterations = Some(0);
    let report = run_scenario(&s).unwrap();
    assert!(!report.optimal);
    assert_eq!(report.termination, "maxIterations");
    assert!(!report.passed());
}

#[test]
fn zero_flow_with_duty_is_rejected_before_solving() {
    let mut s = Scenario::reference();
    s.inlet.flow_mol = 0.0;
    assert!(matches!(run_scenario(&s), Err(AppError::Validation(_))));
}

#[test]
fn dynamic_flowsheet_fails_construction() {
    let mut s = Scenario::reference();
    s.flowsheet.dynamic = true;
    let err = run_scenario(&s).unwrap_err();
    assert!(matches!(err, AppError::Model(_)));
    assert!(err.to_string().contains("does not support dynamic behavior"));
}

#[test]
fn unit_config_domain_is_enforced() {
    let mut s = Scenario::reference();
    s.unit.config.insert(
        "material_balance_type".to_string(),
        ConfigValue::Str("componentPhase".to_string()),
    );
    assert!(matches!(build_flowsheet(&s), Err(AppError::Model(_))));
}

#[test]
fn pressure_change_lowers_outlet_pressure() {
    let mut s = Scenario::reference();
    s.pressure_change = Some(-0.02);
    s.expect = None;
    let report = run_scenario(&s).unwrap();
    assert!(report.optimal);
    assert!((report.outlet.pressure - 0.08).abs() < 1e-8);
    assert_eq!(report.pressure_change, Some(-0.02));
    assert!((report.outlet.temperature - 4.3138).abs() < 1e-3);
}

#[test]
fn bthm_vapor_heating() {
    let report = run_scenario(&bthm_vapor()).unwrap();
    assert!(report.optimal, "termination {}", report.termination);
    assert!(report.outlet.temperature > report.inlet.temperature);
    assert!(report.outlet.temperature < 520.0);
    assert_eq!(report.outlet.vap_frac, Some(1.0));
}

#[test]
fn bthm_rejects_unknown_components() {
    let mut s = bthm_vapor();
    s.inlet.mole_frac_comp.insert("xenon".to_string(), 0.0);
    assert!(matches!(validate_scenario(&s), Err(AppError::Validation(_))));
}

#[test]
fn constant_cp_package_needs_components() {
    let mut s = Scenario::reference();
    s.property_package = PropertyPackageDef::ConstantCp {
        components: Vec::new(),
        temperature_ref: 298.15,
    };
    assert!(matches!(validate_scenario(&s), Err(AppError::Validation(_))));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    // Constant heat capacity: the outlet rises by Q / (F cp_mix).
    #[test]
    fn constant_cp_outlet_matches_closed_form(q in -3.0f64..20.0, t_in in 2.0f64..400.0) {
        let mut s = Scenario::reference();
        s.heat_duty = q;
        s.inlet.temperature = t_in;
        s.expect = None;
        let report = run_scenario(&s).unwrap();
        prop_assert!(report.optimal);
        let expected = t_in + q / 3.806;
        prop_assert!((report.outlet.temperature - expected).abs() < 1e-6);
    }

    #[test]
    fn unknown_unit_options_rejected(key in "[a-z]{3,12}") {
        prop_assume!(![
            "dynamic", "has_holdup", "material_balance_type", "energy_balance_type",
            "momentum_balance_type", "has_pressure_change", "property_package",
        ].contains(&key.as_str()));
        let mut s = Scenario::reference();
        s.unit.config = BTreeMap::from([(key, ConfigValue::Bool(true))]);
        prop_assert!(build_flowsheet(&s).is_err());
    }
}
