//! The scenario files shipped under demos/ stay loadable.

use pf_app::{Scenario, build_flowsheet, run_scenario, validate_scenario};

const DEMOS: &[(&str, &str)] = &[
    (
        "reference_heater",
        include_str!("../../../demos/reference_heater.yaml"),
    ),
    (
        "bthm_vapor_heater",
        include_str!("../../../demos/bthm_vapor_heater.yaml"),
    ),
    (
        "bthm_two_phase_heater",
        include_str!("../../../demos/bthm_two_phase_heater.yaml"),
    ),
];

#[test]
fn demos_parse_and_build_square_models() {
    for (name, yaml) in DEMOS {
        let scenario: Scenario = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(scenario.name, *name);
        validate_scenario(&scenario).unwrap();
        let case = build_flowsheet(&scenario).unwrap();
        assert_eq!(case.flowsheet.degrees_of_freedom(), 0, "{name}");
    }
}

#[test]
fn reference_demo_matches_builtin_result() {
    let scenario: Scenario = serde_yaml::from_str(DEMOS[0].1).unwrap();
    let from_file = run_scenario(&scenario).unwrap();
    let builtin = run_scenario(&Scenario::reference()).unwrap();
    assert!(from_file.passed());
    assert!((from_file.outlet.temperature - builtin.outlet.temperature).abs() < 1e-9);
}
