use pf_props::{BthmIdealPackage, ConstantCpPackage, PropertyPackage, StateOptions, StateVars};
use std::sync::Arc;

#[test]
fn packages_are_shareable_trait_objects() {
    let packages: Vec<Arc<dyn PropertyPackage>> = vec![
        Arc::new(ConstantCpPackage::reference()),
        Arc::new(BthmIdealPackage::new()),
    ];
    for pkg in &packages {
        assert_eq!(pkg.num_components(), 4);
        let state = StateVars::new(1.0, vec![0.25; 4], 400.0, 1e5);
        let h = pkg.enth_mol(&state, &StateOptions::default()).unwrap();
        assert!(h.is_finite());
    }
}

#[test]
fn bthm_bounds_and_weights() {
    let pkg = BthmIdealPackage::new();
    let bounds = pkg.state_bounds();
    let t = bounds.temperature.unwrap();
    assert_eq!((t.lb, t.nominal, t.ub), (273.15, 300.0, 1000.0));
    let p = bounds.pressure.unwrap();
    assert_eq!((p.lb, p.ub), (5e4, 1e6));
    let mw = pkg.mw_comp().unwrap();
    assert!((mw[0] - 78.1136e-3).abs() < 1e-12);
}

#[test]
fn bthm_enthalpy_continuous_across_dew_point() {
    // Scan upward from a two-phase state; enthalpy must increase monotonically.
    let pkg = BthmIdealPackage::new();
    let opts = StateOptions::default();
    let mut last = f64::NEG_INFINITY;
    let mut t = 300.0;
    while t < 420.0 {
        let h = pkg
            .enth_mol(&StateVars::new(1.0, vec![0.25; 4], t, 1e5), &opts)
            .unwrap();
        assert!(h > last, "enthalpy decreased at T={t}");
        last = h;
        t += 2.0;
    }
}

#[test]
fn has_phase_equilibrium_parsed_from_args() {
    let pkg = BthmIdealPackage::new();
    let mut args = std::collections::BTreeMap::new();
    args.insert(
        "has_phase_equilibrium".to_string(),
        pf_core::ConfigValue::Bool(false),
    );
    let opts = pkg.state_options(&args).unwrap();
    assert!(!opts.has_phase_equilibrium);
}
