//! Scenario loading, saving and validation.

use std::path::Path;

use pf_props::PropertyPackage;

use crate::error::{AppError, AppResult};
use crate::run_service::build_package;
use crate::scenario::Scenario;

const FRACTION_SUM_TOL: f64 = 1e-6;

/// Load a scenario from a YAML file.
pub fn load_scenario(path: &Path) -> AppResult<Scenario> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::ScenarioFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let scenario: Scenario = serde_yaml::from_str(&content)?;
    Ok(scenario)
}

/// Save a scenario to a YAML file.
pub fn save_scenario(path: &Path, scenario: &Scenario) -> AppResult<()> {
    let content = serde_yaml::to_string(scenario)?;

    std::fs::write(path, content).map_err(|e| AppError::ScenarioFileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

/// Check a scenario before building anything from it.
///
/// Unit configuration values are checked later against the heater's
/// declared domains.
pub fn validate_scenario(scenario: &Scenario) -> AppResult<()> {
    if scenario.name.trim().is_empty() {
        return Err(AppError::Validation(
            "Scenario must have a name".to_string(),
        ));
    }
    if scenario.solver.name.trim().is_empty() {
        return Err(AppError::Validation(
            "Solver name must not be empty".to_string(),
        ));
    }

    let package = build_package(&scenario.property_package)
        .map_err(|e| AppError::Validation(format!("Invalid property package: {e}")))?;
    validate_inlet(scenario, package.as_ref())?;

    if !scenario.heat_duty.is_finite() {
        return Err(AppError::Validation(format!(
            "Heat duty must be finite, got {}",
            scenario.heat_duty
        )));
    }
    if let Some(dp) = scenario.pressure_change {
        if !dp.is_finite() {
            return Err(AppError::Validation(format!(
                "Pressure change must be finite, got {dp}"
            )));
        }
    }
    if let Some(expect) = &scenario.expect {
        if !(expect.tolerance > 0.0) || !expect.outlet_temperature.is_finite() {
            return Err(AppError::Validation(
                "Expected outlet temperature needs a finite value and a positive tolerance"
                    .to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_inlet(scenario: &Scenario, package: &dyn PropertyPackage) -> AppResult<()> {
    let inlet = &scenario.inlet;

    if !(inlet.flow_mol >= 0.0) || !inlet.flow_mol.is_finite() {
        return Err(AppError::Validation(format!(
            "Inlet flow must be finite and non-negative, got {}",
            inlet.flow_mol
        )));
    }
    if inlet.flow_mol == 0.0 && scenario.heat_duty != 0.0 {
        return Err(AppError::Validation(format!(
            "Heat duty {} cannot be absorbed by zero inlet flow",
            scenario.heat_duty
        )));
    }
    if !(inlet.temperature > 0.0) || !inlet.temperature.is_finite() {
        return Err(AppError::Validation(format!(
            "Inlet temperature must be positive, got {}",
            inlet.temperature
        )));
    }
    if !(inlet.pressure > 0.0) || !inlet.pressure.is_finite() {
        return Err(AppError::Validation(format!(
            "Inlet pressure must be positive, got {}",
            inlet.pressure
        )));
    }

    let mut sum = 0.0;
    for (component, x) in &inlet.mole_frac_comp {
        if package.component_index(component).is_err() {
            return Err(AppError::Validation(format!(
                "Unknown component '{}' (package has: {})",
                component,
                package.component_names().join(", ")
            )));
        }
        if !(0.0..=1.0).contains(x) {
            return Err(AppError::Validation(format!(
                "Mole fraction of '{component}' must lie in [0, 1], got {x}"
            )));
        }
        sum += x;
    }
    if (sum - 1.0).abs() > FRACTION_SUM_TOL {
        return Err(AppError::Validation(format!(
            "Inlet mole fractions must sum to 1, got {sum}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_is_valid() {
        validate_scenario(&Scenario::reference()).unwrap();
    }

    #[test]
    fn fractions_must_sum_to_one() {
        let mut s = Scenario::reference();
        s.inlet.mole_frac_comp.insert("methane".to_string(), 0.5);
        let err = validate_scenario(&s).unwrap_err();
        assert!(err.to_string().contains("sum to 1"));
    }

    #[test]
    fn unknown_component_rejected() {
        let mut s = Scenario::reference();
        s.inlet.mole_frac_comp.remove("methane");
        s.inlet.mole_frac_comp.insert("xenon".to_string(), 0.25);
        let err = validate_scenario(&s).unwrap_err();
        assert!(err.to_string().contains("xenon"));
    }

    #[test]
    fn zero_flow_needs_zero_duty() {
        let mut s = Scenario::reference();
        s.inlet.flow_mol = 0.0;
        let err = validate_scenario(&s).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(err.to_string().contains("zero inlet flow"));

        s.heat_duty = 0.0;
        validate_scenario(&s).unwrap();
    }

    #[test]
    fn non_positive_temperature_rejected() {
        let mut s = Scenario::reference();
        s.inlet.temperature = 0.0;
        assert!(matches!(validate_scenario(&s), Err(AppError::Validation(_))));
    }

    #[test]
    fn bad_expectation_rejected() {
        let mut s = Scenario::reference();
        if let Some(e) = s.expect.as_mut() {
            e.tolerance = 0.0;
        }
        assert!(validate_scenario(&s).is_err());
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir().join(format!("pf-app-scenario-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("reference.yaml");
        save_scenario(&path, &Scenario::reference()).unwrap();
        let loaded = load_scenario(&path).unwrap();
        assert_eq!(loaded, Scenario::reference());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_scenario(Path::new("/nonexistent/scenario.yaml")).unwrap_err();
        assert!(matches!(err, AppError::ScenarioFileRead { .. }));
        assert!(err.to_string().contains("/nonexistent/scenario.yaml"));
    }
}
