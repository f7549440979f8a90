//! Build a heater flowsheet from a scenario, solve it and summarize the result.

use std::collections::BTreeMap;
use std::sync::Arc;

use pf_core::ConfigValue;
use pf_model::{Flowsheet, FlowsheetConfig, Heater, Model, StateBlock, UnitModel};
use pf_props::{BthmIdealPackage, ConstantCpComponent, ConstantCpPackage, PropertyPackage};
use pf_solver::{SolverFactory, SolverOptions};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::scenario::{PropertyPackageDef, Scenario};
use crate::scenario_service::validate_scenario;

/// Name the scenario's package is registered under on the flowsheet.
const PACKAGE_NAME: &str = "props";

/// A built and fully specified heater flowsheet, ready to solve.
#[derive(Debug)]
pub struct HeaterCase {
    pub flowsheet: Flowsheet,
    pub heater: Heater,
}

/// State of one stream after the solve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamReport {
    pub flow_mol: f64,
    pub mole_frac_comp: BTreeMap<String, f64>,
    pub temperature: f64,
    pub pressure: f64,
    /// Vapor fraction; absent when the package cannot split the state.
    pub vap_frac: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExpectationOutcome {
    pub expected: f64,
    pub tolerance: f64,
    pub actual: f64,
    pub passed: bool,
}

/// Summary of one scenario run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub scenario: String,
    pub solver: String,
    pub termination: String,
    pub optimal: bool,
    pub iterations: usize,
    pub residual_norm: f64,
    pub degrees_of_freedom: i64,
    pub heat_duty: f64,
    pub pressure_change: Option<f64>,
    pub inlet: StreamReport,
    pub outlet: StreamReport,
    pub expectation: Option<ExpectationOutcome>,
    /// Unit report table
    #[serde(skip)]
    pub report_text: String,
}

impl RunReport {
    /// The run converged and met its expectation, if any.
    pub fn passed(&self) -> bool {
        self.optimal && self.expectation.is_none_or(|e| e.passed)
    }

    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Create the property package a scenario names.
pub fn build_package(def: &PropertyPackageDef) -> AppResult<Arc<dyn PropertyPackage>> {
    match def {
        PropertyPackageDef::ConstantCp {
            components,
            temperature_ref,
        } => {
            let components = components
                .iter()
                .map(|c| ConstantCpComponent::new(c.name.clone(), c.cp_mol))
                .collect();
            Ok(Arc::new(ConstantCpPackage::new(components, *temperature_ref)?))
        }
        PropertyPackageDef::BthmIdeal => Ok(Arc::new(BthmIdealPackage::new())),
    }
}

/// Build the flowsheet, fix the inlet, heat duty and pressure change, and
/// optionally initialize the heater.
pub fn build_flowsheet(scenario: &Scenario) -> AppResult<HeaterCase> {
    validate_scenario(scenario)?;

    let mut flowsheet = Flowsheet::new(FlowsheetConfig {
        dynamic: scenario.flowsheet.dynamic,
    });
    let package = build_package(&scenario.property_package)?;
    flowsheet.add_property_package(PACKAGE_NAME, package.clone())?;

    let mut overrides = scenario.unit.config.clone();
    if scenario.pressure_change.is_some() {
        overrides
            .entry("has_pressure_change".to_string())
            .or_insert(ConfigValue::Bool(true));
    }
    let heater = Heater::build_with(&mut flowsheet, &scenario.unit.name, &overrides)?;

    let model = flowsheet.model_mut();
    let inlet = heater.inlet();
    inlet.fix(model, "flow_mol", scenario.inlet.flow_mol)?;
    for component in package.component_names() {
        let x = scenario
            .inlet
            .mole_frac_comp
            .get(component)
            .copied()
            .unwrap_or(0.0);
        inlet.fix(model, &format!("mole_frac_comp[{component}]"), x)?;
    }
    inlet.fix(model, "temperature", scenario.inlet.temperature)?;
    inlet.fix(model, "pressure", scenario.inlet.pressure)?;

    model.fix(heater.heat_duty(), scenario.heat_duty);
    match (scenario.pressure_change, heater.pressure_change()) {
        (Some(dp), Some(id)) => model.fix(id, dp),
        (Some(_), None) => {
            return Err(AppError::InvalidInput(
                "pressure_change is set but the heater was built without has_pressure_change"
                    .to_string(),
            ));
        }
        (None, Some(id)) => model.fix(id, 0.0),
        (None, None) => {}
    }

    if scenario.initialize {
        heater.initialize(model)?;
    }

    Ok(HeaterCase { flowsheet, heater })
}

fn stream_report(model: &Model, block: &StateBlock) -> StreamReport {
    let state = block.current_state(model);
    let mole_frac_comp = block
        .package()
        .component_names()
        .into_iter()
        .map(str::to_string)
        .zip(state.mole_frac_comp.iter().copied())
        .collect();
    let vap_frac = block.phase_split(model).ok().map(|s| s.vap_frac);
    StreamReport {
        flow_mol: state.flow_mol,
        mole_frac_comp,
        temperature: state.temperature,
        pressure: state.pressure,
        vap_frac,
    }
}

/// Build, solve and summarize a scenario.
///
/// A solve that finishes without `optimal` termination still produces a
/// report; only construction failures and solver errors are returned as
/// `Err`.
pub fn run_scenario(scenario: &Scenario) -> AppResult<RunReport> {
    let HeaterCase {
        mut flowsheet,
        heater,
    } = build_flowsheet(scenario)?;

    let dof = flowsheet.degrees_of_freedom();
    let options = SolverOptions {
        max_iterations: scenario.solver.max_iterations,
        ..SolverOptions::default()
    };
    let solver = SolverFactory::get_with_options(&scenario.solver.name, &options)?;

    info!(scenario = %scenario.name, solver = solver.name(), dof, "running scenario");
    let results = solver.solve(flowsheet.model_mut(), scenario.solver.tee)?;
    if !results.is_optimal() {
        warn!(
            scenario = %scenario.name,
            termination = %results.termination_condition,
            message = %results.message,
            "solve did not reach an optimal point"
        );
    }

    let model = flowsheet.model();
    let cv = heater.control_volume();
    let inlet = stream_report(model, cv.properties_in()?);
    let outlet = stream_report(model, cv.properties_out()?);

    let expectation = scenario.expect.map(|e| {
        let actual = outlet.temperature;
        ExpectationOutcome {
            expected: e.outlet_temperature,
            tolerance: e.tolerance,
            actual,
            passed: (actual - e.outlet_temperature).abs() <= e.tolerance,
        }
    });

    Ok(RunReport {
        scenario: scenario.name.clone(),
        solver: results.solver.clone(),
        termination: results.termination_condition.to_string(),
        optimal: results.is_optimal(),
        iterations: results.iterations,
        residual_norm: results.residual_norm,
        degrees_of_freedom: dof,
        heat_duty: model.value(heater.heat_duty()),
        pressure_change: heater.pressure_change().map(|id| model.value(id)),
        inlet,
        outlet,
        expectation,
        report_text: heater.report(model)?,
    })
}
