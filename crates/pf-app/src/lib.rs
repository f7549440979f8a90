//! Shared application service layer for procflow.
//!
//! This crate gives the CLI one entry point for scenario files: loading and
//! validating them, building the heater flowsheet they describe, running
//! the selected solver and summarizing the outcome.

pub mod error;
pub mod run_service;
pub mod scenario;
pub mod scenario_service;

// Re-export key types for convenience
pub use error::{AppError, AppResult};
pub use run_service::{
    ExpectationOutcome, HeaterCase, RunReport, StreamReport, build_flowsheet, build_package,
    run_scenario,
};
pub use scenario::{
    ComponentDef, ExpectDef, FlowsheetDef, InletDef, PropertyPackageDef, Scenario, SolverDef,
    UnitDef,
};
pub use scenario_service::{load_scenario, save_scenario, validate_scenario};
