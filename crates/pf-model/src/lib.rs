//! pf-model: equation-oriented flowsheet models for procflow.
//!
//! Provides:
//! - `Model`: named variables (value, fixed flag, bounds) and residual constraints
//! - `StateBlock`: FTPx state variables built from a property package
//! - `ControlVolume0D`: steady-state material, energy and momentum balances
//! - `Port` and `Flowsheet::connect` for stream connections
//! - `UnitModel` trait and the `Heater` unit
//!
//! # Example
//!
//! ```
//! use pf_model::{Flowsheet, FlowsheetConfig, Heater, UnitModel};
//! use pf_props::ConstantCpPackage;
//! use std::sync::Arc;
//!
//! let mut fs = Flowsheet::new(FlowsheetConfig::default());
//! fs.add_property_package("ideal", Arc::new(ConstantCpPackage::reference())).unwrap();
//! let heater = Heater::build(&mut fs, "heater", Heater::config()).unwrap();
//!
//! let model = fs.model_mut();
//! heater.inlet().fix(model, "flow_mol", 1.0).unwrap();
//! assert_eq!(heater.name(), "fs.heater");
//! ```

pub mod control_volume;
pub mod error;
pub mod flowsheet;
pub mod heater;
pub mod model;
pub mod port;
pub mod state_block;
pub mod unit;

pub use control_volume::{
    ControlVolume0D, EnergyBalanceType, MaterialBalanceType, MomentumBalanceType,
};
pub use error::{ModelError, ModelResult};
pub use flowsheet::{Connection, Flowsheet, FlowsheetConfig};
pub use heater::{DYNAMIC_NOT_SUPPORTED, HOLDUP_NOT_SUPPORTED, Heater};
pub use model::{Constraint, Model, Residual, Values, Var};
pub use port::Port;
pub use state_block::StateBlock;
pub use unit::{UnitModel, resolve_flag};
