//! pf-core: shared building blocks for procflow.
//!
//! - `units`: uom SI quantities and constructors
//! - `ids`: typed handles for variables, constraints and units
//! - `config`: declared option schemas with domain checks
//! - `error`: errors shared by the layers above

pub mod config;
pub mod error;
pub mod ids;
pub mod units;

pub use config::{ConfigBlock, ConfigValue, Domain};
pub use error::{PfError, PfResult};
pub use ids::{ConstraintId, UnitId, VarId};
pub use units::*;
