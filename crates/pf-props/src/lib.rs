//! pf-props: physical property packages for procflow.
//!
//! Provides:
//! - FTPx state variables and bounds
//! - `PropertyPackage` trait used by state blocks to build enthalpy and
//!   phase equilibrium expressions
//! - Pure-component correlations (RPP ideal gas Cp, Perry liquid Cp, NIST Antoine)
//! - Ideal two-phase flash with non-condensable components
//! - Benzene-toluene-hydrogen-methane ideal VLE package
//! - Constant heat capacity ideal package
//!
//! # Example
//!
//! ```
//! use pf_props::{ConstantCpPackage, PropertyPackage, StateOptions, StateVars};
//!
//! let package = ConstantCpPackage::reference();
//! let state = StateVars::new(1.0, vec![0.25; 4], 3.0, 0.1);
//! let h = package.enth_mol(&state, &StateOptions::default()).unwrap();
//! assert!((h - 3.806 * (3.0 - 298.15)).abs() < 1e-9);
//! ```

pub mod bthm;
pub mod component;
pub mod constant_cp;
pub mod correlations;
pub mod error;
pub mod flash;
pub mod package;
pub mod state;

pub use bthm::BthmIdealPackage;
pub use component::{ComponentData, PhaseKind};
pub use constant_cp::{ConstantCpComponent, ConstantCpPackage};
pub use correlations::{NistAntoine, PerryLiquidCp, RppIdealGasCp};
pub use error::{PropsError, PropsResult};
pub use flash::ideal_flash;
pub use package::PropertyPackage;
pub use state::{Bound, PhaseSplit, StateBounds, StateOptions, StateVars};
