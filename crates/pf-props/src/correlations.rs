//! Pure-component property correlations.
//!
//! All enthalpies are sensible enthalpies relative to a reference
//! temperature, in J/mol. Formation enthalpies are added by the caller.

use crate::error::{PropsError, PropsResult};
use pf_core::constants::PA_PER_BAR;

/// Ideal-gas heat capacity, Reid-Prausnitz-Poling form.
///
/// `cp = A + B*T + C*T^2 + D*T^3` in J/(mol·K).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RppIdealGasCp {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl RppIdealGasCp {
    pub const fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { a, b, c, d }
    }

    pub fn cp_mol(&self, t: f64) -> f64 {
        self.a + t * (self.b + t * (self.c + t * self.d))
    }

    /// Integral of cp from `t_ref` to `t`.
    pub fn enth_mol(&self, t: f64, t_ref: f64) -> f64 {
        let antiderivative = |t: f64| {
            t * (self.a + t * (self.b / 2.0 + t * (self.c / 3.0 + t * self.d / 4.0)))
        };
        antiderivative(t) - antiderivative(t_ref)
    }
}

/// Liquid heat capacity, Perry's polynomial form.
///
/// Coefficients are in J/(kmol·K) as tabulated; results are per mol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerryLiquidCp {
    pub c: [f64; 5],
}

impl PerryLiquidCp {
    pub const fn new(c: [f64; 5]) -> Self {
        Self { c }
    }

    pub fn cp_mol(&self, t: f64) -> f64 {
        let [c1, c2, c3, c4, c5] = self.c;
        (c1 + t * (c2 + t * (c3 + t * (c4 + t * c5)))) / 1000.0
    }

    pub fn enth_mol(&self, t: f64, t_ref: f64) -> f64 {
        let [c1, c2, c3, c4, c5] = self.c;
        let antiderivative = |t: f64| {
            t * (c1 + t * (c2 / 2.0 + t * (c3 / 3.0 + t * (c4 / 4.0 + t * c5 / 5.0))))
        };
        (antiderivative(t) - antiderivative(t_ref)) / 1000.0
    }
}

/// Saturation pressure, NIST Antoine form.
///
/// `log10(Psat / bar) = A - B / (T + C)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NistAntoine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl NistAntoine {
    pub const fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    /// Saturation pressure in Pa.
    pub fn pressure_sat(&self, t: f64) -> PropsResult<f64> {
        let denom = t + self.c;
        if !denom.is_finite() || denom <= 0.0 {
            return Err(PropsError::OutOfRange {
                what: "Antoine temperature",
            });
        }
        Ok(10f64.powf(self.a - self.b / denom) * PA_PER_BAR)
    }
}
