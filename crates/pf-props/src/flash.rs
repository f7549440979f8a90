//! Ideal vapor-liquid flash with non-condensable components.
//!
//! Solves the Rachford-Rice equation
//!
//! `f(V) = Σ_cond z_j (K_j - 1) / (1 + V (K_j - 1)) + Σ_nc z_j / V = 0`
//!
//! for the vapor fraction `V` by bisection. `f` is strictly decreasing on
//! `(0, 1]` for non-negative `z`, so bisection always brackets the root.

use crate::error::{PropsError, PropsResult};
use crate::state::PhaseSplit;
use tracing::trace;

const MAX_BISECTION_ITERS: usize = 200;
const V_TOL: f64 = 1e-14;

/// Flash a feed of overall composition `z`.
///
/// `k_values[j]` is `Some(K_j)` for condensable components and `None` for
/// non-condensables.
pub fn ideal_flash(z: &[f64], k_values: &[Option<f64>]) -> PropsResult<PhaseSplit> {
    if z.len() != k_values.len() {
        return Err(PropsError::InvalidArg {
            what: "K-value count does not match composition",
        });
    }
    if k_values.iter().flatten().any(|k| !k.is_finite() || *k <= 0.0) {
        return Err(PropsError::NonPhysical {
            what: "K-values must be positive and finite",
        });
    }

    // Small negative fractions appear in solver iterates; they carry no material.
    let z: Vec<f64> = z.iter().map(|v| v.max(0.0)).collect();
    if z.iter().sum::<f64>() <= 0.0 {
        return Err(PropsError::NonPhysical {
            what: "mole fractions sum to zero",
        });
    }

    let has_noncondensable = k_values
        .iter()
        .zip(&z)
        .any(|(k, zj)| k.is_none() && *zj > 0.0);

    let rr = |v: f64| -> f64 {
        z.iter()
            .zip(k_values)
            .map(|(zj, k)| match k {
                Some(k) => zj * (k - 1.0) / (1.0 + v * (k - 1.0)),
                None => zj / v,
            })
            .sum()
    };

    let v = if rr(1.0) >= 0.0 {
        1.0
    } else if !has_noncondensable && rr(0.0) <= 0.0 {
        0.0
    } else {
        let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
        let mut iters = 0;
        while hi - lo > V_TOL {
            if iters == MAX_BISECTION_ITERS {
                return Err(PropsError::ConvergenceFailed {
                    what: "Rachford-Rice vapor fraction",
                });
            }
            let mid = 0.5 * (lo + hi);
            // f(0) is +inf with non-condensables present
            if mid > 0.0 && rr(mid) > 0.0 {
                lo = mid;
            } else {
                hi = mid;
            }
            iters += 1;
        }
        0.5 * (lo + hi)
    };

    trace!(vap_frac = v, has_noncondensable, "flash");

    let mut liq = Vec::with_capacity(z.len());
    let mut vap = Vec::with_capacity(z.len());
    for (zj, k) in z.iter().zip(k_values) {
        match k {
            Some(k) => {
                let x = zj / (1.0 + v * (k - 1.0));
                liq.push(x);
                vap.push(k * x);
            }
            None => {
                liq.push(0.0);
                vap.push(if v > 0.0 { zj / v } else { 0.0 });
            }
        }
    }

    Ok(PhaseSplit {
        vap_frac: v,
        liq_frac_comp: liq,
        vap_frac_comp: vap,
    })
}
