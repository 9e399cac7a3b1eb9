//! Log-space bisection.
//!
//! Plausible sigmas span many orders of magnitude, so the bracket is halved in
//! `ln σ` rather than in σ: every step removes the same fraction of decades and
//! a fixed, small iteration count reaches a good Newton start point whatever
//! the scale of the problem.

use tracing::{debug, trace};

use crate::domain::{FitRequest, SolverConfig};
use crate::model::ratio;
use crate::solve::SolveError;

/// Geometric mean of two positive numbers, computed via logs.
pub fn geometric_mid(a: f64, b: f64) -> f64 {
    ((a.ln() + b.ln()) / 2.0).exp()
}

/// Sign of the residual `ratio(σ) - target`: `true` iff it is negative.
///
/// `±inf` carries a sign (a window reaching past the support can make `S`
/// underflow while `A` does not); only NaN is rejected.
fn residual_sign(req: &FitRequest, sigma: f64) -> Result<bool, SolveError> {
    let r = ratio(req, sigma);
    if r.is_nan() {
        return Err(SolveError::NonFinite { sigma });
    }
    Ok((r - req.target_ratio()).is_sign_negative())
}

/// Bracket the root over `[config.sigma_low, config.sigma_high]` and bisect it
/// `config.bisect_iterations` times.
///
/// Fails with [`SolveError::Unreachable`] when the residual has the same sign
/// at both endpoints.
pub fn bracket_and_bisect(req: &FitRequest, config: &SolverConfig) -> Result<f64, SolveError> {
    let mut a = config.sigma_low;
    let mut b = config.sigma_high;

    let sign_a = residual_sign(req, a)?;
    let sign_b = residual_sign(req, b)?;
    if sign_a == sign_b {
        return Err(SolveError::Unreachable {
            target: req.target_ratio(),
            ratio_at_low: ratio(req, a),
            ratio_at_high: ratio(req, b),
            sigma_low: a,
            sigma_high: b,
        });
    }

    for iteration in 0..config.bisect_iterations {
        let mid = geometric_mid(a, b);
        if residual_sign(req, mid)? == sign_a {
            a = mid;
        } else {
            b = mid;
        }
        trace!(iteration, low = a, high = b, "bisection step");
    }

    let sigma = geometric_mid(a, b);
    debug!(sigma, low = a, high = b, "bisection finished");
    Ok(sigma)
}
