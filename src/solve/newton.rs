//! Newton-Raphson refinement of a bracketed sigma estimate.

use tracing::{debug, trace};

use crate::domain::{FitRequest, SolverConfig};
use crate::model::{ratio, ratio_derivative};
use crate::solve::SolveError;

/// Refined sigma and the number of Newton steps it took.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonOutcome {
    pub sigma: f64,
    pub iterations: usize,
}

/// Apply `σ ← σ - (ratio(σ) - target) / ratio'(σ)` at most
/// `config.newton_iterations` times.
///
/// Stops early once the relative step drops to `config.step_tolerance` or the
/// residual is exactly zero.
pub fn newton_refine(
    req: &FitRequest,
    sigma_init: f64,
    config: &SolverConfig,
) -> Result<NewtonOutcome, SolveError> {
    let target = req.target_ratio();
    let mut sigma = sigma_init;

    for iteration in 1..=config.newton_iterations {
        let residual = ratio(req, sigma) - target;
        let slope = ratio_derivative(req, sigma);
        if !(residual.is_finite() && slope.is_finite()) {
            return Err(SolveError::NonFinite { sigma });
        }
        if residual == 0.0 {
            debug!(sigma, iterations = iteration - 1, "newton hit exact root");
            return Ok(NewtonOutcome {
                sigma,
                iterations: iteration - 1,
            });
        }
        if slope == 0.0 {
            return Err(SolveError::ZeroDerivative { sigma, iteration });
        }

        let step = residual / slope;
        let next = sigma - step;
        if !(next.is_finite() && next > 0.0) {
            return Err(SolveError::Diverged {
                sigma: next,
                iteration,
            });
        }
        sigma = next;
        trace!(iteration, sigma, residual, step, "newton step");

        if step.abs() <= config.step_tolerance * sigma {
            debug!(sigma, iterations = iteration, "newton converged");
            return Ok(NewtonOutcome {
                sigma,
                iterations: iteration,
            });
        }
    }

    debug!(sigma, iterations = config.newton_iterations, "newton iteration ceiling reached");
    Ok(NewtonOutcome {
        sigma,
        iterations: config.newton_iterations,
    })
}
