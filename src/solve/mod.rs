//! Sigma solver orchestration.
//!
//! Responsibilities:
//!
//! - bracket the root in log-space and bisect to a robust estimate
//! - polish it with Newton-Raphson
//! - reject results that do not reproduce the target ratio

pub mod bracket;
pub mod newton;

pub use bracket::*;
pub use newton::*;

use thiserror::Error;
use tracing::info;

use crate::domain::{FitRequest, FitResult, SolverConfig};
use crate::model::ratio;

/// Failures of a single solve.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error(
        "CAN NOT find the solution: target ratio {:.4}% is outside the ratios reached over sigma in [{sigma_low}, {sigma_high}] ({:.4}% .. {:.4}%)",
        .target * 100.0,
        .ratio_at_low * 100.0,
        .ratio_at_high * 100.0
    )]
    Unreachable {
        target: f64,
        ratio_at_low: f64,
        ratio_at_high: f64,
        sigma_low: f64,
        sigma_high: f64,
    },

    #[error("non-finite ratio encountered at sigma={sigma}")]
    NonFinite { sigma: f64 },

    #[error("ratio derivative vanished at sigma={sigma} (newton step {iteration})")]
    ZeroDerivative { sigma: f64, iteration: usize },

    #[error("newton refinement left the positive axis (sigma={sigma}, step {iteration})")]
    Diverged { sigma: f64, iteration: usize },

    #[error("failed to converge: sigma={sigma} gives ratio {:.6}%, target {:.6}%", .achieved * 100.0, .target * 100.0)]
    NotConverged { sigma: f64, achieved: f64, target: f64 },

    #[error("invalid solver configuration: {0}")]
    InvalidConfig(String),
}

/// Solve with the default configuration.
pub fn solve(req: &FitRequest) -> Result<FitResult, SolveError> {
    solve_with(req, &SolverConfig::default())
}

/// Find sigma such that `ratio(req, sigma) == req.target_ratio()`.
pub fn solve_with(req: &FitRequest, config: &SolverConfig) -> Result<FitResult, SolveError> {
    config.validate()?;

    let initial_sigma = bracket_and_bisect(req, config)?;
    let refined = newton_refine(req, initial_sigma, config)?;

    let achieved_ratio = ratio(req, refined.sigma);
    if !((achieved_ratio - req.target_ratio()).abs() <= config.ratio_tolerance) {
        return Err(SolveError::NotConverged {
            sigma: refined.sigma,
            achieved: achieved_ratio,
            target: req.target_ratio(),
        });
    }

    info!(
        sigma = refined.sigma,
        initial_sigma,
        newton_iterations = refined.iterations,
        "sigma solved"
    );
    Ok(FitResult {
        sigma: refined.sigma,
        initial_sigma,
        achieved_ratio,
        newton_iterations: refined.iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Preset;
    use crate::preset::derive;

    #[test]
    fn solved_sigma_reproduces_target() {
        let req = FitRequest::new(10, 30, 10.0, 10, 20, 0.6).unwrap();
        let result = solve(&req).unwrap();
        assert!((result.sigma - 18.330172849).abs() < 1e-6, "sigma={}", result.sigma);
        assert!((ratio(&req, result.sigma) - 0.6).abs() < 1e-6);
        assert_eq!(result.sigma_x1000(), 18_330);
    }

    #[test]
    fn window_equal_to_support_is_unreachable() {
        // The window is the whole support: ratio is 1 for every sigma.
        let req = FitRequest::new(10, 30, 10.0, 10, 30, 0.6).unwrap();
        assert!(matches!(solve(&req), Err(SolveError::Unreachable { .. })));
    }

    #[test]
    fn every_preset_round_trips_on_default_range() {
        let expected = [
            (Preset::SuperLow, 2.902594),
            (Preset::Low, 5.747044),
            (Preset::Medium, 5.936142),
            (Preset::High, 5.747044),
            (Preset::SuperHigh, 2.902594),
        ];
        for (preset, sigma) in expected {
            let req = derive(preset, 10, 30).to_request().unwrap();
            let result = solve(&req).unwrap();
            assert!((result.sigma - sigma).abs() < 1e-5, "{preset}: sigma={}", result.sigma);
            assert!((result.achieved_ratio - req.target_ratio()).abs() < 1e-6);
        }
    }

    #[test]
    fn wide_support_round_trips() {
        let req = FitRequest::new(0, 100, 50.0, 40, 60, 0.5).unwrap();
        let result = solve(&req).unwrap();
        assert!((result.sigma - 15.5918).abs() < 1e-3);
        assert!((ratio(&req, result.sigma) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn window_past_support_with_distant_mean_solves() {
        let req = FitRequest::new(10, 30, 0.0, 0, 15, 0.9).unwrap();
        let result = solve(&req).unwrap();
        assert!((result.sigma - 32.23823).abs() < 1e-4, "sigma={}", result.sigma);
        assert!((result.achieved_ratio - 0.9).abs() < 1e-6);
    }

    #[test]
    fn newton_ceiling_is_respected() {
        let req = FitRequest::new(10, 30, 20.0, 15, 25, 0.7).unwrap();
        let config = SolverConfig {
            step_tolerance: 0.0,
            ..SolverConfig::default()
        };
        let result = solve_with(&req, &config).unwrap();
        assert!(result.newton_iterations <= config.newton_iterations);
    }

    #[test]
    fn zero_ratio_tolerance_after_one_newton_step_is_not_converged() {
        let req = FitRequest::new(10, 30, 10.0, 10, 20, 0.6).unwrap();
        let config = SolverConfig {
            newton_iterations: 1,
            ratio_tolerance: 0.0,
            ..SolverConfig::default()
        };
        assert!(matches!(
            solve_with(&req, &config),
            Err(SolveError::NotConverged { .. })
        ));
    }

    #[test]
    fn invalid_config_is_rejected_before_solving() {
        let req = FitRequest::new(10, 30, 20.0, 15, 25, 0.7).unwrap();
        let config = SolverConfig {
            sigma_low: -1.0,
            ..SolverConfig::default()
        };
        assert!(matches!(solve_with(&req, &config), Err(SolveError::InvalidConfig(_))));
    }
}
