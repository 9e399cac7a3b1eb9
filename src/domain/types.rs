//! Shared domain types.
//!
//! These types are intentionally small and serializable so they can be:
//!
//! - built by the CLI (directly or via a preset)
//! - passed by reference through the solver
//! - exported to a JSON report and reloaded for plotting

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::solve::SolveError;

/// Lower endpoint of the sigma search interval.
pub const DEFAULT_SIGMA_LOW: f64 = 0.01;
/// Upper endpoint of the sigma search interval.
pub const DEFAULT_SIGMA_HIGH: f64 = 1_000_000.0;
pub const DEFAULT_BISECT_ITERATIONS: usize = 20;
pub const DEFAULT_NEWTON_ITERATIONS: usize = 50;
/// Newton refinement stops once `|Δσ| <= step_tolerance * σ`.
pub const DEFAULT_STEP_TOLERANCE: f64 = 1e-12;
/// A solved sigma must reproduce the target ratio within this bound.
pub const DEFAULT_RATIO_TOLERANCE: f64 = 1e-6;

/// Validation failures for a [`FitRequest`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    #[error("min ({min}) must not exceed max ({max})")]
    InvertedSupport { min: i64, max: i64 },

    #[error("from ({from}) must not exceed to ({to})")]
    InvertedWindow { from: i64, to: i64 },

    #[error("window [{from}, {to}] does not overlap the support [{min}, {max}]")]
    DisjointWindow { min: i64, max: i64, from: i64, to: i64 },

    #[error("mean value must be finite, got {0}")]
    NonFiniteMean(f64),

    #[error("ratio must lie strictly between 0% and 100%, got {:.2}%", .0 * 100.0)]
    TargetOutOfRange(f64),
}

/// One ratio-fitting problem.
///
/// Fields are private so every instance has passed [`FitRequest::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFitRequest")]
pub struct FitRequest {
    min: i64,
    max: i64,
    mean: f64,
    from: i64,
    to: i64,
    target_ratio: f64,
}

#[derive(Deserialize)]
struct RawFitRequest {
    min: i64,
    max: i64,
    mean: f64,
    from: i64,
    to: i64,
    target_ratio: f64,
}

impl TryFrom<RawFitRequest> for FitRequest {
    type Error = RequestError;

    fn try_from(raw: RawFitRequest) -> Result<Self, Self::Error> {
        FitRequest::new(raw.min, raw.max, raw.mean, raw.from, raw.to, raw.target_ratio)
    }
}

impl FitRequest {
    /// Build a request, checking every invariant.
    ///
    /// `target_ratio` is a fraction (`0.6`), not a percentage.
    pub fn new(
        min: i64,
        max: i64,
        mean: f64,
        from: i64,
        to: i64,
        target_ratio: f64,
    ) -> Result<Self, RequestError> {
        if min > max {
            return Err(RequestError::InvertedSupport { min, max });
        }
        if from > to {
            return Err(RequestError::InvertedWindow { from, to });
        }
        if to < min || from > max {
            return Err(RequestError::DisjointWindow { min, max, from, to });
        }
        if !mean.is_finite() {
            return Err(RequestError::NonFiniteMean(mean));
        }
        if !(target_ratio > 0.0 && target_ratio < 1.0) {
            return Err(RequestError::TargetOutOfRange(target_ratio));
        }
        Ok(Self {
            min,
            max,
            mean,
            from,
            to,
            target_ratio,
        })
    }

    /// Same as [`FitRequest::new`] with the ratio given in percent.
    pub fn from_percent(
        min: i64,
        max: i64,
        mean: f64,
        from: i64,
        to: i64,
        ratio_percent: f64,
    ) -> Result<Self, RequestError> {
        Self::new(min, max, mean, from, to, ratio_percent / 100.0)
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn from(&self) -> i64 {
        self.from
    }

    pub fn to(&self) -> i64 {
        self.to
    }

    pub fn target_ratio(&self) -> f64 {
        self.target_ratio
    }

    pub fn mean_x1000(&self) -> f64 {
        self.mean * 1000.0
    }
}

/// Output of a successful solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    /// Solved standard deviation.
    pub sigma: f64,
    /// Estimate handed from bisection to Newton refinement.
    pub initial_sigma: f64,
    /// `ratio(request, sigma)`.
    pub achieved_ratio: f64,
    /// Newton steps actually taken.
    pub newton_iterations: usize,
}

impl FitResult {
    pub fn sigma_x1000(&self) -> i64 {
        (self.sigma * 1000.0).round() as i64
    }
}

/// Numeric knobs of the two-phase solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    pub sigma_low: f64,
    pub sigma_high: f64,
    pub bisect_iterations: usize,
    pub newton_iterations: usize,
    pub step_tolerance: f64,
    pub ratio_tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            sigma_low: DEFAULT_SIGMA_LOW,
            sigma_high: DEFAULT_SIGMA_HIGH,
            bisect_iterations: DEFAULT_BISECT_ITERATIONS,
            newton_iterations: DEFAULT_NEWTON_ITERATIONS,
            step_tolerance: DEFAULT_STEP_TOLERANCE,
            ratio_tolerance: DEFAULT_RATIO_TOLERANCE,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> Result<(), SolveError> {
        let Self {
            sigma_low,
            sigma_high,
            newton_iterations,
            step_tolerance,
            ratio_tolerance,
            ..
        } = *self;

        if !(sigma_low.is_finite() && sigma_high.is_finite() && sigma_low > 0.0 && sigma_high > sigma_low) {
            return Err(SolveError::InvalidConfig(format!(
                "sigma interval must satisfy 0 < low < high, got [{sigma_low}, {sigma_high}]"
            )));
        }
        if newton_iterations == 0 {
            return Err(SolveError::InvalidConfig(
                "newton iterations must be at least 1".to_string(),
            ));
        }
        for (name, value) in [("step tolerance", step_tolerance), ("ratio tolerance", ratio_tolerance)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SolveError::InvalidConfig(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Named distribution shapes that derive a request from `[min, max]` alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum Preset {
    SuperLow,
    Low,
    Medium,
    High,
    SuperHigh,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::SuperLow,
        Preset::Low,
        Preset::Medium,
        Preset::High,
        Preset::SuperHigh,
    ];

    /// Machine name, as accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Preset::SuperLow => "super_low",
            Preset::Low => "low",
            Preset::Medium => "medium",
            Preset::High => "high",
            Preset::SuperHigh => "super_high",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Preset::SuperLow => "Super Low",
            Preset::Low => "Low",
            Preset::Medium => "Medium",
            Preset::High => "High",
            Preset::SuperHigh => "Super High",
        }
    }

    /// Comma-separated list of every valid name.
    pub fn all_names() -> String {
        Self::ALL.map(Preset::name).join(", ")
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown mode {given:?}: \"mode\" must be one of: {}", Preset::all_names())]
pub struct UnknownPreset {
    pub given: String,
}

impl FromStr for Preset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| UnknownPreset { given: s.to_string() })
    }
}
