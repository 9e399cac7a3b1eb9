//! Command-line parsing for the sigma fitter.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! numeric code: everything here converts flags into a `FitRequest` and a
//! `SolverConfig`, nothing more.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{FitRequest, Preset, RequestError, SolverConfig};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "sigma",
    version,
    about = "Fit the standard deviation of a discretized Gaussian to a target in-range ratio"
)]
pub struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Solve sigma for an explicit min/max/mean/from/to/ratio request.
    Calculate(CalculateArgs),
    /// Derive mean/from/to/ratio from min/max with a named mode, then solve.
    Select(SelectArgs),
    /// Solve every mode for one range and print a comparison table.
    Presets(PresetsArgs),
    /// Solve, then draw seeded samples from the fitted distribution.
    Sample(SampleArgs),
    /// Re-render the mass chart of a saved JSON report.
    Plot(PlotArgs),
}

/// Explicit request flags.
#[derive(Debug, Args, Clone)]
pub struct RequestArgs {
    /// Minimum value of the support.
    #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
    pub min: i64,

    /// Maximum value of the support.
    #[arg(long, default_value_t = 30, allow_negative_numbers = true)]
    pub max: i64,

    /// Mean value of the Gaussian.
    #[arg(long, visible_alias = "mean-value", default_value_t = 10.0, allow_negative_numbers = true)]
    pub mean: f64,

    /// Lower bound of the measured window.
    #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
    pub from: i64,

    /// Upper bound of the measured window.
    #[arg(long, default_value_t = 20, allow_negative_numbers = true)]
    pub to: i64,

    /// Target share of the mass between `from` and `to`, in percent.
    #[arg(long, default_value_t = 60.0)]
    pub ratio: f64,
}

impl RequestArgs {
    pub fn to_request(&self) -> Result<FitRequest, RequestError> {
        FitRequest::from_percent(self.min, self.max, self.mean, self.from, self.to, self.ratio)
    }
}

/// Support bounds for mode-driven commands.
#[derive(Debug, Args, Clone, Copy)]
pub struct RangeArgs {
    /// Minimum value of the support.
    #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
    pub min: i64,

    /// Maximum value of the support.
    #[arg(long, default_value_t = 30, allow_negative_numbers = true)]
    pub max: i64,
}

/// Optional solver overrides (take precedence over `SIGMA_FIT_*` variables).
#[derive(Debug, Args, Clone, Default)]
pub struct SolverArgs {
    /// Lower sigma bound of the bisection bracket.
    #[arg(long)]
    pub sigma_low: Option<f64>,

    /// Upper sigma bound of the bisection bracket.
    #[arg(long)]
    pub sigma_high: Option<f64>,

    /// Number of log-space bisection steps.
    #[arg(long)]
    pub bisect_iterations: Option<usize>,

    /// Maximum number of Newton steps.
    #[arg(long)]
    pub newton_iterations: Option<usize>,

    /// Accepted |ratio(sigma) - target| for the final answer.
    #[arg(long)]
    pub ratio_tolerance: Option<f64>,
}

impl SolverArgs {
    pub fn apply(&self, mut config: SolverConfig) -> SolverConfig {
        if let Some(v) = self.sigma_low {
            config.sigma_low = v;
        }
        if let Some(v) = self.sigma_high {
            config.sigma_high = v;
        }
        if let Some(v) = self.bisect_iterations {
            config.bisect_iterations = v;
        }
        if let Some(v) = self.newton_iterations {
            config.newton_iterations = v;
        }
        if let Some(v) = self.ratio_tolerance {
            config.ratio_tolerance = v;
        }
        config
    }
}

/// Presentation and export options.
#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    /// Render an ASCII chart of the fitted mass.
    #[arg(long)]
    pub plot: bool,

    /// Maximum chart rows (neighbouring integers are bucketed beyond this).
    #[arg(long, default_value_t = 40)]
    pub height: usize,

    /// Bar width (columns) of the tallest row.
    #[arg(long, default_value_t = 50)]
    pub width: usize,

    /// Write a JSON fit report.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct CalculateArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    #[command(flatten)]
    pub solver: SolverArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args, Clone)]
pub struct SelectArgs {
    #[command(flatten)]
    pub range: RangeArgs,

    /// Mode of the distribution.
    #[arg(long, value_enum)]
    pub mode: Preset,

    #[command(flatten)]
    pub solver: SolverArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args, Clone)]
pub struct PresetsArgs {
    #[command(flatten)]
    pub range: RangeArgs,

    #[command(flatten)]
    pub solver: SolverArgs,
}

#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    /// Derive mean/from/to/ratio from min/max with this mode instead.
    #[arg(long, value_enum)]
    pub mode: Option<Preset>,

    /// Number of draws.
    #[arg(short = 'n', long, default_value_t = 10_000)]
    pub count: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    #[command(flatten)]
    pub solver: SolverArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Options for plotting a saved report.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Report JSON produced by `--export`.
    #[arg(long, value_name = "JSON")]
    pub report: PathBuf,

    /// Maximum chart rows.
    #[arg(long, default_value_t = 40)]
    pub height: usize,

    /// Bar width (columns) of the tallest row.
    #[arg(long, default_value_t = 50)]
    pub width: usize,
}
