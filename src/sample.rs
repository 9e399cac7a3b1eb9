//! Seeded draws from a fitted discrete distribution.
//!
//! This is the downstream use of a solved sigma: generate integers in
//! `[min, max]` with probability proportional to the discretized Gaussian and
//! check how many land in the window.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, WeightedAliasIndex};
use tracing::debug;

use crate::domain::FitRequest;
use crate::error::AppError;
use crate::model::mass_table;

/// Empirical statistics of a batch of draws.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSummary {
    pub draws: usize,
    pub seed: u64,
    /// Draws inside `[from, to]`.
    pub in_window: usize,
    pub empirical_ratio: f64,
    pub mean: f64,
    pub std_dev: f64,
    /// Observed frequency per support point, in support order.
    pub frequencies: Vec<(i64, f64)>,
}

/// Draw `count` integers from the distribution fitted by `sigma`.
pub fn draw(req: &FitRequest, sigma: f64, count: usize, seed: u64) -> Result<SampleSummary, AppError> {
    if count == 0 {
        return Err(AppError::config("Sample count must be >= 1."));
    }

    let table = mass_table(req, sigma);
    let weights: Vec<f64> = table.iter().map(|&(_, p)| p).collect();
    let alias = WeightedAliasIndex::new(weights)
        .map_err(|e| AppError::config(format!("Cannot sample from fitted distribution: {e}")))?;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut counts = vec![0_usize; table.len()];
    for _ in 0..count {
        counts[alias.sample(&mut rng)] += 1;
    }

    let n = count as f64;
    let mut in_window = 0;
    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    for (&(x, _), &c) in table.iter().zip(&counts) {
        if (req.from()..=req.to()).contains(&x) {
            in_window += c;
        }
        let xf = x as f64;
        sum += xf * c as f64;
        sum_sq += xf * xf * c as f64;
    }
    let mean = sum / n;
    let variance = (sum_sq / n - mean * mean).max(0.0);

    let frequencies = table
        .iter()
        .zip(&counts)
        .map(|(&(x, _), &c)| (x, c as f64 / n))
        .collect();

    debug!(count, seed, in_window, "sampling finished");
    Ok(SampleSummary {
        draws: count,
        seed,
        in_window,
        empirical_ratio: in_window as f64 / n,
        mean,
        std_dev: variance.sqrt(),
        frequencies,
    })
}
