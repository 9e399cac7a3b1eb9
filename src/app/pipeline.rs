//! Shared "fit pipeline" logic used by every subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! request (explicit or preset) -> solve -> run record
//!
//! The command handlers can then focus on presentation.

use rayon::prelude::*;
use tracing::debug;

use crate::domain::{FitRequest, FitResult, Preset, SolverConfig};
use crate::error::AppError;
use crate::preset::{PresetDerivation, derive};

/// All computed outputs of a single solve.
#[derive(Debug, Clone)]
pub struct FitRun {
    pub request: FitRequest,
    pub derivation: Option<PresetDerivation>,
    pub result: FitResult,
    pub config: SolverConfig,
}

impl FitRun {
    pub fn preset(&self) -> Option<Preset> {
        self.derivation.as_ref().map(|d| d.preset)
    }
}

/// One row of the preset comparison table.
#[derive(Debug, Clone)]
pub struct PresetRow {
    pub derivation: PresetDerivation,
    pub outcome: Result<FitResult, AppError>,
}

/// Solve an explicit request.
pub fn run_fit(request: FitRequest, config: &SolverConfig) -> Result<FitRun, AppError> {
    debug!(?request, "solving request");
    let result = crate::solve::solve_with(&request, config)?;
    Ok(FitRun {
        request,
        derivation: None,
        result,
        config: *config,
    })
}

/// Solve the request a preset derivation describes.
pub fn run_derivation(derivation: PresetDerivation, config: &SolverConfig) -> Result<FitRun, AppError> {
    let request = derivation.to_request()?;
    let mut run = run_fit(request, config)?;
    run.derivation = Some(derivation);
    Ok(run)
}

/// Solve every preset for `[min, max]` in parallel, in [`Preset::ALL`] order.
///
/// A failing preset does not abort the others; its error is kept in the row.
pub fn run_presets(min: i64, max: i64, config: &SolverConfig) -> Vec<PresetRow> {
    Preset::ALL
        .par_iter()
        .map(|&preset| {
            let derivation = derive(preset, min, max);
            let outcome = derivation
                .to_request()
                .map_err(AppError::from)
                .and_then(|request| crate::solve::solve_with(&request, config).map_err(AppError::from));
            PresetRow { derivation, outcome }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EXIT_REQUEST, EXIT_SOLVE};

    #[test]
    fn preset_run_keeps_its_derivation() {
        let run = run_derivation(derive(Preset::Medium, 10, 30), &SolverConfig::default()).unwrap();
        assert_eq!(run.preset(), Some(Preset::Medium));
        assert_eq!((run.request.from(), run.request.to()), (15, 25));
        assert!((run.result.sigma - 5.936142).abs() < 1e-5);
    }

    #[test]
    fn presets_table_preserves_order_and_isolates_failures() {
        // A single-point support makes every window equal the support, so the
        // ratio is pinned at 1 and no preset is reachable.
        let rows = run_presets(7, 7, &SolverConfig::default());
        assert_eq!(rows.len(), Preset::ALL.len());
        for (row, preset) in rows.iter().zip(Preset::ALL) {
            assert_eq!(row.derivation.preset, preset);
            let err = row.outcome.as_ref().unwrap_err();
            assert_eq!(err.exit_code(), EXIT_SOLVE);
        }

        let rows = run_presets(10, 30, &SolverConfig::default());
        assert!(rows.iter().all(|r| r.outcome.is_ok()));
    }

    #[test]
    fn inverted_range_is_a_request_error() {
        let err = run_derivation(derive(Preset::Low, 30, 10), &SolverConfig::default()).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_REQUEST);
    }
}
