//! Read/write fit report JSON files.
//!
//! A report is the portable representation of one solve:
//! - the request (re-validated on load)
//! - the solved sigma and its diagnostics
//! - solver settings and the preset, when one was used
//! - the normalized mass table for quick plotting

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::pipeline::FitRun;
use crate::domain::{FitRequest, FitResult, Preset, SolverConfig};
use crate::error::AppError;
use crate::model::mass_table;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitReport {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub mode: Option<Preset>,
    pub request: FitRequest,
    pub result: FitResult,
    pub mean_x1000: f64,
    pub sigma_x1000: i64,
    pub solver: SolverConfig,
    pub mass: Vec<(i64, f64)>,
}

impl FitReport {
    pub fn from_run(run: &FitRun, generated_at: DateTime<Utc>) -> Self {
        Self {
            tool: "sigma".to_string(),
            generated_at,
            mode: run.preset(),
            request: run.request,
            result: run.result,
            mean_x1000: run.request.mean_x1000(),
            sigma_x1000: run.result.sigma_x1000(),
            solver: run.config,
            mass: mass_table(&run.request, run.result.sigma),
        }
    }
}

/// Write a report JSON file stamped with the current time.
pub fn write_report_json(path: &Path, run: &FitRun) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::config(format!("Failed to create report JSON '{}': {e}", path.display())))?;

    let report = FitReport::from_run(run, Utc::now());
    serde_json::to_writer_pretty(file, &report)
        .map_err(|e| AppError::config(format!("Failed to write report JSON: {e}")))?;

    Ok(())
}

/// Read a report JSON file.
pub fn read_report_json(path: &Path) -> Result<FitReport, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::config(format!("Failed to open report JSON '{}': {e}", path.display())))?;
    let report: FitReport =
        serde_json::from_reader(file).map_err(|e| AppError::config(format!("Invalid report JSON: {e}")))?;
    Ok(report)
}
