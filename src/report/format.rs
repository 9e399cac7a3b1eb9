//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the numeric code stays clean and testable
//! - output changes are localized

use crate::app::pipeline::{FitRun, PresetRow};
use crate::domain::FitRequest;
use crate::preset::PresetDerivation;
use crate::sample::SampleSummary;

const THIN_RULE: &str = "-----------------------------";
const THICK_RULE: &str = "==============================================";

/// Echo an explicit request.
pub fn format_request(req: &FitRequest) -> String {
    let mut out = String::new();
    out.push_str(&format!("min = {}\n", req.min()));
    out.push_str(&format!("max = {}\n", req.max()));
    out.push_str(&format!("mean_value = {}\n", req.mean()));
    out.push_str(&format!("from = {}\n", req.from()));
    out.push_str(&format!("to = {}\n", req.to()));
    out.push_str(&format!("ratio = {:.2}%\n", req.target_ratio() * 100.0));
    out
}

/// Echo a preset derivation with the formula behind every field.
pub fn format_derivation(d: &PresetDerivation) -> String {
    let mut out = String::new();
    out.push_str(&format!("min = {}\n", d.min));
    out.push_str(&format!("max = {}\n", d.max));
    out.push_str(&format!("mode = {}\n", d.preset.display_name()));
    out.push_str(THIN_RULE);
    out.push('\n');
    out.push_str(&format!("average = (min+max)/2 = {}\n", d.average));
    out.push_str(&format!("mean_value = {} = {}\n", d.mean_formula, d.mean));
    out.push_str(&format!("from = {} = {}\n", d.from_formula, d.from));
    out.push_str(&format!("to = {} = {}\n", d.to_formula, d.to));
    out.push_str(&format!("ratio = {:.2}%\n", d.ratio_percent));
    out.push_str(THIN_RULE);
    out.push('\n');
    out
}

/// Solved sigma plus the x1000 display values.
pub fn format_result(run: &FitRun) -> String {
    let result = &run.result;
    let mut out = String::new();
    out.push_str(&format!("Deviation Value = {}\n", result.sigma));
    out.push_str(&format!(
        "achieved ratio = {:.6}% (newton steps: {})\n",
        result.achieved_ratio * 100.0,
        result.newton_iterations
    ));
    out.push_str(THICK_RULE);
    out.push('\n');
    out.push_str(&format!("mean_value (x1000) = {}\n", run.request.mean_x1000()));
    out.push_str(&format!(
        "Deviation Value (x1000 & Rounded) = {}\n",
        result.sigma_x1000()
    ));
    out
}

/// One line per preset; failures are reported inline.
pub fn format_preset_table(min: i64, max: i64, rows: &[PresetRow]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Modes for min = {min}, max = {max}\n\n"));
    out.push_str(
        format!(
            "{:<12} {:>10} {:>8} {:>8} {:>8} {:>14} {:>10}\n",
            "mode", "mean", "from", "to", "ratio", "sigma", "sigma_x1000"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<12} {:-<10} {:-<8} {:-<8} {:-<8} {:-<14} {:-<10}\n",
            "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for row in rows {
        let d = &row.derivation;
        let head = format!(
            "{:<12} {:>10} {:>8} {:>8} {:>7.2}%",
            d.preset.name(),
            d.mean,
            d.from,
            d.to,
            d.ratio_percent
        );
        let tail = match &row.outcome {
            Ok(result) => format!(" {:>14.6} {:>10}", result.sigma, result.sigma_x1000()),
            Err(err) => format!(" {}", err.message()),
        };
        out.push_str(&head);
        out.push_str(&tail);
        out.push('\n');
    }
    out
}

/// Empirical sampling statistics against the requested target.
pub fn format_sample_summary(req: &FitRequest, summary: &SampleSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("draws = {} (seed {})\n", summary.draws, summary.seed));
    out.push_str(&format!(
        "in [{}, {}] = {} ({:.2}%, target {:.2}%)\n",
        req.from(),
        req.to(),
        summary.in_window,
        summary.empirical_ratio * 100.0,
        req.target_ratio() * 100.0
    ));
    out.push_str(&format!(
        "sample mean = {:.4} (mean_value {})\n",
        summary.mean,
        req.mean()
    ));
    out.push_str(&format!("sample std dev = {:.4}\n", summary.std_dev));
    out
}
