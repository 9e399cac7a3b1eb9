//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - installs logging
//! - resolves solver configuration (defaults < environment < flags)
//! - runs the fit pipeline
//! - prints reports/plots and writes optional exports

use clap::Parser;
use tracing::info;

use crate::cli::{CalculateArgs, Cli, Command, OutputArgs, PlotArgs, PresetsArgs, SampleArgs, SelectArgs, SolverArgs};
use crate::domain::SolverConfig;
use crate::error::AppError;
use crate::model::mass_table;

pub mod pipeline;

use pipeline::FitRun;

/// Entry point for the `sigma` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Calculate(args) => handle_calculate(args),
        Command::Select(args) => handle_select(args),
        Command::Presets(args) => handle_presets(args),
        Command::Sample(args) => handle_sample(args),
        Command::Plot(args) => handle_plot(args),
    }
}

fn handle_calculate(args: CalculateArgs) -> Result<(), AppError> {
    let config = solver_config(&args.solver)?;
    let request = args.request.to_request()?;
    println!("{}", crate::report::format_request(&request));

    let run = pipeline::run_fit(request, &config)?;
    println!("{}", crate::report::format_result(&run));
    emit_outputs(&run, &args.output)
}

fn handle_select(args: SelectArgs) -> Result<(), AppError> {
    let config = solver_config(&args.solver)?;
    let derivation = crate::preset::derive(args.mode, args.range.min, args.range.max);
    println!("{}", crate::report::format_derivation(&derivation));

    let run = pipeline::run_derivation(derivation, &config)?;
    println!("{}", crate::report::format_result(&run));
    emit_outputs(&run, &args.output)
}

fn handle_presets(args: PresetsArgs) -> Result<(), AppError> {
    let config = solver_config(&args.solver)?;
    let rows = pipeline::run_presets(args.range.min, args.range.max, &config);
    println!(
        "{}",
        crate::report::format_preset_table(args.range.min, args.range.max, &rows)
    );
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = solver_config(&args.solver)?;
    let run = match args.mode {
        Some(mode) => {
            let derivation = crate::preset::derive(mode, args.request.min, args.request.max);
            println!("{}", crate::report::format_derivation(&derivation));
            pipeline::run_derivation(derivation, &config)?
        }
        None => {
            let request = args.request.to_request()?;
            println!("{}", crate::report::format_request(&request));
            pipeline::run_fit(request, &config)?
        }
    };
    println!("{}", crate::report::format_result(&run));

    let summary = crate::sample::draw(&run.request, run.result.sigma, args.count, args.seed)?;
    println!("{}", crate::report::format_sample_summary(&run.request, &summary));

    if args.output.plot {
        print_chart(&run, &summary.frequencies, &args.output);
    }
    export_report(&run, &args.output)
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let report = crate::io::read_report_json(&args.report)?;
    let window = (report.request.from(), report.request.to());
    let chart = crate::plot::render_mass_chart(&report.mass, window, args.width, args.height);
    println!("{}", crate::report::format_request(&report.request));
    println!("Deviation Value = {}\n", report.result.sigma);
    println!("{chart}");
    Ok(())
}

fn emit_outputs(run: &FitRun, output: &OutputArgs) -> Result<(), AppError> {
    if output.plot {
        print_chart(run, &mass_table(&run.request, run.result.sigma), output);
    }
    export_report(run, output)
}

fn print_chart(run: &FitRun, points: &[(i64, f64)], output: &OutputArgs) {
    let window = (run.request.from(), run.request.to());
    let chart = crate::plot::render_mass_chart(points, window, output.width, output.height);
    println!("{chart}");
}

fn export_report(run: &FitRun, output: &OutputArgs) -> Result<(), AppError> {
    if let Some(path) = &output.export {
        crate::io::write_report_json(path, run)?;
        info!(path = %path.display(), "report written");
    }
    Ok(())
}

/// Resolve solver settings: defaults, then `SIGMA_FIT_*`, then CLI flags.
pub fn solver_config(args: &SolverArgs) -> Result<SolverConfig, AppError> {
    let config = args.apply(crate::config::solver_config_from_env()?);
    config.validate()?;
    Ok(config)
}
