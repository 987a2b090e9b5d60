//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - runs the load/clean/analyze pipeline
//! - prints reports and the terminal plot
//! - writes optional exports, generates samples or starts the dashboard

use clap::Parser;

use crate::cli::{CleanArgs, Command, InputArgs, ReportArgs, SampleArgs, ServeArgs};
use crate::dashboard::DashboardState;
use crate::domain::{AnalysisConfig, SampleConfig, ServeConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `sales` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is fine; a malformed one is worth a warning.
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            log::warn!("Ignoring .env: {e}");
        }
    }

    // `sales` and `sales --input x.csv` behave like `sales report ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Report(args) => handle_report(&report_config_from_args(&args)),
        Command::Clean(args) => handle_clean(&args),
        Command::Serve(args) => handle_serve(&serve_config_from_args(&args)),
        Command::Sample(args) => handle_sample(&sample_config_from_args(&args)),
    }
}

fn handle_report(config: &AnalysisConfig) -> Result<(), AppError> {
    let run = pipeline::run_analysis(config)?;

    println!("{}", crate::report::format_report(config, &run.analysis));

    if config.plot {
        let plot = crate::plot::render_fuel_sales_plot(&run.analysis.fuel_series, config.plot_width, config.plot_height);
        println!("{plot}");
    }

    write_exports(config, &run)
}

/// Optional exports; each writer logs its own destination.
fn write_exports(config: &AnalysisConfig, run: &pipeline::RunOutput) -> Result<(), AppError> {
    if let Some(path) = &config.export_clean {
        crate::io::export::write_clean_csv(path, run.table.records())?;
    }
    if let Some(path) = &config.export_json {
        crate::io::report_json::write_report_json(path, config, &run.analysis)?;
    }
    Ok(())
}

fn handle_clean(args: &CleanArgs) -> Result<(), AppError> {
    let config = analysis_config_from_input(&args.input);
    let table = pipeline::load_table(&config)?;
    crate::io::export::write_clean_csv(&args.output, table.records())?;
    println!("Wrote {} cleaned rows to {}", table.len(), args.output.display());
    Ok(())
}

fn handle_serve(config: &ServeConfig) -> Result<(), AppError> {
    let run = pipeline::run_analysis(&config.analysis)?;
    let source = config.analysis.csv_path.display().to_string();
    let state = DashboardState::new(source, run.table, run.analysis);
    crate::dashboard::run(config.addr, state)
}

fn handle_sample(config: &SampleConfig) -> Result<(), AppError> {
    let rows = crate::data::write_sample(config)?;
    println!("Wrote {rows} sample rows to {}", config.output.display());
    Ok(())
}

fn analysis_config_from_input(input: &InputArgs) -> AnalysisConfig {
    let mut config = AnalysisConfig::new(&input.input);
    config.date_format = input.date_format.clone();
    config
}

pub fn report_config_from_args(args: &ReportArgs) -> AnalysisConfig {
    AnalysisConfig {
        top_n: args.top,
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_clean: args.export_clean.clone(),
        export_json: args.export_json.clone(),
        ..analysis_config_from_input(&args.input)
    }
}

pub fn serve_config_from_args(args: &ServeArgs) -> ServeConfig {
    ServeConfig {
        analysis: analysis_config_from_input(&args.input),
        addr: args.addr,
    }
}

pub fn sample_config_from_args(args: &SampleArgs) -> SampleConfig {
    SampleConfig {
        output: args.output.clone(),
        stores: args.stores,
        weeks: args.weeks,
        seed: args.seed,
        start_date: args.start_date,
        date_format: args.date_format.clone(),
    }
}

/// Rewrite argv so `sales` defaults to `sales report`.
///
/// Rules:
/// - `sales`                      -> `sales report`
/// - `sales --input x.csv ...`    -> `sales report --input x.csv ...`
/// - `sales --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("report".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    if matches!(arg1.as_str(), "report" | "clean" | "serve" | "sample") {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "report".to_string());
    }

    argv
}
