//! Command-line parsing for the weekly sales pipeline.
//!
//! Parsing stays here; dispatch lives in [`crate::app`]. Flags that name the
//! input or the date format can also come from the environment (a `.env` file
//! is loaded before parsing).

use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::DEFAULT_SOURCE_DATE_FORMAT;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sales", version, about = "Weekly retail sales cleaning, analysis and dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load, clean and analyze the CSV, then print the report (the default).
    Report(ReportArgs),
    /// Write the cleaned table to CSV without printing the report.
    Clean(CleanArgs),
    /// Serve the interactive dashboard over HTTP.
    Serve(ServeArgs),
    /// Generate a synthetic dataset in the source CSV layout.
    Sample(SampleArgs),
}

/// Where the data comes from.
#[derive(Debug, Args, Clone)]
pub struct InputArgs {
    /// Weekly sales CSV.
    #[arg(short, long, env = "SALES_CSV", default_value = "Walmart_Sales.csv")]
    pub input: PathBuf,

    /// chrono format of the `Date` column.
    #[arg(long, env = "SALES_DATE_FORMAT", default_value = DEFAULT_SOURCE_DATE_FORMAT)]
    pub date_format: String,
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Show the top-N holiday weeks.
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Also write the cleaned table to CSV.
    #[arg(long, value_name = "CSV")]
    pub export_clean: Option<PathBuf>,

    /// Write all computed results to JSON.
    #[arg(long, value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct CleanArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Destination for the cleaned CSV.
    #[arg(short, long, default_value = "sales_clean.csv")]
    pub output: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Address to listen on.
    #[arg(long, env = "SALES_DASHBOARD_ADDR", default_value = "127.0.0.1:8050")]
    pub addr: SocketAddr,
}

#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// Destination CSV.
    #[arg(short, long, default_value = "sample_sales.csv")]
    pub output: PathBuf,

    /// Number of stores.
    #[arg(long, default_value_t = 45)]
    pub stores: u32,

    /// Number of consecutive weeks per store.
    #[arg(long, default_value_t = 143)]
    pub weeks: u32,

    /// Random seed; the same seed always writes the same file.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// First week (YYYY-MM-DD).
    #[arg(long, default_value = "2010-02-05")]
    pub start_date: NaiveDate,

    /// chrono format used to write the `Date` column.
    #[arg(long, default_value = DEFAULT_SOURCE_DATE_FORMAT)]
    pub date_format: String,
}
