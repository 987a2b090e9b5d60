//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during cleaning and aggregation
//! - exported to JSON/CSV
//! - served by the dashboard API

use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Source column names, in file order.
pub const COLUMNS: [&str; 8] = [
    "Store",
    "Date",
    "Weekly_Sales",
    "Holiday_Flag",
    "Temperature",
    "Fuel_Price",
    "CPI",
    "Unemployment",
];

/// Date format of the `Date` column in the source file.
pub const DEFAULT_SOURCE_DATE_FORMAT: &str = "%m/%d/%Y";

/// Fixed-width display format for cleaned dates.
pub const DISPLAY_DATE_FORMAT: &str = "%m-%d-%Y";

/// A row as read from the CSV, before cleaning.
///
/// Every field is optional: an empty cell, a `NaN` or a short row is a
/// *missing* value, which the cleaner reports; it is not a load error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    /// Zero-based data row index in the source file (header excluded).
    pub row: usize,
    pub store: Option<u32>,
    /// Date text exactly as it appears in the file (trimmed).
    pub date: Option<String>,
    pub weekly_sales: Option<f64>,
    pub holiday_flag: Option<bool>,
    pub temperature: Option<f64>,
    pub fuel_price: Option<f64>,
    pub cpi: Option<f64>,
    pub unemployment: Option<f64>,
}

/// One cleaned row per (store, week).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub store: u32,
    /// Chronological value used for sorting and grouping.
    pub date: NaiveDate,
    /// `MM-DD-YYYY` rendering of `date`, for display only.
    pub date_label: String,
    pub weekly_sales: f64,
    pub holiday_flag: bool,
    pub temperature: i32,
    pub fuel_price: f64,
    pub cpi: f64,
    pub unemployment: f64,
}

/// Which weeks the CPI scatter looks at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CpiFilter {
    #[default]
    All,
    Holiday,
    #[serde(alias = "non_holiday")]
    #[value(alias = "non_holiday")]
    NonHoliday,
}

impl CpiFilter {
    pub const ALL: [CpiFilter; 3] = [CpiFilter::All, CpiFilter::Holiday, CpiFilter::NonHoliday];

    pub fn matches(self, record: &SalesRecord) -> bool {
        match self {
            CpiFilter::All => true,
            CpiFilter::Holiday => record.holiday_flag,
            CpiFilter::NonHoliday => !record.holiday_flag,
        }
    }

    /// Query-string value (`all`, `holiday`, `non-holiday`).
    pub fn as_str(self) -> &'static str {
        match self {
            CpiFilter::All => "all",
            CpiFilter::Holiday => "holiday",
            CpiFilter::NonHoliday => "non-holiday",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            CpiFilter::All => "All Weeks",
            CpiFilter::Holiday => "Holiday Weeks",
            CpiFilter::NonHoliday => "Non-Holiday Weeks",
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags, `.env` values and defaults.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub csv_path: PathBuf,
    /// chrono format string for the source `Date` column.
    pub date_format: String,

    pub top_n: usize,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_clean: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

impl AnalysisConfig {
    pub fn new(csv_path: impl Into<PathBuf>) -> Self {
        Self {
            csv_path: csv_path.into(),
            date_format: DEFAULT_SOURCE_DATE_FORMAT.to_string(),
            top_n: 10,
            plot: true,
            plot_width: 100,
            plot_height: 20,
            export_clean: None,
            export_json: None,
        }
    }
}

/// Dashboard settings.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub analysis: AnalysisConfig,
    pub addr: SocketAddr,
}

/// Synthetic dataset settings.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub output: PathBuf,
    pub stores: u32,
    pub weeks: u32,
    pub seed: u64,
    pub start_date: NaiveDate,
    pub date_format: String,
}
