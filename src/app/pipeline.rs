//! Shared "load, clean, analyze" logic used by the report, clean and serve
//! commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! CSV load -> cleaning -> aggregation
//!
//! The front-ends then only differ in presentation (printing vs HTTP).

use log::info;

use crate::analysis::{Analysis, HolidayCalendar};
use crate::clean::{CleanTable, clean_records, is_valid_date_format};
use crate::domain::AnalysisConfig;
use crate::error::AppError;
use crate::io::ingest::load_raw_records;

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub table: CleanTable,
    pub analysis: Analysis,
}

/// Load and clean the configured CSV.
pub fn load_table(config: &AnalysisConfig) -> Result<CleanTable, AppError> {
    if !is_valid_date_format(&config.date_format) {
        return Err(AppError::new(
            2,
            format!("Invalid date format '{}' (expected a chrono format such as %m/%d/%Y).", config.date_format),
        ));
    }
    let raw = load_raw_records(&config.csv_path)?;
    let table = clean_records(raw, &config.date_format)?;
    info!("Cleaned table: {} rows, {} stores", table.len(), table.stores().len());
    Ok(table)
}

/// Execute the full pipeline and return the computed outputs.
pub fn run_analysis(config: &AnalysisConfig) -> Result<RunOutput, AppError> {
    let table = load_table(config)?;
    let analysis = Analysis::compute(table.records(), &HolidayCalendar::default());
    Ok(RunOutput { table, analysis })
}
