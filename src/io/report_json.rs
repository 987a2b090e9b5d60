//! Write the analysis as a JSON document.
//!
//! The document carries run metadata next to the aggregates so it can be read
//! without the command line that produced it. Undefined statistics (`NaN`) are
//! written as `null`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::analysis::Analysis;
use crate::domain::AnalysisConfig;
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct ReportFile<'a> {
    pub tool: &'static str,
    pub source: String,
    pub date_format: &'a str,
    pub analysis: &'a Analysis,
}

impl<'a> ReportFile<'a> {
    pub fn new(config: &'a AnalysisConfig, analysis: &'a Analysis) -> Self {
        Self {
            tool: "sales",
            source: config.csv_path.display().to_string(),
            date_format: &config.date_format,
            analysis,
        }
    }
}

/// Write the report JSON file.
pub fn write_report_json(path: &Path, config: &AnalysisConfig, analysis: &Analysis) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create report JSON '{}': {e}", path.display())))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, &ReportFile::new(config, analysis))
        .map_err(|e| AppError::new(4, format!("Failed to write report JSON: {e}")))?;
    writer
        .flush()
        .map_err(|e| AppError::new(4, format!("Failed to write report JSON: {e}")))?;

    info!("Wrote report JSON to {}", path.display());
    Ok(())
}
