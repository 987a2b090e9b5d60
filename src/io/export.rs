//! Export the cleaned table to CSV.
//!
//! The export uses the source column names so the file can be fed back into the
//! loader (with `--date-format %m-%d-%Y`). `Date` is written as the `MM-DD-YYYY`
//! display label and `Holiday_Flag` as `0`/`1`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::info;

use crate::domain::{COLUMNS, SalesRecord};
use crate::error::AppError;

/// Write `records` as CSV to the file at `path`.
pub fn write_clean_csv(path: &Path, records: &[SalesRecord]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_clean_csv_to(file, records)
        .map_err(|e| AppError::new(4, format!("Failed to write export CSV '{}': {e}", path.display())))?;
    info!("Wrote {} cleaned rows to {}", records.len(), path.display());
    Ok(())
}

/// Write `records` as CSV to any writer.
pub fn write_clean_csv_to<W: Write>(writer: W, records: &[SalesRecord]) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(COLUMNS)?;

    for r in records {
        out.write_record([
            r.store.to_string(),
            r.date_label.clone(),
            format!("{:.2}", r.weekly_sales),
            if r.holiday_flag { "1" } else { "0" }.to_string(),
            r.temperature.to_string(),
            format!("{:.2}", r.fuel_price),
            format!("{:.3}", r.cpi),
            format!("{:.3}", r.unemployment),
        ])?;
    }

    out.flush()?;
    Ok(())
}
