//! Synthetic weekly sales generation.
//!
//! Produces a dataset in the input CSV format so the full pipeline can run
//! without the real file. Output is a deterministic function of the
//! [`SampleConfig`]: the same seed always yields the same rows.
//!
//! Shape of the data:
//! - each store gets a base sales level, CPI level, unemployment level and climate
//! - fuel price is one random walk shared by all stores, plus a small store offset
//! - holiday weeks come from the default holiday calendar and lift sales
//!   (Thanksgiving most, the Christmas week slightly below normal)
//! - CPI drifts up and unemployment drifts down over time

use std::f64::consts::TAU;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{Datelike, Duration, NaiveDate};
use log::info;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::analysis::HolidayCalendar;
use crate::clean::is_valid_date_format;
use crate::domain::{COLUMNS, RawRecord, SampleConfig};
use crate::error::AppError;

const FUEL_START: f64 = 2.57;
const FUEL_WEEKLY_SD: f64 = 0.03;
const FUEL_RANGE: (f64, f64) = (2.40, 4.50);

const SALES_NOISE_SD: f64 = 0.06;
const MIN_SALES: f64 = 100_000.0;

/// CPI grows ~2% a year.
const CPI_WEEKLY_GROWTH: f64 = 0.02 / 52.0;
const UNEMPLOYMENT_WEEKLY_DRIFT: f64 = 0.01;
const MIN_UNEMPLOYMENT: f64 = 2.5;

/// Generate the rows described by `config`, ordered by store then week.
pub fn generate_sample(config: &SampleConfig) -> Result<Vec<RawRecord>, AppError> {
    if config.stores == 0 {
        return Err(AppError::new(2, "Sample store count must be > 0."));
    }
    if config.weeks == 0 {
        return Err(AppError::new(2, "Sample week count must be > 0."));
    }
    validate_date_format(&config.date_format)?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let noise = Normal::new(0.0, 1.0).map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;
    let calendar = HolidayCalendar::default();

    let dates = (0..config.weeks)
        .map(|w| {
            config
                .start_date
                .checked_add_signed(Duration::weeks(i64::from(w)))
                .ok_or_else(|| AppError::new(2, "Sample dates run past the supported calendar range."))
        })
        .collect::<Result<Vec<NaiveDate>, AppError>>()?;

    let mut fuel_path = Vec::with_capacity(dates.len());
    let mut fuel = FUEL_START;
    for _ in &dates {
        fuel_path.push(fuel);
        fuel = (fuel + FUEL_WEEKLY_SD * noise.sample(&mut rng)).clamp(FUEL_RANGE.0, FUEL_RANGE.1);
    }

    let mut rows = Vec::with_capacity(dates.len() * config.stores as usize);
    for store in 1..=config.stores {
        let base_sales: f64 = rng.gen_range(250_000.0..2_500_000.0);
        let base_cpi: f64 = rng.gen_range(126.0..225.0);
        let base_unemployment: f64 = rng.gen_range(4.0..14.0);
        let climate: f64 = rng.gen_range(-15.0..15.0);
        let fuel_offset: f64 = rng.gen_range(-0.15..0.15);

        for (week, (&date, &fuel)) in dates.iter().zip(&fuel_path).enumerate() {
            let t = week as f64;
            let holiday = calendar.name_for(date);

            let sales = base_sales * seasonal_lift(date, holiday) * (1.0 + SALES_NOISE_SD * noise.sample(&mut rng));
            let temperature = 60.0 + climate - 25.0 * (TAU * (f64::from(date.ordinal()) + 10.0) / 365.25).cos()
                + 3.0 * noise.sample(&mut rng);
            let cpi = base_cpi * (1.0 + CPI_WEEKLY_GROWTH * t) + 0.05 * noise.sample(&mut rng);
            let unemployment = (base_unemployment - UNEMPLOYMENT_WEEKLY_DRIFT * t + 0.05 * noise.sample(&mut rng))
                .max(MIN_UNEMPLOYMENT);

            rows.push(RawRecord {
                row: rows.len(),
                store: Some(store),
                date: Some(date.format(&config.date_format).to_string()),
                weekly_sales: Some(sales.max(MIN_SALES)),
                holiday_flag: Some(holiday.is_some()),
                temperature: Some(temperature),
                fuel_price: Some(fuel + fuel_offset),
                cpi: Some(cpi),
                unemployment: Some(unemployment),
            });
        }
    }

    Ok(rows)
}

/// Generate and write a sample file. Returns the number of rows written.
pub fn write_sample(config: &SampleConfig) -> Result<usize, AppError> {
    let rows = generate_sample(config)?;
    write_sample_csv(&config.output, &rows)?;
    info!(
        "Wrote {} sample rows ({} stores x {} weeks, seed {}) to {}",
        rows.len(),
        config.stores,
        config.weeks,
        config.seed,
        config.output.display()
    );
    Ok(rows.len())
}

pub fn write_sample_csv(path: &Path, rows: &[RawRecord]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create sample CSV '{}': {e}", path.display())))?;
    write_sample_csv_to(file, rows)
        .map_err(|e| AppError::new(4, format!("Failed to write sample CSV '{}': {e}", path.display())))
}

/// Write raw rows in the source layout. Missing values become empty cells.
pub fn write_sample_csv_to<W: Write>(writer: W, rows: &[RawRecord]) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(COLUMNS)?;

    for r in rows {
        out.write_record([
            r.store.map(|s| s.to_string()).unwrap_or_default(),
            r.date.clone().unwrap_or_default(),
            fmt_opt(r.weekly_sales, 2),
            r.holiday_flag.map(|h| if h { "1" } else { "0" }.to_string()).unwrap_or_default(),
            fmt_opt(r.temperature, 2),
            fmt_opt(r.fuel_price, 3),
            fmt_opt(r.cpi, 7),
            fmt_opt(r.unemployment, 3),
        ])?;
    }

    out.flush()?;
    Ok(())
}

fn seasonal_lift(date: NaiveDate, holiday: Option<&str>) -> f64 {
    match holiday {
        Some("Thanksgiving") => 1.30,
        Some("Super Bowl") => 1.05,
        Some("Labor Day") => 1.03,
        Some("Christmas") => 0.95,
        Some(_) => 1.0,
        // Pre-Christmas shopping weeks.
        None if date.month() == 12 && date.day() <= 24 => 1.20,
        None => 1.0,
    }
}

fn validate_date_format(format: &str) -> Result<(), AppError> {
    if !is_valid_date_format(format) {
        return Err(AppError::new(2, format!("Invalid sample date format '{format}'.")));
    }
    Ok(())
}

fn fmt_opt(v: Option<f64>, decimals: usize) -> String {
    v.map(|x| format!("{x:.decimals$}")).unwrap_or_default()
}
