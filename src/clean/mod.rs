//! Cleaning pass: raw rows in, a fully valid, ordered table out.
//!
//! Steps, in order:
//!
//! 1. parse each `Date` with the configured source format (first failure wins)
//! 2. stable-sort by `(store, date)`
//! 3. round numeric fields (see [`rounding`])
//! 4. render the `MM-DD-YYYY` display date
//! 5. verify that no field is missing, reporting every offending row
//!
//! The pass is a pure function of its input; the resulting [`CleanTable`] is
//! read-only.

pub mod rounding;

use chrono::NaiveDate;
use chrono::format::{Item, StrftimeItems};
use log::{debug, info};

use crate::domain::{DISPLAY_DATE_FORMAT, RawRecord, SalesRecord};
use crate::error::{MissingRow, PipelineError};
use rounding::{INDEX_DP, MONEY_DP, round_half_even, round_to_int};

/// The cleaned, immutable table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanTable {
    records: Vec<SalesRecord>,
}

impl CleanTable {
    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct store ids, ascending.
    pub fn stores(&self) -> Vec<u32> {
        let mut stores: Vec<u32> = self.records.iter().map(|r| r.store).collect();
        stores.dedup();
        stores
    }
}

/// A raw row with its parsed date, between steps 1 and 5.
struct Staged {
    raw: RawRecord,
    date: Option<NaiveDate>,
}

/// Run the full cleaning pass.
pub fn clean_records(raw: Vec<RawRecord>, date_format: &str) -> Result<CleanTable, PipelineError> {
    let total = raw.len();

    // 1) Parse dates.
    let mut staged = Vec::with_capacity(total);
    for record in raw {
        let date = match record.date.as_deref() {
            Some(text) => Some(parse_source_date(record.row, text, date_format)?),
            None => None,
        };
        staged.push(Staged { raw: record, date });
    }

    // 2) Stable sort. Rows missing a key sort first and are rejected in step 5.
    staged.sort_by_key(|s| (s.raw.store, s.date));

    // 3-5) Round, label, verify.
    let mut records = Vec::with_capacity(total);
    let mut missing = Vec::new();
    for s in staged {
        match finish_record(&s) {
            Ok(record) => records.push(record),
            Err(fields) => missing.push(MissingRow {
                row: s.raw.row,
                fields,
            }),
        }
    }

    if !missing.is_empty() {
        // Report in source order regardless of where the sort put them.
        missing.sort_by_key(|m| m.row);
        return Err(PipelineError::IncompleteData { rows: missing });
    }

    info!("Cleaned {} rows", records.len());
    debug!(
        "Date range {} .. {}",
        records.iter().map(|r| r.date).min().map(|d| d.to_string()).unwrap_or_default(),
        records.iter().map(|r| r.date).max().map(|d| d.to_string()).unwrap_or_default(),
    );

    Ok(CleanTable { records })
}

/// Parse a source date cell with the given chrono format.
pub fn parse_source_date(row: usize, text: &str, format: &str) -> Result<NaiveDate, PipelineError> {
    NaiveDate::parse_from_str(text, format).map_err(|_| PipelineError::DateParse {
        row,
        value: text.to_string(),
        format: format.to_string(),
    })
}

/// Whether `format` is a usable chrono format string (`%Q` or a trailing `%` is not).
pub fn is_valid_date_format(format: &str) -> bool {
    !format.is_empty() && !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// Render a date for display (`MM-DD-YYYY`).
pub fn display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

fn finish_record(s: &Staged) -> Result<SalesRecord, Vec<&'static str>> {
    let raw = &s.raw;

    let mut missing = Vec::new();
    let mut check = |present: bool, name: &'static str| {
        if !present {
            missing.push(name);
        }
    };
    check(raw.store.is_some(), "Store");
    check(s.date.is_some(), "Date");
    check(raw.weekly_sales.is_some(), "Weekly_Sales");
    check(raw.holiday_flag.is_some(), "Holiday_Flag");
    check(raw.temperature.is_some(), "Temperature");
    check(raw.fuel_price.is_some(), "Fuel_Price");
    check(raw.cpi.is_some(), "CPI");
    check(raw.unemployment.is_some(), "Unemployment");

    let (
        Some(store),
        Some(date),
        Some(weekly_sales),
        Some(holiday_flag),
        Some(temperature),
        Some(fuel_price),
        Some(cpi),
        Some(unemployment),
    ) = (
        raw.store,
        s.date,
        raw.weekly_sales,
        raw.holiday_flag,
        raw.temperature,
        raw.fuel_price,
        raw.cpi,
        raw.unemployment,
    )
    else {
        return Err(missing);
    };

    Ok(SalesRecord {
        store,
        date,
        date_label: display_date(date),
        weekly_sales: round_half_even(weekly_sales, MONEY_DP),
        holiday_flag,
        temperature: round_to_int(temperature),
        fuel_price: round_half_even(fuel_price, MONEY_DP),
        cpi: round_half_even(cpi, INDEX_DP),
        unemployment: round_half_even(unemployment, INDEX_DP),
    })
}
