use chrono::NaiveDate;
use serde::Serialize;

use super::{from_cents, to_cents};
use crate::domain::SalesRecord;

/// Headline numbers for the report header and `/api/summary`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub stores: usize,
    pub holiday_rows: usize,
    /// `NaN` for an empty table.
    pub mean_weekly_sales: f64,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

pub fn summarize(records: &[SalesRecord]) -> DatasetSummary {
    let mut stores: Vec<u32> = records.iter().map(|r| r.store).collect();
    stores.sort_unstable();
    stores.dedup();

    let cents: i64 = records.iter().map(|r| to_cents(r.weekly_sales)).sum();
    let mean_weekly_sales = if records.is_empty() {
        f64::NAN
    } else {
        from_cents(cents) / records.len() as f64
    };

    DatasetSummary {
        rows: records.len(),
        stores: stores.len(),
        holiday_rows: records.iter().filter(|r| r.holiday_flag).count(),
        mean_weekly_sales,
        first_date: records.iter().map(|r| r.date).min(),
        last_date: records.iter().map(|r| r.date).max(),
    }
}
