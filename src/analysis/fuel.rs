//! Weekly totals for the fuel price vs sales time series.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::{from_cents, to_cents};
use crate::clean::display_date;
use crate::domain::SalesRecord;

/// All-store sales and mean fuel price for one week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyTotals {
    pub date: NaiveDate,
    pub date_label: String,
    pub total_sales: f64,
    pub mean_fuel_price: f64,
    pub stores: usize,
}

/// One entry per distinct date, in chronological order.
pub fn fuel_sales_series(records: &[SalesRecord]) -> Vec<WeeklyTotals> {
    let mut weeks: BTreeMap<NaiveDate, (i64, f64, usize)> = BTreeMap::new();
    for r in records {
        let week = weeks.entry(r.date).or_default();
        week.0 += to_cents(r.weekly_sales);
        week.1 += r.fuel_price;
        week.2 += 1;
    }

    weeks
        .into_iter()
        .map(|(date, (cents, fuel, stores))| WeeklyTotals {
            date,
            date_label: display_date(date),
            total_sales: from_cents(cents),
            mean_fuel_price: fuel / stores as f64,
            stores,
        })
        .collect()
}
