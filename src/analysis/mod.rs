//! Aggregations over the cleaned table.
//!
//! Every function here is a pure read of `&[SalesRecord]`. Sales totals are
//! accumulated in integer cents (`weekly_sales` is already rounded to 2 dp), so
//! sums do not depend on row order.

pub mod correlation;
pub mod fuel;
pub mod holidays;
pub mod stores;
pub mod summary;

use serde::Serialize;

use crate::domain::SalesRecord;

pub use correlation::*;
pub use fuel::*;
pub use holidays::*;
pub use stores::*;
pub use summary::*;

/// All aggregates for one cleaned table.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub summary: DatasetSummary,
    pub holiday_ranking: Vec<HolidayWeek>,
    pub holiday_summaries: Vec<HolidaySummary>,
    pub stores: Vec<StoreEconomics>,
    pub unemployment_extremes: Option<StoreExtremes>,
    pub cpi_correlation: CpiCorrelation,
    pub fuel_series: Vec<WeeklyTotals>,
}

impl Analysis {
    pub fn compute(records: &[SalesRecord], calendar: &HolidayCalendar) -> Self {
        let stores = store_economics(records);
        let unemployment_extremes = unemployment_extremes(&stores);

        Self {
            summary: summarize(records),
            holiday_ranking: rank_holiday_weeks(records, calendar),
            holiday_summaries: summarize_holidays(records, calendar),
            stores,
            unemployment_extremes,
            cpi_correlation: cpi_sales_correlation(records),
            fuel_series: fuel_sales_series(records),
        }
    }

    pub fn store(&self, store: u32) -> Option<&StoreEconomics> {
        self.stores
            .binary_search_by_key(&store, |s| s.store)
            .ok()
            .map(|idx| &self.stores[idx])
    }
}

pub(crate) fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

pub(crate) fn from_cents(cents: i64) -> f64 {
    cents as f64 / 100.0
}
