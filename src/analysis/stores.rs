//! Per-store economics and unemployment extremes.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{from_cents, to_cents};
use crate::domain::SalesRecord;

/// Mean economic indicators for one store across all its weeks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreEconomics {
    pub store: u32,
    pub weeks: usize,
    pub mean_unemployment: f64,
    pub mean_weekly_sales: f64,
    pub mean_cpi: f64,
}

#[derive(Default)]
struct Accumulator {
    weeks: usize,
    sales_cents: i64,
    unemployment: f64,
    cpi: f64,
}

/// One row per store, ascending by store id.
pub fn store_economics(records: &[SalesRecord]) -> Vec<StoreEconomics> {
    let mut per_store: BTreeMap<u32, Accumulator> = BTreeMap::new();
    for r in records {
        let acc = per_store.entry(r.store).or_default();
        acc.weeks += 1;
        acc.sales_cents += to_cents(r.weekly_sales);
        acc.unemployment += r.unemployment;
        acc.cpi += r.cpi;
    }

    per_store
        .into_iter()
        .map(|(store, acc)| {
            let n = acc.weeks as f64;
            StoreEconomics {
                store,
                weeks: acc.weeks,
                mean_unemployment: acc.unemployment / n,
                mean_weekly_sales: from_cents(acc.sales_cents) / n,
                mean_cpi: acc.cpi / n,
            }
        })
        .collect()
}

/// Stores at both ends of the mean-unemployment range.
///
/// Both lists hold every tied store, ascending by id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreExtremes {
    pub lowest_unemployment: Vec<StoreEconomics>,
    pub highest_unemployment: Vec<StoreEconomics>,
}

/// `None` when there are no stores.
pub fn unemployment_extremes(stores: &[StoreEconomics]) -> Option<StoreExtremes> {
    let first = stores.first()?.mean_unemployment;
    let (low, high) = stores.iter().fold((first, first), |(lo, hi), s| {
        (lo.min(s.mean_unemployment), hi.max(s.mean_unemployment))
    });

    let pick = |target: f64| -> Vec<StoreEconomics> {
        stores
            .iter()
            .filter(|s| s.mean_unemployment == target)
            .cloned()
            .collect()
    };

    Some(StoreExtremes {
        lowest_unemployment: pick(low),
        highest_unemployment: pick(high),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::record;

    fn with_unemployment(store: u32, week: u32, sales: f64, unemployment: f64) -> SalesRecord {
        let mut r = record(store, (2010, 2, week), sales, false);
        r.unemployment = unemployment;
        r
    }

    #[test]
    fn means_are_per_store_and_ordered_by_id() {
        let records = vec![
            with_unemployment(3, 5, 100.0, 7.0),
            with_unemployment(3, 12, 300.0, 9.0),
            with_unemployment(1, 5, 50.0, 6.0),
        ];
        let stores = store_economics(&records);

        assert_eq!(stores.len(), 2);
        assert_eq!(stores[0].store, 1);
        assert_eq!(stores[0].weeks, 1);
        assert_eq!(stores[1].store, 3);
        assert_eq!(stores[1].weeks, 2);
        assert_eq!(stores[1].mean_unemployment, 8.0);
        assert_eq!(stores[1].mean_weekly_sales, 200.0);
        assert!((stores[1].mean_cpi - 211.096).abs() < 1e-9);
    }

    #[test]
    fn extremes_pick_lowest_and_highest() {
        let records = vec![
            with_unemployment(1, 5, 1.0, 8.106),
            with_unemployment(2, 5, 1.0, 4.125),
            with_unemployment(3, 5, 1.0, 14.313),
        ];
        let extremes = unemployment_extremes(&store_economics(&records)).unwrap();
        let low: Vec<u32> = extremes.lowest_unemployment.iter().map(|s| s.store).collect();
        let high: Vec<u32> = extremes.highest_unemployment.iter().map(|s| s.store).collect();
        assert_eq!(low, vec![2]);
        assert_eq!(high, vec![3]);
    }

    #[test]
    fn extremes_report_every_tied_store() {
        let records = vec![
            with_unemployment(4, 5, 1.0, 5.0),
            with_unemployment(7, 5, 1.0, 9.0),
            with_unemployment(9, 5, 1.0, 5.0),
            with_unemployment(12, 5, 1.0, 9.0),
        ];
        let extremes = unemployment_extremes(&store_economics(&records)).unwrap();
        let low: Vec<u32> = extremes.lowest_unemployment.iter().map(|s| s.store).collect();
        let high: Vec<u32> = extremes.highest_unemployment.iter().map(|s| s.store).collect();
        assert_eq!(low, vec![4, 9]);
        assert_eq!(high, vec![7, 12]);
    }

    #[test]
    fn single_store_is_both_extremes() {
        let records = vec![with_unemployment(1, 5, 1.0, 8.0)];
        let extremes = unemployment_extremes(&store_economics(&records)).unwrap();
        assert_eq!(extremes.lowest_unemployment, extremes.highest_unemployment);
    }

    #[test]
    fn no_stores_no_extremes() {
        assert!(store_economics(&[]).is_empty());
        assert!(unemployment_extremes(&[]).is_none());
    }
}
