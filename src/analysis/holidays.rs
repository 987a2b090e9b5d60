//! Holiday week ranking and per-holiday summaries.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::{from_cents, to_cents};
use crate::domain::SalesRecord;
use crate::math::{mean, median};

/// Name used for flagged weeks the calendar does not know.
pub const OTHER_HOLIDAY: &str = "Other Holiday";

const DEFAULT_HOLIDAYS: [(&str, &[(i32, u32, u32)]); 4] = [
    ("Super Bowl", &[(2010, 2, 12), (2011, 2, 11), (2012, 2, 10)]),
    ("Labor Day", &[(2010, 9, 10), (2011, 9, 9), (2012, 9, 7)]),
    ("Thanksgiving", &[(2010, 11, 26), (2011, 11, 25)]),
    ("Christmas", &[(2010, 12, 31), (2011, 12, 30)]),
];

/// Maps holiday week dates to holiday names.
#[derive(Debug, Clone)]
pub struct HolidayCalendar {
    names: HashMap<NaiveDate, String>,
}

impl HolidayCalendar {
    pub fn new(entries: impl IntoIterator<Item = (NaiveDate, String)>) -> Self {
        Self {
            names: entries.into_iter().collect(),
        }
    }

    pub fn name_for(&self, date: NaiveDate) -> Option<&str> {
        self.names.get(&date).map(String::as_str)
    }
}

impl Default for HolidayCalendar {
    /// The Walmart dataset's four named holiday weeks for 2010-2012.
    fn default() -> Self {
        Self::new(DEFAULT_HOLIDAYS.iter().flat_map(|(name, dates)| {
            dates
                .iter()
                .filter_map(|&(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
                .map(|date| (date, name.to_string()))
        }))
    }
}

/// Total sales across stores for one holiday-flagged week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HolidayWeek {
    pub date: NaiveDate,
    pub date_label: String,
    pub holiday_name: Option<String>,
    pub total_sales: f64,
    /// Number of store rows summed into `total_sales`.
    pub stores: usize,
}

/// Holiday weeks ordered by total sales, highest first.
///
/// Ties keep the order in which the weeks first appear in `records`, which for a
/// cleaned table is the `(store, date)` order.
pub fn rank_holiday_weeks(records: &[SalesRecord], calendar: &HolidayCalendar) -> Vec<HolidayWeek> {
    let mut order: Vec<NaiveDate> = Vec::new();
    let mut groups: HashMap<NaiveDate, (i64, usize, &str)> = HashMap::new();

    for r in records.iter().filter(|r| r.holiday_flag) {
        let entry = groups.entry(r.date).or_insert_with(|| {
            order.push(r.date);
            (0, 0, r.date_label.as_str())
        });
        entry.0 += to_cents(r.weekly_sales);
        entry.1 += 1;
    }

    let mut weeks: Vec<(i64, HolidayWeek)> = order
        .into_iter()
        .filter_map(|date| {
            let (cents, stores, label) = groups.remove(&date)?;
            Some((
                cents,
                HolidayWeek {
                    date,
                    date_label: label.to_string(),
                    holiday_name: calendar.name_for(date).map(str::to_string),
                    total_sales: from_cents(cents),
                    stores,
                },
            ))
        })
        .collect();

    // `sort_by` is stable: equal totals stay in first-appearance order.
    weeks.sort_by(|a, b| b.0.cmp(&a.0));
    weeks.into_iter().map(|(_, week)| week).collect()
}

/// Weekly sales statistics for one named holiday.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HolidaySummary {
    pub name: String,
    pub mean_sales: f64,
    pub median_sales: f64,
    pub observations: usize,
}

/// Per-holiday store-week statistics, ordered by mean sales, highest first.
///
/// Flagged weeks missing from the calendar are pooled under [`OTHER_HOLIDAY`].
pub fn summarize_holidays(records: &[SalesRecord], calendar: &HolidayCalendar) -> Vec<HolidaySummary> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<f64>> = HashMap::new();

    for r in records.iter().filter(|r| r.holiday_flag) {
        let name = calendar.name_for(r.date).unwrap_or(OTHER_HOLIDAY);
        groups
            .entry(name)
            .or_insert_with(|| {
                order.push(name);
                Vec::new()
            })
            .push(r.weekly_sales);
    }

    let mut out: Vec<HolidaySummary> = order
        .into_iter()
        .filter_map(|name| {
            let sales = groups.remove(name)?;
            Some(HolidaySummary {
                name: name.to_string(),
                mean_sales: mean(&sales),
                median_sales: median(&sales),
                observations: sales.len(),
            })
        })
        .collect();

    out.sort_by(|a, b| b.mean_sales.total_cmp(&a.mean_sales));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::record;

    #[test]
    fn ranks_weeks_by_summed_sales() {
        let records = vec![
            record(1, (2010, 2, 12), 100.10, true),
            record(1, (2010, 9, 10), 300.00, true),
            record(1, (2010, 11, 26), 50.00, true),
            record(1, (2010, 12, 3), 999.99, false),
            record(2, (2010, 2, 12), 250.25, true),
            record(2, (2010, 11, 26), 60.00, true),
        ];

        let ranking = rank_holiday_weeks(&records, &HolidayCalendar::default());
        let got: Vec<(&str, f64, usize)> = ranking
            .iter()
            .map(|w| (w.date_label.as_str(), w.total_sales, w.stores))
            .collect();
        assert_eq!(
            got,
            vec![
                ("02-12-2010", 350.35, 2),
                ("09-10-2010", 300.00, 1),
                ("11-26-2010", 110.00, 2),
            ]
        );
        assert_eq!(ranking[0].holiday_name.as_deref(), Some("Super Bowl"));
        assert_eq!(ranking[2].holiday_name.as_deref(), Some("Thanksgiving"));
    }

    #[test]
    fn ties_keep_first_appearance_order() {
        let records = vec![
            record(1, (2010, 9, 10), 10.00, true),
            record(1, (2010, 2, 12), 10.00, true),
            record(1, (2010, 11, 26), 20.00, true),
        ];
        let ranking = rank_holiday_weeks(&records, &HolidayCalendar::default());
        let labels: Vec<&str> = ranking.iter().map(|w| w.date_label.as_str()).collect();
        assert_eq!(labels, vec!["11-26-2010", "09-10-2010", "02-12-2010"]);
    }

    #[test]
    fn sums_do_not_depend_on_row_order() {
        let forward = vec![
            record(1, (2010, 2, 12), 0.10, true),
            record(2, (2010, 2, 12), 0.20, true),
            record(3, (2010, 2, 12), 0.30, true),
            record(4, (2010, 2, 12), 1641957.44, true),
        ];
        let mut backward = forward.clone();
        backward.reverse();

        let a = rank_holiday_weeks(&forward, &HolidayCalendar::default());
        let b = rank_holiday_weeks(&backward, &HolidayCalendar::default());
        assert_eq!(a[0].total_sales, b[0].total_sales);
        assert_eq!(a[0].total_sales, 1641958.04);
    }

    #[test]
    fn no_holiday_rows_gives_empty_ranking() {
        let records = vec![record(1, (2010, 2, 5), 1.0, false)];
        assert!(rank_holiday_weeks(&records, &HolidayCalendar::default()).is_empty());
        assert!(summarize_holidays(&records, &HolidayCalendar::default()).is_empty());
    }

    #[test]
    fn summaries_group_by_name_with_other_fallback() {
        let records = vec![
            record(1, (2010, 2, 12), 100.0, true),
            record(2, (2010, 2, 12), 300.0, true),
            record(1, (2011, 2, 11), 200.0, true),
            record(1, (2010, 12, 31), 50.0, true),
            record(1, (2010, 7, 2), 400.0, true),
        ];
        let summaries = summarize_holidays(&records, &HolidayCalendar::default());

        let names: Vec<&str> = summaries.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec![OTHER_HOLIDAY, "Super Bowl", "Christmas"]);

        let super_bowl = &summaries[1];
        assert_eq!(super_bowl.observations, 3);
        assert_eq!(super_bowl.mean_sales, 200.0);
        assert_eq!(super_bowl.median_sales, 200.0);
    }

    #[test]
    fn default_calendar_knows_the_named_weeks() {
        let calendar = HolidayCalendar::default();
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        assert_eq!(calendar.name_for(date(2012, 9, 7)), Some("Labor Day"));
        assert_eq!(calendar.name_for(date(2011, 11, 25)), Some("Thanksgiving"));
        assert_eq!(calendar.name_for(date(2010, 2, 5)), None);
    }
}
