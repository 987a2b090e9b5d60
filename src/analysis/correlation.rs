//! CPI vs weekly sales: correlation coefficients and scatter data.

use std::fmt;

use serde::Serialize;

use crate::domain::{CpiFilter, SalesRecord};
use crate::math::{LinearTrend, fit_line, pearson};

/// A Pearson coefficient with its sample size. `coefficient` is `NaN` when undefined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Correlation {
    pub observations: usize,
    pub coefficient: f64,
}

impl Correlation {
    pub fn is_defined(&self) -> bool {
        self.coefficient.is_finite()
    }

    pub fn value(&self) -> Option<f64> {
        self.is_defined().then_some(self.coefficient)
    }
}

impl fmt::Display for Correlation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Some(r) => write!(f, "{r:.4}"),
            None => f.write_str("undefined"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CpiCorrelation {
    pub all_weeks: Correlation,
    pub holiday_weeks: Correlation,
}

pub fn cpi_sales_correlation(records: &[SalesRecord]) -> CpiCorrelation {
    CpiCorrelation {
        all_weeks: correlation_for(records, CpiFilter::All),
        holiday_weeks: correlation_for(records, CpiFilter::Holiday),
    }
}

/// Correlation between CPI and weekly sales over the rows `filter` selects.
pub fn correlation_for(records: &[SalesRecord], filter: CpiFilter) -> Correlation {
    let (cpi, sales): (Vec<f64>, Vec<f64>) = records
        .iter()
        .filter(|r| filter.matches(r))
        .map(|r| (r.cpi, r.weekly_sales))
        .unzip();

    Correlation {
        observations: cpi.len(),
        coefficient: pearson(&cpi, &sales),
    }
}

/// One week of one store on the CPI scatter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CpiPoint {
    pub cpi: f64,
    pub weekly_sales: f64,
    pub holiday_week: bool,
}

/// Points for the CPI scatter chart, with an optional least-squares trendline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CpiScatter {
    pub filter: CpiFilter,
    /// Points in table order.
    pub points: Vec<CpiPoint>,
    pub trend: Option<LinearTrend>,
    pub correlation: Correlation,
}

pub fn cpi_scatter(records: &[SalesRecord], filter: CpiFilter) -> CpiScatter {
    let points: Vec<CpiPoint> = records
        .iter()
        .filter(|r| filter.matches(r))
        .map(|r| CpiPoint {
            cpi: r.cpi,
            weekly_sales: r.weekly_sales,
            holiday_week: r.holiday_flag,
        })
        .collect();
    let xy: Vec<(f64, f64)> = points.iter().map(|p| (p.cpi, p.weekly_sales)).collect();

    CpiScatter {
        filter,
        trend: fit_line(&xy),
        correlation: correlation_for(records, filter),
        points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::record;

    fn with_cpi(week: u32, sales: f64, holiday: bool, cpi: f64) -> SalesRecord {
        let mut r = record(1, (2010, 3, week), sales, holiday);
        r.cpi = cpi;
        r
    }

    #[test]
    fn perfectly_linear_weeks_correlate_to_one() {
        let records = vec![
            with_cpi(5, 100.0, false, 210.0),
            with_cpi(12, 200.0, true, 211.0),
            with_cpi(19, 300.0, false, 212.0),
            with_cpi(26, 400.0, true, 213.0),
        ];
        let corr = cpi_sales_correlation(&records);
        assert_eq!(corr.all_weeks.observations, 4);
        assert!((corr.all_weeks.coefficient - 1.0).abs() < 1e-12);
        assert_eq!(corr.holiday_weeks.observations, 2);
        assert!((corr.holiday_weeks.coefficient - 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_cpi_is_undefined_not_zero() {
        let records = vec![
            with_cpi(5, 100.0, false, 211.096),
            with_cpi(12, 250.0, false, 211.096),
            with_cpi(19, 175.0, false, 211.096),
        ];
        let corr = correlation_for(&records, CpiFilter::All);
        assert!(corr.coefficient.is_nan());
        assert!(!corr.is_defined());
        assert_eq!(corr.value(), None);
        assert_eq!(corr.to_string(), "undefined");
    }

    #[test]
    fn too_few_holiday_weeks_is_undefined() {
        let records = vec![with_cpi(5, 100.0, true, 210.0), with_cpi(12, 90.0, false, 212.0)];
        let corr = cpi_sales_correlation(&records);
        assert_eq!(corr.holiday_weeks.observations, 1);
        assert!(!corr.holiday_weeks.is_defined());
        assert!((corr.all_weeks.coefficient + 1.0).abs() < 1e-12);
    }

    #[test]
    fn display_uses_four_decimals() {
        let corr = Correlation {
            observations: 5,
            coefficient: 0.8,
        };
        assert_eq!(corr.to_string(), "0.8000");
    }

    #[test]
    fn scatter_filters_points_and_fits_trend() {
        let records = vec![
            with_cpi(5, 100.0, false, 210.0),
            with_cpi(12, 500.0, true, 211.0),
            with_cpi(19, 300.0, false, 212.0),
            with_cpi(26, 700.0, true, 213.0),
        ];

        let holiday = cpi_scatter(&records, CpiFilter::Holiday);
        let xy: Vec<(f64, f64)> = holiday.points.iter().map(|p| (p.cpi, p.weekly_sales)).collect();
        assert_eq!(xy, vec![(211.0, 500.0), (213.0, 700.0)]);
        assert!(holiday.points.iter().all(|p| p.holiday_week));
        let trend = holiday.trend.unwrap();
        assert!((trend.slope - 100.0).abs() < 1e-6);

        let non_holiday = cpi_scatter(&records, CpiFilter::NonHoliday);
        assert_eq!(non_holiday.points.len(), 2);
        assert!(non_holiday.points.iter().all(|p| !p.holiday_week));

        let all = cpi_scatter(&records, CpiFilter::All);
        let flags: Vec<bool> = all.points.iter().map(|p| p.holiday_week).collect();
        assert_eq!(flags, vec![false, true, false, true]);
        assert_eq!(non_holiday.filter, CpiFilter::NonHoliday);

        let empty = cpi_scatter(&[], CpiFilter::All);
        assert!(empty.points.is_empty());
        assert!(empty.trend.is_none());
        assert!(!empty.correlation.is_defined());
    }
}
