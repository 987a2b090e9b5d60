//! SVG charts for the dashboard, drawn with Plotters.
//!
//! Every chart renders into an in-memory string via `SVGBackend::with_string`,
//! so the HTTP layer can serve it without touching the filesystem.

use std::error::Error;

use chrono::Duration;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::analysis::{CpiScatter, HolidaySummary, StoreEconomics, WeeklyTotals};
use crate::error::AppError;

pub const CHART_SIZE: (u32, u32) = (900, 460);

type DrawResult = Result<(), Box<dyn Error>>;
type Root<'a> = DrawingArea<SVGBackend<'a>, Shift>;

const SALES_COLOR: RGBColor = RGBColor(31, 119, 180);
const FUEL_COLOR: RGBColor = RGBColor(214, 39, 40);
const HIGHLIGHT_COLOR: RGBColor = RGBColor(255, 127, 14);
const MUTED_COLOR: RGBColor = RGBColor(160, 160, 160);
const HOLIDAY_WEEK_COLOR: RGBColor = RGBColor(228, 87, 86);
const NON_HOLIDAY_WEEK_COLOR: RGBColor = RGBColor(76, 120, 168);

/// Bars of mean weekly sales per holiday, in summary order (highest mean first).
pub fn holiday_sales_chart(summaries: &[HolidaySummary]) -> Result<String, AppError> {
    render(|root| {
        if summaries.is_empty() {
            return draw_message(root, "No holiday weeks in the data");
        }

        let labels: Vec<String> = summaries
            .iter()
            .map(|s| format!("{} (n={})", s.name, s.observations))
            .collect();
        let max = summaries.iter().map(|s| s.mean_sales).fold(0.0, f64::max);
        let x_fmt = |x: &f64| index_label(&labels, *x);

        let mut chart = ChartBuilder::on(root)
            .caption("Holiday Weeks with the Largest Sales Lift", ("sans-serif", 24))
            .margin(12)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(-0.5f64..(summaries.len() as f64 - 0.5), 0f64..(max * 1.1).max(1.0))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(summaries.len())
            .x_label_formatter(&x_fmt)
            .y_label_formatter(&|v| fmt_millions(*v))
            .y_desc("Average weekly sales")
            .draw()?;

        chart.draw_series(summaries.iter().enumerate().map(|(i, s)| {
            let x = i as f64;
            Rectangle::new([(x - 0.4, 0.0), (x + 0.4, s.mean_sales)], SALES_COLOR.filled())
        }))?;

        Ok(())
    })
}

/// Mean unemployment vs mean weekly sales per store, one store highlighted.
pub fn store_sales_chart(stores: &[StoreEconomics], highlight: Option<u32>) -> Result<String, AppError> {
    render(|root| {
        if stores.is_empty() {
            return draw_message(root, "No stores in the data");
        }

        let (x0, x1) = padded_range(stores.iter().map(|s| s.mean_unemployment));
        let (y0, y1) = padded_range(stores.iter().map(|s| s.mean_weekly_sales));
        let (c0, c1) = padded_range(stores.iter().map(|s| s.mean_cpi));
        // Marker radius 3..9 px grows with the store's mean CPI.
        let radius = |s: &StoreEconomics| 3 + (6.0 * (s.mean_cpi - c0) / (c1 - c0)).round() as i32;

        let mut chart = ChartBuilder::on(root)
            .caption("Store Unemployment vs Mean Weekly Sales", ("sans-serif", 24))
            .margin(12)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(x0..x1, y0..y1)?;

        chart
            .configure_mesh()
            .x_desc("Mean unemployment (%)")
            .y_desc("Mean weekly sales")
            .y_label_formatter(&|v| fmt_millions(*v))
            .draw()?;

        chart.draw_series(
            stores
                .iter()
                .filter(|s| Some(s.store) != highlight)
                .map(|s| Circle::new((s.mean_unemployment, s.mean_weekly_sales), radius(s), MUTED_COLOR.mix(0.65).filled())),
        )?;

        if let Some(s) = highlight.and_then(|id| stores.iter().find(|s| s.store == id)) {
            let at = (s.mean_unemployment, s.mean_weekly_sales);
            chart.draw_series(std::iter::once(Circle::new(at, radius(s) + 2, HIGHLIGHT_COLOR.filled())))?;
            chart.draw_series(std::iter::once(Text::new(
                format!("Store {}", s.store),
                at,
                ("sans-serif", 14),
            )))?;
        }

        Ok(())
    })
}

/// CPI vs weekly sales scatter with its least-squares trendline.
pub fn cpi_scatter_chart(scatter: &CpiScatter) -> Result<String, AppError> {
    render(|root| {
        if scatter.points.is_empty() {
            return draw_message(root, "No weeks match this filter");
        }

        let (x0, x1) = padded_range(scatter.points.iter().map(|p| p.cpi));
        let (y0, y1) = padded_range(scatter.points.iter().map(|p| p.weekly_sales));
        let caption = format!(
            "CPI vs Weekly Sales ({}, r = {})",
            scatter.filter.display_name(),
            scatter.correlation
        );

        let mut chart = ChartBuilder::on(root)
            .caption(caption, ("sans-serif", 24))
            .margin(12)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(x0..x1, y0..y1)?;

        chart
            .configure_mesh()
            .x_desc("CPI")
            .y_desc("Weekly sales")
            .y_label_formatter(&|v| fmt_millions(*v))
            .draw()?;

        for (holiday_week, label, color) in [
            (false, "Non-holiday week", NON_HOLIDAY_WEEK_COLOR),
            (true, "Holiday week", HOLIDAY_WEEK_COLOR),
        ] {
            let group: Vec<(f64, f64)> = scatter
                .points
                .iter()
                .filter(|p| p.holiday_week == holiday_week)
                .map(|p| (p.cpi, p.weekly_sales))
                .collect();
            if group.is_empty() {
                continue;
            }
            chart
                .draw_series(group.into_iter().map(|p| Circle::new(p, 2, color.mix(0.6).filled())))?
                .label(label)
                .legend(move |(x, y)| Circle::new((x + 10, y), 4, color.filled()));
        }

        if let Some(trend) = scatter.trend {
            chart
                .draw_series(LineSeries::new(
                    [x0, x1].into_iter().map(|x| (x, trend.predict(x))),
                    BLACK.stroke_width(2),
                ))?
                .label("Trend")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLACK));
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        Ok(())
    })
}

/// Total weekly sales (left axis) and mean fuel price (right axis) over time.
pub fn fuel_sales_chart(series: &[WeeklyTotals]) -> Result<String, AppError> {
    render(|root| {
        let (Some(first), Some(last)) = (series.first(), series.last()) else {
            return draw_message(root, "No weekly data");
        };

        let origin = first.date;
        let day = |w: &WeeklyTotals| (w.date - origin).num_days() as f64;
        let span = day(last).max(1.0);
        let (s0, s1) = padded_range(series.iter().map(|w| w.total_sales));
        let (f0, f1) = padded_range(series.iter().map(|w| w.mean_fuel_price));
        let x_fmt = |x: &f64| {
            origin
                .checked_add_signed(Duration::days(x.round() as i64))
                .map(|d| d.format("%m-%Y").to_string())
                .unwrap_or_default()
        };

        let mut chart = ChartBuilder::on(root)
            .caption("Fuel Price vs Total Weekly Sales", ("sans-serif", 24))
            .margin(12)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .right_y_label_area_size(60)
            .build_cartesian_2d(0f64..span, s0..s1)?
            .set_secondary_coord(0f64..span, f0..f1);

        chart
            .configure_mesh()
            .x_label_formatter(&x_fmt)
            .y_label_formatter(&|v| fmt_millions(*v))
            .x_desc("Week")
            .y_desc("Total weekly sales")
            .draw()?;

        chart
            .configure_secondary_axes()
            .y_desc("Mean fuel price ($/gal)")
            .y_label_formatter(&|v| format!("{v:.2}"))
            .draw()?;

        chart
            .draw_series(LineSeries::new(
                series.iter().map(|w| (day(w), w.total_sales)),
                SALES_COLOR.stroke_width(2),
            ))?
            .label("Total sales")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &SALES_COLOR));

        chart
            .draw_secondary_series(LineSeries::new(
                series.iter().map(|w| (day(w), w.mean_fuel_price)),
                FUEL_COLOR.stroke_width(2),
            ))?
            .label("Fuel price")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &FUEL_COLOR));

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        Ok(())
    })
}

fn render(draw: impl FnOnce(&Root<'_>) -> DrawResult) -> Result<String, AppError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;
        draw(&root).map_err(chart_error)?;
        root.present().map_err(chart_error)?;
    }
    Ok(svg)
}

fn draw_message(root: &Root<'_>, message: &str) -> DrawResult {
    root.draw(&Text::new(message.to_string(), (40, 40), ("sans-serif", 20)))?;
    Ok(())
}

fn chart_error(e: impl std::fmt::Display) -> AppError {
    AppError::new(4, format!("Failed to render chart: {e}"))
}

/// Data range with 5% padding on both sides; a flat range is widened by one unit.
fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if !(min.is_finite() && max.is_finite()) {
        return (0.0, 1.0);
    }
    if max <= min {
        return (min - 1.0, max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}

fn index_label(labels: &[String], x: f64) -> String {
    let i = x.round();
    if (x - i).abs() > 1e-6 || i < 0.0 {
        return String::new();
    }
    labels.get(i as usize).cloned().unwrap_or_default()
}

fn fmt_millions(v: f64) -> String {
    format!("{:.1}M", v / 1e6)
}
