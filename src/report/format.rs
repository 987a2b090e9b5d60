//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the aggregation code stays clean and testable
//! - output changes are localized (the tests below pin the layout)

use crate::analysis::{
    Analysis, CpiCorrelation, DatasetSummary, HolidaySummary, HolidayWeek, StoreEconomics, StoreExtremes,
};
use crate::domain::AnalysisConfig;

/// Everything `sales report` prints before the chart.
pub fn format_report(config: &AnalysisConfig, analysis: &Analysis) -> String {
    let mut out = String::new();
    out.push_str(&format_run_summary(config, &analysis.summary));
    out.push('\n');
    out.push_str(&format_holiday_ranking(&analysis.holiday_ranking, config.top_n));
    out.push('\n');
    out.push_str(&format_holiday_summaries(&analysis.holiday_summaries));
    out.push('\n');
    out.push_str(&format_store_extremes(analysis.unemployment_extremes.as_ref()));
    out.push('\n');
    out.push_str(&format_correlations(&analysis.cpi_correlation));
    out
}

/// Header block: source, row and store counts, date range.
pub fn format_run_summary(config: &AnalysisConfig, summary: &DatasetSummary) -> String {
    let mut out = String::new();

    out.push_str("=== sales - Weekly Sales Report ===\n");
    out.push_str(&format!("Source: {}\n", config.csv_path.display()));
    out.push_str(&format!(
        "Rows: n={} | stores={} | holiday rows={}\n",
        summary.rows, summary.stores, summary.holiday_rows
    ));
    match (summary.first_date, summary.last_date) {
        (Some(first), Some(last)) => out.push_str(&format!(
            "Weeks: {} .. {}\n",
            first.format("%m-%d-%Y"),
            last.format("%m-%d-%Y")
        )),
        _ => out.push_str("Weeks: (none)\n"),
    }
    out.push_str(&format!("Mean weekly sales: {}\n", fmt_money(summary.mean_weekly_sales)));

    out
}

/// Top `top_n` holiday weeks by total sales.
pub fn format_holiday_ranking(weeks: &[HolidayWeek], top_n: usize) -> String {
    let mut out = String::new();
    out.push_str("Top holiday weeks by total sales:\n");
    if weeks.is_empty() {
        out.push_str("  (no holiday weeks)\n");
        return out;
    }

    push_row(&mut out, format!("{:>4} {:<10} {:<14} {:>6} {:>18}", "rank", "week", "holiday", "stores", "total_sales"));
    push_row(&mut out, format!("{:-<4} {:-<10} {:-<14} {:-<6} {:-<18}", "", "", "", "", ""));

    for (i, w) in weeks.iter().take(top_n).enumerate() {
        push_row(
            &mut out,
            format!(
                "{:>4} {:<10} {:<14} {:>6} {:>18}",
                i + 1,
                w.date_label,
                truncate(w.holiday_name.as_deref().unwrap_or(""), 14),
                w.stores,
                fmt_money(w.total_sales),
            ),
        );
    }

    out
}

pub fn format_holiday_summaries(summaries: &[HolidaySummary]) -> String {
    let mut out = String::new();
    out.push_str("Weekly sales by holiday:\n");
    if summaries.is_empty() {
        out.push_str("  (no holiday weeks)\n");
        return out;
    }

    push_row(&mut out, format!("{:<14} {:>6} {:>16} {:>16}", "holiday", "weeks", "mean", "median"));
    push_row(&mut out, format!("{:-<14} {:-<6} {:-<16} {:-<16}", "", "", "", ""));
    for s in summaries {
        push_row(
            &mut out,
            format!(
                "{:<14} {:>6} {:>16} {:>16}",
                truncate(&s.name, 14),
                s.observations,
                fmt_money(s.mean_sales),
                fmt_money(s.median_sales),
            ),
        );
    }

    out
}

pub fn format_store_extremes(extremes: Option<&StoreExtremes>) -> String {
    let mut out = String::new();
    out.push_str("Store unemployment extremes:\n");
    let Some(extremes) = extremes else {
        out.push_str("  (no stores)\n");
        return out;
    };

    out.push_str(&format_extreme_group("lowest", &extremes.lowest_unemployment));
    out.push_str(&format_extreme_group("highest", &extremes.highest_unemployment));
    out
}

fn format_extreme_group(label: &str, stores: &[StoreEconomics]) -> String {
    let mut out = String::new();
    for s in stores {
        out.push_str(&format!(
            "- {label:<7} store {:>3}: unemployment {:.3}% | mean weekly sales {}\n",
            s.store,
            s.mean_unemployment,
            fmt_money(s.mean_weekly_sales),
        ));
    }
    out
}

pub fn format_correlations(corr: &CpiCorrelation) -> String {
    let mut out = String::new();
    out.push_str("CPI vs weekly sales (Pearson r):\n");
    out.push_str(&format!(
        "- all weeks     (n={}): {}\n",
        corr.all_weeks.observations, corr.all_weeks
    ));
    out.push_str(&format!(
        "- holiday weeks (n={}): {}\n",
        corr.holiday_weeks.observations, corr.holiday_weeks
    ));
    out
}

fn push_row(out: &mut String, row: String) {
    out.push_str(row.trim_end());
    out.push('\n');
}

/// `1641957.44` -> `$1,641,957.44`; non-finite values print as `n/a`.
pub fn fmt_money(v: f64) -> String {
    if !v.is_finite() {
        return "n/a".to_string();
    }

    let fixed = format!("{:.2}", v.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if v < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{frac_part}")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
