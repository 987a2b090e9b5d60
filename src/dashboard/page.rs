//! Server-rendered dashboard page.
//!
//! The page is plain HTML: summary cards, a store selector and a CPI filter in
//! one GET form, and `<img>` tags pointing at the SVG chart endpoints. Changing
//! a control resubmits the form, so no client-side script is needed beyond
//! `onchange`.

use std::fmt::Write;

use crate::analysis::Analysis;
use crate::domain::CpiFilter;
use crate::report::fmt_money;

/// One summary card.
struct Card {
    value: String,
    label: &'static str,
    subtext: &'static str,
}

/// Render the full page for the given selection.
pub fn render_page(source: &str, analysis: &Analysis, store: Option<u32>, filter: CpiFilter) -> String {
    let mut html = String::with_capacity(8 * 1024);
    html.push_str(PAGE_HEAD);

    html.push_str("<main class=\"page\">\n<h1>Walmart Sales Dashboard</h1>\n");
    let _ = writeln!(
        html,
        "<p>Weekly sales from <code>{}</code>: how holidays, regional unemployment, CPI and fuel prices interact with revenue.</p>",
        escape_html(source)
    );

    html.push_str("<div class=\"summary-grid\">\n");
    for card in summary_cards(analysis) {
        let _ = writeln!(
            html,
            "<div class=\"summary-card\"><h3>{}</h3><p>{}</p><small>{}</small></div>",
            escape_html(&card.value),
            card.label,
            card.subtext
        );
    }
    html.push_str("</div>\n");

    html.push_str("<form method=\"get\" action=\"/\">\n<div class=\"chart-grid\">\n");

    html.push_str("<div class=\"chart-card\"><h4>Holiday Performance</h4>\n");
    html.push_str("<img src=\"/charts/holidays.svg\" alt=\"Average weekly sales by holiday\">\n</div>\n");

    html.push_str("<div class=\"chart-card\"><h4>Store Sensitivity to Unemployment</h4>\n");
    html.push_str("<select name=\"store\" onchange=\"this.form.submit()\">\n");
    for s in &analysis.stores {
        let selected = if Some(s.store) == store { " selected" } else { "" };
        let _ = writeln!(html, "<option value=\"{0}\"{selected}>Store {0}</option>", s.store);
    }
    html.push_str("</select>\n");
    match store {
        Some(id) => {
            let _ = writeln!(
                html,
                "<img src=\"/charts/stores.svg?store={id}\" alt=\"Store unemployment vs sales, store {id} highlighted\">"
            );
        }
        None => html.push_str("<img src=\"/charts/stores.svg\" alt=\"Store unemployment vs sales\">\n"),
    }
    html.push_str("</div>\n</div>\n");

    html.push_str("<div class=\"chart-grid\">\n");
    html.push_str("<div class=\"chart-card\"><h4>CPI vs. Weekly Sales</h4>\n<div class=\"filters\">\n");
    for option in CpiFilter::ALL {
        let checked = if option == filter { " checked" } else { "" };
        let _ = writeln!(
            html,
            "<label><input type=\"radio\" name=\"cpi\" value=\"{}\"{checked} onchange=\"this.form.submit()\"> {}</label>",
            option.as_str(),
            option.display_name()
        );
    }
    html.push_str("</div>\n");
    let _ = writeln!(
        html,
        "<img src=\"/charts/cpi.svg?filter={}\" alt=\"CPI vs weekly sales, {}\">",
        filter.as_str(),
        filter.display_name()
    );
    let corr = &analysis.cpi_correlation;
    let _ = writeln!(
        html,
        "<small>Pearson r: all weeks {} (n={}), holiday weeks {} (n={})</small>",
        corr.all_weeks, corr.all_weeks.observations, corr.holiday_weeks, corr.holiday_weeks.observations
    );
    html.push_str("</div>\n");

    html.push_str("<div class=\"chart-card\"><h4>Fuel Price vs. Total Sales</h4>\n");
    html.push_str("<img src=\"/charts/fuel.svg\" alt=\"Fuel price vs total weekly sales\">\n</div>\n");
    html.push_str("</div>\n");

    html.push_str("<noscript><button type=\"submit\">Update</button></noscript>\n</form>\n");
    html.push_str("<footer><small>JSON: <a href=\"/api/summary\">/api/summary</a> | <a href=\"/api/stores\">/api/stores</a></small></footer>\n");
    html.push_str("</main>\n</body>\n</html>\n");

    html
}

fn summary_cards(analysis: &Analysis) -> Vec<Card> {
    let summary = &analysis.summary;
    let range = match (summary.first_date, summary.last_date) {
        (Some(first), Some(last)) => format!("{} - {}", first.format("%b %Y"), last.format("%b %Y")),
        _ => "n/a".to_string(),
    };

    vec![
        Card {
            value: group_thousands(summary.rows),
            label: "Store-Weeks",
            subtext: "rows after cleaning",
        },
        Card {
            value: summary.stores.to_string(),
            label: "Stores",
            subtext: "unique locations",
        },
        Card {
            value: fmt_money(summary.mean_weekly_sales),
            label: "Average Weekly Sales",
            subtext: "per store-week",
        },
        Card {
            value: range,
            label: "Date Range",
            subtext: "full coverage",
        },
    ]
}

fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const PAGE_HEAD: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Walmart Sales Dashboard</title>
<style>
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 0; background: #f5f5f5; }
.page { max-width: 1200px; margin: 0 auto; padding: 2rem 1.5rem 3rem 1.5rem; }
h1 { margin-bottom: 0.25rem; }
.summary-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(180px, 1fr)); gap: 1rem; margin: 1.5rem 0; }
.summary-card, .chart-card { background: white; border-radius: 8px; padding: 1rem; box-shadow: 0 1px 3px rgba(15, 23, 42, 0.12); }
.summary-card h3 { margin: 0; font-size: 1.5rem; }
.summary-card p { margin: 0.25rem 0 0 0; font-weight: 500; }
.summary-card small, footer small, .chart-card small { color: #6b7280; }
.chart-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(320px, 1fr)); gap: 1.5rem; margin-bottom: 1.5rem; }
.chart-card h4 { margin-top: 0; }
.chart-card img { width: 100%; height: auto; }
.filters label { margin-right: 1rem; }
footer { margin-top: 2rem; text-align: center; }
</style>
</head>
<body>
"##;
