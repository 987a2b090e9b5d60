//! Charts: ASCII for the terminal report, SVG for the dashboard.

pub mod ascii;
pub mod svg;

pub use ascii::render_fuel_sales_plot;
