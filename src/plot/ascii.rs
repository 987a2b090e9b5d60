//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements (x is the week date):
//! - total weekly sales: `o`, scaled to the sales range
//! - mean fuel price: `-` line, scaled to its own range

use crate::analysis::WeeklyTotals;

/// Render the fuel price vs total sales chart.
pub fn render_fuel_sales_plot(series: &[WeeklyTotals], width: usize, height: usize) -> String {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return "Plot: no weekly data\n".to_string();
    };

    let width = width.max(10);
    let height = height.max(5);

    let origin = first.date;
    let days = |w: &WeeklyTotals| (w.date - origin).num_days() as f64;
    let t_max = days(last);
    let (t_min, t_max) = if t_max > 0.0 { (0.0, t_max) } else { (0.0, 1.0) };

    let sales: Vec<(f64, f64)> = series.iter().map(|w| (days(w), w.total_sales)).collect();
    let fuel: Vec<(f64, f64)> = series.iter().map(|w| (days(w), w.mean_fuel_price)).collect();

    let (s_min, s_max) = value_range(&sales).unwrap_or((0.0, 1.0));
    let (s_min, s_max) = pad_range(s_min, s_max, 0.05);
    let (f_min, f_max) = value_range(&fuel).unwrap_or((0.0, 1.0));
    let (f_min, f_max) = pad_range(f_min, f_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Line first so the sales points overlay it.
    draw_curve(&mut grid, &fuel, (t_min, t_max), (f_min, f_max));

    for &(t, y) in &sales {
        let x = map_x(t, t_min, t_max, width);
        let y = map_y(y, s_min, s_max, height);
        grid[y][x] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: weeks=[{}, {}] | sales=[{s_min:.2}, {s_max:.2}] (o) | fuel=[{f_min:.2}, {f_max:.2}] (-)\n",
        first.date_label, last.date_label,
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn value_range(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &(_, y) in points {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    if !(min_y.is_finite() && max_y.is_finite()) {
        None
    } else if max_y > min_y {
        Some((min_y, max_y))
    } else {
        // Flat series: centre it.
        Some((min_y - 0.5, max_y + 0.5))
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], (t_min, t_max): (f64, f64), (y_min, y_max): (f64, f64)) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(t, y) in curve {
        let x = map_x(t, t_min, t_max, width);
        let yy = map_y(y, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, x, yy, '-');
        } else {
            grid[yy][x] = '-';
        }
        prev = Some((x, yy));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
