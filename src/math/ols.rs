//! Least squares solver and straight-line fits.
//!
//! The dashboard overlays a trendline `y = intercept + slope * x` on the CPI
//! scatter. That is the ordinary least squares problem
//!
//! ```text
//! minimize Σ (y_i - β0 - β1 x_i)^2
//! ```
//!
//! solved on a two-column design matrix `[1, x_i]`.
//!
//! Implementation choices:
//! - We use SVD to solve the least-squares problem robustly even when the
//!   design matrix is tall (more rows than columns).
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic for
//!   non-square matrices.)
//! - A constant `x` makes the slope unidentifiable. SVD would still return a
//!   minimum-norm answer, so [`fit_line`] rejects that case up front.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// A fitted straight line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearTrend {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearTrend {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fit `y = intercept + slope * x` through `points`.
///
/// Returns `None` for fewer than two points, non-finite input, or a constant `x`.
pub fn fit_line(points: &[(f64, f64)]) -> Option<LinearTrend> {
    if points.len() < 2 || points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
        return None;
    }

    let first_x = points[0].0;
    if points.iter().all(|&(x, _)| x == first_x) {
        return None;
    }

    // Centering x keeps the design well conditioned for index-like values (CPI ~ 200).
    let n = points.len();
    let x_mean = points.iter().map(|&(x, _)| x).sum::<f64>() / n as f64;
    let design = DMatrix::from_fn(n, 2, |i, j| if j == 0 { 1.0 } else { points[i].0 - x_mean });
    let target = DVector::from_iterator(n, points.iter().map(|&(_, y)| y));

    let beta = solve_least_squares(&design, &target)?;
    let slope = beta[1];
    let intercept = beta[0] - slope * x_mean;
    Some(LinearTrend { slope, intercept })
}
