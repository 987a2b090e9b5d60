//! Descriptive statistics over plain `f64` slices.
//!
//! Conventions: an empty input has no mean/median (`NaN`), and an undefined
//! correlation is `NaN`. Callers decide how to present `NaN`; it is never
//! silently turned into zero here.

/// Arithmetic mean; `NaN` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median (average of the two middle values for even lengths); `NaN` for an empty slice.
pub fn median(values: &[f64]) -> f64 {
    let n = values.len();
    if n == 0 {
        return f64::NAN;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

/// Pearson correlation coefficient between two equally long series.
///
/// Undefined (`NaN`) when there are fewer than two pairs, the lengths differ,
/// or either series is constant.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len();
    if n < 2 || n != ys.len() || is_constant(xs) || is_constant(ys) {
        return f64::NAN;
    }

    let mx = mean(xs);
    let my = mean(ys);

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - mx;
        let dy = y - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }

    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

// Checked on the raw values: the mean of identical floats is not always
// bit-identical to them, which would leave a tiny non-zero variance.
fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}
