//! Decimal rounding used by the cleaner.
//!
//! Rule: the value is scaled by `10^dp` and rounded to the nearest integer with
//! ties going to the even neighbour, then scaled back.
//!
//! The tie rule applies to the *binary* value: `0.125` is exactly representable
//! and rounds to `0.12`, while `1.005 * 100` comes out as `100.49999...` and
//! rounds down to `1.0`.

/// Decimal places for `weekly_sales` and `fuel_price`.
pub const MONEY_DP: u32 = 2;
/// Decimal places for `cpi` and `unemployment`.
pub const INDEX_DP: u32 = 3;

/// Round `value` to `decimals` places, ties to even.
pub fn round_half_even(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round_ties_even() / scale
}

/// Round to a whole number (ties to even) and narrow to `i32`.
///
/// Out-of-range inputs saturate; temperatures never get near the limits.
pub fn round_to_int(value: f64) -> i32 {
    value.round_ties_even() as i32
}
