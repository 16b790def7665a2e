//! Numeric helpers centralizing rounding, clamping and safe casts.

use num_traits::cast::cast;

use crate::constants::{PERCENT_MAX, PERCENT_MIN};

/// Replace non-finite and negative values with zero.
#[must_use]
pub fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Round a f64 to `places` decimal places, returning 0.0 for non-finite values.
#[must_use]
pub fn round_to_places(value: f64, places: u32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let exponent = cast::<u32, i32>(places).unwrap_or(0);
    let scale = 10f64.powi(exponent);
    (value * scale).round() / scale
}

/// Format a f64 with a fixed number of decimal places. Ties round away from
/// zero, so `0.25` becomes `"0.3"` at one place.
#[must_use]
pub fn format_fixed(value: f64, places: u32) -> String {
    let precision = cast::<u32, usize>(places).unwrap_or(0);
    let value = round_to_places(value, places);
    format!("{value:.precision$}")
}

/// Clamp a percentage into `[0, 100]`, returning 0.0 for NaN.
#[must_use]
pub fn clamp_percentage(value: f64) -> f64 {
    if value.is_nan() {
        return PERCENT_MIN;
    }
    value.clamp(PERCENT_MIN, PERCENT_MAX)
}
