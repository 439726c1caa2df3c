//! JSON-safe numeric helpers.
//!
//! Every float that leaves the engine passes through [`finite`], so NaN and
//! Infinity serialize as `null` instead of invalid JSON tokens.

/// Returns `Some(value)` for finite floats, `None` for NaN and Infinity.
pub fn finite(value: f64) -> Option<f64> {
    if value.is_finite() { Some(value) } else { None }
}

/// Rounds half away from zero to the given number of decimals.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
