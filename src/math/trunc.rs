//! Decimal truncation.
//!
//! Optimizer output carries fractional noise (`2.0000000031`, `-0.0000004`).
//! Truncating toward zero before reporting keeps a run that stopped just short
//! of a boundary on the feasible side of it.

/// Relative distance to an integer below which a scaled value is snapped to it.
const SNAP_EPS: f64 = 1e-9;

/// Truncate `x` toward zero, keeping `n_decimals` decimal places.
///
/// `trunc(2.789, 2) == 2.78`, `trunc(-0.004, 2) == 0.0`.
///
/// A value that already carries at most `n_decimals` decimals is returned
/// unchanged even when its binary representation sits just below the decimal
/// (`0.57 * 100.0 == 56.99999999999999`).
pub fn trunc(x: f64, n_decimals: u32) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let scale = 10f64.powi(n_decimals as i32);
    let scaled = x * scale;
    let nearest = scaled.round();
    let snapped = if (scaled - nearest).abs() <= SNAP_EPS * nearest.abs().max(1.0) {
        nearest
    } else {
        scaled.trunc()
    };
    // `-0.0` reads badly in reports.
    (snapped / scale) + 0.0
}

/// Truncate every element of `values`.
pub fn trunc_slice(values: &[f64], n_decimals: u32) -> Vec<f64> {
    values.iter().map(|&v| trunc(v, n_decimals)).collect()
}
