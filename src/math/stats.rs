//! Correlation statistics.

use nalgebra::DVector;

/// Pearson correlation coefficient of two equally long samples.
///
/// Returns NaN when fewer than two pairs are available, when either sample has
/// zero variance, or when any input is NaN.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 2 {
        return f64::NAN;
    }
    let x = DVector::from_column_slice(x);
    let y = DVector::from_column_slice(y);
    let xc = x.add_scalar(-x.mean());
    let yc = y.add_scalar(-y.mean());

    let denom = xc.norm() * yc.norm();
    if denom == 0.0 {
        return f64::NAN;
    }
    // Rounding can push |r| marginally past 1.
    (xc.dot(&yc) / denom).clamp(-1.0, 1.0)
}
