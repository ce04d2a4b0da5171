//! Piecewise-linear interpolation with linear extrapolation.
//!
//! Queries outside the sampled range extend the first or last segment, so a
//! shifted core sample that lands past the end of the well log still gets a
//! value. Coincident knots produce non-finite values for queries inside that
//! segment; callers decide what to do with them.

use crate::domain::DepthSeries;
use crate::error::MatchError;

#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl LinearInterpolator {
    /// Build from the non-missing samples of `series`.
    pub fn from_series(series: &DepthSeries) -> Result<Self, MatchError> {
        let clean = series.dropna();
        if clean.len() < 2 {
            return Err(MatchError::InsufficientWellLog { found: clean.len() });
        }
        Ok(Self {
            xs: clean.depths().to_vec(),
            ys: clean.values().to_vec(),
        })
    }

    pub fn eval(&self, x: f64) -> f64 {
        let n = self.xs.len();
        // Index of the segment `[xs[i], xs[i + 1]]` used for `x`.
        let i = self.xs.partition_point(|&k| k <= x).clamp(1, n - 1) - 1;
        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[i], self.ys[i + 1]);
        y0 + (x - x0) * (y1 - y0) / (x1 - x0)
    }

    pub fn eval_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.eval(x)).collect()
    }
}
