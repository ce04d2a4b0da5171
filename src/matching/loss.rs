//! Correlation loss of a candidate delta vector.
//!
//! Given:
//! - the original depths of the core samples of every lithology interval
//! - the core log values at those depths
//! - an interpolator of the well log
//!
//! the loss of a delta vector is the negative Pearson correlation between the
//! well log read at the shifted core depths and the (unshifted) core values.
//! Lower is better; `-1.0` is a perfect match.

use crate::domain::NonFinitePolicy;
use crate::math::{LinearInterpolator, pearson};
use crate::matching::DeltaLayout;

#[derive(Debug, Clone)]
pub struct LossEvaluator {
    layout: DeltaLayout,
    core_depths: Vec<Vec<f64>>,
    core_values: Vec<f64>,
    well: LinearInterpolator,
    non_finite: NonFinitePolicy,
}

impl LossEvaluator {
    /// `core_depths` holds one array per lithology interval in sequence order;
    /// `core_values` is their concatenated core log values.
    pub fn new(
        layout: DeltaLayout,
        core_depths: Vec<Vec<f64>>,
        core_values: Vec<f64>,
        well: LinearInterpolator,
        non_finite: NonFinitePolicy,
    ) -> Self {
        debug_assert_eq!(core_depths.len(), layout.n_gaps());
        debug_assert_eq!(core_depths.iter().map(Vec::len).sum::<usize>(), core_values.len());
        Self {
            layout,
            core_depths,
            core_values,
            well,
            non_finite,
        }
    }

    pub fn layout(&self) -> &DeltaLayout {
        &self.layout
    }

    pub fn n_samples(&self) -> usize {
        self.core_values.len()
    }

    /// Core sample depths after applying `deltas`, concatenated over all lithology intervals.
    pub fn shifted_depths(&self, deltas: &[f64]) -> Vec<f64> {
        let offsets = self.layout.interval_offsets(deltas[0], &deltas[1..]);
        let mut out = Vec::with_capacity(self.core_values.len());
        for (depths, offset) in self.core_depths.iter().zip(offsets) {
            out.extend(depths.iter().map(|d| d + offset));
        }
        out
    }

    pub fn loss(&self, deltas: &[f64]) -> f64 {
        let mut well_values = self.well.eval_many(&self.shifted_depths(deltas));
        apply_non_finite_policy(&mut well_values, self.non_finite);
        -pearson(&well_values, &self.core_values)
    }
}

/// Post-process interpolated well-log values before correlating.
///
/// With `NonFinitePolicy::Zero` every NaN or infinite value becomes `0.0`.
/// Where these values come from is not understood yet; the replacement keeps
/// results compatible with existing matchings rather than being a correct
/// treatment.
pub fn apply_non_finite_policy(values: &mut [f64], policy: NonFinitePolicy) {
    match policy {
        NonFinitePolicy::Zero => {
            for v in values.iter_mut().filter(|v| !v.is_finite()) {
                *v = 0.0;
            }
        }
        NonFinitePolicy::Propagate => {}
    }
}
