//! Initial guess grid generation.
//!
//! The loss surface is non-convex, so every run starts from a different
//! deterministic guess: each whole-sequence shift on a regular grid combined
//! with three hypotheses about where the unrecovered core went inside each
//! boring interval.

use crate::error::MatchError;

/// Upper bound on the number of shift grid nodes.
const MAX_GRID_NODES: usize = 100_000;

/// Where the unrecovered core of a boring interval is assumed to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapPlacement {
    /// All of it below the last lithology interval (no gap before any interval).
    Trailing,
    /// Evenly distributed: `g / (n + 1)` before each interval and after the last.
    Even,
    /// All of it above the first lithology interval.
    Leading,
}

impl GapPlacement {
    /// Generation order of the hypotheses.
    pub const ALL: [GapPlacement; 3] = [GapPlacement::Trailing, GapPlacement::Even, GapPlacement::Leading];

    /// Gap entries for one boring interval with `n` lithology intervals and
    /// `gap_length` of unrecovered core.
    pub fn gaps(self, n: usize, gap_length: f64) -> Vec<f64> {
        if n == 0 {
            return Vec::new();
        }
        match self {
            GapPlacement::Trailing => vec![0.0; n],
            GapPlacement::Even => vec![gap_length / (n as f64 + 1.0); n],
            GapPlacement::Leading => {
                let mut out = vec![0.0; n];
                out[0] = gap_length;
                out
            }
        }
    }
}

/// Whole-sequence shift grid: `from + i * step` for `i < ceil((to - from) / step)`.
pub fn shift_grid(from: f64, to: f64, step: f64) -> Result<Vec<f64>, MatchError> {
    if !(from.is_finite() && to.is_finite() && step.is_finite()) || step == 0.0 {
        return Err(MatchError::InvalidGrid(format!(
            "from={from}, to={to}, step={step} (must be finite with a non-zero step)"
        )));
    }
    let count = ((to - from) / step).ceil();
    if count <= 0.0 {
        return Ok(Vec::new());
    }
    if count > MAX_GRID_NODES as f64 {
        return Err(MatchError::InvalidGrid(format!(
            "{count} grid nodes requested, at most {MAX_GRID_NODES} allowed"
        )));
    }
    Ok((0..count as usize).map(|i| from + i as f64 * step).collect())
}

/// One full gap vector per placement hypothesis, in `GapPlacement::ALL` order.
pub fn gap_hypotheses(counts: &[usize], gap_lengths: &[f64]) -> Vec<Vec<f64>> {
    GapPlacement::ALL
        .iter()
        .map(|&placement| {
            counts
                .iter()
                .zip(gap_lengths)
                .flat_map(|(&n, &g)| placement.gaps(n, g))
                .collect()
        })
        .collect()
}

/// Initial delta vectors: shift grid (outer) crossed with gap hypotheses (inner).
pub fn generate_init_deltas(
    counts: &[usize],
    gap_lengths: &[f64],
    delta_from: f64,
    delta_to: f64,
    delta_step: f64,
) -> Result<Vec<Vec<f64>>, MatchError> {
    let shifts = shift_grid(delta_from, delta_to, delta_step)?;
    let hypotheses = gap_hypotheses(counts, gap_lengths);

    let mut out = Vec::with_capacity(shifts.len() * hypotheses.len());
    for &shift in &shifts {
        for gaps in &hypotheses {
            let mut delta = Vec::with_capacity(1 + gaps.len());
            delta.push(shift);
            delta.extend_from_slice(gaps);
            out.push(delta);
        }
    }
    Ok(out)
}
