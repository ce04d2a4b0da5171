//! Feasibility constraints of a delta vector.
//!
//! Every constraint is an inequality `g(x) >= 0`. They are plain values
//! evaluated by [`Constraint::eval`], so a solver backend only needs to loop
//! over the set.

use std::ops::Range;

use crate::matching::DeltaLayout;

#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// `gap_length - sum(x[range]) >= 0`: gaps of one boring interval fit its unrecovered core.
    GapBudget { range: Range<usize>, gap_length: f64 },
    /// `x[index] >= 0`.
    NonNegativeGap { index: usize },
    /// `x[0] + limit >= 0`: the sequence moves up by at most `limit`.
    MaxShiftUp { limit: f64 },
    /// `limit - x[0] >= 0`: the sequence moves down by at most `limit`.
    MaxShiftDown { limit: f64 },
}

impl Constraint {
    pub fn eval(&self, x: &[f64]) -> f64 {
        match self {
            Constraint::GapBudget { range, gap_length } => {
                gap_length - x[range.clone()].iter().sum::<f64>()
            }
            Constraint::NonNegativeGap { index } => x[*index],
            Constraint::MaxShiftUp { limit } => x[0] + limit,
            Constraint::MaxShiftDown { limit } => limit - x[0],
        }
    }
}

/// How far a sequence may move up and down.
///
/// Each direction is capped by `max_shift` and by the well log coverage on
/// that side; a sequence already outside the coverage gets a zero limit.
pub fn shift_limits(max_shift: f64, sequence: (f64, f64), well: (f64, f64)) -> (f64, f64) {
    let up = max_shift.min((sequence.0 - well.0).max(0.0));
    let down = max_shift.min((well.1 - sequence.1).max(0.0));
    (up, down)
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConstraintSet {
    constraints: Vec<Constraint>,
}

impl ConstraintSet {
    /// Build the full constraint set of a boring sequence.
    ///
    /// `sequence` and `well` are `(depth_from, depth_to)` extents.
    pub fn build(
        layout: &DeltaLayout,
        gap_lengths: &[f64],
        max_shift: f64,
        sequence: (f64, f64),
        well: (f64, f64),
    ) -> Self {
        let mut constraints = Vec::with_capacity(layout.counts().len() + layout.n_gaps() + 2);

        for (range, &gap_length) in layout.gap_ranges().into_iter().zip(gap_lengths) {
            constraints.push(Constraint::GapBudget { range, gap_length });
        }
        for index in 1..layout.delta_len() {
            constraints.push(Constraint::NonNegativeGap { index });
        }

        let (up, down) = shift_limits(max_shift, sequence, well);
        constraints.push(Constraint::MaxShiftUp { limit: up });
        constraints.push(Constraint::MaxShiftDown { limit: down });

        Self { constraints }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Constraint> {
        self.constraints.iter()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Whether every constraint holds up to `tol`.
    pub fn is_satisfied(&self, x: &[f64], tol: f64) -> bool {
        self.constraints.iter().all(|c| c.eval(x) >= -tol)
    }

    /// Copy of `x` with the sequence delta clamped into the shift limits.
    ///
    /// Gap entries are left alone: grid hypotheses already satisfy their budgets.
    pub fn project_shift(&self, x: &[f64]) -> Vec<f64> {
        let mut out = x.to_vec();
        for constraint in &self.constraints {
            match *constraint {
                Constraint::MaxShiftUp { limit } => out[0] = out[0].max(-limit),
                Constraint::MaxShiftDown { limit } => out[0] = out[0].min(limit),
                _ => {}
            }
        }
        out
    }
}

impl<'a> IntoIterator for &'a ConstraintSet {
    type Item = &'a Constraint;
    type IntoIter = std::slice::Iter<'a, Constraint>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
