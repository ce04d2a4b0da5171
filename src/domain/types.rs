//! Shared domain types.
//!
//! Interval rows derive `serde` with the column names used by the boring and
//! lithology tables (`DEPTH_FROM`, `DEPTH_TO`, `CORE_RECOVERY`) so external
//! loaders can build them directly from their tabular sources.

use serde::{Deserialize, Serialize};

use crate::error::MatchError;

/// Anything that occupies a `[depth_from, depth_to]` range.
pub trait DepthInterval {
    fn depth_from(&self) -> f64;
    fn depth_to(&self) -> f64;

    fn length(&self) -> f64 {
        self.depth_to() - self.depth_from()
    }
}

/// A drilled interval and the length of core physically recovered from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct BoringInterval {
    pub depth_from: f64,
    pub depth_to: f64,
    pub core_recovery: f64,
}

impl BoringInterval {
    pub fn new(depth_from: f64, depth_to: f64, core_recovery: f64) -> Self {
        Self {
            depth_from,
            depth_to,
            core_recovery,
        }
    }

    /// Length of unrecovered core, never negative.
    pub fn gap_length(&self) -> f64 {
        (self.length() - self.core_recovery).max(0.0)
    }
}

impl DepthInterval for BoringInterval {
    fn depth_from(&self) -> f64 {
        self.depth_from
    }

    fn depth_to(&self) -> f64 {
        self.depth_to
    }
}

/// One identified rock-type segment of recovered core.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct LithologyInterval {
    pub depth_from: f64,
    pub depth_to: f64,
}

impl LithologyInterval {
    pub fn new(depth_from: f64, depth_to: f64) -> Self {
        Self {
            depth_from,
            depth_to,
        }
    }

    /// Whether the interval lies fully inside `boring`.
    pub fn is_within(&self, boring: &BoringInterval) -> bool {
        self.depth_from >= boring.depth_from && self.depth_to <= boring.depth_to
    }
}

impl DepthInterval for LithologyInterval {
    fn depth_from(&self) -> f64 {
        self.depth_from
    }

    fn depth_to(&self) -> f64 {
        self.depth_to
    }
}

/// A depth-indexed series of real values (well log or core log).
///
/// Samples are kept sorted by depth. Values may be NaN to mark missing
/// measurements; depths are expected to be finite.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DepthSeries {
    depths: Vec<f64>,
    values: Vec<f64>,
}

impl DepthSeries {
    pub fn new(depths: Vec<f64>, values: Vec<f64>) -> Result<Self, MatchError> {
        if depths.len() != values.len() {
            return Err(MatchError::InvalidSeries(format!(
                "{} depths but {} values",
                depths.len(),
                values.len()
            )));
        }
        if depths.iter().any(|d| !d.is_finite()) {
            return Err(MatchError::InvalidSeries("depths must be finite".to_string()));
        }
        Ok(Self::from_pairs(depths.into_iter().zip(values)))
    }

    /// Build a series from `(depth, value)` pairs in any order.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let mut pairs: Vec<(f64, f64)> = pairs.into_iter().collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        let (depths, values) = pairs.into_iter().unzip();
        Self { depths, values }
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    pub fn depths(&self) -> &[f64] {
        &self.depths
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Shallowest sampled depth, missing values included.
    pub fn depth_from(&self) -> Option<f64> {
        self.depths.first().copied()
    }

    /// Deepest sampled depth, missing values included.
    pub fn depth_to(&self) -> Option<f64> {
        self.depths.last().copied()
    }

    /// Copy of the series without NaN values.
    pub fn dropna(&self) -> Self {
        let (depths, values) = self
            .depths
            .iter()
            .zip(&self.values)
            .filter(|(_, v)| !v.is_nan())
            .map(|(&d, &v)| (d, v))
            .unzip();
        Self { depths, values }
    }

    /// Samples with `from <= depth <= to` (both ends inclusive).
    pub fn slice(&self, from: f64, to: f64) -> (&[f64], &[f64]) {
        let start = self.depths.partition_point(|&d| d < from);
        let end = self.depths.partition_point(|&d| d <= to).max(start);
        (&self.depths[start..end], &self.values[start..end])
    }
}

/// Outcome of one matching run.
///
/// `interval_deltas` holds one absolute depth offset per lithology interval
/// (cumulative gap plus `sequence_delta`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    pub depth_from: f64,
    pub depth_to: f64,
    pub sequence_delta: f64,
    pub interval_deltas: Vec<f64>,
    pub loss: f64,
}
