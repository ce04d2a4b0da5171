//! Index arithmetic of delta vectors.
//!
//! A delta vector is `[sequence_delta, g_1, ..., g_m]` where the gap entries
//! are grouped by boring interval in sequence order. Within one boring
//! interval the gaps are cumulative: lithology interval `j` sits
//! `g_1 + ... + g_j` below where the recovered core would put it, so a later
//! interval is never shifted less than an earlier one.

use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaLayout {
    counts: Vec<usize>,
}

impl DeltaLayout {
    /// `counts[i]` is the number of lithology intervals in boring interval `i`.
    pub fn new(counts: Vec<usize>) -> Self {
        Self { counts }
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Total number of lithology intervals (gap entries).
    pub fn n_gaps(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Length of a full delta vector.
    pub fn delta_len(&self) -> usize {
        1 + self.n_gaps()
    }

    /// Ranges of each boring interval's gap entries, indexed into the full delta vector.
    pub fn gap_ranges(&self) -> Vec<Range<usize>> {
        let mut start = 1;
        self.counts
            .iter()
            .map(|&n| {
                let range = start..start + n;
                start += n;
                range
            })
            .collect()
    }

    /// Absolute depth offset of every lithology interval.
    ///
    /// `gaps` are the gap entries only (the delta vector without its head).
    /// Each boring interval's chunk is summed cumulatively, then
    /// `sequence_delta` is added.
    pub fn interval_offsets(&self, sequence_delta: f64, gaps: &[f64]) -> Vec<f64> {
        debug_assert_eq!(gaps.len(), self.n_gaps());
        let mut out = Vec::with_capacity(gaps.len());
        let mut rest = gaps;
        for &n in &self.counts {
            let (chunk, tail) = rest.split_at(n.min(rest.len()));
            let mut acc = 0.0;
            for g in chunk {
                acc += g;
                out.push(acc + sequence_delta);
            }
            rest = tail;
        }
        out
    }
}
