//! Matching a whole boring table.
//!
//! The table is split into contiguous boring sequences (no depth gap larger
//! than `max_gap`), and each sequence is matched on its own:
//!
//! boring table -> sequences -> multi-start matching -> shifts per sequence

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::data::split_contiguous;
use crate::domain::{
    BoringInterval, DepthInterval, DepthSeries, LithologyInterval, MatchConfig, Shift,
};
use crate::error::MatchError;
use crate::matching::{SequenceMatcher, best_shift};

/// Matching result of one boring sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceMatch {
    pub depth_from: f64,
    pub depth_to: f64,
    /// Baseline first, then one shift per initial guess.
    pub shifts: Vec<Shift>,
}

impl SequenceMatch {
    pub fn best(&self) -> Option<&Shift> {
        best_shift(&self.shifts)
    }
}

impl SequenceMatcher {
    /// Split `boring` into contiguous sequences and match each in depth order.
    ///
    /// Sequences without any core sample are skipped; other errors abort.
    pub fn match_intervals(
        &self,
        boring: &[BoringInterval],
        lithology: &[LithologyInterval],
        well_log: &DepthSeries,
        core_log: &DepthSeries,
    ) -> Result<Vec<SequenceMatch>, MatchError> {
        let sequences = split_contiguous(boring, self.config().max_gap);
        let mut out = Vec::with_capacity(sequences.len());

        for sequence in sequences {
            let (Some(first), Some(last)) = (sequence.first(), sequence.last()) else {
                continue;
            };
            match self.match_sequence(sequence, lithology, well_log, core_log) {
                Ok(shifts) => out.push(SequenceMatch {
                    depth_from: first.depth_from(),
                    depth_to: last.depth_to(),
                    shifts,
                }),
                Err(MatchError::NoCoreSamples { depth_from, depth_to }) => {
                    warn!(depth_from, depth_to, "boring sequence has no core samples, skipping");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(out)
    }
}

/// Match every contiguous sequence of `boring` with the COBYLA backend.
pub fn match_boring_intervals(
    boring: &[BoringInterval],
    lithology: &[LithologyInterval],
    well_log: &DepthSeries,
    core_log: &DepthSeries,
    config: &MatchConfig,
) -> Result<Vec<SequenceMatch>, MatchError> {
    SequenceMatcher::new(config.clone())?.match_intervals(boring, lithology, well_log, core_log)
}
