//! `core-matching` library crate.
//!
//! Aligns a sparse core log with a continuous well log by searching for the
//! depth shift of each boring sequence and the placement of unrecovered core
//! inside each boring interval that maximize their correlation.
//!
//! Layout:
//!
//! - `domain`: interval rows, depth series, shifts, configuration
//! - `math`: truncation, interpolation, correlation
//! - `data`: sequence segmentation and synthetic logs
//! - `matching`: grid, loss, constraints, solver, worker pool, orchestration

pub mod data;
pub mod domain;
pub mod error;
pub mod math;
pub mod matching;

pub use domain::{BoringInterval, DepthSeries, LithologyInterval, MatchConfig, NonFinitePolicy, Shift};
pub use error::MatchError;
pub use matching::{SequenceMatch, SequenceMatcher, best_shift, match_boring_intervals, match_boring_sequence};
