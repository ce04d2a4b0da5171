//! Domain types used throughout the matching pipeline.
//!
//! This module defines:
//!
//! - interval rows (`BoringInterval`, `LithologyInterval`)
//! - depth-indexed log samples (`DepthSeries`)
//! - match outputs (`Shift`)
//! - run configuration (`MatchConfig`, `NonFinitePolicy`)

pub mod config;
pub mod types;

pub use config::*;
pub use types::*;
