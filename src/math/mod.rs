//! Numeric building blocks: truncation, interpolation, correlation.

pub mod interp;
pub mod stats;
pub mod trunc;

pub use interp::*;
pub use stats::*;
pub use trunc::*;
