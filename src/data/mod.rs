//! Table and series helpers around the matching core.
//!
//! - `segment`: split boring tables into contiguous sequences
//! - `synthetic`: seeded synthetic well/core logs for tests and demos

pub mod segment;
pub mod synthetic;

pub use segment::*;
pub use synthetic::*;
