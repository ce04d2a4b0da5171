//! Core-to-log matching.
//!
//! Responsibilities:
//!
//! - generate initial guesses (shift grid x gap placement hypotheses)
//! - evaluate the correlation loss of a delta vector
//! - express physical feasibility as inequality constraints
//! - run one constrained minimization per guess (parallel, with timeouts)
//! - report shifts and pick the best one

pub mod constraints;
pub mod grid;
pub mod layout;
pub mod loss;
pub mod matcher;
pub mod pipeline;
pub mod pool;
pub mod selection;
pub mod solver;

pub use constraints::*;
pub use grid::*;
pub use layout::*;
pub use loss::*;
pub use matcher::*;
pub use pipeline::*;
pub use pool::*;
pub use selection::*;
pub use solver::*;
