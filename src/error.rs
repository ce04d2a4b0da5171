use thiserror::Error;

/// Errors surfaced by the matching core.
///
/// Timeouts and per-run solver failures are not errors: they fall back to the
/// initial guess of the run (see `matching::matcher`).
#[derive(Debug, Clone, Error)]
pub enum MatchError {
    #[error("Invalid matching configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid shift grid: {0}")]
    InvalidGrid(String),

    #[error("Invalid depth series: {0}")]
    InvalidSeries(String),

    #[error("Boring sequence is empty.")]
    EmptySequence,

    #[error("Well log has {found} non-missing samples; at least 2 are needed for interpolation.")]
    InsufficientWellLog { found: usize },

    #[error("No core samples fall into the lithology intervals of sequence {depth_from}..{depth_to}.")]
    NoCoreSamples { depth_from: f64, depth_to: f64 },

    #[error("Solver failed: {0}")]
    Solver(String),

    #[error("Worker pool error: {0}")]
    WorkerPool(String),
}

impl MatchError {
    /// Process exit code for front-ends that wrap the library.
    pub fn exit_code(&self) -> u8 {
        match self {
            MatchError::InvalidConfig(_)
            | MatchError::InvalidGrid(_)
            | MatchError::InvalidSeries(_) => 2,
            MatchError::EmptySequence
            | MatchError::InsufficientWellLog { .. }
            | MatchError::NoCoreSamples { .. } => 3,
            MatchError::Solver(_) | MatchError::WorkerPool(_) => 4,
        }
    }
}
