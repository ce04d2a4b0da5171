//! Constrained minimization backends.
//!
//! The orchestrator only needs "minimize this objective from this starting
//! point subject to `g(x) >= 0` constraints with an iteration cap", so the
//! solver sits behind [`ConstrainedSolver`]. The default backend is COBYLA, a
//! derivative-free trust-region method that handles inequality constraints
//! natively.

use cobyla::RhoBeg;

use crate::domain::MatchConfig;
use crate::error::MatchError;
use crate::matching::ConstraintSet;

/// Half-width of the box every variable is confined to. The real feasible
/// region comes from the constraint set.
const SEARCH_BOX: f64 = 1e6;

/// Final point and objective value of one solver run.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverRun {
    pub x: Vec<f64>,
    pub loss: f64,
}

pub trait ConstrainedSolver: Send + Sync {
    /// Minimize `objective` starting from `x0` subject to `constraints`.
    ///
    /// `max_iter` is counted in gradient-based iterations; backends translate
    /// it into their own budget.
    fn minimize(
        &self,
        objective: &dyn Fn(&[f64]) -> f64,
        x0: &[f64],
        constraints: &ConstraintSet,
        max_iter: usize,
    ) -> Result<SolverRun, MatchError>;
}

/// COBYLA backend.
#[derive(Debug, Clone)]
pub struct Cobyla {
    /// Initial trust-region radius.
    pub rhobeg: f64,
}

impl Cobyla {
    pub fn from_config(config: &MatchConfig) -> Self {
        Self {
            rhobeg: config.rhobeg,
        }
    }
}

impl Default for Cobyla {
    fn default() -> Self {
        Self { rhobeg: 0.5 }
    }
}

impl ConstrainedSolver for Cobyla {
    fn minimize(
        &self,
        objective: &dyn Fn(&[f64]) -> f64,
        x0: &[f64],
        constraints: &ConstraintSet,
        max_iter: usize,
    ) -> Result<SolverRun, MatchError> {
        let func = |x: &[f64], _data: &mut ()| objective(x);
        let cons: Vec<_> = constraints
            .iter()
            .map(|c| move |x: &[f64], _data: &mut ()| c.eval(x))
            .collect();
        let bounds = vec![(-SEARCH_BOX, SEARCH_BOX); x0.len()];
        // One finite-difference gradient iteration costs `n + 1` evaluations.
        let maxeval = max_iter.saturating_mul(x0.len() + 1);

        match cobyla::minimize(
            func,
            x0,
            &bounds,
            &cons,
            (),
            maxeval,
            RhoBeg::All(self.rhobeg),
            None,
        ) {
            Ok((_status, x, loss)) => Ok(SolverRun { x, loss }),
            Err((status, _, _)) => Err(MatchError::Solver(format!("COBYLA stopped with {status:?}"))),
        }
    }
}
