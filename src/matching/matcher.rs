//! Multi-start matching of one boring sequence.
//!
//! Given a boring sequence, its lithology intervals and the two logs, we:
//!
//! - collect the core samples of every lithology interval
//! - build the feasibility constraints and the initial guess grid
//! - clamp each initial guess into the shift limits
//! - record the zero-shift baseline
//! - run one constrained minimization per initial guess on a worker pool
//! - turn every run into a [`Shift`]
//!
//! A run that exceeds its timeout, whose solver fails, or whose final point
//! violates the constraints falls back to its (clamped) initial guess with the
//! loss evaluated directly. Every initial guess
//! therefore yields exactly one shift.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{BoringInterval, DepthSeries, LithologyInterval, MatchConfig, Shift};
use crate::error::MatchError;
use crate::math::{LinearInterpolator, trunc};
use crate::matching::{
    CancelToken, Cobyla, ConstrainedSolver, ConstraintSet, DeltaLayout, LossEvaluator, SolverRun,
    TaskOutcome, WorkerPool, best_shift, generate_init_deltas,
};

/// Decimal places kept in reported deltas.
const DELTA_DECIMALS: u32 = 2;

/// Largest constraint violation accepted in a solver's final point.
const FEASIBILITY_TOL: f64 = 1e-6;

/// Runs multi-start matching with a fixed configuration and solver backend.
#[derive(Clone)]
pub struct SequenceMatcher {
    config: MatchConfig,
    solver: Arc<dyn ConstrainedSolver>,
}

impl std::fmt::Debug for SequenceMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceMatcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SequenceMatcher {
    /// Matcher using the COBYLA backend.
    pub fn new(config: MatchConfig) -> Result<Self, MatchError> {
        let solver = Arc::new(Cobyla::from_config(&config));
        Self::with_solver(config, solver)
    }

    pub fn with_solver(
        config: MatchConfig,
        solver: Arc<dyn ConstrainedSolver>,
    ) -> Result<Self, MatchError> {
        config.validate()?;
        Ok(Self { config, solver })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Match one boring sequence.
    ///
    /// Returns the zero-shift baseline followed by one shift per initial
    /// guess, in grid order.
    pub fn match_sequence(
        &self,
        sequence: &[BoringInterval],
        lithology: &[LithologyInterval],
        well_log: &DepthSeries,
        core_log: &DepthSeries,
    ) -> Result<Vec<Shift>, MatchError> {
        let config = &self.config;
        let timeout = config.timeout()?;

        let well_extent = match (well_log.depth_from(), well_log.depth_to()) {
            (Some(from), Some(to)) => (from, to),
            _ => return Err(MatchError::InsufficientWellLog { found: 0 }),
        };
        let interpolator = LinearInterpolator::from_series(well_log)?;

        let Some(sequence_extent) = sequence_extent(sequence) else {
            return Err(MatchError::EmptySequence);
        };
        let (sequence_from, sequence_to) = sequence_extent;

        let samples = CoreSamples::collect(sequence, lithology, core_log);
        if samples.values.is_empty() {
            return Err(MatchError::NoCoreSamples {
                depth_from: sequence_from,
                depth_to: sequence_to,
            });
        }

        let layout = DeltaLayout::new(samples.counts.clone());
        let constraints = ConstraintSet::build(
            &layout,
            &samples.gap_lengths,
            config.max_shift,
            sequence_extent,
            well_extent,
        );
        let init_deltas = generate_init_deltas(
            &samples.counts,
            &samples.gap_lengths,
            config.delta_from,
            config.delta_to,
            config.delta_step,
        )?;

        let problem = Arc::new(SequenceProblem {
            evaluator: LossEvaluator::new(
                layout,
                samples.depths,
                samples.values,
                interpolator,
                config.non_finite,
            ),
            constraints,
            max_iter: config.max_iter,
        });
        let starts: Vec<Vec<f64>> = init_deltas
            .iter()
            .map(|x0| problem.constraints.project_shift(x0))
            .collect();
        let pool = WorkerPool::new(config.workers)?;

        debug!(
            depth_from = sequence_from,
            depth_to = sequence_to,
            boring_intervals = sequence.len(),
            lithology_intervals = problem.evaluator.layout().n_gaps(),
            core_samples = problem.evaluator.n_samples(),
            initial_guesses = starts.len(),
            constraints = problem.constraints.len(),
            workers = pool.num_workers(),
            "matching boring sequence"
        );

        let mut shifts = Vec::with_capacity(init_deltas.len() + 1);

        let zero = vec![0.0; problem.evaluator.layout().delta_len()];
        shifts.push(Shift {
            depth_from: sequence_from,
            depth_to: sequence_to,
            sequence_delta: 0.0,
            interval_deltas: zero[1..].to_vec(),
            loss: problem.evaluator.loss(&zero),
        });

        let handles: Vec<_> = starts
            .iter()
            .map(|x0| {
                let problem = Arc::clone(&problem);
                let solver = Arc::clone(&self.solver);
                let x0 = x0.clone();
                pool.submit(move |cancel| problem.optimize(solver.as_ref(), &x0, cancel))
            })
            .collect();

        let mut timed_out = 0usize;
        let mut failed = 0usize;
        for (run_idx, (handle, x0)) in handles.into_iter().zip(&starts).enumerate() {
            let run = match handle.wait(timeout) {
                TaskOutcome::Completed(run) => run,
                TaskOutcome::TimedOut => {
                    timed_out += 1;
                    warn!(run_idx, sequence_delta = x0[0], "run timed out, using its initial guess");
                    problem.fallback(x0)
                }
                TaskOutcome::Failed(reason) => {
                    failed += 1;
                    warn!(run_idx, sequence_delta = x0[0], %reason, "run failed, using its initial guess");
                    problem.fallback(x0)
                }
            };
            shifts.push(finalize_shift(
                problem.evaluator.layout(),
                &run.x,
                run.loss,
                sequence_extent,
            ));
        }
        drop(pool);

        info!(
            depth_from = sequence_from,
            depth_to = sequence_to,
            runs = starts.len(),
            timed_out,
            failed,
            best_loss = best_shift(&shifts).map(|s| s.loss),
            "boring sequence matched"
        );

        Ok(shifts)
    }
}

/// Match one boring sequence with the COBYLA backend.
///
/// See [`SequenceMatcher::match_sequence`].
pub fn match_boring_sequence(
    sequence: &[BoringInterval],
    lithology: &[LithologyInterval],
    well_log: &DepthSeries,
    core_log: &DepthSeries,
    config: &MatchConfig,
) -> Result<Vec<Shift>, MatchError> {
    SequenceMatcher::new(config.clone())?.match_sequence(sequence, lithology, well_log, core_log)
}

/// Turn a raw delta vector into a reported shift.
///
/// The sequence delta and the gaps are truncated to two decimals, gaps are
/// floored at zero, then accumulated per boring interval.
pub fn finalize_shift(layout: &DeltaLayout, deltas: &[f64], loss: f64, sequence: (f64, f64)) -> Shift {
    let sequence_delta = trunc(deltas[0], DELTA_DECIMALS);
    let gaps: Vec<f64> = deltas[1..]
        .iter()
        .map(|&g| trunc(g, DELTA_DECIMALS).max(0.0))
        .collect();
    Shift {
        depth_from: sequence.0 + sequence_delta,
        depth_to: sequence.1 + sequence_delta,
        sequence_delta,
        interval_deltas: layout.interval_offsets(sequence_delta, &gaps),
        loss,
    }
}

fn sequence_extent(sequence: &[BoringInterval]) -> Option<(f64, f64)> {
    if sequence.is_empty() {
        return None;
    }
    let from = sequence.iter().map(|b| b.depth_from).fold(f64::INFINITY, f64::min);
    let to = sequence.iter().map(|b| b.depth_to).fold(f64::NEG_INFINITY, f64::max);
    Some((from, to))
}

/// Read-only state shared by all runs of one sequence.
struct SequenceProblem {
    evaluator: LossEvaluator,
    constraints: ConstraintSet,
    max_iter: usize,
}

impl SequenceProblem {
    fn optimize(
        &self,
        solver: &dyn ConstrainedSolver,
        x0: &[f64],
        cancel: &CancelToken,
    ) -> Result<SolverRun, String> {
        // Once abandoned, a flat objective lets the solver stop quickly.
        let objective = |x: &[f64]| {
            if cancel.is_cancelled() {
                0.0
            } else {
                self.evaluator.loss(x)
            }
        };
        let run = solver
            .minimize(&objective, x0, &self.constraints, self.max_iter)
            .map_err(|e| e.to_string())?;
        if !self.constraints.is_satisfied(&run.x, FEASIBILITY_TOL) {
            return Err(format!(
                "solver ended outside the feasible region at sequence_delta={}",
                run.x[0]
            ));
        }
        Ok(run)
    }

    fn fallback(&self, x0: &[f64]) -> SolverRun {
        SolverRun {
            x: x0.to_vec(),
            loss: self.evaluator.loss(x0),
        }
    }
}

/// Core samples of a sequence, grouped the way the delta vector is.
struct CoreSamples {
    counts: Vec<usize>,
    gap_lengths: Vec<f64>,
    depths: Vec<Vec<f64>>,
    values: Vec<f64>,
}

impl CoreSamples {
    fn collect(
        sequence: &[BoringInterval],
        lithology: &[LithologyInterval],
        core_log: &DepthSeries,
    ) -> Self {
        let mut samples = Self {
            counts: Vec::with_capacity(sequence.len()),
            gap_lengths: Vec::with_capacity(sequence.len()),
            depths: Vec::new(),
            values: Vec::new(),
        };
        for boring in sequence {
            let mut n = 0;
            for li in lithology.iter().filter(|li| li.is_within(boring)) {
                let (depths, values) = core_log.slice(li.depth_from, li.depth_to);
                samples.depths.push(depths.to_vec());
                samples.values.extend_from_slice(values);
                n += 1;
            }
            samples.counts.push(n);
            samples.gap_lengths.push(boring.gap_length());
        }
        samples
    }
}
