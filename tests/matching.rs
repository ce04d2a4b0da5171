use std::sync::Arc;
use std::thread;
use std::time::Duration;

use core_matching::data::{SyntheticLogSpec, shifted_core_log, synthetic_well_log};
use core_matching::math::trunc;
use core_matching::matching::{
    ConstrainedSolver, ConstraintSet, SolverRun, generate_init_deltas, shift_grid,
};
use core_matching::{
    BoringInterval, DepthSeries, LithologyInterval, MatchConfig, MatchError, SequenceMatcher,
    Shift, best_shift, match_boring_intervals, match_boring_sequence,
};

/// Returns the starting point untouched.
struct IdentitySolver;

impl ConstrainedSolver for IdentitySolver {
    fn minimize(
        &self,
        objective: &dyn Fn(&[f64]) -> f64,
        x0: &[f64],
        _constraints: &ConstraintSet,
        _max_iter: usize,
    ) -> Result<SolverRun, MatchError> {
        Ok(SolverRun {
            x: x0.to_vec(),
            loss: objective(x0),
        })
    }
}

/// Takes far longer than any timeout used below, then reports a bogus point.
struct StallingSolver;

impl ConstrainedSolver for StallingSolver {
    fn minimize(
        &self,
        _objective: &dyn Fn(&[f64]) -> f64,
        x0: &[f64],
        _constraints: &ConstraintSet,
        _max_iter: usize,
    ) -> Result<SolverRun, MatchError> {
        thread::sleep(Duration::from_secs(2));
        Ok(SolverRun {
            x: x0.iter().map(|v| v + 1.0).collect(),
            loss: -1.0,
        })
    }
}

/// Reports a point far above any shift limit.
struct OvershootingSolver;

impl ConstrainedSolver for OvershootingSolver {
    fn minimize(
        &self,
        objective: &dyn Fn(&[f64]) -> f64,
        x0: &[f64],
        _constraints: &ConstraintSet,
        _max_iter: usize,
    ) -> Result<SolverRun, MatchError> {
        let mut x = x0.to_vec();
        x[0] = -50.0;
        Ok(SolverRun {
            loss: objective(&x),
            x,
        })
    }
}

struct FailingSolver;

impl ConstrainedSolver for FailingSolver {
    fn minimize(
        &self,
        _objective: &dyn Fn(&[f64]) -> f64,
        _x0: &[f64],
        _constraints: &ConstraintSet,
        _max_iter: usize,
    ) -> Result<SolverRun, MatchError> {
        Err(MatchError::Solver("singular matrix".to_string()))
    }
}

fn well_log() -> DepthSeries {
    synthetic_well_log(&SyntheticLogSpec::default()).unwrap()
}

/// Two fully recovered boring intervals covering `[40, 60]`.
fn full_recovery_sequence() -> (Vec<BoringInterval>, Vec<LithologyInterval>) {
    (
        vec![BoringInterval::new(40.0, 50.0, 10.0), BoringInterval::new(50.0, 60.0, 10.0)],
        vec![LithologyInterval::new(40.0, 50.0), LithologyInterval::new(50.0, 60.0)],
    )
}

fn config() -> MatchConfig {
    MatchConfig {
        max_shift: 5.0,
        delta_from: -3.0,
        delta_to: 3.0,
        delta_step: 1.0,
        max_iter: 50,
        timeout_secs: 60.0,
        ..MatchConfig::default()
    }
}

fn assert_same_shifts(a: &[Shift], b: &[Shift]) {
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(b) {
        assert_eq!(x.sequence_delta, y.sequence_delta);
        assert_eq!(x.interval_deltas, y.interval_deltas);
        assert_eq!(x.depth_from, y.depth_from);
        assert_eq!(x.depth_to, y.depth_to);
        assert!(x.loss == y.loss || (x.loss.is_nan() && y.loss.is_nan()));
    }
}

#[test]
fn identical_logs_correlate_perfectly_at_zero_shift() {
    let well = well_log();
    let (boring, lithology) = full_recovery_sequence();
    let cfg = MatchConfig {
        delta_from: -1.0,
        delta_to: 2.0,
        ..config()
    };

    let shifts = match_boring_sequence(&boring, &lithology, &well, &well, &cfg).unwrap();

    let baseline = &shifts[0];
    assert_eq!(baseline.sequence_delta, 0.0);
    assert_eq!(baseline.depth_from, 40.0);
    assert_eq!(baseline.depth_to, 60.0);
    assert_eq!(baseline.interval_deltas, vec![0.0, 0.0]);
    assert!((baseline.loss + 1.0).abs() < 1e-9, "loss={}", baseline.loss);

    let best = best_shift(&shifts).unwrap();
    assert!((best.loss + 1.0).abs() < 1e-6);
}

#[test]
fn recovers_a_known_sequence_shift() {
    let well = well_log();
    let core = shifted_core_log(&well, 2.0, 40.0, 60.0, 0.1).unwrap();
    let (boring, lithology) = full_recovery_sequence();

    let shifts = match_boring_sequence(&boring, &lithology, &well, &core, &config()).unwrap();
    assert_eq!(shifts.len(), 1 + 6 * 3);

    let best = best_shift(&shifts).unwrap();
    assert!(best.loss < -0.999, "loss={}", best.loss);
    assert!((best.sequence_delta - 2.0).abs() <= 0.02, "delta={}", best.sequence_delta);
    assert!((best.depth_from - (40.0 + best.sequence_delta)).abs() < 1e-9);
}

#[test]
fn sequence_at_top_of_well_never_moves_above_it() {
    let well = well_log();
    // The best alignment would move the sequence 1 m up, out of the well log.
    let core = shifted_core_log(&well, -1.0, 0.0, 10.0, 0.1).unwrap();
    let boring = vec![BoringInterval::new(0.0, 10.0, 10.0)];
    let lithology = vec![LithologyInterval::new(0.0, 10.0)];
    let cfg = MatchConfig {
        delta_from: 0.0,
        delta_to: 3.0,
        ..config()
    };

    let shifts = match_boring_sequence(&boring, &lithology, &well, &core, &cfg).unwrap();
    for shift in &shifts {
        assert!(shift.sequence_delta >= 0.0, "delta={}", shift.sequence_delta);
        assert!(shift.depth_from >= 0.0);
    }
}

/// Sequence `[0, 10]` at the top of the well log, 2 m of core lost.
fn top_of_well_sequence() -> (Vec<BoringInterval>, Vec<LithologyInterval>) {
    (
        vec![BoringInterval::new(0.0, 10.0, 8.0)],
        vec![LithologyInterval::new(0.0, 4.0), LithologyInterval::new(4.0, 8.0)],
    )
}

#[test]
fn short_solver_budget_never_moves_sequence_above_well() {
    let well = well_log();
    let core = shifted_core_log(&well, -1.0, 0.0, 10.0, 0.1).unwrap();
    let (boring, lithology) = top_of_well_sequence();

    for max_iter in [1, 5, 20] {
        // Default grid starts at -5 m, well outside the upward limit of 0.
        let cfg = MatchConfig {
            max_iter,
            ..MatchConfig::default()
        };
        let shifts = match_boring_sequence(&boring, &lithology, &well, &core, &cfg).unwrap();
        assert_eq!(shifts.len(), 1 + 10 * 3);
        for shift in &shifts {
            assert!(shift.sequence_delta >= 0.0, "max_iter={max_iter} {shift:?}");
            assert!(shift.depth_from >= 0.0, "max_iter={max_iter} {shift:?}");
        }
    }
}

#[test]
fn initial_guesses_are_clamped_into_shift_limits() {
    let well = well_log();
    let core = shifted_core_log(&well, -1.0, 0.0, 10.0, 0.1).unwrap();
    let (boring, lithology) = top_of_well_sequence();
    let cfg = MatchConfig {
        delta_from: -3.0,
        delta_to: 2.0,
        ..config()
    };

    let shifts = SequenceMatcher::with_solver(cfg, Arc::new(IdentitySolver))
        .unwrap()
        .match_sequence(&boring, &lithology, &well, &core)
        .unwrap();
    let expected = [0.0, 0.0, 0.0, 0.0, 1.0];
    for (i, shift) in shifts[1..].iter().enumerate() {
        assert_eq!(shift.sequence_delta, expected[i / 3], "{shift:?}");
    }
}

#[test]
fn infeasible_solver_result_falls_back_to_initial_guess() {
    let well = well_log();
    let core = shifted_core_log(&well, 0.5, 40.0, 60.0, 0.1).unwrap();
    let (boring, lithology) = full_recovery_sequence();

    let overshot = SequenceMatcher::with_solver(config(), Arc::new(OvershootingSolver))
        .unwrap()
        .match_sequence(&boring, &lithology, &well, &core)
        .unwrap();
    let initial = SequenceMatcher::with_solver(config(), Arc::new(IdentitySolver))
        .unwrap()
        .match_sequence(&boring, &lithology, &well, &core)
        .unwrap();
    assert_same_shifts(&overshot, &initial);
    assert!(overshot.iter().all(|s| s.sequence_delta > -5.0));
}

#[test]
fn gaps_stay_non_negative_and_within_budget() {
    let well = well_log();
    let core = shifted_core_log(&well, 1.0, 40.0, 50.0, 0.1).unwrap();
    // 2 m of core lost in the boring interval.
    let boring = vec![BoringInterval::new(40.0, 50.0, 8.0)];
    let lithology = vec![LithologyInterval::new(40.0, 44.0), LithologyInterval::new(44.0, 48.0)];
    let cfg = MatchConfig {
        delta_from: -1.0,
        delta_to: 2.0,
        ..config()
    };

    let shifts = match_boring_sequence(&boring, &lithology, &well, &core, &cfg).unwrap();
    assert_eq!(shifts.len(), 1 + 3 * 3);
    for shift in &shifts[1..] {
        let first = shift.interval_deltas[0] - shift.sequence_delta;
        let second = shift.interval_deltas[1] - shift.interval_deltas[0];
        assert!(first >= -1e-9 && second >= -1e-9, "{shift:?}");
        assert!(first + second <= 2.0 + 1e-2, "{shift:?}");
    }
}

#[test]
fn half_recovered_interval_gets_three_gap_hypotheses() {
    let boring = BoringInterval::new(0.0, 10.0, 5.0);
    let deltas = generate_init_deltas(&[1], &[boring.gap_length()], 0.0, 1.0, 1.0).unwrap();
    assert_eq!(deltas, vec![vec![0.0, 0.0], vec![0.0, 2.5], vec![0.0, 5.0]]);
}

#[test]
fn initial_guess_count_follows_grid() {
    let deltas = generate_init_deltas(&[2, 1], &[1.0, 0.5], -2.0, 2.5, 0.5).unwrap();
    let grid = shift_grid(-2.0, 2.5, 0.5).unwrap();
    assert_eq!(grid.len(), 9);
    assert_eq!(deltas.len(), 3 * 9);
    assert!(deltas.iter().all(|d| grid.contains(&d[0])));
}

#[test]
fn timed_out_runs_fall_back_to_their_initial_guess() {
    let well = well_log();
    let core = shifted_core_log(&well, 0.5, 40.0, 60.0, 0.1).unwrap();
    let (boring, lithology) = full_recovery_sequence();
    let cfg = MatchConfig {
        delta_from: 0.0,
        delta_to: 2.0,
        timeout_secs: 0.02,
        workers: Some(2),
        ..config()
    };

    let stalled = SequenceMatcher::with_solver(cfg.clone(), Arc::new(StallingSolver))
        .unwrap()
        .match_sequence(&boring, &lithology, &well, &core)
        .unwrap();
    let patient = MatchConfig {
        timeout_secs: 60.0,
        ..cfg
    };
    let initial = SequenceMatcher::with_solver(patient, Arc::new(IdentitySolver))
        .unwrap()
        .match_sequence(&boring, &lithology, &well, &core)
        .unwrap();

    assert_eq!(stalled.len(), 1 + 2 * 3);
    assert_same_shifts(&stalled, &initial);
    let grid = shift_grid(0.0, 2.0, 1.0).unwrap();
    for (i, shift) in stalled[1..].iter().enumerate() {
        assert_eq!(shift.sequence_delta, trunc(grid[i / 3], 2));
    }
}

#[test]
fn zero_timeout_skips_optimization_entirely() {
    let well = well_log();
    let core = shifted_core_log(&well, 0.5, 40.0, 60.0, 0.1).unwrap();
    let (boring, lithology) = full_recovery_sequence();
    let cfg = MatchConfig {
        timeout_secs: 0.0,
        ..config()
    };

    let cobyla = match_boring_sequence(&boring, &lithology, &well, &core, &cfg).unwrap();
    let initial = SequenceMatcher::with_solver(config(), Arc::new(IdentitySolver))
        .unwrap()
        .match_sequence(&boring, &lithology, &well, &core)
        .unwrap();
    assert_same_shifts(&cobyla, &initial);
}

#[test]
fn solver_failures_fall_back_without_aborting_the_batch() {
    let well = well_log();
    let core = shifted_core_log(&well, 0.5, 40.0, 60.0, 0.1).unwrap();
    let (boring, lithology) = full_recovery_sequence();

    let failed = SequenceMatcher::with_solver(config(), Arc::new(FailingSolver))
        .unwrap()
        .match_sequence(&boring, &lithology, &well, &core)
        .unwrap();
    let initial = SequenceMatcher::with_solver(config(), Arc::new(IdentitySolver))
        .unwrap()
        .match_sequence(&boring, &lithology, &well, &core)
        .unwrap();
    assert_same_shifts(&failed, &initial);
}

#[test]
fn whole_table_is_matched_per_contiguous_sequence() {
    let well = well_log();
    let core = shifted_core_log(&well, 1.0, 20.0, 40.0, 0.1).unwrap();
    let boring = vec![
        BoringInterval::new(20.0, 30.0, 10.0),
        BoringInterval::new(30.0, 40.0, 9.0),
        // Separate sequence without core samples in the core log.
        BoringInterval::new(70.0, 80.0, 10.0),
    ];
    let lithology = vec![
        LithologyInterval::new(20.0, 30.0),
        LithologyInterval::new(30.0, 39.0),
        LithologyInterval::new(70.0, 80.0),
    ];
    let cfg = MatchConfig {
        max_gap: 1.0,
        delta_from: 0.0,
        delta_to: 2.0,
        ..config()
    };

    let matches = match_boring_intervals(&boring, &lithology, &well, &core, &cfg).unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].depth_from, 20.0);
    assert_eq!(matches[0].depth_to, 40.0);
    assert_eq!(matches[0].shifts.len(), 1 + 2 * 3);

    let best = matches[0].best().unwrap();
    assert!(best.loss < -0.99, "loss={}", best.loss);
}
