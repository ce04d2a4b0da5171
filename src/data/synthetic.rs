//! Seeded synthetic logs.
//!
//! A synthetic well log is a sum of a few random sinusoids (wavelengths of a
//! few meters, like bed-scale log variations) plus optional Gaussian noise.
//! A matching core log is obtained by sampling that well log at shifted
//! depths, which gives a ground-truth `sequence_delta` to recover.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::DepthSeries;
use crate::error::MatchError;
use crate::math::LinearInterpolator;

/// Shortest and longest wavelength of the synthetic signal components (meters).
const WAVELENGTH_RANGE: (f64, f64) = (2.0, 15.0);

#[derive(Debug, Clone)]
pub struct SyntheticLogSpec {
    pub depth_from: f64,
    pub depth_to: f64,
    pub step: f64,
    pub seed: u64,
    /// Number of sinusoidal components.
    pub components: usize,
    /// Standard deviation of additive noise; `0.0` disables it.
    pub noise_sigma: f64,
}

impl Default for SyntheticLogSpec {
    fn default() -> Self {
        Self {
            depth_from: 0.0,
            depth_to: 100.0,
            step: 0.1,
            seed: 42,
            components: 4,
            noise_sigma: 0.0,
        }
    }
}

/// Regular depth grid `from, from + step, ...` up to and including `to`.
pub fn depth_grid(from: f64, to: f64, step: f64) -> Result<Vec<f64>, MatchError> {
    if !(from.is_finite() && to.is_finite() && step.is_finite() && step > 0.0 && to >= from) {
        return Err(MatchError::InvalidSeries(format!(
            "Invalid depth grid: from={from}, to={to}, step={step}"
        )));
    }
    // Small slack so that `to` itself survives rounding of `(to - from) / step`.
    let n = ((to - from) / step + 1e-9).floor() as usize + 1;
    Ok((0..n).map(|i| from + i as f64 * step).collect())
}

pub fn synthetic_well_log(spec: &SyntheticLogSpec) -> Result<DepthSeries, MatchError> {
    if spec.components == 0 {
        return Err(MatchError::InvalidSeries("Synthetic log needs at least one component.".to_string()));
    }
    let depths = depth_grid(spec.depth_from, spec.depth_to, spec.step)?;

    let mut rng = StdRng::seed_from_u64(spec.seed);
    let components: Vec<(f64, f64, f64)> = (0..spec.components)
        .map(|_| {
            let wavelength = rng.gen_range(WAVELENGTH_RANGE.0..WAVELENGTH_RANGE.1);
            let amplitude = rng.gen_range(0.5..1.5);
            let phase = rng.gen_range(0.0..std::f64::consts::TAU);
            (std::f64::consts::TAU / wavelength, amplitude, phase)
        })
        .collect();

    let noise = if spec.noise_sigma > 0.0 {
        Some(
            Normal::new(0.0, spec.noise_sigma)
                .map_err(|e| MatchError::InvalidSeries(format!("Noise distribution error: {e}")))?,
        )
    } else {
        None
    };

    let values: Vec<f64> = depths
        .iter()
        .map(|&d| {
            let signal: f64 = components
                .iter()
                .map(|&(k, a, phi)| a * (k * d + phi).sin())
                .sum();
            match &noise {
                Some(normal) => signal + normal.sample(&mut rng),
                None => signal,
            }
        })
        .collect();

    DepthSeries::new(depths, values)
}

/// Sample `well` at `depth + shift` for every depth of a regular grid.
///
/// Matching the returned core log against `well` is solved by
/// `sequence_delta == shift`.
pub fn shifted_core_log(
    well: &DepthSeries,
    shift: f64,
    depth_from: f64,
    depth_to: f64,
    step: f64,
) -> Result<DepthSeries, MatchError> {
    let interpolator = LinearInterpolator::from_series(well)?;
    let depths = depth_grid(depth_from, depth_to, step)?;
    let values = depths.iter().map(|&d| interpolator.eval(d + shift)).collect();
    DepthSeries::new(depths, values)
}
