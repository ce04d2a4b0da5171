//! Matching run configuration.
//!
//! `MatchConfig` is a plain serializable value so callers can keep it in
//! whatever settings format they already use. `MatchConfig::from_env` covers
//! the common case of tuning a run through `CORE_MATCH_*` environment
//! variables (or a `.env` file).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::MatchError;

/// What the loss evaluator does with non-finite interpolated well-log values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NonFinitePolicy {
    /// Replace non-finite values with `0.0` before correlating.
    #[default]
    Zero,
    /// Keep them; the loss then becomes NaN.
    Propagate,
}

/// Parameters of a multi-start matching run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Maximum whole-sequence shift in either direction (meters).
    pub max_shift: f64,
    /// Start of the initial whole-sequence shift grid (meters).
    pub delta_from: f64,
    /// End of the initial shift grid, exclusive (meters).
    pub delta_to: f64,
    /// Step of the initial shift grid (meters).
    pub delta_step: f64,
    /// Solver iteration cap per run.
    pub max_iter: usize,
    /// Wall-clock budget per run (seconds).
    pub timeout_secs: f64,
    /// Largest depth gap tolerated inside one boring sequence (meters).
    pub max_gap: f64,
    /// Worker count override; `None` uses the execution environment's default.
    pub workers: Option<usize>,
    /// Initial trust-region radius of the solver (meters).
    pub rhobeg: f64,
    pub non_finite: NonFinitePolicy,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_shift: 5.0,
            delta_from: -5.0,
            delta_to: 5.0,
            delta_step: 1.0,
            max_iter: 100,
            timeout_secs: 10.0,
            max_gap: 0.0,
            workers: None,
            rhobeg: 0.5,
            non_finite: NonFinitePolicy::Zero,
        }
    }
}

impl MatchConfig {
    /// Load `.env` (if present) and apply `CORE_MATCH_*` overrides on top of the defaults.
    pub fn from_env() -> Result<Self, MatchError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, MatchError> {
        let mut config = Self::default();

        if let Some(v) = parse_var(&lookup, "CORE_MATCH_MAX_SHIFT")? {
            config.max_shift = v;
        }
        if let Some(v) = parse_var(&lookup, "CORE_MATCH_DELTA_FROM")? {
            config.delta_from = v;
        }
        if let Some(v) = parse_var(&lookup, "CORE_MATCH_DELTA_TO")? {
            config.delta_to = v;
        }
        if let Some(v) = parse_var(&lookup, "CORE_MATCH_DELTA_STEP")? {
            config.delta_step = v;
        }
        if let Some(v) = parse_var(&lookup, "CORE_MATCH_MAX_ITER")? {
            config.max_iter = v;
        }
        if let Some(v) = parse_var(&lookup, "CORE_MATCH_TIMEOUT_SECS")? {
            config.timeout_secs = v;
        }
        if let Some(v) = parse_var(&lookup, "CORE_MATCH_MAX_GAP")? {
            config.max_gap = v;
        }
        if let Some(v) = parse_var(&lookup, "CORE_MATCH_WORKERS")? {
            config.workers = Some(v);
        }
        if let Some(v) = parse_var(&lookup, "CORE_MATCH_RHOBEG")? {
            config.rhobeg = v;
        }
        if let Some(strict) = parse_var::<bool, _>(&lookup, "CORE_MATCH_STRICT_NON_FINITE")? {
            config.non_finite = if strict {
                NonFinitePolicy::Propagate
            } else {
                NonFinitePolicy::Zero
            };
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        if !(self.max_shift.is_finite() && self.max_shift > 0.0) {
            return Err(MatchError::InvalidConfig(format!(
                "max_shift must be finite and > 0, got {}",
                self.max_shift
            )));
        }
        if !(self.delta_from.is_finite() && self.delta_to.is_finite()) {
            return Err(MatchError::InvalidConfig(
                "delta_from and delta_to must be finite".to_string(),
            ));
        }
        if !self.delta_step.is_finite() || self.delta_step == 0.0 {
            return Err(MatchError::InvalidConfig(format!(
                "delta_step must be finite and non-zero, got {}",
                self.delta_step
            )));
        }
        if self.max_iter == 0 {
            return Err(MatchError::InvalidConfig("max_iter must be >= 1".to_string()));
        }
        if !(self.timeout_secs.is_finite() && self.timeout_secs >= 0.0) {
            return Err(MatchError::InvalidConfig(format!(
                "timeout_secs must be finite and >= 0, got {}",
                self.timeout_secs
            )));
        }
        if !(self.max_gap.is_finite() && self.max_gap >= 0.0) {
            return Err(MatchError::InvalidConfig(format!(
                "max_gap must be finite and >= 0, got {}",
                self.max_gap
            )));
        }
        if self.workers == Some(0) {
            return Err(MatchError::InvalidConfig("workers must be >= 1 when set".to_string()));
        }
        if !(self.rhobeg.is_finite() && self.rhobeg > 0.0) {
            return Err(MatchError::InvalidConfig(format!(
                "rhobeg must be finite and > 0, got {}",
                self.rhobeg
            )));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Result<Duration, MatchError> {
        Duration::try_from_secs_f64(self.timeout_secs)
            .map_err(|e| MatchError::InvalidConfig(format!("timeout_secs: {e}")))
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, MatchError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| MatchError::InvalidConfig(format!("{key}={raw:?}: {e}"))),
    }
}
