//! Discrete sojourn-time distributions.
//!
//! A `DelayDist` is a normalised pmf over whole simulation steps: weight `k`
//! is the probability of maturing on the `k`-th `mature` call after the one
//! in the step of entry.  Continuous distributions are discretised on the
//! run's time step by integrating the density over
//! `[t - step/2, t + step/2]` around each grid point `t = 0, step, …, max`.

use statrs::distribution::{ContinuousCDF, Gamma, LogNormal};

use crate::{CompartmentError, CompartmentResult};

/// A normalised discrete delay distribution.
#[derive(Clone, Debug, PartialEq)]
pub struct DelayDist {
    weights: Vec<f64>,
}

impl DelayDist {
    /// Build from raw non-negative weights; they are normalised to sum to 1.
    pub fn from_weights(weights: Vec<f64>) -> CompartmentResult<Self> {
        if weights.is_empty() {
            return Err(CompartmentError::InvalidDelay("no weights given".into()));
        }
        if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(CompartmentError::InvalidDelay(format!("weight {w} is negative or non-finite")));
        }
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return Err(CompartmentError::InvalidDelay("weights sum to zero".into()));
        }
        Ok(Self { weights: weights.into_iter().map(|w| w / total).collect() })
    }

    /// Every member matures exactly `steps` steps after entry.
    pub fn fixed(steps: usize) -> Self {
        let mut weights = vec![0.0; steps + 1];
        weights[steps] = 1.0;
        Self { weights }
    }

    /// Every member matures on the first `mature` call after entry.
    pub fn immediate() -> Self {
        Self::fixed(0)
    }

    /// Gamma-distributed delay with the given mean and shape, truncated at
    /// `max` time units and discretised on `time_step`.
    pub fn gamma(mean: f64, shape: f64, max: f64, time_step: f64) -> CompartmentResult<Self> {
        if !(mean > 0.0) || !(shape > 0.0) {
            return Err(CompartmentError::InvalidDelay(format!(
                "gamma needs positive mean and shape, got mean={mean} shape={shape}"
            )));
        }
        let dist = Gamma::new(shape, shape / mean)
            .map_err(|e| CompartmentError::InvalidDelay(e.to_string()))?;
        Self::discretise(|x| dist.cdf(x), max, time_step)
    }

    /// Lognormal delay with the given mean and standard deviation, truncated
    /// at `max` time units and discretised on `time_step`.
    pub fn lognormal(mean: f64, sd: f64, max: f64, time_step: f64) -> CompartmentResult<Self> {
        if !(mean > 0.0) || !(sd > 0.0) {
            return Err(CompartmentError::InvalidDelay(format!(
                "lognormal needs positive mean and sd, got mean={mean} sd={sd}"
            )));
        }
        let sigma2 = (1.0 + (sd * sd) / (mean * mean)).ln();
        let mu = mean.ln() - sigma2 / 2.0;
        let dist = LogNormal::new(mu, sigma2.sqrt())
            .map_err(|e| CompartmentError::InvalidDelay(e.to_string()))?;
        Self::discretise(|x| dist.cdf(x), max, time_step)
    }

    fn discretise(cdf: impl Fn(f64) -> f64, max: f64, time_step: f64) -> CompartmentResult<Self> {
        if !(time_step > 0.0) || !(max >= 0.0) {
            return Err(CompartmentError::InvalidDelay(format!(
                "need time_step > 0 and max >= 0, got time_step={time_step} max={max}"
            )));
        }
        let n_points = (max / time_step).round() as usize + 1;
        let half = time_step / 2.0;
        let weights = (0..n_points)
            .map(|i| {
                let t = i as f64 * time_step;
                cdf(t + half) - cdf((t - half).max(0.0))
            })
            .collect();
        Self::from_weights(weights)
    }

    /// The normalised pmf.
    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Number of bins (longest possible delay + 1).
    #[inline]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Expected delay in steps.
    pub fn mean_steps(&self) -> f64 {
        self.weights.iter().enumerate().map(|(k, w)| k as f64 * w).sum()
    }
}
