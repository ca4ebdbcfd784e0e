//! Serialisable delay descriptions, discretised into `DelayDist`s once the
//! run's time step is known.
//!
//! ```json
//! {"gamma":     {"mean": 4.0, "shape": 4.0, "max": 60}}
//! {"lognormal": {"mean": 5.0, "sd": 2.0, "max": 60}}
//! {"fixed":     {"delay": 2.0}}
//! {"weights":   [0.0, 0.25, 0.5, 0.25]}
//! ```
//!
//! `weights` are taken per simulation step as given; the other forms are in
//! units of model time.

use epi_compartment::DelayDist;
use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DelaySpec {
    Gamma { mean: f64, shape: f64, max: f64 },
    Lognormal { mean: f64, sd: f64, max: f64 },
    Fixed { delay: f64 },
    Weights(Vec<f64>),
}

impl DelaySpec {
    /// Discretise on `time_step`.  `field` names the parameter in errors.
    pub fn resolve(&self, time_step: f64, field: &str) -> ConfigResult<DelayDist> {
        let wrap = |source| ConfigError::Delay { field: field.to_owned(), source };
        match self {
            DelaySpec::Gamma { mean, shape, max } => {
                DelayDist::gamma(*mean, *shape, *max, time_step).map_err(wrap)
            }
            DelaySpec::Lognormal { mean, sd, max } => {
                DelayDist::lognormal(*mean, *sd, *max, time_step).map_err(wrap)
            }
            DelaySpec::Fixed { delay } => {
                if !(*delay >= 0.0) || !(time_step > 0.0) {
                    return Err(ConfigError::invalid(field, format!("fixed delay {delay} must be >= 0")));
                }
                Ok(DelayDist::fixed((delay / time_step).round() as usize))
            }
            DelaySpec::Weights(w) => DelayDist::from_weights(w.clone()).map_err(wrap),
        }
    }
}
