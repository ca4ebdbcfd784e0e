//! JSON parameter loading.
//!
//! # Format
//!
//! ```json
//! {
//!   "time0": 0, "time1": 100, "time_step": 0.25, "report_every": 4,
//!   "deterministic": false,
//!   "travel": [[1.0]],
//!   "populations": [{
//!     "name": "city",
//!     "size": [50000, 30000],
//!     "matrices": [[[2.0, 0.5], [0.5, 1.5]]],
//!     "u": [0.08, 0.08], "y": [0.3, 0.6], "rho": [0.5, 0.5],
//!     "fIp": [1, 1], "fIa": [0.5, 0.5], "fIs": [1, 1],
//!     "dE":  {"gamma": {"mean": 4.0, "shape": 4.0, "max": 60}},
//!     "dIp": {"gamma": {"mean": 1.5, "shape": 4.0, "max": 60}},
//!     "dIa": {"gamma": {"mean": 5.0, "shape": 4.0, "max": 60}},
//!     "dIs": {"gamma": {"mean": 3.5, "shape": 4.0, "max": 60}},
//!     "dH":  {"fixed": {"delay": 1}},
//!     "dC":  {"fixed": {"delay": 2}},
//!     "seed_events": [{"t": 0, "n": 10}]
//!   }],
//!   "processes": [{
//!     "name": "deaths", "source": "E", "names": ["to_death", "null"],
//!     "prob": [[0.001, 0.01], [0.999, 0.99]],
//!     "delays": [{"gamma": {"mean": 22, "shape": 22, "max": 60}}, {"fixed": {"delay": 0}}],
//!     "report": ["o", ""]
//!   }]
//! }
//! ```

use std::path::Path;

use log::debug;

use crate::{ConfigResult, Parameters};

impl Parameters {
    /// Parse and validate parameters from a JSON string.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let params: Parameters = serde_json::from_str(json)?;
        params.validate()?;
        debug!(
            "loaded parameters: {} populations, {} age groups, {} processes",
            params.populations.len(),
            params.n_groups(),
            params.processes.len()
        );
        Ok(params)
    }

    /// Like [`from_json_str`](Self::from_json_str) but reads from `path`.
    pub fn from_json_path(path: &Path) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
