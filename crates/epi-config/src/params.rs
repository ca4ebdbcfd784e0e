//! Simulation parameters as supplied by the caller.
//!
//! The structs here are plain data with `serde` derives.  They are checked
//! once by [`Parameters::validate`] and never mutated after a run starts.

use epi_core::{Matrix, SamplingMode, TimeGrid};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult, DelaySpec, ProcessDecl};

// ── Seeding and schedules ─────────────────────────────────────────────────────

/// Inject `n` individuals from Susceptible into Exposed at time `t`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeedEvent {
    pub t: f64,
    #[serde(default = "one")]
    pub n: f64,
}

fn one() -> f64 {
    1.0
}

/// A per-population quantity that a scheduled change may overwrite.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduledVariable {
    /// Multipliers on the component contact matrices (one per matrix).
    #[serde(rename = "contact")]
    Contact,
    #[serde(rename = "u")]
    Susceptibility,
    #[serde(rename = "y")]
    ClinicalFraction,
    #[serde(rename = "rho")]
    Reporting,
    #[serde(rename = "fIp")]
    InfectiousnessPresymptomatic,
    #[serde(rename = "fIa")]
    InfectiousnessAsymptomatic,
    #[serde(rename = "fIs")]
    InfectiousnessSymptomatic,
    #[serde(rename = "tau")]
    ExternalMixing,
}

/// Assign `value` to `variable` from time `t` onwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduledChange {
    pub t:        f64,
    pub variable: ScheduledVariable,
    pub value:    Vec<f64>,
}

// ── PopulationParams ──────────────────────────────────────────────────────────

/// Parameters of one subpopulation.  Every per-age vector has one entry per
/// age group, in the order of `size`.
///
/// Vectors marked *optional* may be left empty and take the documented
/// default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PopulationParams {
    #[serde(default)]
    pub name: String,

    /// Age-group labels (optional; defaults to the group index).
    #[serde(default)]
    pub group_names: Vec<String>,

    /// Individuals per age group.
    pub size: Vec<f64>,

    /// Component contact matrices, `[a][b]` = contacts of age `a` with age `b`.
    pub matrices: Vec<Matrix>,

    /// Multiplier per component matrix (optional; default 1 each).
    #[serde(default)]
    pub contact: Vec<f64>,

    /// Susceptibility per age.
    #[serde(rename = "u")]
    pub susceptibility: Vec<f64>,

    /// Probability that an infection is clinical (E → Ip rather than Ia).
    #[serde(rename = "y")]
    pub clinical_fraction: Vec<f64>,

    /// Probability that a clinical case is reported (optional; default 0).
    #[serde(rename = "rho", default)]
    pub reporting: Vec<f64>,

    /// Relative infectiousness of the Ip, Ia and Is states.
    #[serde(rename = "fIp")]
    pub infectiousness_presymptomatic: Vec<f64>,
    #[serde(rename = "fIa")]
    pub infectiousness_asymptomatic: Vec<f64>,
    #[serde(rename = "fIs")]
    pub infectiousness_symptomatic: Vec<f64>,

    /// Scaling applied to this population's infectiousness when it acts on
    /// other populations (optional; default 1).
    #[serde(rename = "tau", default)]
    pub external_mixing: Vec<f64>,

    #[serde(rename = "dE")]
    pub delay_exposed: DelaySpec,
    #[serde(rename = "dIp")]
    pub delay_presymptomatic: DelaySpec,
    #[serde(rename = "dIa")]
    pub delay_asymptomatic: DelaySpec,
    #[serde(rename = "dIs")]
    pub delay_symptomatic: DelaySpec,
    #[serde(rename = "dH")]
    pub delay_hospital: DelaySpec,
    #[serde(rename = "dC")]
    pub delay_reporting: DelaySpec,

    /// Seeding events in chronological order.
    #[serde(default)]
    pub seed_events: Vec<SeedEvent>,

    /// Shorthand for seed events of one individual each, in chronological
    /// order.  Merged with `seed_events` by [`PopulationParams::seed_schedule`].
    #[serde(default)]
    pub seed_times: Vec<f64>,

    /// Age weights for seeding (optional; default uniform).
    #[serde(default)]
    pub seed_ages: Vec<f64>,

    /// Parameter changes in chronological order.
    #[serde(default)]
    pub schedule: Vec<ScheduledChange>,
}

impl PopulationParams {
    #[inline]
    pub fn n_groups(&self) -> usize {
        self.size.len()
    }

    /// Label for age group `a`.
    pub fn group_name(&self, a: usize) -> String {
        self.group_names.get(a).cloned().unwrap_or_else(|| a.to_string())
    }

    /// `seed_events` and `seed_times` merged into one chronological list.
    /// Events at equal times keep `seed_events` first.
    pub fn seed_schedule(&self) -> Vec<SeedEvent> {
        let mut events = self.seed_events.clone();
        events.extend(self.seed_times.iter().map(|&t| SeedEvent { t, n: 1.0 }));
        events.sort_by(|a, b| a.t.total_cmp(&b.t));
        events
    }

    fn validate(&self, p: usize, n_groups: usize) -> ConfigResult<()> {
        let field = |name: &str| format!("populations[{p}].{name}");

        if self.size.len() != n_groups {
            return Err(ConfigError::invalid(
                field("size"),
                format!("has {} age groups, population 0 has {n_groups}", self.size.len()),
            ));
        }
        check_non_negative(&field("size"), &self.size)?;

        if self.matrices.is_empty() {
            return Err(ConfigError::invalid(field("matrices"), "at least one contact matrix is required"));
        }
        for (m, matrix) in self.matrices.iter().enumerate() {
            if matrix.rows() != n_groups || matrix.cols() != n_groups {
                return Err(ConfigError::invalid(
                    field(&format!("matrices[{m}]")),
                    format!("is {}x{}, expected {n_groups}x{n_groups}", matrix.rows(), matrix.cols()),
                ));
            }
        }
        if !self.contact.is_empty() && self.contact.len() != self.matrices.len() {
            return Err(ConfigError::invalid(
                field("contact"),
                format!("has {} entries for {} matrices", self.contact.len(), self.matrices.len()),
            ));
        }

        check_len(&field("u"), &self.susceptibility, n_groups, false)?;
        check_len(&field("y"), &self.clinical_fraction, n_groups, false)?;
        check_len(&field("rho"), &self.reporting, n_groups, true)?;
        check_len(&field("fIp"), &self.infectiousness_presymptomatic, n_groups, false)?;
        check_len(&field("fIa"), &self.infectiousness_asymptomatic, n_groups, false)?;
        check_len(&field("fIs"), &self.infectiousness_symptomatic, n_groups, false)?;
        check_len(&field("tau"), &self.external_mixing, n_groups, true)?;
        check_len(&field("seed_ages"), &self.seed_ages, n_groups, true)?;
        check_len_strings(&field("group_names"), &self.group_names, n_groups)?;

        check_probabilities(&field("y"), &self.clinical_fraction)?;
        check_probabilities(&field("rho"), &self.reporting)?;
        check_non_negative(&field("u"), &self.susceptibility)?;
        check_non_negative(&field("seed_ages"), &self.seed_ages)?;
        if !self.seed_ages.is_empty() && self.seed_ages.iter().sum::<f64>() <= 0.0 {
            return Err(ConfigError::invalid(field("seed_ages"), "weights sum to zero"));
        }

        let mut last = f64::NEG_INFINITY;
        for (i, seed) in self.seed_events.iter().enumerate() {
            if seed.t < last {
                return Err(ConfigError::invalid(field("seed_events"), format!("entry {i} is out of chronological order")));
            }
            if !(seed.n >= 0.0) {
                return Err(ConfigError::invalid(field("seed_events"), format!("entry {i} seeds {} individuals", seed.n)));
            }
            last = seed.t;
        }

        if let Some(i) = self.seed_times.windows(2).position(|w| !(w[1] >= w[0])) {
            return Err(ConfigError::invalid(field("seed_times"), format!("entry {} is out of chronological order", i + 1)));
        }

        let mut last = f64::NEG_INFINITY;
        for (i, change) in self.schedule.iter().enumerate() {
            if change.t < last {
                return Err(ConfigError::invalid(field("schedule"), format!("entry {i} is out of chronological order")));
            }
            let expected = match change.variable {
                ScheduledVariable::Contact => self.matrices.len(),
                _ => n_groups,
            };
            if change.value.len() != expected {
                return Err(ConfigError::invalid(
                    field("schedule"),
                    format!("entry {i} ({:?}) has {} values, expected {expected}", change.variable, change.value.len()),
                ));
            }
            if matches!(change.variable, ScheduledVariable::ClinicalFraction | ScheduledVariable::Reporting) {
                check_probabilities(&field(&format!("schedule[{i}].value")), &change.value)?;
            }
            last = change.t;
        }
        Ok(())
    }
}

// ── Parameters ────────────────────────────────────────────────────────────────

/// Complete, caller-supplied configuration of one simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    /// Model time of the first tick.
    pub time0: f64,
    /// Last model time recorded by the reporter.
    pub time1: f64,
    /// Model time advanced per tick.  Must equal `1 / report_every`.
    pub time_step: f64,
    /// Ticks per reporter row.
    pub report_every: u32,

    /// `true` → every transition takes its expected value.
    #[serde(default)]
    pub deterministic: bool,

    /// `travel[j][i]`: share of population `j`'s infectious contact that
    /// lands in population `i` (optional; default identity).
    #[serde(default)]
    pub travel: Option<Matrix>,

    pub populations: Vec<PopulationParams>,

    #[serde(default)]
    pub processes: Vec<ProcessDecl>,
}

impl Parameters {
    pub fn time_grid(&self) -> TimeGrid {
        TimeGrid::new(self.time0, self.time1, self.time_step, self.report_every)
    }

    pub fn mode(&self) -> SamplingMode {
        SamplingMode::from_flag(self.deterministic)
    }

    /// Number of age groups (shared by all populations).
    pub fn n_groups(&self) -> usize {
        self.populations.first().map_or(0, PopulationParams::n_groups)
    }

    /// Travel coefficient from population `j` to population `i`.
    pub fn travel(&self, j: usize, i: usize) -> f64 {
        match &self.travel {
            Some(m) => m.get(j, i),
            None => {
                if i == j { 1.0 } else { 0.0 }
            }
        }
    }

    /// Check shapes, ranges and orderings.
    ///
    /// Step alignment (`time_step * report_every == 1`) is checked when the
    /// reporter is built; process report tags are checked there too.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.populations.is_empty() {
            return Err(ConfigError::invalid("populations", "at least one population is required"));
        }
        if !(self.time_step > 0.0) {
            return Err(ConfigError::invalid("time_step", format!("must be positive, got {}", self.time_step)));
        }
        if !(self.time1 >= self.time0) {
            return Err(ConfigError::invalid("time1", format!("{} is before time0 {}", self.time1, self.time0)));
        }

        let n_groups = self.n_groups();
        if n_groups == 0 {
            return Err(ConfigError::invalid("populations[0].size", "at least one age group is required"));
        }
        for (p, pop) in self.populations.iter().enumerate() {
            pop.validate(p, n_groups)?;
        }

        if let Some(travel) = &self.travel {
            let n = self.populations.len();
            if travel.rows() != n || travel.cols() != n {
                return Err(ConfigError::invalid(
                    "travel",
                    format!("is {}x{}, expected {n}x{n}", travel.rows(), travel.cols()),
                ));
            }
        }
        Ok(())
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn check_len(field: &str, v: &[f64], n: usize, optional: bool) -> ConfigResult<()> {
    if v.len() == n || (optional && v.is_empty()) {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("has {} entries, expected {n}", v.len())))
    }
}

fn check_len_strings(field: &str, v: &[String], n: usize) -> ConfigResult<()> {
    if v.is_empty() || v.len() == n {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("has {} entries, expected {n}", v.len())))
    }
}

fn check_non_negative(field: &str, v: &[f64]) -> ConfigResult<()> {
    match v.iter().position(|x| !(*x >= 0.0)) {
        Some(i) => Err(ConfigError::invalid(field, format!("entry {i} ({}) is negative or NaN", v[i]))),
        None => Ok(()),
    }
}

fn check_probabilities(field: &str, v: &[f64]) -> ConfigResult<()> {
    match v.iter().position(|x| !(0.0..=1.0).contains(x)) {
        Some(i) => Err(ConfigError::invalid(field, format!("entry {i} ({}) is not a probability", v[i]))),
        None => Ok(()),
    }
}
