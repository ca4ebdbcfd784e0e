//! User-declared auxiliary processes and their resolution into a plan.
//!
//! A process hangs off one *hookpoint* (a built-in transition flow or the
//! maturation flow of another process compartment) and splits the
//! individuals arriving there across its own compartments.
//!
//! Declarations refer to sources by name.  [`ProcessPlan::resolve`] turns
//! those names into typed [`Hookpoint`]s and assigns every compartment a
//! dense [`ProcessCompartmentId`] in declaration order, so the tick loop
//! never has to interpret names or raw integer ranges.

use epi_compartment::DelayDist;
use epi_core::ProcessCompartmentId;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult, DelaySpec};

/// Tolerance on per-age branch probabilities summing to one.
const PROB_SUM_TOLERANCE: f64 = 1e-9;

// ── Declarations ──────────────────────────────────────────────────────────────

/// One process as written in the parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcessDecl {
    #[serde(default)]
    pub name: String,

    /// Built-in flow name (`S`, `E`, `Ep`, `Ea`, `Ip`, `Is`, `H`, `Ia`, `I`)
    /// or the name of any process compartment.
    pub source: String,

    /// Compartment names, unique across all processes.
    pub names: Vec<String>,

    /// `prob[c][a]`: probability that an individual of age `a` entering the
    /// process goes to compartment `c`.  Per age these may sum to less than
    /// one; the shortfall is not tracked.
    pub prob: Vec<Vec<f64>>,

    /// Sojourn time in each compartment.
    pub delays: Vec<DelaySpec>,

    /// Report tags per compartment: any of `p` (prevalence), `i` (incidence),
    /// `o` (outcidence).  May be empty for no reporting at all.
    #[serde(default)]
    pub report: Vec<String>,
}

// ── Hookpoints ────────────────────────────────────────────────────────────────

/// The nine flows of the built-in chain that a process can draw from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BuiltinFlow {
    /// S → E (new infections).
    SusceptibleToExposed,
    /// E → Ip + Ia.
    ExposedOut,
    /// E → Ip.
    ExposedToPresymptomatic,
    /// E → Ia.
    ExposedToAsymptomatic,
    /// Ip → Is (symptom onset).
    PresymptomaticToSymptomatic,
    /// Is → H.
    SymptomaticToHospital,
    /// H → R.
    HospitalToRecovered,
    /// Ia → R.
    AsymptomaticToRecovered,
    /// H → R plus Ia → R.
    ///
    /// Overlaps `HospitalToRecovered` and `AsymptomaticToRecovered`; processes
    /// sourcing from both this and one of its parts see the same individuals
    /// twice.
    Recovering,
}

impl BuiltinFlow {
    pub const ALL: [BuiltinFlow; 9] = [
        BuiltinFlow::SusceptibleToExposed,
        BuiltinFlow::ExposedOut,
        BuiltinFlow::ExposedToPresymptomatic,
        BuiltinFlow::ExposedToAsymptomatic,
        BuiltinFlow::PresymptomaticToSymptomatic,
        BuiltinFlow::SymptomaticToHospital,
        BuiltinFlow::HospitalToRecovered,
        BuiltinFlow::AsymptomaticToRecovered,
        BuiltinFlow::Recovering,
    ];

    /// The name used for this flow in a process's `source` field.
    pub fn source_name(self) -> &'static str {
        match self {
            BuiltinFlow::SusceptibleToExposed => "S",
            BuiltinFlow::ExposedOut => "E",
            BuiltinFlow::ExposedToPresymptomatic => "Ep",
            BuiltinFlow::ExposedToAsymptomatic => "Ea",
            BuiltinFlow::PresymptomaticToSymptomatic => "Ip",
            BuiltinFlow::SymptomaticToHospital => "Is",
            BuiltinFlow::HospitalToRecovered => "H",
            BuiltinFlow::AsymptomaticToRecovered => "Ia",
            BuiltinFlow::Recovering => "I",
        }
    }

    pub fn from_source_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.source_name() == name)
    }
}

/// Where a process's entering individuals come from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Hookpoint {
    Builtin(BuiltinFlow),
    /// Maturation output of a process compartment in the same tick.
    Compartment(ProcessCompartmentId),
}

// ── Resolved plan ─────────────────────────────────────────────────────────────

/// A process compartment with its id, delay and raw report tags.
#[derive(Clone, Debug)]
pub struct ResolvedCompartment {
    pub id:     ProcessCompartmentId,
    pub name:   String,
    pub delay:  DelayDist,
    /// Report tags as declared; parsed by the reporter.
    pub report: String,
}

/// A process with its source bound and probabilities transposed to
/// `[age][branch]` for the tick loop.
#[derive(Clone, Debug)]
pub struct ResolvedProcess {
    pub name:         String,
    pub source:       Hookpoint,
    pub compartments: Vec<ProcessCompartmentId>,
    pub prob_by_group: Vec<Vec<f64>>,
}

/// The resolved process graph, consumed read-only during a run.
#[derive(Clone, Debug, Default)]
pub struct ProcessPlan {
    processes:    Vec<ResolvedProcess>,
    compartments: Vec<ResolvedCompartment>,
}

impl ProcessPlan {
    /// Validate `decls` and bind every source.
    ///
    /// Compartment ids are assigned first for all processes, so a process may
    /// source from a compartment declared later (or its own).
    pub fn resolve(decls: &[ProcessDecl], n_groups: usize, time_step: f64) -> ConfigResult<Self> {
        let mut by_name: FxHashMap<&str, ProcessCompartmentId> = FxHashMap::default();
        let mut compartments = Vec::new();

        for (p, decl) in decls.iter().enumerate() {
            let label = process_label(decl, p);
            let n_branches = decl.names.len();
            if n_branches == 0 {
                return Err(ConfigError::invalid(format!("processes[{p}]"), format!("{label} declares no compartments")));
            }
            if decl.prob.len() != n_branches || decl.delays.len() != n_branches {
                return Err(ConfigError::invalid(
                    format!("processes[{p}]"),
                    format!(
                        "{label}: {n_branches} names but {} prob rows and {} delays",
                        decl.prob.len(),
                        decl.delays.len()
                    ),
                ));
            }
            if !decl.report.is_empty() && decl.report.len() != n_branches {
                return Err(ConfigError::invalid(
                    format!("processes[{p}].report"),
                    format!("{label}: {} report entries for {n_branches} compartments", decl.report.len()),
                ));
            }

            for (c, name) in decl.names.iter().enumerate() {
                if name.is_empty() || BuiltinFlow::from_source_name(name).is_some() || by_name.contains_key(name.as_str()) {
                    return Err(ConfigError::DuplicateCompartment(name.clone()));
                }
                let id = ProcessCompartmentId::try_from(compartments.len())
                    .map_err(|_| ConfigError::invalid("processes", "too many process compartments"))?;
                by_name.insert(name.as_str(), id);

                let field = format!("processes[{p}].delays[{c}]");
                compartments.push(ResolvedCompartment {
                    id,
                    name: name.clone(),
                    delay: decl.delays[c].resolve(time_step, &field)?,
                    report: decl.report.get(c).cloned().unwrap_or_default(),
                });
            }
        }

        let mut processes = Vec::with_capacity(decls.len());
        let mut next_id = 0usize;
        for (p, decl) in decls.iter().enumerate() {
            let label = process_label(decl, p);
            let source = match BuiltinFlow::from_source_name(&decl.source) {
                Some(flow) => Hookpoint::Builtin(flow),
                None => match by_name.get(decl.source.as_str()) {
                    Some(&id) => Hookpoint::Compartment(id),
                    None => {
                        return Err(ConfigError::UnknownSource {
                            process:     label,
                            source_name: decl.source.clone(),
                        });
                    }
                },
            };

            let ids = compartments[next_id..next_id + decl.names.len()]
                .iter()
                .map(|c| c.id)
                .collect();
            next_id += decl.names.len();

            processes.push(ResolvedProcess {
                name: label,
                source,
                compartments: ids,
                prob_by_group: transpose_probabilities(decl, p, n_groups)?,
            });
        }

        Ok(Self { processes, compartments })
    }

    /// Processes in declaration order.
    #[inline]
    pub fn processes(&self) -> &[ResolvedProcess] {
        &self.processes
    }

    /// All process compartments, indexed by `ProcessCompartmentId`.
    #[inline]
    pub fn compartments(&self) -> &[ResolvedCompartment] {
        &self.compartments
    }

    #[inline]
    pub fn compartment(&self, id: ProcessCompartmentId) -> &ResolvedCompartment {
        &self.compartments[id.index()]
    }

    #[inline]
    pub fn n_compartments(&self) -> usize {
        self.compartments.len()
    }

    /// Look up a compartment id by name.
    pub fn find(&self, name: &str) -> Option<ProcessCompartmentId> {
        self.compartments.iter().find(|c| c.name == name).map(|c| c.id)
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn process_label(decl: &ProcessDecl, p: usize) -> String {
    if decl.name.is_empty() { format!("process {p}") } else { decl.name.clone() }
}

/// `prob[c][a]` → `[a][c]`, checking ranges and per-age sums.
fn transpose_probabilities(decl: &ProcessDecl, p: usize, n_groups: usize) -> ConfigResult<Vec<Vec<f64>>> {
    let field = format!("processes[{p}].prob");
    for (c, row) in decl.prob.iter().enumerate() {
        if row.len() != n_groups {
            return Err(ConfigError::invalid(
                &field,
                format!("row {c} has {} entries, expected {n_groups}", row.len()),
            ));
        }
        if let Some(x) = row.iter().find(|x| !(0.0..=1.0).contains(*x)) {
            return Err(ConfigError::invalid(&field, format!("row {c} holds {x}, not a probability")));
        }
    }

    let by_group: Vec<Vec<f64>> = (0..n_groups)
        .map(|a| decl.prob.iter().map(|row| row[a]).collect())
        .collect();

    for (a, probs) in by_group.iter().enumerate() {
        let sum: f64 = probs.iter().sum();
        if sum > 1.0 + PROB_SUM_TOLERANCE {
            return Err(ConfigError::invalid(&field, format!("age group {a} probabilities sum to {sum} > 1")));
        }
    }
    Ok(by_group)
}
