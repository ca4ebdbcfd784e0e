//! Per-population rate cache.
//!
//! Each population of each run owns one `PopulationRates`, copied from the
//! read-only [`PopulationParams`] at construction.  Scheduled changes write
//! into this copy and mark it dirty; [`PopulationRates::recalculate`] then
//! rebuilds the dependent quantities (currently the effective contact
//! matrix).  The shared `Parameters` are never touched.

use epi_compartment::DelayDist;
use epi_core::Matrix;
use log::debug;

use crate::{ConfigResult, PopulationParams, ScheduledChange, ScheduledVariable};

/// The six built-in delay distributions, discretised on the run's step.
#[derive(Clone, Debug)]
pub struct BuiltinDelays {
    pub exposed:        DelayDist,
    pub presymptomatic: DelayDist,
    pub asymptomatic:   DelayDist,
    pub symptomatic:    DelayDist,
    pub hospital:       DelayDist,
    pub reporting:      DelayDist,
}

/// Mutable, per-run view of one population's rates.
#[derive(Clone, Debug)]
pub struct PopulationRates {
    pub size:                          Vec<f64>,
    pub matrices:                      Vec<Matrix>,
    pub contact:                       Vec<f64>,
    pub susceptibility:                Vec<f64>,
    pub clinical_fraction:             Vec<f64>,
    pub reporting:                     Vec<f64>,
    pub infectiousness_presymptomatic: Vec<f64>,
    pub infectiousness_asymptomatic:   Vec<f64>,
    pub infectiousness_symptomatic:    Vec<f64>,
    pub external_mixing:               Vec<f64>,
    /// Normalised seeding weights per age.
    pub seed_ages:                     Vec<f64>,
    pub delays:                        BuiltinDelays,

    contact_matrix: Matrix,
    needs_recalc:   bool,
}

impl PopulationRates {
    /// Copy `params`, fill optional vectors with their defaults, and
    /// discretise the built-in delays on `time_step`.
    pub fn new(params: &PopulationParams, time_step: f64) -> ConfigResult<Self> {
        let n = params.n_groups();
        let or_fill = |v: &[f64], fill: f64| if v.is_empty() { vec![fill; n] } else { v.to_vec() };

        let contact = if params.contact.is_empty() {
            vec![1.0; params.matrices.len()]
        } else {
            params.contact.clone()
        };

        let mut seed_ages = or_fill(&params.seed_ages, 1.0);
        let total: f64 = seed_ages.iter().sum();
        if total > 0.0 {
            seed_ages.iter_mut().for_each(|w| *w /= total);
        }

        let delays = BuiltinDelays {
            exposed:        params.delay_exposed.resolve(time_step, "dE")?,
            presymptomatic: params.delay_presymptomatic.resolve(time_step, "dIp")?,
            asymptomatic:   params.delay_asymptomatic.resolve(time_step, "dIa")?,
            symptomatic:    params.delay_symptomatic.resolve(time_step, "dIs")?,
            hospital:       params.delay_hospital.resolve(time_step, "dH")?,
            reporting:      params.delay_reporting.resolve(time_step, "dC")?,
        };

        let mut rates = Self {
            size: params.size.clone(),
            matrices: params.matrices.clone(),
            contact,
            susceptibility: params.susceptibility.clone(),
            clinical_fraction: params.clinical_fraction.clone(),
            reporting: or_fill(&params.reporting, 0.0),
            infectiousness_presymptomatic: params.infectiousness_presymptomatic.clone(),
            infectiousness_asymptomatic: params.infectiousness_asymptomatic.clone(),
            infectiousness_symptomatic: params.infectiousness_symptomatic.clone(),
            external_mixing: or_fill(&params.external_mixing, 1.0),
            seed_ages,
            delays,
            contact_matrix: Matrix::zeros(n, n),
            needs_recalc: true,
        };
        rates.recalculate();
        Ok(rates)
    }

    /// Apply one scheduled assignment.  Lengths were checked by
    /// `Parameters::validate`.
    pub fn set(&mut self, change: &ScheduledChange) {
        debug!("t={}: setting {:?} = {:?}", change.t, change.variable, change.value);
        let target = match change.variable {
            ScheduledVariable::Contact => &mut self.contact,
            ScheduledVariable::Susceptibility => &mut self.susceptibility,
            ScheduledVariable::ClinicalFraction => &mut self.clinical_fraction,
            ScheduledVariable::Reporting => &mut self.reporting,
            ScheduledVariable::InfectiousnessPresymptomatic => &mut self.infectiousness_presymptomatic,
            ScheduledVariable::InfectiousnessAsymptomatic => &mut self.infectiousness_asymptomatic,
            ScheduledVariable::InfectiousnessSymptomatic => &mut self.infectiousness_symptomatic,
            ScheduledVariable::ExternalMixing => &mut self.external_mixing,
        };
        target.clone_from(&change.value);
        self.needs_recalc = true;
    }

    /// Rebuild dependent quantities if anything changed since the last call.
    ///
    /// The effective contact matrix is `Σ_m contact[m] · matrices[m]`.
    pub fn recalculate(&mut self) {
        if !self.needs_recalc {
            return;
        }
        let n = self.size.len();
        let mut cm = Matrix::zeros(n, n);
        for (matrix, &scale) in self.matrices.iter().zip(&self.contact) {
            cm.add_scaled(matrix, scale);
        }
        self.contact_matrix = cm;
        self.needs_recalc = false;
    }

    /// The effective contact matrix, `[a][b]`.
    #[inline]
    pub fn contact_matrix(&self) -> &Matrix {
        &self.contact_matrix
    }

    #[inline]
    pub fn n_groups(&self) -> usize {
        self.size.len()
    }
}
