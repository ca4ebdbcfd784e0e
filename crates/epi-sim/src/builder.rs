//! Fluent builder for constructing a [`Simulation`].

use epi_config::{Parameters, ProcessPlan};
use epi_core::PopulationId;
use epi_report::Reporter;
use log::debug;

use crate::{Metapopulation, NoopObserver, Population, PopulationObserver, SimError, SimResult, Simulation};

/// Fluent builder for [`Simulation`].
///
/// # Optional inputs
///
/// | Method              | Default                        |
/// |---------------------|--------------------------------|
/// | `.observer(p, obs)` | [`NoopObserver`] (never stops) |
///
/// # Example
///
/// ```rust,ignore
/// let params = Parameters::from_json_path("params.json".as_ref())?;
/// let reporter = SimBuilder::new(&params)
///     .observer(0, |t: f64, pop: &Population| t < 30.0 || pop.symptomatic_total() > 0.0)
///     .build()?
///     .run(&mut SimRng::new(42))?;
/// ```
pub struct SimBuilder<'a> {
    params:    &'a Parameters,
    observers: Vec<(usize, Box<dyn PopulationObserver + 'a>)>,
}

impl<'a> SimBuilder<'a> {
    pub fn new(params: &'a Parameters) -> Self {
        Self {
            params,
            observers: Vec::new(),
        }
    }

    /// Attach `observer` to population `index`, replacing any earlier one.
    pub fn observer(mut self, index: usize, observer: impl PopulationObserver + 'a) -> Self {
        self.observers.push((index, Box::new(observer)));
        self
    }

    /// Validate the parameters, resolve the process plan, size the reporter
    /// and set up every population.
    pub fn build(self) -> SimResult<Simulation<'a>> {
        let params = self.params;
        params.validate()?;

        let plan = ProcessPlan::resolve(&params.processes, params.n_groups(), params.time_step)?;
        let reporter = Reporter::new(params, &plan)?;

        let n_pops = params.populations.len();
        let mut observers: Vec<Box<dyn PopulationObserver + 'a>> = Vec::with_capacity(n_pops);
        observers.resize_with(n_pops, || Box::new(NoopObserver));
        for (index, observer) in self.observers {
            let slot = observers.get_mut(index).ok_or(SimError::UnknownPopulation { index, count: n_pops })?;
            *slot = observer;
        }

        let pops = params
            .populations
            .iter()
            .enumerate()
            .map(|(p, pp)| Population::new(PopulationId(p as u32), pp, &plan, params.time_step))
            .collect::<SimResult<Vec<_>>>()?;

        debug!(
            "built simulation: {} populations, {} process compartments, {} reporter channels",
            n_pops,
            plan.n_compartments(),
            reporter.layout().len()
        );

        Ok(Simulation::new(params, plan, reporter, Metapopulation::new(pops, observers)))
    }
}
