//! The `Simulation` driver and the replicate runner.

use epi_config::{Parameters, ProcessPlan};
use epi_core::{Randomizer, SamplingMode, SimRng, Tick, TimeGrid};
use epi_report::{ChannelLayout, Reporter};
use log::{info, trace};

use crate::population::TickContext;
use crate::{Metapopulation, Population, SimBuilder, SimResult};

// ── Simulation ────────────────────────────────────────────────────────────────

/// One run: the metapopulation, its reporter and the tick cursor.
///
/// The run executes `grid.n_steps()` ticks, i.e. `(1 + time1 - time0) /
/// time_step`, and stops early the first time any observer returns `false`.
///
/// Create via [`SimBuilder`].
pub struct Simulation<'a> {
    params:   &'a Parameters,
    plan:     ProcessPlan,
    layout:   ChannelLayout,
    grid:     TimeGrid,
    mode:     SamplingMode,
    meta:     Metapopulation<'a>,
    reporter: Reporter,
    next:     Tick,
    stopped:  bool,
}

impl<'a> Simulation<'a> {
    pub(crate) fn new(params: &'a Parameters, plan: ProcessPlan, reporter: Reporter, meta: Metapopulation<'a>) -> Self {
        Self {
            layout: reporter.layout().clone(),
            grid: params.time_grid(),
            mode: params.mode(),
            params,
            plan,
            meta,
            reporter,
            next: Tick::ZERO,
            stopped: false,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run to the horizon (or the first stop request) and return the
    /// reporter.
    pub fn run(mut self, rng: &mut dyn Randomizer) -> SimResult<Reporter> {
        info!(
            "run start: {} populations, {} age groups, {} steps of {} ({:?})",
            self.meta.populations().len(),
            self.params.n_groups(),
            self.grid.n_steps(),
            self.grid.time_step,
            self.mode
        );
        while self.step(rng)? {}
        match self.reporter.stopped_at() {
            Some(t) => info!("run stopped early at t={t}"),
            None => info!("run complete at t={}", self.grid.time1),
        }
        Ok(self.reporter)
    }

    /// Execute one tick.  Returns `true` while more ticks remain and no
    /// observer has asked to stop.
    pub fn step(&mut self, rng: &mut dyn Randomizer) -> SimResult<bool> {
        if self.is_finished() {
            return Ok(false);
        }

        let tick = self.next;
        let ctx = TickContext {
            mode:   self.mode,
            grid:   &self.grid,
            plan:   &self.plan,
            layout: &self.layout,
        };
        trace!("tick {tick} (t={})", self.grid.time_at(tick));

        let keep_going = self.meta.tick(tick, &ctx, self.params, rng, &mut self.reporter)?;
        self.next = tick.offset(1);
        if !keep_going {
            let t = self.grid.time_at(tick);
            info!("observer requested stop at t={t}");
            self.reporter.mark_stopped(t);
            self.stopped = true;
        }
        Ok(!self.is_finished())
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.stopped || self.next.0 >= self.grid.n_steps()
    }

    /// The next tick to execute.
    #[inline]
    pub fn current_tick(&self) -> Tick {
        self.next
    }

    #[inline]
    pub fn populations(&self) -> &[Population] {
        self.meta.populations()
    }

    #[inline]
    pub fn plan(&self) -> &ProcessPlan {
        &self.plan
    }

    #[inline]
    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    pub fn into_reporter(self) -> Reporter {
        self.reporter
    }
}

// ── Convenience drivers ───────────────────────────────────────────────────────

/// Build and run one simulation with no observers.
pub fn run_simulation(params: &Parameters, rng: &mut dyn Randomizer) -> SimResult<Reporter> {
    SimBuilder::new(params).build()?.run(rng)
}

/// Run `n_runs` independent replicates.
///
/// Replicate `r` draws from `SimRng::new(seed).child(r)`, so results do not
/// depend on whether the `parallel` feature is enabled.
pub fn run_replicates(params: &Parameters, n_runs: usize, seed: u64) -> SimResult<Vec<Reporter>> {
    let mut root = SimRng::new(seed);
    let rngs: Vec<SimRng> = (0..n_runs as u64).map(|r| root.child(r)).collect();
    info!("running {n_runs} replicates from seed {seed}");

    #[cfg(not(feature = "parallel"))]
    {
        rngs.into_iter()
            .map(|mut rng| run_simulation(params, &mut rng))
            .collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        rngs.into_par_iter()
            .map(|mut rng| run_simulation(params, &mut rng))
            .collect()
    }
}
