//! One population: built-in SEI3HR states, process compartments and the
//! per-tick transition chain.

use epi_compartment::Compartment;
use epi_config::{
    BuiltinFlow, Hookpoint, PopulationParams, PopulationRates, ProcessPlan, ScheduledChange, SeedEvent,
};
use epi_core::{
    GroupId, PopulationId, ProcessCompartmentId, Randomizer, SamplingMode, Tick, TimeGrid,
    draw_binomial, draw_multinomial,
};
use epi_report::{BuiltinChannel, ChannelLayout, Reporter};
use log::debug;

use crate::{PopulationObserver, SimError, SimResult};

// ── Tick context ──────────────────────────────────────────────────────────────

/// Read-only run state shared by every population during a tick.
#[derive(Clone, Copy)]
pub(crate) struct TickContext<'a> {
    pub mode:   SamplingMode,
    pub grid:   &'a TimeGrid,
    pub plan:   &'a ProcessPlan,
    pub layout: &'a ChannelLayout,
}

// ── Built-in flows ────────────────────────────────────────────────────────────

/// The flows of one age group's built-in chain in one tick.
#[derive(Clone, Copy, Debug, Default)]
struct Flows {
    s_e:   f64,
    e:     f64,
    e_ip:  f64,
    e_ia:  f64,
    ip_is: f64,
    is_h:  f64,
    h_r:   f64,
    ia_r:  f64,
}

impl Flows {
    fn get(&self, flow: BuiltinFlow) -> f64 {
        match flow {
            BuiltinFlow::SusceptibleToExposed => self.s_e,
            BuiltinFlow::ExposedOut => self.e,
            BuiltinFlow::ExposedToPresymptomatic => self.e_ip,
            BuiltinFlow::ExposedToAsymptomatic => self.e_ia,
            BuiltinFlow::PresymptomaticToSymptomatic => self.ip_is,
            BuiltinFlow::SymptomaticToHospital => self.is_h,
            BuiltinFlow::HospitalToRecovered => self.h_r,
            BuiltinFlow::AsymptomaticToRecovered => self.ia_r,
            BuiltinFlow::Recovering => self.h_r + self.ia_r,
        }
    }
}

// ── Population ────────────────────────────────────────────────────────────────

/// State of one population in one run.
///
/// `S` and `R` are plain counts; every other state is a delay-structured
/// [`Compartment`] per age group.  `C` holds reported cases waiting out the
/// reporting delay and is not part of the epidemic state proper.
pub struct Population {
    id:    PopulationId,
    rates: PopulationRates,

    seed_events:  Vec<SeedEvent>,
    schedule:     Vec<ScheduledChange>,
    seed_row:     usize,
    schedule_row: usize,

    s:  Vec<f64>,
    e:  Vec<Compartment>,
    ip: Vec<Compartment>,
    ia: Vec<Compartment>,
    is: Vec<Compartment>,
    h:  Vec<Compartment>,
    c:  Vec<Compartment>,
    r:  Vec<f64>,

    /// `[compartment][group]`.
    processes: Vec<Vec<Compartment>>,

    // Scratch, reused every tick.
    lambda:   Vec<f64>,
    entering: Vec<f64>,
    matured:  Vec<f64>,
    split:    Vec<f64>,
    seeds:    Vec<f64>,
}

impl Population {
    pub(crate) fn new(id: PopulationId, params: &PopulationParams, plan: &ProcessPlan, time_step: f64) -> SimResult<Self> {
        let rates = PopulationRates::new(params, time_step)?;
        let n = rates.n_groups();
        let n_pc = plan.n_compartments();

        Ok(Self {
            id,
            seed_events: params.seed_schedule(),
            schedule: params.schedule.clone(),
            seed_row: 0,
            schedule_row: 0,
            s: rates.size.clone(),
            e: vec![Compartment::new(); n],
            ip: vec![Compartment::new(); n],
            ia: vec![Compartment::new(); n],
            is: vec![Compartment::new(); n],
            h: vec![Compartment::new(); n],
            c: vec![Compartment::new(); n],
            r: vec![0.0; n],
            processes: vec![vec![Compartment::new(); n]; n_pc],
            lambda: vec![0.0; n],
            entering: vec![0.0; n_pc],
            matured: vec![0.0; n_pc],
            split: Vec::new(),
            seeds: vec![0.0; n],
            rates,
        })
    }

    // ── Read access ───────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> PopulationId {
        self.id
    }

    #[inline]
    pub fn n_groups(&self) -> usize {
        self.s.len()
    }

    /// Current rates, including any scheduled changes applied so far.
    #[inline]
    pub fn rates(&self) -> &PopulationRates {
        &self.rates
    }

    #[inline]
    pub fn susceptible(&self, a: usize) -> f64 {
        self.s[a]
    }

    #[inline]
    pub fn exposed(&self, a: usize) -> f64 {
        self.e[a].size()
    }

    #[inline]
    pub fn presymptomatic(&self, a: usize) -> f64 {
        self.ip[a].size()
    }

    #[inline]
    pub fn asymptomatic(&self, a: usize) -> f64 {
        self.ia[a].size()
    }

    #[inline]
    pub fn symptomatic(&self, a: usize) -> f64 {
        self.is[a].size()
    }

    #[inline]
    pub fn hospitalised(&self, a: usize) -> f64 {
        self.h[a].size()
    }

    #[inline]
    pub fn recovered(&self, a: usize) -> f64 {
        self.r[a]
    }

    /// Cases waiting out the reporting delay.
    #[inline]
    pub fn awaiting_report(&self, a: usize) -> f64 {
        self.c[a].size()
    }

    #[inline]
    pub fn process(&self, id: ProcessCompartmentId, a: usize) -> f64 {
        self.processes[id.index()][a].size()
    }

    /// `S + E + Ip + Ia + Is + H + R` for age group `a`.
    pub fn total(&self, a: usize) -> f64 {
        self.s[a]
            + self.e[a].size()
            + self.ip[a].size()
            + self.ia[a].size()
            + self.is[a].size()
            + self.h[a].size()
            + self.r[a]
    }

    /// Symptomatic occupancy summed over age groups.
    pub fn symptomatic_total(&self) -> f64 {
        self.is.iter().map(Compartment::size).sum()
    }

    // ── Contagiousness ────────────────────────────────────────────────────

    /// Seed, apply due schedule changes, then write this population's
    /// per-age contagiousness into `out`.
    pub(crate) fn contagiousness(
        &mut self,
        t:    f64,
        mode: SamplingMode,
        rng:  &mut dyn Randomizer,
        out:  &mut [f64],
    ) -> SimResult<()> {
        while self.seed_row < self.seed_events.len() && t >= self.seed_events[self.seed_row].t {
            let n = self.seed_events[self.seed_row].n;
            self.seed(n, mode, rng)?;
            debug!("population {} t={t}: seeded {n}", self.id);
            self.seed_row += 1;
        }

        while self.schedule_row < self.schedule.len() && t >= self.schedule[self.schedule_row].t {
            self.rates.set(&self.schedule[self.schedule_row]);
            self.schedule_row += 1;
        }
        self.rates.recalculate();

        let r = &self.rates;
        for (a, slot) in out.iter_mut().enumerate() {
            *slot = if r.size[a] == 0.0 {
                0.0
            } else {
                (r.infectiousness_presymptomatic[a] * self.ip[a].size()
                    + r.infectiousness_asymptomatic[a] * self.ia[a].size()
                    + r.infectiousness_symptomatic[a] * self.is[a].size())
                    / r.size[a]
            };
        }
        Ok(())
    }

    /// Move `n` individuals from S to E.
    ///
    /// Deterministic: age group `a` receives `n · w[a]`.  Stochastic: one age
    /// group is drawn from the seeding weights and receives all `n`.
    fn seed(&mut self, n: f64, mode: SamplingMode, rng: &mut dyn Randomizer) -> SimResult<()> {
        let mut seeds = std::mem::take(&mut self.seeds);
        let weights = &self.rates.seed_ages;
        seeds.clear();
        match mode {
            SamplingMode::Deterministic => seeds.extend(weights.iter().map(|w| n * w)),
            SamplingMode::Stochastic => {
                let mut pick = vec![0; weights.len()];
                rng.multinomial(1, weights, &mut pick);
                seeds.extend(pick.iter().map(|&k| if k > 0 { n.round() } else { 0.0 }));
            }
        }
        let result = self.enrol_seeds(&seeds, mode, rng);
        self.seeds = seeds;
        result
    }

    fn enrol_seeds(&mut self, seeds: &[f64], mode: SamplingMode, rng: &mut dyn Randomizer) -> SimResult<()> {
        for (a, &k) in seeds.iter().enumerate() {
            if k <= 0.0 {
                continue;
            }
            if self.s[a] < k {
                return Err(SimError::InsufficientSusceptible {
                    population: self.id,
                    group:      GroupId(a as u32),
                    requested:  k,
                    available:  self.s[a],
                });
            }
            self.s[a] -= k;
            self.e[a].add(k, &self.rates.delays.exposed, mode, rng)?;
        }
        Ok(())
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Advance one step given the incoming infectious pressure `infec`
    /// (per age), writing into `rep`.  Returns `false` if `observer` asks
    /// the run to stop.
    pub(crate) fn tick(
        &mut self,
        tick:     Tick,
        ctx:      &TickContext<'_>,
        infec:    &[f64],
        rng:      &mut dyn Randomizer,
        rep:      &mut Reporter,
        observer: &mut dyn PopulationObserver,
    ) -> SimResult<bool> {
        let mode = ctx.mode;
        let dt = ctx.grid.time_step;
        let t = ctx.grid.time_at(tick);
        let row = ctx.grid.row_of(tick);
        let snapshot = ctx.grid.is_report_tick(tick);
        let pid = self.id;

        // Force of infection.
        let cm = self.rates.contact_matrix();
        for (a, lambda) in self.lambda.iter_mut().enumerate() {
            let pressure: f64 = infec.iter().enumerate().map(|(b, &x)| cm.get(a, b) * x).sum();
            *lambda = self.rates.susceptibility[a] * pressure;
        }

        for a in 0..self.n_groups() {
            let g = GroupId(a as u32);

            // ── 0. Prevalence ─────────────────────────────────────────────
            if snapshot {
                rep.set(row, pid, g, BuiltinChannel::S.id(), self.s[a]);
                rep.set(row, pid, g, BuiltinChannel::E.id(), self.e[a].size());
                rep.set(row, pid, g, BuiltinChannel::Ip.id(), self.ip[a].size());
                rep.set(row, pid, g, BuiltinChannel::Is.id(), self.is[a].size());
                rep.set(row, pid, g, BuiltinChannel::Ia.id(), self.ia[a].size());
                rep.set(row, pid, g, BuiltinChannel::R.id(), self.r[a]);
                for pc in ctx.layout.prevalence() {
                    rep.set(row, pid, g, pc.channel, self.processes[pc.compartment.index()][a].size());
                }
            }

            // ── 1. Built-in chain ─────────────────────────────────────────
            let delays = &self.rates.delays;
            let mut f = Flows::default();

            f.s_e = draw_binomial(mode, rng, self.s[a], 1.0 - (-self.lambda[a] * dt).exp());
            self.s[a] -= f.s_e;
            self.e[a].add(f.s_e, &delays.exposed, mode, rng)?;

            f.e = self.e[a].mature();
            f.e_ip = draw_binomial(mode, rng, f.e, self.rates.clinical_fraction[a]);
            f.e_ia = f.e - f.e_ip;
            self.ip[a].add(f.e_ip, &delays.presymptomatic, mode, rng)?;
            self.ia[a].add(f.e_ia, &delays.asymptomatic, mode, rng)?;

            f.ip_is = self.ip[a].mature();
            self.is[a].add(f.ip_is, &delays.symptomatic, mode, rng)?;

            let to_report = draw_binomial(mode, rng, f.ip_is, self.rates.reporting[a]);
            self.c[a].add(to_report, &delays.reporting, mode, rng)?;
            let reported = self.c[a].mature();

            f.is_h = self.is[a].mature();
            self.h[a].add(f.is_h, &delays.hospital, mode, rng)?;

            f.h_r = self.h[a].mature();
            self.r[a] += f.h_r;

            f.ia_r = self.ia[a].mature();
            self.r[a] += f.ia_r;

            // ── 2. Processes ──────────────────────────────────────────────
            for (out, comp) in self.matured.iter_mut().zip(&mut self.processes) {
                *out = comp[a].mature();
            }
            self.entering.fill(0.0);

            for process in ctx.plan.processes() {
                let n_entering = match process.source {
                    Hookpoint::Builtin(flow) => f.get(flow),
                    Hookpoint::Compartment(id) => self.matured[id.index()],
                };
                draw_multinomial(mode, rng, n_entering, &process.prob_by_group[a], &mut self.split);
                for (&id, &n) in process.compartments.iter().zip(&self.split) {
                    let delay = &ctx.plan.compartment(id).delay;
                    self.processes[id.index()][a].add(n, delay, mode, rng)?;
                    self.entering[id.index()] = n;
                }
            }

            // ── 3. Incidence / outcidence ─────────────────────────────────
            rep.add(row, pid, g, BuiltinChannel::Cases.id(), f.ip_is);
            rep.add(row, pid, g, BuiltinChannel::CasesReported.id(), reported);
            rep.add(row, pid, g, BuiltinChannel::Subclinical.id(), f.e_ia);
            for pc in ctx.layout.incidence() {
                rep.add(row, pid, g, pc.channel, self.entering[pc.compartment.index()]);
            }
            for pc in ctx.layout.outcidence() {
                rep.add(row, pid, g, pc.channel, self.matured[pc.compartment.index()]);
            }
        }

        Ok(observer.observe(t, self))
    }
}
