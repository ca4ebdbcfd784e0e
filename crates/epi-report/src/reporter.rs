//! Dense time-series table filled during a run.
//!
//! Storage is one `Vec<f64>` per channel, laid out row-major as
//! `[row][population][group]`.  Rows are whole units of model time; a tick
//! writes into `grid.row_of(tick)`.

use epi_config::{Parameters, ProcessPlan};
use epi_core::{ChannelId, GroupId, PopulationId, TimeGrid};
use log::debug;

use crate::{ChannelLayout, ReportError, ReportResult};

#[derive(Clone, Debug)]
pub struct Reporter {
    grid:              TimeGrid,
    layout:            ChannelLayout,
    population_names:  Vec<String>,
    group_names:       Vec<String>,
    n_rows:            usize,
    data:              Vec<Vec<f64>>,
    stopped_at:        Option<f64>,
}

impl Reporter {
    /// Size the table for `params` and resolve the channel layout for `plan`.
    ///
    /// Fails if `time_step` is not exactly `1 / report_every` or if a process
    /// compartment carries an unknown report tag.
    pub fn new(params: &Parameters, plan: &ProcessPlan) -> ReportResult<Self> {
        let grid = params.time_grid();
        if !grid.steps_align() {
            return Err(ReportError::StepMismatch {
                time_step:    grid.time_step,
                report_every: grid.report_every,
            });
        }
        let layout = ChannelLayout::new(plan)?;

        let population_names = params
            .populations
            .iter()
            .enumerate()
            .map(|(p, pp)| if pp.name.is_empty() { p.to_string() } else { pp.name.clone() })
            .collect::<Vec<_>>();
        let group_names = match params.populations.first() {
            Some(pp) => (0..pp.n_groups()).map(|a| pp.group_name(a)).collect(),
            None => Vec::new(),
        };

        let n_rows = grid.n_rows();
        let cells = n_rows * population_names.len() * group_names.len();
        let data = vec![vec![0.0; cells]; layout.len()];

        debug!(
            "reporter: {} rows × {} populations × {} groups × {} channels",
            n_rows,
            population_names.len(),
            group_names.len(),
            layout.len()
        );

        Ok(Self {
            grid,
            layout,
            population_names,
            group_names,
            n_rows,
            data,
            stopped_at: None,
        })
    }

    // ── Shape ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    #[inline]
    pub fn layout(&self) -> &ChannelLayout {
        &self.layout
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    #[inline]
    pub fn n_populations(&self) -> usize {
        self.population_names.len()
    }

    #[inline]
    pub fn n_groups(&self) -> usize {
        self.group_names.len()
    }

    #[inline]
    pub fn col_names(&self) -> &[String] {
        self.layout.names()
    }

    pub fn population_name(&self, pop: PopulationId) -> &str {
        &self.population_names[pop.index()]
    }

    pub fn group_name(&self, group: GroupId) -> &str {
        &self.group_names[group.index()]
    }

    /// Model time of `row`.
    #[inline]
    pub fn row_time(&self, row: usize) -> f64 {
        self.grid.row_time(row)
    }

    // ── Cell access ───────────────────────────────────────────────────────

    #[inline]
    fn cell(&self, row: usize, pop: PopulationId, group: GroupId) -> usize {
        (row * self.n_populations() + pop.index()) * self.n_groups() + group.index()
    }

    #[inline]
    pub fn get(&self, row: usize, pop: PopulationId, group: GroupId, ch: ChannelId) -> f64 {
        self.data[ch.index()][self.cell(row, pop, group)]
    }

    /// Overwrite a cell.  Used for prevalence snapshots.
    #[inline]
    pub fn set(&mut self, row: usize, pop: PopulationId, group: GroupId, ch: ChannelId, value: f64) {
        let i = self.cell(row, pop, group);
        self.data[ch.index()][i] = value;
    }

    /// Accumulate into a cell.  Used for incidence and outcidence.
    #[inline]
    pub fn add(&mut self, row: usize, pop: PopulationId, group: GroupId, ch: ChannelId, value: f64) {
        let i = self.cell(row, pop, group);
        self.data[ch.index()][i] += value;
    }

    /// Whole column for `ch`, in `[row][population][group]` order.
    #[inline]
    pub fn column(&self, ch: ChannelId) -> &[f64] {
        &self.data[ch.index()]
    }

    /// Column by name, if the layout has it.
    pub fn column_by_name(&self, name: &str) -> Option<&[f64]> {
        self.layout.find(name).map(|ch| self.column(ch))
    }

    /// One `(population, group)` trajectory of `ch` over all rows.
    pub fn series(&self, pop: PopulationId, group: GroupId, ch: ChannelId) -> Vec<f64> {
        (0..self.n_rows).map(|row| self.get(row, pop, group, ch)).collect()
    }

    /// Sum of `ch` over every population and group in `row`.
    pub fn row_total(&self, row: usize, ch: ChannelId) -> f64 {
        let width = self.n_populations() * self.n_groups();
        let start = row * width;
        self.data[ch.index()][start..start + width].iter().sum()
    }

    // ── Early stop ────────────────────────────────────────────────────────

    /// Record that an observer stopped the run at model time `t`.
    pub fn mark_stopped(&mut self, t: f64) {
        self.stopped_at = Some(t);
    }

    /// Model time of the tick that requested an early stop, if any.
    #[inline]
    pub fn stopped_at(&self) -> Option<f64> {
        self.stopped_at
    }
}
