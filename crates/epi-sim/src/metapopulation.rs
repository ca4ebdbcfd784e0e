//! Cross-population coupling.

use epi_config::Parameters;
use epi_core::{Randomizer, Tick};
use epi_report::Reporter;

use crate::population::TickContext;
use crate::{Population, PopulationObserver, SimResult};

/// All populations of a run plus the per-tick mixing buffers.
///
/// `contag[j][a]` is the contagiousness originating in population `j`;
/// `infec[i][a]` the infectious pressure present in population `i`.  Both are
/// rebuilt every tick.
pub struct Metapopulation<'a> {
    pops:      Vec<Population>,
    observers: Vec<Box<dyn PopulationObserver + 'a>>,
    contag:    Vec<Vec<f64>>,
    infec:     Vec<Vec<f64>>,
}

impl<'a> Metapopulation<'a> {
    pub(crate) fn new(pops: Vec<Population>, observers: Vec<Box<dyn PopulationObserver + 'a>>) -> Self {
        let n_groups = pops.first().map_or(0, Population::n_groups);
        let shape = vec![vec![0.0; n_groups]; pops.len()];
        Self {
            pops,
            observers,
            contag: shape.clone(),
            infec: shape,
        }
    }

    #[inline]
    pub fn populations(&self) -> &[Population] {
        &self.pops
    }

    /// Contagiousness, mixing, then every population's tick.  Returns `false`
    /// if any observer asked to stop; all populations tick regardless.
    pub(crate) fn tick(
        &mut self,
        tick:   Tick,
        ctx:    &TickContext<'_>,
        params: &Parameters,
        rng:    &mut dyn Randomizer,
        rep:    &mut Reporter,
    ) -> SimResult<bool> {
        let t = ctx.grid.time_at(tick);

        for (pop, contag) in self.pops.iter_mut().zip(&mut self.contag) {
            pop.contagiousness(t, ctx.mode, rng, contag)?;
        }

        // Pressure arriving from elsewhere is scaled by the source's tau.
        for (i, infec) in self.infec.iter_mut().enumerate() {
            infec.fill(0.0);
            for (j, (contag, source)) in self.contag.iter().zip(&self.pops).enumerate() {
                let travel = params.travel(j, i);
                if travel == 0.0 {
                    continue;
                }
                let tau = &source.rates().external_mixing;
                for (a, slot) in infec.iter_mut().enumerate() {
                    let mixing = if j == i { 1.0 } else { tau[a] };
                    *slot += travel * contag[a] * mixing;
                }
            }
        }

        let mut keep_going = true;
        for ((pop, observer), infec) in self.pops.iter_mut().zip(&mut self.observers).zip(&self.infec) {
            keep_going &= pop.tick(tick, ctx, infec, rng, rep, observer.as_mut())?;
        }
        Ok(keep_going)
    }
}
