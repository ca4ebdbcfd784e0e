//! The `Compartment` delay buffer.

use std::collections::VecDeque;

use epi_core::{Randomizer, SamplingMode};

use crate::{CompartmentError, CompartmentResult, DelayDist};

/// A delay-structured holding stage.
///
/// # Contract
///
/// - `size()` is the current occupancy and never negative.
/// - Total added minus total matured equals `size()`.
/// - `mature()` is called at most once per compartment per tick; the caller
///   (the population tick) enforces this.
///
/// In stochastic mode the randomness is drawn when a cohort is added: the
/// cohort is split over future bins by one [`Randomizer::multinomial`] draw, so every later
/// `mature()` returns a whole number that never exceeds the occupancy.
#[derive(Clone, Debug, Default)]
pub struct Compartment {
    bins: VecDeque<f64>,
    size: f64,
}

impl Compartment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enrol `n` individuals whose sojourn follows `delay`.
    pub fn add(
        &mut self,
        n:     f64,
        delay: &DelayDist,
        mode:  SamplingMode,
        rng:   &mut dyn Randomizer,
    ) -> CompartmentResult<()> {
        if !n.is_finite() || n < 0.0 {
            return Err(CompartmentError::InvalidCount(n));
        }
        if n == 0.0 {
            return Ok(());
        }
        if self.bins.len() < delay.len() {
            self.bins.resize(delay.len(), 0.0);
        }

        match mode {
            SamplingMode::Deterministic => {
                for (bin, w) in self.bins.iter_mut().zip(delay.weights()) {
                    *bin += n * w;
                }
                self.size += n;
            }
            SamplingMode::Stochastic => {
                let count = n.round() as u64;
                let mut counts = vec![0; delay.len()];
                rng.multinomial(count, delay.weights(), &mut counts);
                for (bin, k) in self.bins.iter_mut().zip(counts) {
                    *bin += k as f64;
                }
                self.size += count as f64;
            }
        }
        Ok(())
    }

    /// Advance one step and return the number of individuals leaving.
    pub fn mature(&mut self) -> f64 {
        let out = self.bins.pop_front().unwrap_or(0.0);
        if self.bins.is_empty() {
            self.size = 0.0;
        } else {
            self.size = (self.size - out).max(0.0);
        }
        out
    }

    /// Current occupancy.
    #[inline]
    pub fn size(&self) -> f64 {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0.0
    }
}
