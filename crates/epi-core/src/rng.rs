//! The random-number capability and its default implementation.
//!
//! # Determinism strategy
//!
//! A run threads one `&mut dyn Randomizer` through every stochastic call in a
//! fixed order (populations ascending, age groups ascending, transitions in
//! chain order), so the same seed always reproduces the same output.
//!
//! Independent replicates each get their own `SimRng`, derived up front from
//! a root seed with [`SimRng::child`]:
//!
//!   seed = root.next_u64() XOR (replicate * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive replicate indices across the seed space.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Binomial, Distribution};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── Randomizer ────────────────────────────────────────────────────────────────

/// Random draws needed by the simulation.
///
/// # Contract
///
/// - `binomial(0, p)` is `0`; `binomial(n, 0.0)` is `0`; `binomial(n, 1.0)`
///   is `n`.  None of these edge cases may fail or consume randomness in a
///   way that makes the result differ from those values.
/// - `multinomial` normalises `probs` by their sum and writes one count per
///   category into `out` (same length as `probs`); the counts sum to `n`
///   unless every probability is zero, in which case `out` is all zeros.
///   `multinomial(1, w, out)` is therefore a categorical draw.
/// - Implementations are used by exactly one thread at a time.
pub trait Randomizer {
    /// Number of successes in `n` trials with success probability `p`.
    fn binomial(&mut self, n: u64, p: f64) -> u64;

    /// Split `n` individuals across categories with weights `probs`.
    ///
    /// The default implementation uses sequential conditional binomials; the
    /// last category with positive weight takes whatever remains.
    fn multinomial(&mut self, n: u64, probs: &[f64], out: &mut [u64]) {
        debug_assert_eq!(probs.len(), out.len());
        out.fill(0);
        let Some(last) = probs.iter().rposition(|&p| p > 0.0) else {
            return;
        };
        let mut mass: f64 = probs.iter().map(|p| p.max(0.0)).sum();
        let mut remaining = n;
        for (i, (p, slot)) in probs.iter().zip(out.iter_mut()).enumerate() {
            if remaining == 0 {
                break;
            }
            let p = p.max(0.0);
            *slot = if i == last {
                remaining
            } else if p <= 0.0 {
                0
            } else {
                self.binomial(remaining, (p / mass).min(1.0))
            };
            remaining -= *slot;
            mass -= p;
        }
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Run-level RNG backed by `SmallRng`.
///
/// `!Sync` by construction: hand each replicate its own instance.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` with a different seed offset, used to seed
    /// one RNG per replicate deterministically from the root seed.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }
}

impl Randomizer for SimRng {
    fn binomial(&mut self, n: u64, p: f64) -> u64 {
        // `!(p > 0.0)` also catches NaN.
        if n == 0 || !(p > 0.0) {
            return 0;
        }
        if p >= 1.0 {
            return n;
        }
        match Binomial::new(n, p) {
            Ok(dist) => dist.sample(&mut self.0),
            Err(_) => 0,
        }
    }
}
