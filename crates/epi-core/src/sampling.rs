//! Mode-aware draw helpers.
//!
//! Every transition in the model is either a binomial thinning of a count or
//! a multinomial split of it.  In deterministic mode the helpers return the
//! expectation; in stochastic mode they sample through the [`Randomizer`].
//! Counts are carried as `f64` in both modes so the two share one code path.

use crate::Randomizer;

/// Whether transitions are sampled or replaced by their expectation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SamplingMode {
    Deterministic,
    #[default]
    Stochastic,
}

impl SamplingMode {
    /// `deterministic = true` → `Deterministic`.
    pub fn from_flag(deterministic: bool) -> Self {
        if deterministic {
            SamplingMode::Deterministic
        } else {
            SamplingMode::Stochastic
        }
    }

    #[inline]
    pub fn is_deterministic(self) -> bool {
        self == SamplingMode::Deterministic
    }
}

/// Branch weights within this of one count as a full split.
const SHORTFALL_TOLERANCE: f64 = 1e-9;

/// Round a stochastic-mode count to the integer it represents.
#[inline]
pub(crate) fn as_count(n: f64) -> u64 {
    if n > 0.0 { n.round() as u64 } else { 0 }
}

/// Binomial thinning of `n` with probability `p`.
///
/// Deterministic: `n * p` (with `p` clamped to `[0, 1]`).
pub fn draw_binomial(mode: SamplingMode, rng: &mut dyn Randomizer, n: f64, p: f64) -> f64 {
    match mode {
        SamplingMode::Deterministic => n.max(0.0) * p.clamp(0.0, 1.0),
        SamplingMode::Stochastic => rng.binomial(as_count(n), p) as f64,
    }
}

/// Split `n` across `probs`, writing one count per entry into `out`.
///
/// `probs` need not sum to one: any shortfall is an implicit "enters none of
/// these" branch whose members are dropped.  Weights summing above one are
/// normalised.  `out` is resized to `probs.len()`.
///
/// Stochastic: a binomial thins `n` to the members taking any branch, then
/// [`Randomizer::multinomial`] splits them.
pub fn draw_multinomial(
    mode:  SamplingMode,
    rng:   &mut dyn Randomizer,
    n:     f64,
    probs: &[f64],
    out:   &mut Vec<f64>,
) {
    out.clear();
    out.resize(probs.len(), 0.0);
    let total: f64 = probs.iter().map(|p| p.max(0.0)).sum();

    match mode {
        SamplingMode::Deterministic => {
            let n = n.max(0.0);
            let scale = total.max(1.0);
            for (p, slot) in probs.iter().zip(out.iter_mut()) {
                *slot = n * p.max(0.0) / scale;
            }
        }
        SamplingMode::Stochastic => {
            let n = as_count(n);
            let branching = if total < 1.0 - SHORTFALL_TOLERANCE { rng.binomial(n, total) } else { n };
            let mut counts = vec![0; probs.len()];
            rng.multinomial(branching, probs, &mut counts);
            for (slot, k) in out.iter_mut().zip(counts) {
                *slot = k as f64;
            }
        }
    }
}
