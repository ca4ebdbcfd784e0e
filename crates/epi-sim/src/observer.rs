//! Per-population observer hook.

use crate::Population;

/// Called once per tick, after a population's transitions and reporting.
///
/// Returning `false` asks the run to stop.  Every population still finishes
/// the current tick; the driver then returns the reporter as it stands.
///
/// Any `FnMut(f64, &Population) -> bool` closure is an observer:
///
/// ```rust,ignore
/// let stop_at_100_cases = |_t: f64, pop: &Population| pop.symptomatic_total() < 100.0;
/// let sim = SimBuilder::new(&params).observer(0, stop_at_100_cases).build()?;
/// ```
pub trait PopulationObserver {
    fn observe(&mut self, t: f64, population: &Population) -> bool;
}

impl<F> PopulationObserver for F
where
    F: FnMut(f64, &Population) -> bool,
{
    #[inline]
    fn observe(&mut self, t: f64, population: &Population) -> bool {
        self(t, population)
    }
}

/// Never stops the run.
pub struct NoopObserver;

impl PopulationObserver for NoopObserver {
    #[inline]
    fn observe(&mut self, _t: f64, _population: &Population) -> bool {
        true
    }
}
