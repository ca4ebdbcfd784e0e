//! Simulation time model.
//!
//! # Design
//!
//! The canonical clock is an integer step counter, `Tick`.  Model time is
//! derived from it:
//!
//!   t = time0 + tick * time_step
//!
//! The reporter records one row per whole unit of model time, so with
//! `report_every` steps per unit:
//!
//!   row            = tick / report_every
//!   is_report_tick = tick % report_every == 0
//!
//! Deciding "is this an integer time?" on the integer counter keeps the
//! prevalence snapshots exact for step sizes such as 0.1 that have no exact
//! binary representation.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation step counter, starting at 0 for `time0`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── TimeGrid ──────────────────────────────────────────────────────────────────

/// Maps step counters to model time and reporter rows.
///
/// Cheap to copy; holds no heap data.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimeGrid {
    /// Model time of tick 0.
    pub time0: f64,
    /// Last model time that receives a reporter row.
    pub time1: f64,
    /// Model time advanced by one tick.
    pub time_step: f64,
    /// Ticks per reporter row.
    pub report_every: u32,
}

impl TimeGrid {
    pub fn new(time0: f64, time1: f64, time_step: f64, report_every: u32) -> Self {
        Self { time0, time1, time_step, report_every }
    }

    /// `true` when exactly `report_every` steps make up one unit of time.
    pub fn steps_align(&self) -> bool {
        self.report_every > 0 && self.time_step == 1.0 / f64::from(self.report_every)
    }

    /// Number of reporter rows: one per whole time unit in `[time0, time1]`.
    pub fn n_rows(&self) -> usize {
        if self.time1 < self.time0 {
            return 0;
        }
        (self.time1 - self.time0) as usize + 1
    }

    /// Number of ticks the driver executes, `(1 + time1 - time0) / time_step`.
    ///
    /// Computed on the row count so the final tick always lands inside the
    /// last reporter row.
    pub fn n_steps(&self) -> u64 {
        self.n_rows() as u64 * u64::from(self.report_every)
    }

    /// Model time at `tick`.
    #[inline]
    pub fn time_at(&self, tick: Tick) -> f64 {
        self.time0 + tick.0 as f64 * self.time_step
    }

    /// Reporter row that `tick` contributes to.
    #[inline]
    pub fn row_of(&self, tick: Tick) -> usize {
        (tick.0 / u64::from(self.report_every.max(1))) as usize
    }

    /// `true` when `tick` falls on a whole unit of model time.
    #[inline]
    pub fn is_report_tick(&self, tick: Tick) -> bool {
        tick.0 % u64::from(self.report_every.max(1)) == 0
    }

    /// Model time of reporter row `row`.
    #[inline]
    pub fn row_time(&self, row: usize) -> f64 {
        self.time0 + row as f64
    }
}
