//! `epi-config`: simulation parameters and the resolved process plan.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`params`]   | `Parameters`, `PopulationParams`, `SeedEvent`, `ScheduledChange` |
//! | [`delay`]    | `DelaySpec`: serialisable delay description               |
//! | [`rates`]    | `PopulationRates`: per-run mutable rate cache             |
//! | [`process`]  | `ProcessDecl`, `BuiltinFlow`, `Hookpoint`, `ProcessPlan`   |
//! | [`loader`]   | JSON loading                                               |
//! | [`error`]    | `ConfigError`, `ConfigResult<T>`                           |
//!
//! # Lifecycle
//!
//! ```text
//! JSON ──serde──▶ Parameters ──validate──▶ read-only for the whole run
//!                     │
//!                     ├──▶ ProcessPlan::resolve   (ids + hookpoint bindings)
//!                     └──▶ PopulationRates::new   (one copy per population per run;
//!                                                   the only thing schedules mutate)
//! ```

pub mod delay;
pub mod error;
pub mod loader;
pub mod params;
pub mod process;
pub mod rates;

#[cfg(test)]
mod tests;

pub use delay::DelaySpec;
pub use error::{ConfigError, ConfigResult};
pub use params::{Parameters, PopulationParams, ScheduledChange, ScheduledVariable, SeedEvent};
pub use process::{BuiltinFlow, Hookpoint, ProcessDecl, ProcessPlan, ResolvedCompartment, ResolvedProcess};
pub use rates::{BuiltinDelays, PopulationRates};
