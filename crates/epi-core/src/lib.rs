//! `epi-core`: foundational types for the epi metapopulation simulator.
//!
//! This crate is a dependency of every other `epi-*` crate.  It has no
//! `epi-*` dependencies and few external ones (`rand`, `rand_distr` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`ids`]      | `PopulationId`, `GroupId`, `ProcessCompartmentId`, `ChannelId` |
//! | [`time`]     | `Tick`, `TimeGrid`                                         |
//! | [`rng`]      | `Randomizer` capability trait, `SimRng`                    |
//! | [`sampling`] | `SamplingMode`, `draw_binomial`, `draw_multinomial`        |
//! | [`matrix`]   | `Matrix` (dense row-major `f64`)                           |
//! | [`error`]    | `CoreError`, `CoreResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids, `Matrix` and        |
//! |         | `SamplingMode`.  Required by `epi-config`.                 |

pub mod error;
pub mod ids;
pub mod matrix;
pub mod rng;
pub mod sampling;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::{ChannelId, GroupId, PopulationId, ProcessCompartmentId};
pub use matrix::Matrix;
pub use rng::{Randomizer, SimRng};
pub use sampling::{SamplingMode, draw_binomial, draw_multinomial};
pub use time::{Tick, TimeGrid};
