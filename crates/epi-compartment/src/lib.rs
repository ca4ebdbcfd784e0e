//! `epi-compartment`: delay-structured holding stages.
//!
//! # Crate layout
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`delay`]       | `DelayDist`: discrete sojourn-time pmf               |
//! | [`compartment`] | `Compartment`: cohort buffer with `add`/`mature`     |
//! | [`error`]       | `CompartmentError`, `CompartmentResult<T>`            |
//!
//! # Maturation model
//!
//! A compartment holds a queue of bins, one per future time step.  Adding a
//! cohort spreads it over the bins according to its `DelayDist`; each call to
//! [`Compartment::mature`] pops the front bin and returns it.
//!
//! ```text
//! add(n, [0.0, 0.5, 0.5])   bins: [0, n/2, n/2]
//! mature() -> 0             bins: [n/2, n/2]
//! mature() -> n/2           bins: [n/2]
//! mature() -> n/2           bins: []
//! ```
//!
//! Weight at index 0 therefore leaves on the `mature` call of the step in
//! which it was added (if `mature` follows `add` in that step).

pub mod compartment;
pub mod delay;
pub mod error;


pub use compartment::Compartment;
pub use delay::DelayDist;
pub use error::{CompartmentError, CompartmentResult};
