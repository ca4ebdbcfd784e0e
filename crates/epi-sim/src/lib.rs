//! `epi-sim`: population dynamics and the run driver.
//!
//! # Tick
//!
//! ```text
//! for tick in 0..grid.n_steps():
//!   Metapopulation::tick
//!     ① Contagiousness : per population: due seed events (S → E), due
//!                        schedule changes, rate recalculation, then
//!                        (fIp·Ip + fIa·Ia + fIs·Is) / size per age.
//!     ② Mixing         : infec[i][a] = Σ_j travel(j,i) · contag[j][a] · (τ_j[a] if j ≠ i)
//!     ③ Population::tick, per population and age group:
//!          prevalence snapshot (whole time units only)
//!          S→E, E→Ip/Ia, Ip→Is (+ reporting delay C), Is→H, H→R, Ia→R
//!          mature every process compartment
//!          seed every process from its hookpoint
//!          accumulate incidence / outcidence
//!          observer
//!   stop if any observer returned false
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                          |
//! |------------|-------------------------------------------------|
//! | `parallel` | `run_replicates` runs on Rayon's thread pool.   |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use epi_config::Parameters;
//! use epi_core::SimRng;
//! use epi_sim::SimBuilder;
//!
//! let params = Parameters::from_json_path("params.json".as_ref())?;
//! let reporter = SimBuilder::new(&params).build()?.run(&mut SimRng::new(42))?;
//! ```

pub mod builder;
pub mod error;
pub mod metapopulation;
pub mod observer;
pub mod population;
pub mod sim;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use metapopulation::Metapopulation;
pub use observer::{NoopObserver, PopulationObserver};
pub use population::Population;
pub use sim::{Simulation, run_replicates, run_simulation};
