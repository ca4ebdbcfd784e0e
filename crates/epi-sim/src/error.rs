use epi_compartment::CompartmentError;
use epi_config::ConfigError;
use epi_core::{GroupId, PopulationId};
use epi_report::ReportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(
        "population {population}, age group {group}: cannot seed {requested} individuals, \
         only {available} susceptible"
    )]
    InsufficientSusceptible {
        population: PopulationId,
        group:      GroupId,
        requested:  f64,
        available:  f64,
    },

    #[error("observer registered for population {index}, but there are only {count} populations")]
    UnknownPopulation {
        index: usize,
        count: usize,
    },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("reporter error: {0}")]
    Report(#[from] ReportError),

    #[error("compartment error: {0}")]
    Compartment(#[from] CompartmentError),
}

pub type SimResult<T> = Result<T, SimError>;
