use epi_compartment::CompartmentError;
use epi_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid parameter {field}: {reason}")]
    Invalid {
        field:  String,
        reason: String,
    },

    #[error("process {process:?} has unknown source {source_name:?}")]
    UnknownSource {
        process:     String,
        source_name: String,
    },

    #[error("process compartment name {0:?} is used more than once or clashes with a built-in state")]
    DuplicateCompartment(String),

    #[error("delay error in {field}: {source}")]
    Delay {
        field:  String,
        #[source]
        source: CompartmentError,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid { field: field.into(), reason: reason.into() }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
