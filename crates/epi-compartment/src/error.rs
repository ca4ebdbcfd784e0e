use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompartmentError {
    #[error("cannot add a negative or non-finite count ({0}) to a compartment")]
    InvalidCount(f64),

    #[error("invalid delay distribution: {0}")]
    InvalidDelay(String),
}

pub type CompartmentResult<T> = Result<T, CompartmentError>;
