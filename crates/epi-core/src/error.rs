//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

/// Errors raised by `epi-core` primitives.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("matrix row {row} has {got} columns, expected {expected}")]
    RaggedMatrix {
        row:      usize,
        expected: usize,
        got:      usize,
    },

    #[error("matrix index ({row}, {col}) out of range for {rows}x{cols} matrix")]
    OutOfRange {
        row:  usize,
        col:  usize,
        rows: usize,
        cols: usize,
    },

    #[error("probability vector is empty or sums to zero")]
    EmptyProbabilities,
}

/// Shorthand result type for `epi-core`.
pub type CoreResult<T> = Result<T, CoreError>;
