//! `epi-report`: time-series accumulation and export.
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`channel`] | `ReportKind`, `BuiltinChannel`, `ChannelLayout`              |
//! | [`reporter`]| `Reporter`: dense `(row, population, group, channel)` table |
//! | [`writer`]  | `OutputWriter` trait                                         |
//! | [`csv`]     | `CsvWriter`: long-format CSV backend                        |
//! | [`error`]   | `ReportError`, `ReportResult<T>`                             |
//!
//! # Channels
//!
//! Channels 0–8 are fixed:
//!
//! | Id | Name             | Kind       |
//! |----|------------------|------------|
//! | 0  | `S`              | prevalence |
//! | 1  | `E`              | prevalence |
//! | 2  | `Ip`             | prevalence |
//! | 3  | `Is`             | prevalence |
//! | 4  | `Ia`             | prevalence |
//! | 5  | `R`              | prevalence |
//! | 6  | `cases`          | incidence  |
//! | 7  | `cases_reported` | incidence  |
//! | 8  | `subclinical`    | incidence  |
//!
//! Then one channel per `(process compartment, report tag)` in declaration
//! order, named `<compartment>_<tag>`.

pub mod channel;
pub mod csv;
pub mod error;
pub mod reporter;
pub mod writer;

#[cfg(test)]
mod tests;

pub use channel::{BuiltinChannel, ChannelLayout, ProcessChannel, ReportKind};
pub use csv::CsvWriter;
pub use error::{ReportError, ReportResult};
pub use reporter::Reporter;
pub use writer::OutputWriter;
