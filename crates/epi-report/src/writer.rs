//! The `OutputWriter` trait implemented by reporter export backends.

use crate::{ReportResult, Reporter};

/// Sink for finished reporters.
///
/// A writer may receive several reporters (one per replicate); `run` is the
/// replicate index written alongside every row.
pub trait OutputWriter {
    /// Append every row of `reporter`, tagged with `run`.
    fn write_reporter(&mut self, run: usize, reporter: &Reporter) -> ReportResult<()>;

    /// Flush the underlying sink.
    ///
    /// Idempotent, safe to call more than once.
    fn finish(&mut self) -> ReportResult<()>;
}
