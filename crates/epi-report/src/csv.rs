//! CSV output backend.
//!
//! Long format, one record per `(run, row, population, group)`:
//!
//! ```text
//! run,t,population,group,S,E,Ip,Is,Ia,R,cases,cases_reported,subclinical,...
//! ```
//!
//! The header is taken from the first reporter written; later reporters must
//! share its channel layout.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;
use epi_core::{ChannelId, GroupId, PopulationId};

use crate::writer::OutputWriter;
use crate::{ReportError, ReportResult, Reporter};

const KEY_COLUMNS: [&str; 4] = ["run", "t", "population", "group"];

/// Writes reporters to a CSV sink.
pub struct CsvWriter<W: Write = File> {
    inner:    Writer<W>,
    columns:  Option<Vec<String>>,
    finished: bool,
}

impl CsvWriter<File> {
    /// Create (or truncate) the file at `path`.
    pub fn create(path: &Path) -> ReportResult<Self> {
        Ok(Self::from_writer(File::create(path)?))
    }
}

impl<W: Write> CsvWriter<W> {
    pub fn from_writer(sink: W) -> Self {
        Self {
            inner:    Writer::from_writer(sink),
            columns:  None,
            finished: false,
        }
    }

    /// Flush and hand back the sink.
    pub fn into_inner(mut self) -> ReportResult<W> {
        self.inner.flush()?;
        self.inner
            .into_inner()
            .map_err(|e| ReportError::Io(e.into_error()))
    }

    fn write_header(&mut self, reporter: &Reporter) -> ReportResult<()> {
        match &self.columns {
            Some(expected) if expected.as_slice() != reporter.col_names() => {
                Err(ReportError::LayoutMismatch {
                    expected: expected.clone(),
                    got:      reporter.col_names().to_vec(),
                })
            }
            Some(_) => Ok(()),
            None => {
                let header = KEY_COLUMNS
                    .iter()
                    .map(|s| s.to_string())
                    .chain(reporter.col_names().iter().cloned());
                self.inner.write_record(header)?;
                self.columns = Some(reporter.col_names().to_vec());
                Ok(())
            }
        }
    }
}

impl<W: Write> OutputWriter for CsvWriter<W> {
    fn write_reporter(&mut self, run: usize, reporter: &Reporter) -> ReportResult<()> {
        self.write_header(reporter)?;

        let n_channels = reporter.layout().len();
        let mut record: Vec<String> = Vec::with_capacity(KEY_COLUMNS.len() + n_channels);

        for row in 0..reporter.n_rows() {
            for p in 0..reporter.n_populations() {
                let pop = PopulationId(p as u32);
                for a in 0..reporter.n_groups() {
                    let group = GroupId(a as u32);
                    record.clear();
                    record.push(run.to_string());
                    record.push(reporter.row_time(row).to_string());
                    record.push(reporter.population_name(pop).to_owned());
                    record.push(reporter.group_name(group).to_owned());
                    for ch in 0..n_channels {
                        let ch = ChannelId(ch as u32);
                        record.push(reporter.get(row, pop, group, ch).to_string());
                    }
                    self.inner.write_record(&record)?;
                }
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> ReportResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.inner.flush()?;
        Ok(())
    }
}
